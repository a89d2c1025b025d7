use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc, serde::ts_seconds};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JournalEntry {
    pub id: Uuid,
    #[serde(with = "ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub input: String,
    pub response: String,
}

/// Bounded journal of handled commands, one entry per input line. Saved as
/// pretty JSON; autosaves every few records so a crash loses little.
pub struct Journal {
    file_path: PathBuf,
    max_entries: usize,
    entries: Vec<JournalEntry>,
}

impl Journal {
    const AUTOSAVE_EVERY: usize = 10;

    pub fn new(data_dir: &Path) -> Self {
        Self {
            file_path: data_dir.join("journal.json"),
            max_entries: 1000,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, input: &str, response: &str) {
        self.entries.push(JournalEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            input: input.to_string(),
            response: response.to_string(),
        });

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }

        // Ignore autosave errors; the exit-time save reports them.
        if self.entries.len() % Self::AUTOSAVE_EVERY == 0 {
            let _ = self.save();
        }
    }

    pub fn load(&mut self) -> Result<(), String> {
        if !self.file_path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(&self.file_path)
            .map_err(|e| format!("Failed to read journal: {}", e))?;

        self.entries = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid journal format: {}", e))?;

        if self.entries.len() > self.max_entries {
            let start = self.entries.len() - self.max_entries;
            self.entries = self.entries[start..].to_vec();
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| format!("Failed to serialize journal: {}", e))?;

        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, &json)
            .map_err(|e| format!("Failed to write journal: {}", e))?;

        fs::rename(&temp_path, &self.file_path)
            .map_err(|e| format!("Failed to finalize journal save: {}", e))?;

        Ok(())
    }

    pub fn last_n(&self, n: usize) -> &[JournalEntry] {
        let n = n.min(self.entries.len());
        &self.entries[self.entries.len() - n..]
    }

    #[allow(dead_code)]
    pub fn search(&self, query: &str) -> Vec<&JournalEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry.input.to_lowercase().contains(&query)
                    || entry.response.to_lowercase().contains(&query)
            })
            .rev()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_journal(name: &str) -> Journal {
        let dir = std::env::temp_dir().join(format!("ligabot_journal_{}", name));
        let _ = fs::create_dir_all(&dir);
        let _ = fs::remove_file(dir.join("journal.json"));
        Journal::new(&dir)
    }

    #[test]
    fn test_record_and_last_n() {
        let mut journal = test_journal("record");
        journal.record("помощ", "Налични команди: ...");
        journal.record("изход", "До скоро!");

        assert_eq!(journal.len(), 2);
        let last = journal.last_n(1);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].input, "изход");
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut journal = test_journal("cap");
        journal.max_entries = 3;
        for i in 0..5 {
            journal.record(&format!("команда {}", i), "ок");
        }
        assert_eq!(journal.len(), 3);
        assert_eq!(journal.last_n(3)[0].input, "команда 2");
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = std::env::temp_dir().join("ligabot_journal_roundtrip");
        let _ = fs::create_dir_all(&dir);
        let _ = fs::remove_file(dir.join("journal.json"));

        let mut journal = Journal::new(&dir);
        journal.record("покажи всички клубове", "1. Левски");
        journal.save().unwrap();

        let mut reloaded = Journal::new(&dir);
        reloaded.load().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.last_n(1)[0].response, "1. Левски");
    }

    #[test]
    fn test_search_matches_input_and_response() {
        let mut journal = test_journal("search");
        journal.record("добави клуб Левски", "Клуб 'Левски' беше добавен успешно.");
        journal.record("помощ", "Налични команди");

        assert_eq!(journal.search("левски").len(), 1);
        assert_eq!(journal.search("команди").len(), 1);
        assert!(journal.search("няма").is_empty());
    }
}

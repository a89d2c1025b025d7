use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

use crate::core::types::{Club, Player};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LeagueData {
    clubs: Vec<Club>,
    players: Vec<Player>,
    next_club_id: i64,
    next_player_id: i64,
}

impl LeagueData {
    fn empty() -> Self {
        Self {
            clubs: Vec::new(),
            players: Vec::new(),
            next_club_id: 1,
            next_player_id: 1,
        }
    }
}

/// JSON-file registry of clubs and players. Loaded once at startup and
/// written back (temp file + rename) after every mutating command.
pub struct Store {
    file_path: PathBuf,
    data: LeagueData,
    dirty: bool,
}

impl Store {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file_path: data_dir.join("league.json"),
            data: LeagueData::empty(),
            dirty: false,
        }
    }

    /// Load the registry. A missing file is a first run: the registry is
    /// seeded with the classic clubs and marked dirty so it gets written.
    pub fn load(&mut self) -> Result<(), String> {
        if !self.file_path.exists() {
            self.seed_clubs();
            return Ok(());
        }

        let content = fs::read_to_string(&self.file_path)
            .map_err(|e| format!("Failed to read league registry: {}", e))?;

        self.data = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid league registry format: {}", e))?;

        Ok(())
    }

    pub fn save(&mut self) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| format!("Failed to serialize league registry: {}", e))?;

        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, &json)
            .map_err(|e| format!("Failed to write league registry: {}", e))?;

        fs::rename(&temp_path, &self.file_path)
            .map_err(|e| format!("Failed to finalize league registry save: {}", e))?;

        self.dirty = false;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn seed_clubs(&mut self) {
        let seed = [
            ("Левски София", "София", 1914),
            ("ЦСКА София", "София", 1948),
            ("Ботев Пловдив", "Пловдив", 1912),
            ("Лудогорец Разград", "Разград", 1945),
            ("Черно море Варна", "Варна", 1913),
            ("Спартак Варна", "Варна", 1929),
            ("Локомотив Пловдив", "Пловдив", 1926),
            ("Берое Стара Загора", "Стара Загора", 1916),
        ];

        for (name, city, founded_year) in seed {
            let id = self.data.next_club_id;
            self.data.next_club_id += 1;
            self.data.clubs.push(Club::new(id, name, city, founded_year));
        }
        self.dirty = true;
    }

    // --- clubs ---

    pub fn clubs(&self) -> &[Club] {
        &self.data.clubs
    }

    pub fn find_club_by_name(&self, name: &str) -> Option<&Club> {
        let wanted = name.trim().to_lowercase();
        self.data.clubs.iter().find(|c| c.name.to_lowercase() == wanted)
    }

    pub fn find_club_by_id(&self, id: i64) -> Option<&Club> {
        self.data.clubs.iter().find(|c| c.id == id)
    }

    /// Two-stage reference lookup: exact case-insensitive name first, then
    /// numeric id.
    pub fn resolve_club_id(&self, identifier: &str) -> Option<i64> {
        if let Some(club) = self.find_club_by_name(identifier) {
            return Some(club.id);
        }
        identifier
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|id| self.find_club_by_id(id))
            .map(|club| club.id)
    }

    pub fn add_club(&mut self, name: &str, city: &str, founded_year: i32) -> i64 {
        let id = self.data.next_club_id;
        self.data.next_club_id += 1;
        self.data.clubs.push(Club::new(id, name.trim(), city, founded_year));
        self.dirty = true;
        id
    }

    pub fn remove_club(&mut self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        let before = self.data.clubs.len();
        self.data.clubs.retain(|c| c.name.to_lowercase() != wanted);
        let removed = self.data.clubs.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    // --- players ---

    pub fn players(&self) -> &[Player] {
        &self.data.players
    }

    pub fn find_player_by_id(&self, id: i64) -> Option<&Player> {
        self.data.players.iter().find(|p| p.id == id)
    }

    /// Two-stage reference lookup, same policy as clubs: exact
    /// case-insensitive full name first, then numeric id.
    pub fn resolve_player_id(&self, identifier: &str) -> Option<i64> {
        let wanted = identifier.trim().to_lowercase();
        if let Some(player) = self
            .data
            .players
            .iter()
            .find(|p| p.full_name.to_lowercase() == wanted)
        {
            return Some(player.id);
        }
        identifier
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|id| self.find_player_by_id(id))
            .map(|player| player.id)
    }

    pub fn player_exists_in_club(&self, full_name: &str, club_id: i64) -> bool {
        let wanted = full_name.trim().to_lowercase();
        self.data
            .players
            .iter()
            .any(|p| p.club_id == club_id && p.full_name.to_lowercase() == wanted)
    }

    pub fn add_player(&mut self, player: Player) -> i64 {
        let id = self.data.next_player_id;
        self.data.next_player_id += 1;
        self.data.players.push(Player { id, ..player });
        self.dirty = true;
        id
    }

    pub fn update_player<F>(&mut self, id: i64, apply: F) -> bool
    where
        F: FnOnce(&mut Player),
    {
        match self.data.players.iter_mut().find(|p| p.id == id) {
            Some(player) => {
                apply(player);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn remove_player(&mut self, id: i64) -> bool {
        let before = self.data.players.len();
        self.data.players.retain(|p| p.id != id);
        let removed = self.data.players.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ligabot_store_{}", name));
        let _ = fs::create_dir_all(&dir);
        let _ = fs::remove_file(dir.join("league.json"));
        dir
    }

    fn test_store(name: &str) -> Store {
        Store::new(&test_dir(name))
    }

    #[test]
    fn test_first_run_seeds_clubs() {
        let mut store = test_store("seed");
        store.load().unwrap();
        assert_eq!(store.clubs().len(), 8);
        assert!(store.is_dirty());
        assert!(store.find_club_by_name("левски софия").is_some());
    }

    #[test]
    fn test_resolve_club_by_name_then_id() {
        let mut store = test_store("resolve");
        let id = store.add_club("Ботев Враца", "Враца", 1921);

        assert_eq!(store.resolve_club_id("ботев враца"), Some(id));
        assert_eq!(store.resolve_club_id(&id.to_string()), Some(id));
        assert_eq!(store.resolve_club_id("няма такъв"), None);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = test_dir("roundtrip");
        let mut store = Store::new(&dir);
        store.add_club("Марек Дупница", "Дупница", 1947);
        store.save().unwrap();
        assert!(!store.is_dirty());

        let mut reloaded = Store::new(&dir);
        reloaded.load().unwrap();
        assert_eq!(reloaded.clubs().len(), 1);
        assert_eq!(reloaded.clubs()[0].name, "Марек Дупница");
        // id counter survives the round trip
        let next = reloaded.add_club("Пирин Благоевград", "Благоевград", 1922);
        assert_eq!(next, 2);
    }

    #[test]
    fn test_player_ids_are_monotonic() {
        let mut store = test_store("players");
        let club_id = store.add_club("Славия София", "София", 1913);

        let template = Player {
            id: 0,
            club_id,
            full_name: "Иван Иванов".to_string(),
            birth_date: "1995-03-15".to_string(),
            nationality: "България".to_string(),
            position: "GK".to_string(),
            number: 1,
            status: "Активен".to_string(),
        };

        let first = store.add_player(template.clone());
        let second = store.add_player(Player {
            full_name: "Петър Петров".to_string(),
            ..template
        });
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert!(store.player_exists_in_club("иван иванов", club_id));
    }
}

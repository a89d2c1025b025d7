use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::{Path, PathBuf};

use crate::output::Printer;

pub struct Repl {
    editor: DefaultEditor,
    history_file: PathBuf,
    printer: Printer,
}

impl Repl {
    pub fn new(data_dir: &Path) -> Result<Self, String> {
        let editor = DefaultEditor::new()
            .map_err(|e| format!("Failed to initialize line editor: {}", e))?;

        let mut repl = Self {
            editor,
            history_file: data_dir.join("repl_history.txt"),
            printer: Printer::new(),
        };

        if repl.history_file.exists() {
            repl.editor.load_history(&repl.history_file).ok();
        }

        Ok(repl)
    }

    /// Read one command line. `Ok(None)` means end of input (Ctrl+D);
    /// an empty string means "nothing to do, prompt again".
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ReadlineError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return Ok(Some(String::new()));
                }
                self.editor.add_history_entry(trimmed)?;
                Ok(Some(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                Ok(Some(String::new()))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn save_history(&mut self) -> Result<(), String> {
        self.editor
            .save_history(&self.history_file)
            .map_err(|e| format!("Failed to save REPL history: {}", e))
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }
}

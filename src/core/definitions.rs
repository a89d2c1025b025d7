use std::fs;
use std::path::Path;
use sha2::{Sha256, Digest};

use crate::core::intent::IntentDefinition;

/// Definitions read from disk together with the digest of the file they
/// came from. The digest gates `reload`: same digest, no rebuild.
#[derive(Debug)]
pub struct LoadedDefinitions {
    pub definitions: Vec<IntentDefinition>,
    pub digest: String,
}

/// The built-in intent set, written out as intents.json on first run so
/// users can edit phrasings and responses without recompiling.
pub fn default_definitions() -> Vec<IntentDefinition> {
    vec![
        IntentDefinition::new("help", &["помощ", "help", "какво можеш"], &[]),
        IntentDefinition::new("exit", &["изход", "exit", "чао"], &[]),
        IntentDefinition::new(
            "greeting",
            &["здравей", "здрасти", "добър ден"],
            &[
                "Здравей! Как мога да помогна?",
                "Здрасти! Напиши 'помощ' за списък с команди.",
                "Добър ден!",
            ],
        ),
        IntentDefinition::new(
            "thanks",
            &["благодаря", "мерси"],
            &["Моля!", "Няма защо!"],
        ),
        IntentDefinition::new(
            "add_club",
            &["добави клуб [club_name]", "създай клуб [club_name]"],
            &[],
        ),
        IntentDefinition::new(
            "list_clubs",
            &["покажи всички клубове", "списък клубове", "покажи клубове"],
            &[],
        ),
        IntentDefinition::new(
            "delete_club",
            &["изтрий клуб [club_name]", "премахни клуб [club_name]"],
            &[],
        ),
        IntentDefinition::new(
            "add_player",
            &["добави играч [full_name] в клуб [club] позиция [position] номер [number] \
               националност [nationality] дата на раждане [birth_date] статус [status]"],
            &[],
        ),
        IntentDefinition::new(
            "list_players",
            &["покажи всички играчи", "покажи играчи на клуб [club]"],
            &[],
        ),
        IntentDefinition::new(
            "update_player_position",
            &["смени позиция на [player_identifier] на [new_position]"],
            &[],
        ),
        IntentDefinition::new(
            "update_player_number",
            &["смени номер на [player_identifier] на [new_number]"],
            &[],
        ),
        IntentDefinition::new(
            "update_player_status",
            &["смени статус на [player_identifier] на [new_status]"],
            &[],
        ),
        IntentDefinition::new(
            "delete_player",
            &["изтрий играч [player_identifier]", "премахни играч [player_identifier]"],
            &[],
        ),
        IntentDefinition::new(
            "unknown",
            &[],
            &[
                "Не разбирам командата. Напишете 'помощ'.",
                "Не те разбрах. Опитай 'помощ' за списък с команди.",
            ],
        ),
    ]
}

/// Write the default intent set to `path` unless a file is already there.
/// An existing file is never touched, even if it fails to parse.
pub fn materialize_defaults(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }

    let json = serde_json::to_string_pretty(&default_definitions())
        .map_err(|e| format!("Failed to serialize default intents: {}", e))?;

    fs::write(path, json)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

    Ok(true)
}

/// Load intent definitions from disk. Callers treat any error as "zero
/// definitions": the resolver then answers `unknown` for every input.
pub fn load(path: &Path) -> Result<LoadedDefinitions, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;

    let definitions: Vec<IntentDefinition> = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid intents format in {}: {}", path.display(), e))?;

    Ok(LoadedDefinitions {
        definitions,
        digest: digest_of(&content),
    })
}

pub fn digest_of(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

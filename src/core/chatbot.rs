use std::collections::HashMap;
use rand::seq::SliceRandom;

use crate::core::clubs;
use crate::core::intent::{
    compile_patterns, resolve_intent, CompiledPattern, IntentDefinition, ParameterMap, UNKNOWN_TAG,
};
use crate::core::players;
use crate::core::store::Store;

/// What the shell loop should do with a handled line.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Exit,
}

const DEFAULT_REPLY: &str = "Не разбирам командата. Напишете 'помощ'.";

struct CompiledState {
    patterns: Vec<CompiledPattern>,
    responses: HashMap<String, Vec<String>>,
}

/// The chatbot owns its intent definitions and the matcher state compiled
/// from them. Compilation happens on the first resolution and is reused for
/// the life of the instance; `reset` drops it, `rebuild` swaps definitions.
pub struct Chatbot {
    definitions: Vec<IntentDefinition>,
    compiled: Option<CompiledState>,
}

impl Chatbot {
    pub fn new(definitions: Vec<IntentDefinition>) -> Self {
        Self {
            definitions,
            compiled: None,
        }
    }

    /// Drop compiled state; the next resolution recompiles from the same
    /// definitions. Used for test isolation.
    pub fn reset(&mut self) {
        self.compiled = None;
    }

    /// Replace the definitions and recompile lazily.
    pub fn rebuild(&mut self, definitions: Vec<IntentDefinition>) {
        self.definitions = definitions;
        self.compiled = None;
    }

    fn ensure_compiled(&mut self) -> &CompiledState {
        let definitions = &self.definitions;
        self.compiled.get_or_insert_with(|| {
            let patterns = compile_patterns(definitions);
            let mut responses = HashMap::new();
            for definition in definitions {
                responses.insert(definition.tag.clone(), definition.responses.clone());
            }
            CompiledState { patterns, responses }
        })
    }

    /// Resolve one line of input to an intent tag plus extracted parameters.
    pub fn resolve(&mut self, raw_input: &str) -> (String, Option<ParameterMap>) {
        let state = self.ensure_compiled();
        resolve_intent(raw_input, &state.patterns)
    }

    /// Pick one of the tag's configured response templates at random.
    pub fn pick_response(&self, tag: &str) -> Option<String> {
        let responses = match &self.compiled {
            Some(state) => state.responses.get(tag)?,
            None => &self.definitions.iter().find(|d| d.tag == tag)?.responses,
        };
        responses.choose(&mut rand::thread_rng()).cloned()
    }

    /// Resolve and dispatch one line. This is the single entry point the
    /// shell loop calls.
    pub fn handle(&mut self, input: &str, store: &mut Store) -> Reply {
        let (tag, params) = self.resolve(input);
        self.dispatch(&tag, params.as_ref(), store)
    }

    fn dispatch(&mut self, tag: &str, params: Option<&ParameterMap>, store: &mut Store) -> Reply {
        // Generic contract check: a tag with required parameters never
        // reaches its handler without all of them present.
        let required = required_params(tag);
        if !required.is_empty() {
            let missing = match params {
                Some(map) => required.iter().any(|key| !map.contains_key(*key)),
                None => true,
            };
            if missing {
                return Reply::Text(usage_hint(tag).to_string());
            }
        }

        match tag {
            "help" => Reply::Text(self.help_text()),
            "exit" => Reply::Exit,
            "add_club" => Reply::Text(clubs::add_club(store, param(params, "club_name"))),
            "list_clubs" => Reply::Text(clubs::list_clubs(store)),
            "delete_club" => Reply::Text(clubs::delete_club(store, param(params, "club_name"))),
            "add_player" => Reply::Text(players::add_player(
                store,
                param(params, "club"),
                param(params, "full_name"),
                param(params, "birth_date"),
                param(params, "nationality"),
                param(params, "position"),
                param(params, "number"),
                param(params, "status"),
            )),
            "list_players" => {
                let club = params.and_then(|map| map.get("club")).map(|s| s.as_str());
                Reply::Text(players::list_players(store, club))
            }
            "update_player_position" => Reply::Text(players::update_player_position(
                store,
                param(params, "player_identifier"),
                param(params, "new_position"),
            )),
            "update_player_number" => Reply::Text(players::update_player_number(
                store,
                param(params, "player_identifier"),
                param(params, "new_number"),
            )),
            "update_player_status" => Reply::Text(players::update_player_status(
                store,
                param(params, "player_identifier"),
                param(params, "new_status"),
            )),
            "delete_player" => Reply::Text(players::delete_player(
                store,
                param(params, "player_identifier"),
            )),
            _ => {
                let text = self
                    .pick_response(tag)
                    .unwrap_or_else(|| DEFAULT_REPLY.to_string());
                Reply::Text(text)
            }
        }
    }

    /// Numbered list with one example phrasing per intent. The `unknown`
    /// pseudo-intent is skipped.
    pub fn help_text(&self) -> String {
        let mut lines = vec!["Налични команди:".to_string()];
        let mut index = 1;

        for definition in &self.definitions {
            if definition.tag == UNKNOWN_TAG {
                continue;
            }
            if let Some(pattern) = definition.patterns.first() {
                lines.push(format!("{}. {}", index, pattern));
                index += 1;
            }
        }

        lines.join("\n")
    }
}

/// Required parameter keys per tag, consulted before dispatch.
fn required_params(tag: &str) -> &'static [&'static str] {
    match tag {
        "add_club" | "delete_club" => &["club_name"],
        "add_player" => &[
            "full_name",
            "club",
            "position",
            "number",
            "nationality",
            "birth_date",
            "status",
        ],
        "update_player_position" => &["player_identifier", "new_position"],
        "update_player_number" => &["player_identifier", "new_number"],
        "update_player_status" => &["player_identifier", "new_status"],
        "delete_player" => &["player_identifier"],
        _ => &[],
    }
}

/// Fixed usage guidance returned when required parameters are missing.
fn usage_hint(tag: &str) -> &'static str {
    match tag {
        "add_club" => "Моля, посочете име на клуб. Пример: добави клуб Левски",
        "delete_club" => "Моля, посочете име на клуб. Пример: изтрий клуб Левски",
        "add_player" => {
            "Моля, посочете всички данни. Пример: добави играч Иван Иванов в клуб Левски \
             позиция GK номер 1 националност България дата на раждане 1995-03-15 статус Активен"
        }
        "update_player_position" => {
            "Моля, посочете играч и позиция. Пример: смени позиция на Иван Иванов на MF"
        }
        "update_player_number" => {
            "Моля, посочете играч и номер. Пример: смени номер на Иван Иванов на 10"
        }
        "update_player_status" => {
            "Моля, посочете играч и статус. Пример: смени статус на Иван Иванов на Контузиран"
        }
        "delete_player" => "Моля, посочете играч. Пример: изтрий играч Иван Иванов",
        _ => DEFAULT_REPLY,
    }
}

fn param<'a>(params: Option<&'a ParameterMap>, key: &str) -> &'a str {
    params
        .and_then(|map| map.get(key))
        .map(|value| value.as_str())
        .unwrap_or("")
}

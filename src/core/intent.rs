use std::collections::HashMap;
use regex::Regex;
use serde::{Serialize, Deserialize};

/// Tag the resolver answers with when nothing matches.
pub const UNKNOWN_TAG: &str = "unknown";

/// Tags whose patterns may carry `[placeholder]` markers. For every other
/// tag the bracketed text is matched as literal characters.
pub const PARAMETERIZED_TAGS: &[&str] = &[
    "add_club",
    "delete_club",
    "add_player",
    "list_players",
    "update_player_position",
    "update_player_number",
    "update_player_status",
    "delete_player",
];

/// One entry of the intents configuration: a unique tag, the example
/// phrasings that trigger it, and optional canned response templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDefinition {
    pub tag: String,
    pub patterns: Vec<String>,
    #[serde(default)]
    pub responses: Vec<String>,
}

impl IntentDefinition {
    pub fn new(tag: &str, patterns: &[&str], responses: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            responses: responses.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// A pattern string compiled down to an anchored regex. Order in the
/// compiled list mirrors definition order, which is the tie-break rule:
/// the first compiled pattern that matches wins.
#[derive(Debug)]
pub struct CompiledPattern {
    pub tag: String,
    pub matcher: Regex,
    pub has_parameters: bool,
}

pub type ParameterMap = HashMap<String, String>;

enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Compile every pattern of every definition, preserving order. Patterns
/// that fail to compile are skipped rather than aborting the whole set.
pub fn compile_patterns(definitions: &[IntentDefinition]) -> Vec<CompiledPattern> {
    let mut compiled = Vec::new();

    for definition in definitions {
        let parameterized = PARAMETERIZED_TAGS.contains(&definition.tag.as_str());

        for pattern in &definition.patterns {
            let source = pattern_source(pattern, parameterized);
            match Regex::new(&source) {
                Ok(matcher) => {
                    let has_parameters = matcher.capture_names().flatten().next().is_some();
                    compiled.push(CompiledPattern {
                        tag: definition.tag.clone(),
                        matcher,
                        has_parameters,
                    });
                }
                Err(_) => continue,
            }
        }
    }

    compiled
}

/// Build the regex source for one pattern string.
///
/// Literal text is lowercased, escaped, and its internal whitespace runs
/// widened to `\s+` so irregular spacing in the input still matches.
/// Placeholders become named non-greedy captures. The whole matcher is
/// anchored and case-insensitive; matching the original (trimmed) input
/// case-insensitively keeps the user's casing intact in captured values.
pub fn pattern_source(pattern: &str, parameterized: bool) -> String {
    if !parameterized {
        return format!("(?i)^{}$", escape_literal(pattern));
    }

    let segments = split_segments(pattern);
    let has_placeholder = segments.iter().any(|s| matches!(s, Segment::Placeholder(_)));
    if !has_placeholder {
        return format!("(?i)^{}$", escape_literal(pattern));
    }

    let parts: Vec<String> = segments
        .iter()
        .map(|segment| match segment {
            Segment::Literal(text) => escape_literal(text),
            Segment::Placeholder(name) => format!("(?P<{}>.+?)", name),
        })
        .collect();

    format!("(?i)^{}$", parts.join(r"\s+"))
}

/// Split a pattern into alternating literal and `[identifier]` segments.
/// Brackets that do not enclose a bare identifier stay literal text.
fn split_segments(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = pattern;

    while let Some(open) = rest.find('[') {
        match rest[open + 1..].find(']') {
            Some(close) => {
                let name = &rest[open + 1..open + 1 + close];
                if is_identifier(name) {
                    literal.push_str(&rest[..open]);
                    flush_literal(&mut segments, &mut literal);
                    segments.push(Segment::Placeholder(name.to_string()));
                } else {
                    literal.push_str(&rest[..open + close + 2]);
                }
                rest = &rest[open + close + 2..];
            }
            None => break,
        }
    }

    literal.push_str(rest);
    flush_literal(&mut segments, &mut literal);
    segments
}

fn flush_literal(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.trim().is_empty() {
        segments.push(Segment::Literal(literal.clone()));
    }
    literal.clear();
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().next().map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Trim, lowercase, escape for literal matching, and widen whitespace runs.
fn escape_literal(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .map(|word| regex::escape(word))
        .collect::<Vec<String>>()
        .join(r"\s+")
}

/// Try each compiled pattern in order against the trimmed input. Returns
/// the first matching tag with its captured parameters, or `unknown`.
pub fn resolve_intent(raw_input: &str, compiled: &[CompiledPattern]) -> (String, Option<ParameterMap>) {
    let input = raw_input.trim();

    for pattern in compiled {
        let captures = match pattern.matcher.captures(input) {
            Some(captures) => captures,
            None => continue,
        };

        if !pattern.has_parameters {
            return (pattern.tag.clone(), None);
        }

        let mut params = ParameterMap::new();
        for name in pattern.matcher.capture_names().flatten() {
            if let Some(value) = captures.name(name) {
                let value = value.as_str().trim();
                if !value.is_empty() {
                    params.insert(name.to_string(), value.to_string());
                }
            }
        }

        if params.is_empty() {
            return (pattern.tag.clone(), None);
        }
        return (pattern.tag.clone(), Some(params));
    }

    (UNKNOWN_TAG.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(tag: &str, pattern: &str) -> Vec<IntentDefinition> {
        vec![IntentDefinition::new(tag, &[pattern], &[])]
    }

    #[test]
    fn test_literal_pattern_ignores_case_and_spacing() {
        let compiled = compile_patterns(&single("list_clubs", "покажи всички клубове"));
        assert_eq!(compiled.len(), 1);
        assert!(!compiled[0].has_parameters);

        let (tag, params) = resolve_intent("  Покажи   ВСИЧКИ клубове ", &compiled);
        assert_eq!(tag, "list_clubs");
        assert!(params.is_none());
    }

    #[test]
    fn test_placeholder_captures_trimmed_value() {
        let compiled = compile_patterns(&single("add_club", "добави клуб [club_name]"));
        assert!(compiled[0].has_parameters);

        let (tag, params) = resolve_intent("Добави Клуб   Левски", &compiled);
        assert_eq!(tag, "add_club");
        let params = params.unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params["club_name"], "Левски");
    }

    #[test]
    fn test_two_placeholders_split_on_literal() {
        let compiled = compile_patterns(&single(
            "update_player_number",
            "смени номер на [player_identifier] на [new_number]",
        ));

        let (tag, params) = resolve_intent("смени номер на Иван Иванов на 99", &compiled);
        assert_eq!(tag, "update_player_number");
        let params = params.unwrap();
        assert_eq!(params["player_identifier"], "Иван Иванов");
        assert_eq!(params["new_number"], "99");
    }

    #[test]
    fn test_long_pattern_with_multiword_literals() {
        let compiled = compile_patterns(&single(
            "add_player",
            "добави играч [full_name] в клуб [club] позиция [position] номер [number] \
             националност [nationality] дата на раждане [birth_date] статус [status]",
        ));

        let input = "добави играч Иван Иванов в клуб Левски София позиция GK номер 1 \
                     националност България дата на раждане 1995-03-15 статус Активен";
        let (tag, params) = resolve_intent(input, &compiled);
        assert_eq!(tag, "add_player");
        let params = params.unwrap();
        assert_eq!(params["full_name"], "Иван Иванов");
        assert_eq!(params["club"], "Левски София");
        assert_eq!(params["position"], "GK");
        assert_eq!(params["number"], "1");
        assert_eq!(params["nationality"], "България");
        assert_eq!(params["birth_date"], "1995-03-15");
        assert_eq!(params["status"], "Активен");
    }

    #[test]
    fn test_first_match_wins_in_definition_order() {
        let definitions = vec![
            IntentDefinition::new("first", &["здравей"], &[]),
            IntentDefinition::new("second", &["здравей"], &[]),
        ];
        let compiled = compile_patterns(&definitions);

        for _ in 0..10 {
            let (tag, _) = resolve_intent("здравей", &compiled);
            assert_eq!(tag, "first");
        }
    }

    #[test]
    fn test_unmatched_input_is_unknown() {
        let compiled = compile_patterns(&single("add_club", "добави клуб [club_name]"));
        let (tag, params) = resolve_intent("нещо съвсем различно", &compiled);
        assert_eq!(tag, UNKNOWN_TAG);
        assert!(params.is_none());

        let (tag, _) = resolve_intent("", &compiled);
        assert_eq!(tag, UNKNOWN_TAG);
    }

    #[test]
    fn test_brackets_without_identifier_stay_literal() {
        let compiled = compile_patterns(&single("add_club", "добави клуб [не идентификатор]"));
        assert!(!compiled[0].has_parameters);

        let (tag, _) = resolve_intent("добави клуб [не идентификатор]", &compiled);
        assert_eq!(tag, "add_club");
    }

    #[test]
    fn test_placeholders_ignored_for_non_parameterized_tag() {
        // "greeting" is not in PARAMETERIZED_TAGS, so [name] is literal text
        let compiled = compile_patterns(&single("greeting", "здравей [name]"));
        assert!(!compiled[0].has_parameters);

        let (tag, _) = resolve_intent("здравей [name]", &compiled);
        assert_eq!(tag, "greeting");
        let (tag, _) = resolve_intent("здравей Иван", &compiled);
        assert_eq!(tag, UNKNOWN_TAG);
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let definitions = vec![
            IntentDefinition::new("add_club", &["добави клуб [club_name]", "създай клуб [club_name]"], &[]),
            IntentDefinition::new("list_clubs", &["покажи всички клубове"], &[]),
        ];

        let first: Vec<String> = compile_patterns(&definitions)
            .iter()
            .map(|p| p.matcher.as_str().to_string())
            .collect();
        let second: Vec<String> = compile_patterns(&definitions)
            .iter()
            .map(|p| p.matcher.as_str().to_string())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_partial_input_does_not_match_anchored_pattern() {
        let compiled = compile_patterns(&single("list_clubs", "покажи всички клубове"));
        let (tag, _) = resolve_intent("покажи всички", &compiled);
        assert_eq!(tag, UNKNOWN_TAG);
        let (tag, _) = resolve_intent("моля покажи всички клубове сега", &compiled);
        assert_eq!(tag, UNKNOWN_TAG);
    }
}

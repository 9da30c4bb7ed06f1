//! The prompt assembler: deterministic `(declarations, state) -> String`.
//!
//! Assembly is a pure recompute — no caching, no incremental updates. The
//! output has three blocks in fixed order: active modifiers as blockquotes,
//! the technical context derived from the `FRAMEWORK`/`DATABASE` globals,
//! then the non-blank ingredients with `{{KEY}}` tokens interpolated.

use crate::config::SandwichConfig;
use crate::session::{GlobalValues, SessionState};

/// Global key feeding the technical context's framework line.
pub const FRAMEWORK_KEY: &str = "FRAMEWORK";
/// Global key feeding the technical context's database line.
pub const DATABASE_KEY: &str = "DATABASE";

/// Sentinel option value meaning "no selection" for the technical context.
const NONE_OPTION: &str = "None";

/// Replace every `{{KEY}}` token in `input` with the matching global value.
///
/// A single linear scan: tokens whose key has no entry in `globals` are left
/// verbatim, and substituted values are not re-scanned, so interpolation is
/// flat and total — it cannot fail or recurse.
pub fn interpolate(input: &str, globals: &GlobalValues) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some((before, after)) = rest.split_once("{{") {
        out.push_str(before);
        match after.split_once("}}") {
            Some((key, tail)) => match globals.get(key) {
                Some(value) => {
                    out.push_str(value);
                    rest = tail;
                }
                None => {
                    // Unknown key: emit the opener verbatim and keep
                    // scanning inside the would-be token.
                    out.push_str("{{");
                    rest = after;
                }
            },
            None => {
                // No closing delimiter anywhere ahead.
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// A value counts for the technical context only when it is set, non-empty,
/// and not the `"None"` sentinel.
fn present<'a>(globals: &'a GlobalValues, key: &str) -> Option<&'a str> {
    globals
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty() && *v != NONE_OPTION)
}

/// The technical context block, or an empty string when neither the
/// framework nor the database is present.
fn technical_context(globals: &GlobalValues) -> String {
    let framework = present(globals, FRAMEWORK_KEY);
    let database = present(globals, DATABASE_KEY);
    if framework.is_none() && database.is_none() {
        return String::new();
    }

    let mut block = String::from("# Contexto Técnico\n");
    if let Some(framework) = framework {
        block.push_str(&format!("- Framework: **{framework}**\n"));
    }
    if let Some(database) = database {
        block.push_str(&format!("- Base de datos: **{database}**\n"));
    }
    block.push_str(
        "\nPuedes consultar la documentación oficial de estas tecnologías \
         para resolver la tarea correctamente.\n\n",
    );
    block
}

/// Assemble the full prompt from the declarations and the session state.
///
/// Blocks in fixed order:
///
/// 1. Active modifiers, in declaration order, as `"> {text}"` lines, with
///    one blank line after the block when any are active.
/// 2. The technical context (see [`FRAMEWORK_KEY`] / [`DATABASE_KEY`]).
/// 3. Each ingredient, in declaration order, whose interpolated content is
///    non-blank: prefix line, content, blank line. Blank ingredients
///    contribute nothing, not even their prefix.
///
/// The concatenation is trimmed of leading and trailing whitespace.
pub fn assemble(config: &SandwichConfig, state: &SessionState) -> String {
    let mut prompt = String::new();

    let mut any_modifier = false;
    for modifier in &config.modifiers {
        if state.modifiers.get(&modifier.id).copied().unwrap_or(false) {
            prompt.push_str(&format!("> {}\n", modifier.text));
            any_modifier = true;
        }
    }
    if any_modifier {
        prompt.push('\n');
    }

    prompt.push_str(&technical_context(&state.globals));

    for ingredient in &config.ingredients {
        let raw = state
            .values
            .get(&ingredient.id)
            .map(String::as_str)
            .unwrap_or("");
        let content = interpolate(raw, &state.globals);
        if !content.trim().is_empty() {
            prompt.push_str(&format!("{}\n{}\n\n", ingredient.prefix, content));
        }
    }

    prompt.trim().to_string()
}

/// Whitespace-separated word count of the assembled prompt.
pub fn word_count(prompt: &str) -> usize {
    prompt.split_whitespace().count()
}

/// Character count of the raw assembled prompt.
pub fn char_count(prompt: &str) -> usize {
    prompt.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobalsConfig;

    fn config() -> SandwichConfig {
        SandwichConfig::from_json(
            r###"{
                "meta": {"app_name": "Promptwich", "version": "1.0.0"},
                "ingredients": [
                    {"id": "task", "label": "Task", "prefix": "## Task",
                     "placeholder": "", "default": "Do {{X}}"},
                    {"id": "notes", "label": "Notes", "prefix": "## Notes",
                     "placeholder": ""}
                ],
                "modifiers": [
                    {"id": "strict", "label": "Strict", "text": "Be strict."},
                    {"id": "verbose", "label": "Verbose", "text": "Be verbose."}
                ]
            }"###,
        )
        .unwrap()
    }

    fn globals_config() -> GlobalsConfig {
        GlobalsConfig::from_json(
            r#"{
                "variables": [
                    {"key": "X", "label": "X", "options": ["A", "B"]},
                    {"key": "FRAMEWORK", "label": "Framework",
                     "options": ["None", "Axum"]},
                    {"key": "DATABASE", "label": "Database",
                     "options": ["None", "Postgres"]}
                ]
            }"#,
        )
        .unwrap()
    }

    fn globals_of(pairs: &[(&str, &str)]) -> GlobalValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn interpolate_replaces_known_tokens() {
        let globals = globals_of(&[("LANGUAGE", "Rust")]);
        let out = interpolate("Use {{LANGUAGE}}", &globals);
        assert_eq!(out, "Use Rust");
    }

    #[test]
    fn interpolate_leaves_unknown_tokens_verbatim() {
        let globals = globals_of(&[("LANGUAGE", "Rust")]);
        let out = interpolate("Use {{TOOL}} with {{LANGUAGE}}", &globals);
        assert_eq!(out, "Use {{TOOL}} with Rust");
    }

    #[test]
    fn interpolate_is_not_recursive() {
        let globals = globals_of(&[("A", "{{B}}"), ("B", "deep")]);
        assert_eq!(interpolate("{{A}}", &globals), "{{B}}");
    }

    #[test]
    fn interpolate_handles_unclosed_delimiter() {
        let globals = globals_of(&[("A", "x")]);
        assert_eq!(interpolate("open {{A", &globals), "open {{A");
        assert_eq!(interpolate("{{", &globals), "{{");
    }

    #[test]
    fn interpolate_replaces_every_occurrence() {
        let globals = globals_of(&[("X", "A")]);
        assert_eq!(interpolate("{{X}} and {{X}}", &globals), "A and A");
    }

    #[test]
    fn initial_assemble_matches_defaults() {
        let config = config();
        let state = SessionState::initialize(&config, &globals_config());
        // FRAMEWORK and DATABASE both initialize to "None", so no context
        // block appears.
        assert_eq!(assemble(&config, &state), "## Task\nDo A");
    }

    #[test]
    fn assemble_is_idempotent() {
        let config = config();
        let mut state = SessionState::initialize(&config, &globals_config());
        state.set_modifier("strict", true);
        state.set_value("notes", "Careful with {{X}}");
        assert_eq!(assemble(&config, &state), assemble(&config, &state));
    }

    #[test]
    fn active_modifiers_appear_in_declaration_order() {
        let config = config();
        let mut state = SessionState::initialize(&config, &globals_config());
        state.set_modifier("verbose", true);
        state.set_modifier("strict", true);

        let prompt = assemble(&config, &state);
        assert!(prompt.starts_with("> Be strict.\n> Be verbose.\n\n"));
    }

    #[test]
    fn no_active_modifiers_means_no_blockquote_lines() {
        let config = config();
        let mut state = SessionState::initialize(&config, &globals_config());
        state.set_modifier("strict", false);

        let prompt = assemble(&config, &state);
        assert!(!prompt.contains('>'));
    }

    #[test]
    fn technical_context_omitted_when_both_none() {
        let config = config();
        let state = SessionState::initialize(&config, &globals_config());
        assert!(!assemble(&config, &state).contains("Contexto Técnico"));
    }

    #[test]
    fn technical_context_lists_framework_then_database() {
        let config = config();
        let globals_config = globals_config();
        let mut state = SessionState::initialize(&config, &globals_config);
        state.set_global(&globals_config, "FRAMEWORK", "Axum");
        state.set_global(&globals_config, "DATABASE", "Postgres");

        let prompt = assemble(&config, &state);
        let expected = "# Contexto Técnico\n\
                        - Framework: **Axum**\n\
                        - Base de datos: **Postgres**\n\
                        \n\
                        Puedes consultar la documentación oficial de estas \
                        tecnologías para resolver la tarea correctamente.";
        assert!(prompt.contains(expected), "got:\n{prompt}");
    }

    #[test]
    fn technical_context_with_database_only() {
        let config = config();
        let globals_config = globals_config();
        let mut state = SessionState::initialize(&config, &globals_config);
        state.set_global(&globals_config, "DATABASE", "Postgres");

        let prompt = assemble(&config, &state);
        assert!(prompt.contains("- Base de datos: **Postgres**"));
        assert!(!prompt.contains("- Framework:"));
    }

    #[test]
    fn blank_ingredient_contributes_nothing() {
        let config = config();
        let mut state = SessionState::initialize(&config, &globals_config());
        state.set_value("notes", "   \n\t ");

        let prompt = assemble(&config, &state);
        assert!(!prompt.contains("## Notes"));
        assert_eq!(prompt, "## Task\nDo A");
    }

    #[test]
    fn ingredient_blank_after_interpolation_is_suppressed() {
        let config = config();
        let globals_config = GlobalsConfig::from_json(
            r#"{"variables": [{"key": "X", "label": "X", "options": [" "]}]}"#,
        )
        .unwrap();
        let mut state = SessionState::initialize(&config, &globals_config);
        state.set_value("task", "{{X}}");

        assert_eq!(assemble(&config, &state), "");
    }

    #[test]
    fn counts_match_preview_semantics() {
        assert_eq!(word_count("## Task\nDo A"), 4);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(char_count("Do A"), 4);
        // Counted in characters, not bytes.
        assert_eq!(char_count("Técnico"), 7);
    }
}

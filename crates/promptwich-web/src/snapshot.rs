//! Serializable projection of the session for REST transport.
//!
//! The raw [`SessionState`] maps are sparse (absent ingredient = empty,
//! absent modifier = inactive) and global values may be stale relative to
//! their current option sets. [`SessionSnapshot`] densifies everything
//! against the declarations and applies the read-time display
//! reconciliation, so a client can render straight from the snapshot.

use promptwich::{GlobalsConfig, SandwichConfig, SessionState, assemble, char_count, word_count};
use serde::Serialize;

/// One global variable as the UI should render it.
#[derive(Debug, Serialize)]
pub struct VariableSnapshot {
    pub key: String,
    pub label: String,
    /// The option set valid under the current globals. Empty means the UI
    /// skips the control entirely.
    pub options: Vec<String>,
    /// Reconciled display value (stored value if still valid, else the
    /// first option, else empty).
    pub value: String,
}

/// One ingredient with its current content.
#[derive(Debug, Serialize)]
pub struct IngredientSnapshot {
    pub id: String,
    pub label: String,
    pub prefix: String,
    pub placeholder: String,
    pub value: String,
}

/// One modifier with its current toggle state.
#[derive(Debug, Serialize)]
pub struct ModifierSnapshot {
    pub id: String,
    pub label: String,
    pub active: bool,
}

/// Full session view sent to the browser: declarations joined with state,
/// plus the assembled prompt and its counts.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub app_name: String,
    pub version: String,
    pub ingredients: Vec<IngredientSnapshot>,
    pub modifiers: Vec<ModifierSnapshot>,
    pub variables: Vec<VariableSnapshot>,
    pub prompt: String,
    pub word_count: usize,
    pub char_count: usize,
}

impl SessionSnapshot {
    /// Build a snapshot from the declarations and the current session.
    ///
    /// Should be called while holding the session lock so the snapshot is
    /// one consistent view.
    pub fn capture(
        config: &SandwichConfig,
        globals_config: &GlobalsConfig,
        state: &SessionState,
    ) -> Self {
        let ingredients = config
            .ingredients
            .iter()
            .map(|i| IngredientSnapshot {
                id: i.id.clone(),
                label: i.label.clone(),
                prefix: i.prefix.clone(),
                placeholder: i.placeholder.clone(),
                value: state.values.get(&i.id).cloned().unwrap_or_default(),
            })
            .collect();

        let modifiers = config
            .modifiers
            .iter()
            .map(|m| ModifierSnapshot {
                id: m.id.clone(),
                label: m.label.clone(),
                active: state.modifiers.get(&m.id).copied().unwrap_or(false),
            })
            .collect();

        let variables = globals_config
            .variables
            .iter()
            .map(|v| VariableSnapshot {
                key: v.key().to_string(),
                label: v.label().to_string(),
                options: v.options_for(&state.globals).to_vec(),
                value: state.display_value(v),
            })
            .collect();

        let prompt = assemble(config, state);
        let word_count = word_count(&prompt);
        let char_count = char_count(&prompt);

        Self {
            app_name: config.meta.app_name.clone(),
            version: config.meta.version.clone(),
            ingredients,
            modifiers,
            variables,
            prompt,
            word_count,
            char_count,
        }
    }
}

//! Mutable per-session state and its reducers.
//!
//! One editing session owns three value stores: ingredient contents,
//! modifier toggles, and selected global values. All mutation goes through
//! [`SessionState`] methods so the dependent-reset invariant holds: after
//! any global change, every variable whose option set is non-empty stores a
//! member of that set, and every variable with an empty option set stores
//! the empty string.
//!
//! Frontends share one state instance (typically `Arc<Mutex<SessionState>>`)
//! and recompute the assembled prompt on every read; nothing here is
//! incremental.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GlobalVariable, GlobalsConfig, SandwichConfig};
use crate::preset::Preset;

/// Ingredient id → free-text content. Absent id means empty content.
pub type IngredientValues = HashMap<String, String>;

/// Modifier id → active flag. Absent id means inactive.
pub type ModifierStates = HashMap<String, bool>;

/// Variable key → currently selected option string.
pub type GlobalValues = HashMap<String, String>;

/// The three mutable value stores of one editing session.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SessionState {
    pub values: IngredientValues,
    pub modifiers: ModifierStates,
    pub globals: GlobalValues,
}

impl SessionState {
    /// Build the initial session state from the declaration documents.
    ///
    /// Ingredient defaults seed `values`. Globals are seeded in declaration
    /// order — conditional variables are declared after their parent, so
    /// each one resolves its options against the globals assembled so far
    /// and takes the first option (or empty string for an empty set).
    pub fn initialize(config: &SandwichConfig, globals_config: &GlobalsConfig) -> Self {
        let mut values = IngredientValues::new();
        for ingredient in &config.ingredients {
            if let Some(default) = &ingredient.default {
                values.insert(ingredient.id.clone(), default.clone());
            }
        }

        let mut globals = GlobalValues::new();
        for variable in &globals_config.variables {
            let first = variable
                .options_for(&globals)
                .first()
                .cloned()
                .unwrap_or_default();
            globals.insert(variable.key().to_string(), first);
        }

        Self {
            values,
            modifiers: ModifierStates::new(),
            globals,
        }
    }

    /// Set one ingredient's content.
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) {
        self.values.insert(id.to_string(), value.into());
    }

    /// Toggle one modifier.
    pub fn set_modifier(&mut self, id: &str, active: bool) {
        self.modifiers.insert(id.to_string(), active);
    }

    /// Record a user-driven change to global `key`, then reset every
    /// conditional variable that depends on it to the first of its
    /// recomputed options (or empty string for an empty set).
    ///
    /// The reset is a single pass over direct children only; deeper chains
    /// are reconciled at read time by [`display_value`](Self::display_value).
    pub fn set_global(&mut self, globals_config: &GlobalsConfig, key: &str, value: impl Into<String>) {
        self.globals.insert(key.to_string(), value.into());

        for variable in &globals_config.variables {
            let GlobalVariable::Conditional {
                key: child,
                depends_on,
                ..
            } = variable
            else {
                continue;
            };
            if depends_on != key || child == key {
                continue;
            }
            let first = variable
                .options_for(&self.globals)
                .first()
                .cloned()
                .unwrap_or_default();
            debug!("global '{key}' changed, resetting dependent '{child}' to '{first}'");
            self.globals.insert(child.clone(), first);
        }
    }

    /// The value to show for `variable` right now.
    ///
    /// Returns the stored value when it is a member of the current option
    /// set, otherwise the first option (or empty string). Read-time
    /// reconciliation only — the store is never written back, so a stale
    /// value can persist internally without ever being displayed.
    pub fn display_value(&self, variable: &GlobalVariable) -> String {
        let options = variable.options_for(&self.globals);
        let stored = self
            .globals
            .get(variable.key())
            .map(String::as_str)
            .unwrap_or("");
        if options.iter().any(|o| o == stored) {
            stored.to_string()
        } else {
            options.first().cloned().unwrap_or_default()
        }
    }

    /// Apply a preset atomically.
    ///
    /// `values` and `globals` merge over the current state, overwriting
    /// matching keys and leaving others untouched. Modifier state is rebuilt
    /// from scratch: every declared modifier becomes active iff its id is
    /// listed in the preset. Preset globals are merged verbatim without a
    /// dependent-reset pass; display reconciliation absorbs any staleness.
    pub fn apply_preset(&mut self, config: &SandwichConfig, preset: &Preset) {
        debug!("applying preset '{}'", preset.name);

        for (id, value) in &preset.values {
            self.values.insert(id.clone(), value.clone());
        }

        self.modifiers = config
            .modifiers
            .iter()
            .map(|m| (m.id.clone(), preset.modifiers.contains(&m.id)))
            .collect();

        for (key, value) in &preset.globals {
            self.globals.insert(key.clone(), value.clone());
        }
    }
}

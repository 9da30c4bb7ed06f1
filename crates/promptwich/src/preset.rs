//! Named bundles of session state applied atomically.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A preset document: partial ingredient values, the full set of modifiers
/// to activate, and partial global values.
///
/// Applying a preset merges `values` and `globals` over the current state
/// but *replaces* modifier state entirely — see
/// [`SessionState::apply_preset`](crate::session::SessionState::apply_preset).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    /// Ingredient id → content. Absent ids are left untouched.
    #[serde(default)]
    pub values: HashMap<String, String>,
    /// Ids of the modifiers to activate. Every other modifier is deactivated.
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Variable key → value. Absent keys are left untouched.
    #[serde(default)]
    pub globals: HashMap<String, String>,
}

impl Preset {
    /// Parse a preset document from JSON.
    pub fn from_json(data: &str) -> Result<Self, String> {
        serde_json::from_str(data).map_err(|e| format!("failed to parse preset: {e}"))
    }
}

/// One entry in the preset listing: the opaque storage identifier plus the
/// display fields read from the document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PresetListItem {
    pub filename: String,
    pub name: String,
    pub description: String,
}

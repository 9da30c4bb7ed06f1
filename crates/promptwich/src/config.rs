//! Declaration documents: ingredients, modifiers, and global variables.
//!
//! These types mirror the two JSON documents the config provider serves
//! (`sandwich.json` and `globals.json`). Declarations are immutable once
//! loaded; all mutable per-session data lives in
//! [`SessionState`](crate::session::SessionState).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::session::GlobalValues;

/// A labeled, prefixed block of user-authored text.
///
/// An ingredient contributes its `prefix` line followed by its current
/// content to the assembled prompt, but only when the content is non-blank.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Ingredient {
    /// Unique key into [`IngredientValues`](crate::session::IngredientValues).
    pub id: String,
    /// Display label for the form control.
    pub label: String,
    /// Header text emitted before the content (e.g., `"## Task"`).
    pub prefix: String,
    /// Placeholder shown in an empty control.
    pub placeholder: String,
    /// Initial content, if any.
    #[serde(default)]
    pub default: Option<String>,
}

/// An optional blockquote snippet toggled on/off.
///
/// Active modifiers are emitted as `"> {text}"` lines at the top of the
/// assembled prompt, in declaration order.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Modifier {
    /// Unique key into [`ModifierStates`](crate::session::ModifierStates).
    pub id: String,
    /// Display label for the checkbox.
    pub label: String,
    /// Blockquote content emitted when active.
    pub text: String,
}

/// App metadata carried in the sandwich config document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SandwichMeta {
    pub app_name: String,
    pub version: String,
}

/// The ingredient/modifier declaration document (`sandwich.json`).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SandwichConfig {
    pub meta: SandwichMeta,
    pub ingredients: Vec<Ingredient>,
    pub modifiers: Vec<Modifier>,
}

impl SandwichConfig {
    /// Parse a sandwich config document from JSON.
    pub fn from_json(data: &str) -> Result<Self, String> {
        serde_json::from_str(data).map_err(|e| format!("failed to parse sandwich config: {e}"))
    }

    /// Look up an ingredient by id.
    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    /// Look up a modifier by id.
    pub fn modifier(&self, id: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.id == id)
    }
}

/// A named, selectable setting interpolatable into ingredient text via
/// `{{KEY}}` tokens.
///
/// Exactly one of the two variants applies to any variable; the serde
/// encoding is untagged, so a document with `dependsOn` deserializes as
/// [`Conditional`](GlobalVariable::Conditional) and one with `options` as
/// [`Simple`](GlobalVariable::Simple).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GlobalVariable {
    /// Option set depends on the current value of one parent variable.
    Conditional {
        key: String,
        label: String,
        /// Key of the parent variable.
        #[serde(rename = "dependsOn")]
        depends_on: String,
        /// Parent option value → valid options for this variable.
        #[serde(rename = "conditionalOptions")]
        conditional_options: HashMap<String, Vec<String>>,
    },
    /// Static option set.
    Simple {
        key: String,
        label: String,
        options: Vec<String>,
    },
}

impl GlobalVariable {
    /// The variable's unique key.
    pub fn key(&self) -> &str {
        match self {
            Self::Conditional { key, .. } | Self::Simple { key, .. } => key,
        }
    }

    /// The variable's display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Conditional { label, .. } | Self::Simple { label, .. } => label,
        }
    }

    /// Compute the ordered option set valid under `globals`.
    ///
    /// Simple variables return their static options. Conditional variables
    /// look up the parent's current value (empty string when unset) in
    /// `conditionalOptions`; an unmapped parent value yields an empty set,
    /// which is a valid state, not an error — the UI skips the control.
    pub fn options_for(&self, globals: &GlobalValues) -> &[String] {
        match self {
            Self::Simple { options, .. } => options,
            Self::Conditional {
                depends_on,
                conditional_options,
                ..
            } => {
                let parent = globals.get(depends_on).map(String::as_str).unwrap_or("");
                conditional_options
                    .get(parent)
                    .map(Vec::as_slice)
                    .unwrap_or(&[])
            }
        }
    }
}

/// The global-variable declaration document (`globals.json`).
///
/// Declaration order matters: conditional variables must be declared after
/// their parent so one forward pass can seed every value.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GlobalsConfig {
    pub variables: Vec<GlobalVariable>,
}

impl GlobalsConfig {
    /// Parse a globals config document from JSON.
    pub fn from_json(data: &str) -> Result<Self, String> {
        serde_json::from_str(data).map_err(|e| format!("failed to parse globals config: {e}"))
    }

    /// Look up a variable by key.
    pub fn variable(&self, key: &str) -> Option<&GlobalVariable> {
        self.variables.iter().find(|v| v.key() == key)
    }
}

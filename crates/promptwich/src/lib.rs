//! Prompt composition engine for ingredient-based prompt building.
//!
//! `promptwich` turns reusable "ingredient" text blocks, optional boolean
//! "modifier" blurbs, and a small set of interdependent global variables
//! into one Markdown prompt. The crate is pure and synchronous: declarations
//! are loaded once, per-session state is mutated through reducer-style
//! methods, and the prompt is recomputed in full on every read.
//!
//! # Architecture
//!
//! ```text
//! SandwichConfig + GlobalsConfig ──▶ SessionState::initialize
//!                                         │
//!            set_value / set_modifier / set_global / apply_preset
//!                                         │
//!                                         ▼
//!                        assemble(&config, &state) ──▶ String
//! ```
//!
//! # Example
//!
//! ```
//! use promptwich::{GlobalsConfig, SandwichConfig, SessionState, assemble};
//!
//! let config = SandwichConfig::from_json(r###"{
//!     "meta": {"app_name": "Promptwich", "version": "1.0.0"},
//!     "ingredients": [
//!         {"id": "task", "label": "Task", "prefix": "## Task",
//!          "placeholder": "", "default": "Write {{LANGUAGE}}"}
//!     ],
//!     "modifiers": []
//! }"###).unwrap();
//!
//! let globals = GlobalsConfig::from_json(r#"{
//!     "variables": [
//!         {"key": "LANGUAGE", "label": "Language", "options": ["Rust", "Go"]}
//!     ]
//! }"#).unwrap();
//!
//! let state = SessionState::initialize(&config, &globals);
//! assert_eq!(assemble(&config, &state), "## Task\nWrite Rust");
//! ```
//!
//! # Where to find things
//!
//! - **Declarations** (ingredients, modifiers, global variables, and the
//!   option resolver for conditional variables): [`config`].
//! - **Session state and reducers** (initialization, dependent-variable
//!   reset, preset application, display reconciliation): [`session`].
//! - **Presets**: [`preset`].
//! - **Assembly and interpolation**: [`prompt`].

pub mod config;
pub mod preset;
pub mod prompt;
pub mod session;

pub use config::{GlobalVariable, GlobalsConfig, Ingredient, Modifier, SandwichConfig, SandwichMeta};
pub use preset::{Preset, PresetListItem};
pub use prompt::{assemble, char_count, interpolate, word_count};
pub use session::{GlobalValues, IngredientValues, ModifierStates, SessionState};

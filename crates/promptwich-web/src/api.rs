//! REST API endpoint handlers.
//!
//! The declarations are shared read-only (`Arc`); the one mutable session
//! lives behind a mutex. Each write handler performs its whole update while
//! holding the lock, so no reader ever observes a half-applied change
//! (parent update without the dependent reset, or a partially applied
//! preset).

use std::sync::{Arc, Mutex};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use promptwich::{
    GlobalsConfig, Preset, PresetListItem, SandwichConfig, SessionState, assemble, char_count,
    word_count,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::snapshot::SessionSnapshot;
use crate::store::{ConfigStore, is_safe_filename};

/// Shared application state passed to all handlers via axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SandwichConfig>,
    pub globals_config: Arc<GlobalsConfig>,
    pub session: Arc<Mutex<SessionState>>,
    pub store: Arc<ConfigStore>,
}

impl AppState {
    pub fn new(
        config: SandwichConfig,
        globals_config: GlobalsConfig,
        session: SessionState,
        store: ConfigStore,
    ) -> Self {
        Self {
            config: Arc::new(config),
            globals_config: Arc::new(globals_config),
            session: Arc::new(Mutex::new(session)),
            store: Arc::new(store),
        }
    }
}

/// GET /api/config/{filename} — Raw config document.
///
/// Serves `sandwich.json` / `globals.json` to the frontend. Returns 403 for
/// filenames that could escape the config directory, 404 when the document
/// is missing or unparseable.
pub async fn get_config(
    State(app): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if !is_safe_filename(&filename) {
        return Err(StatusCode::FORBIDDEN);
    }
    match app.store.read_config(&filename) {
        Ok(doc) => Ok(Json(doc)),
        Err(e) => {
            warn!("config fetch failed: {e}");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// GET /api/presets — Preset listing, sorted by filename.
pub async fn get_presets(State(app): State<AppState>) -> Json<Vec<PresetListItem>> {
    Json(app.store.list_presets())
}

/// GET /api/presets/{filename} — Full preset document.
pub async fn get_preset(
    State(app): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Preset>, StatusCode> {
    if !is_safe_filename(&filename) {
        return Err(StatusCode::FORBIDDEN);
    }
    match app.store.read_preset(&filename) {
        Ok(preset) => Ok(Json(preset)),
        Err(e) => {
            warn!("preset fetch failed: {e}");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// POST /api/presets/{filename}/apply — Fetch a preset and apply it to the
/// session in one step.
///
/// On any fetch error the session is left untouched and the error status is
/// returned, so a bad preset can never half-apply.
pub async fn apply_preset(State(app): State<AppState>, Path(filename): Path<String>) -> StatusCode {
    if !is_safe_filename(&filename) {
        return StatusCode::FORBIDDEN;
    }
    let preset = match app.store.read_preset(&filename) {
        Ok(preset) => preset,
        Err(e) => {
            warn!("preset apply failed, session unchanged: {e}");
            return StatusCode::NOT_FOUND;
        }
    };

    let mut session = app.session.lock().unwrap();
    session.apply_preset(&app.config, &preset);
    StatusCode::NO_CONTENT
}

/// GET /api/state — Full session snapshot.
///
/// Declarations joined with current state, reconciled global values, the
/// assembled prompt, and its counts. The single read the UI needs per
/// render.
pub async fn get_state(State(app): State<AppState>) -> Json<SessionSnapshot> {
    let session = app.session.lock().unwrap();
    Json(SessionSnapshot::capture(
        &app.config,
        &app.globals_config,
        &session,
    ))
}

/// Response body for GET /api/prompt.
#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
    pub word_count: usize,
    pub char_count: usize,
}

/// GET /api/prompt — The assembled prompt and its counts only.
pub async fn get_prompt(State(app): State<AppState>) -> Json<PromptResponse> {
    let prompt = {
        let session = app.session.lock().unwrap();
        assemble(&app.config, &session)
    };
    let word_count = word_count(&prompt);
    let char_count = char_count(&prompt);
    Json(PromptResponse {
        prompt,
        word_count,
        char_count,
    })
}

/// Request body for POST /api/values.
#[derive(Debug, Deserialize)]
pub struct ValueRequest {
    pub id: String,
    pub value: String,
}

/// POST /api/values — Set one ingredient's content.
///
/// Returns 204 on success, 404 for an undeclared ingredient id.
pub async fn post_value(State(app): State<AppState>, Json(body): Json<ValueRequest>) -> StatusCode {
    if app.config.ingredient(&body.id).is_none() {
        return StatusCode::NOT_FOUND;
    }
    let mut session = app.session.lock().unwrap();
    session.set_value(&body.id, body.value);
    StatusCode::NO_CONTENT
}

/// Request body for POST /api/modifiers.
#[derive(Debug, Deserialize)]
pub struct ModifierRequest {
    pub id: String,
    pub active: bool,
}

/// POST /api/modifiers — Toggle one modifier.
///
/// Returns 204 on success, 404 for an undeclared modifier id.
pub async fn post_modifier(
    State(app): State<AppState>,
    Json(body): Json<ModifierRequest>,
) -> StatusCode {
    if app.config.modifier(&body.id).is_none() {
        return StatusCode::NOT_FOUND;
    }
    let mut session = app.session.lock().unwrap();
    session.set_modifier(&body.id, body.active);
    StatusCode::NO_CONTENT
}

/// Request body for POST /api/globals.
#[derive(Debug, Deserialize)]
pub struct GlobalRequest {
    pub key: String,
    pub value: String,
}

/// POST /api/globals — Change one global variable.
///
/// Runs the dependent-reset pass under the session lock, so the parent
/// change and its child resets land as one atomic step. Returns 204 on
/// success, 404 for an undeclared key.
pub async fn post_global(
    State(app): State<AppState>,
    Json(body): Json<GlobalRequest>,
) -> StatusCode {
    if app.globals_config.variable(&body.key).is_none() {
        return StatusCode::NOT_FOUND;
    }
    debug!("global '{}' set to '{}'", body.key, body.value);
    let mut session = app.session.lock().unwrap();
    session.set_global(&app.globals_config, &body.key, body.value);
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_request_deserializes() {
        let json = r#"{"id": "task", "value": "Fix the bug"}"#;
        let req: ValueRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, "task");
        assert_eq!(req.value, "Fix the bug");
    }

    #[test]
    fn modifier_request_deserializes() {
        let json = r#"{"id": "strict", "active": true}"#;
        let req: ModifierRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, "strict");
        assert!(req.active);
    }

    #[test]
    fn global_request_deserializes() {
        let json = r#"{"key": "DATABASE", "value": "Postgres"}"#;
        let req: GlobalRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "DATABASE");
        assert_eq!(req.value, "Postgres");
    }
}

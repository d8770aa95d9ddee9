//! Settings API:
//!   GET /api/settings – effective configuration (read-only)

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::config::setting_infos;

use super::ok_json;

/// GET /api/settings
pub async fn get_settings(State(state): State<SharedState>) -> Json<Value> {
    ok_json(json!(setting_infos(state.config())))
}

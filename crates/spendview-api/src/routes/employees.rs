//! Employee roster endpoint

use crate::AppState;
use axum::extract::State;

/// Roster for the selector (JSON; empty list before the first load)
pub async fn api_employees(state: State<AppState>) -> String {
    let controller = state.controller.read().await;
    serde_json::to_string(&controller.employees()).unwrap_or_default()
}

//! Feed endpoints - unified snapshot and commands
//!
//! Every handler is a direct projection of a controller command; command
//! handlers answer with the fresh snapshot so the caller can re-render
//! without a second round trip.

use crate::error::error_response;
use crate::AppState;
use axum::extract::{Query, State};
use spendview_core::FeedController;
use spendview_source::EMPTY_EMPLOYEE_ID;
use std::collections::HashMap;

fn snapshot_json(controller: &FeedController) -> String {
    serde_json::to_string(&controller.snapshot()).unwrap_or_default()
}

/// Current unified feed snapshot (JSON)
pub async fn api_feed(state: State<AppState>) -> String {
    let controller = state.controller.read().await;
    snapshot_json(&controller)
}

/// Apply the selector choice: `employee` filters to one employee, an absent
/// or sentinel value selects the full feed
pub async fn api_select(
    state: State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let employee_id = params
        .get("employee")
        .map(|s| s.as_str())
        .unwrap_or(EMPTY_EMPLOYEE_ID);

    let mut controller = state.controller.write().await;
    let result = if employee_id == EMPTY_EMPLOYEE_ID {
        controller.select_all_employees().await
    } else {
        controller.select_employee(employee_id).await
    };

    match result {
        Ok(()) => snapshot_json(&controller),
        Err(e) => error_response(&e),
    }
}

/// Fetch another page of the full feed and widen the visible window
pub async fn api_load_more(state: State<AppState>) -> String {
    let mut controller = state.controller.write().await;
    match controller.load_more().await {
        Ok(()) => snapshot_json(&controller),
        Err(e) => error_response(&e),
    }
}

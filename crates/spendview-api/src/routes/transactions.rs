//! Transaction endpoints - approval updates
//!
//! Approval updates go straight to the source through the cache layer, which
//! invalidates its transaction-list entries; loaded feed state is untouched
//! until the next load.

use crate::error::error_response;
use crate::AppState;
use axum::extract::{Path, Query, State};
use spendview_core::CoreError;
use spendview_source::SetApprovalParams;
use std::collections::HashMap;

/// Set the approval flag on one transaction
pub async fn api_set_approval(
    state: State<AppState>,
    path: Path<String>,
    params: Query<HashMap<String, String>>,
) -> String {
    let approved = params
        .get("approved")
        .and_then(|s| s.parse().ok())
        .unwrap_or(false);
    let params = SetApprovalParams {
        transaction_id: path.0,
        approved,
    };

    match state.fetch.set_transaction_approval(&params).await {
        Ok(()) => r#"{"success": true}"#.to_string(),
        Err(e) => error_response(&CoreError::from(e)),
    }
}

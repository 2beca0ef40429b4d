//! Error responses for spendview-api

use spendview_core::{CoreError, ErrorSeverity};

/// Serialize a core error into the JSON error body, logging it at the level
/// its severity calls for
pub fn error_response(error: &CoreError) -> String {
    match error.severity() {
        ErrorSeverity::Error => log::error!("{}", error),
        _ => log::warn!("{}", error),
    }
    let details = error.to_details();
    format!(
        r#"{{"error": {}}}"#,
        serde_json::to_string(&details).unwrap_or_default()
    )
}

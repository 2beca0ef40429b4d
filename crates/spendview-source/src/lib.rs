//! Transaction data source and caching fetch layer
//!
//! This crate owns everything below the feed stores: the wire-level data
//! model, the [`TransactionSource`] backend trait with its JSON-file default
//! implementation, and [`CachedFetch`], the memoizing fetch primitive the
//! stores share.

use async_trait::async_trait;
use std::sync::Arc;

pub mod cache;
pub mod error;
pub mod static_source;
pub mod types;

pub use cache::CachedFetch;
pub use error::{SourceError, SourceResult};
pub use static_source::{Dataset, StaticDataSource};

// Re-export commonly used types
pub use types::{
    Employee, EmployeeTransactionsParams, PageCursor, Paged, PaginatedRequestParams,
    SetApprovalParams, Transaction, EMPTY_EMPLOYEE, EMPTY_EMPLOYEE_ID,
};

/// Source reference type
pub type SourceRef = Arc<dyn TransactionSource>;

/// Fetch reference type
pub type FetchRef = Arc<dyn FeedFetch>;

// ==================== Utility Functions ====================

/// Build the memoization key for a request: operation name plus the
/// serialized parameters.
pub fn request_signature<P: serde::Serialize>(operation: &str, params: &P) -> String {
    let params = serde_json::to_string(params).unwrap_or_default();
    format!("{}{}", operation, params)
}

// ==================== Source Trait ====================

/// Backend capable of answering roster and transaction requests
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Full employee roster
    async fn employees(&self) -> SourceResult<Vec<Employee>>;

    /// One page of the full transaction feed
    async fn transaction_page(
        &self,
        params: &PaginatedRequestParams,
    ) -> SourceResult<Paged<Transaction>>;

    /// All transactions for one employee, in full
    async fn employee_transactions(
        &self,
        params: &EmployeeTransactionsParams,
    ) -> SourceResult<Vec<Transaction>>;

    /// Update the approval flag on a single transaction
    async fn set_transaction_approval(&self, params: &SetApprovalParams) -> SourceResult<()>;
}

// ==================== Fetch Capability ====================

/// The fetch capability consumed by the feed stores.
///
/// `Ok(None)` means "no data available for this call right now" (for example
/// a request suppressed by the in-flight guard). It is never a valid empty
/// response; callers keep their prior state when they see it.
#[async_trait]
pub trait FeedFetch: Send + Sync {
    async fn employees(&self) -> SourceResult<Option<Vec<Employee>>>;

    async fn transaction_page(
        &self,
        params: &PaginatedRequestParams,
    ) -> SourceResult<Option<Paged<Transaction>>>;

    async fn employee_transactions(
        &self,
        params: &EmployeeTransactionsParams,
    ) -> SourceResult<Option<Vec<Transaction>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_signature_includes_params() {
        let params = PaginatedRequestParams {
            page: Some(PageCursor(2)),
        };
        assert_eq!(
            request_signature("paginatedTransactions", &params),
            "paginatedTransactions{\"page\":2}"
        );
    }

    #[test]
    fn test_request_signature_distinguishes_initial_page() {
        let first = request_signature("paginatedTransactions", &PaginatedRequestParams::default());
        let second = request_signature(
            "paginatedTransactions",
            &PaginatedRequestParams {
                page: Some(PageCursor(0)),
            },
        );
        assert_ne!(first, second);
    }
}

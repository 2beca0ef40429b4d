//! Memoizing fetch layer shared by the feed stores
//!
//! Responses are cached by request signature (operation name plus serialized
//! parameters). A request whose signature is already in flight yields `None`
//! instead of issuing a duplicate call; errors are returned, never cached.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SourceResult;
use crate::types::{
    Employee, EmployeeTransactionsParams, Paged, PaginatedRequestParams, SetApprovalParams,
    Transaction,
};
use crate::{request_signature, FeedFetch, SourceRef};

/// Operation names used in request signatures
pub mod operations {
    pub const EMPLOYEES: &str = "employees";
    pub const PAGINATED_TRANSACTIONS: &str = "paginatedTransactions";
    pub const TRANSACTIONS_BY_EMPLOYEE: &str = "transactionsByEmployee";
}

/// Caching wrapper around a [`TransactionSource`](crate::TransactionSource)
pub struct CachedFetch {
    source: SourceRef,
    entries: Mutex<HashMap<String, serde_json::Value>>,
    in_flight: Mutex<HashSet<String>>,
}

impl CachedFetch {
    pub fn new(source: SourceRef) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Drop every cached response
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Drop cached responses for one operation
    pub fn clear_operation(&self, operation: &str) {
        self.entries
            .lock()
            .unwrap()
            .retain(|signature, _| !signature.starts_with(operation));
    }

    /// Number of cached responses
    pub fn cached_len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Forward an approval update and invalidate cached transaction lists so
    /// the next load reflects it
    pub async fn set_transaction_approval(&self, params: &SetApprovalParams) -> SourceResult<()> {
        self.source.set_transaction_approval(params).await?;
        self.clear_operation(operations::PAGINATED_TRANSACTIONS);
        self.clear_operation(operations::TRANSACTIONS_BY_EMPLOYEE);
        Ok(())
    }

    async fn fetch_with_cache<T, P, Fut>(
        &self,
        operation: &str,
        params: &P,
        load: impl FnOnce() -> Fut,
    ) -> SourceResult<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        P: Serialize,
        Fut: Future<Output = SourceResult<T>>,
    {
        let signature = request_signature(operation, params);

        let cached = {
            let entries = self.entries.lock().unwrap();
            entries.get(&signature).cloned()
        };
        if let Some(value) = cached {
            log::debug!("cache hit: {}", signature);
            return Ok(Some(serde_json::from_value(value)?));
        }

        {
            let mut in_flight = self.in_flight.lock().unwrap();
            if !in_flight.insert(signature.clone()) {
                log::debug!("request already in flight, yielding no data: {}", signature);
                return Ok(None);
            }
        }

        let result = load().await;
        self.in_flight.lock().unwrap().remove(&signature);

        let value = result?;
        let entry = serde_json::to_value(&value)?;
        self.entries.lock().unwrap().insert(signature, entry);
        Ok(Some(value))
    }
}

#[async_trait]
impl FeedFetch for CachedFetch {
    async fn employees(&self) -> SourceResult<Option<Vec<Employee>>> {
        let source = Arc::clone(&self.source);
        self.fetch_with_cache(operations::EMPLOYEES, &(), move || async move {
            source.employees().await
        })
        .await
    }

    async fn transaction_page(
        &self,
        params: &PaginatedRequestParams,
    ) -> SourceResult<Option<Paged<Transaction>>> {
        let source = Arc::clone(&self.source);
        let call_params = *params;
        self.fetch_with_cache(operations::PAGINATED_TRANSACTIONS, params, move || {
            async move { source.transaction_page(&call_params).await }
        })
        .await
    }

    async fn employee_transactions(
        &self,
        params: &EmployeeTransactionsParams,
    ) -> SourceResult<Option<Vec<Transaction>>> {
        let source = Arc::clone(&self.source);
        let call_params = params.clone();
        self.fetch_with_cache(operations::TRANSACTIONS_BY_EMPLOYEE, params, move || {
            async move { source.employee_transactions(&call_params).await }
        })
        .await
    }
}

// ==================== Tests ====================

//! JSON-file-backed transaction source
//!
//! Pages of the full feed are fixed-size chunks of the transaction list in
//! dataset order; the cursor is the index of the next chunk.

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{SourceError, SourceResult};
use crate::types::{
    Employee, EmployeeTransactionsParams, PageCursor, Paged, PaginatedRequestParams,
    SetApprovalParams, Transaction,
};
use crate::TransactionSource;

/// On-disk dataset consumed by [`StaticDataSource`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub employees: Vec<Employee>,
    pub transactions: Vec<Transaction>,
}

/// In-memory source backed by a JSON dataset file
#[derive(Debug)]
pub struct StaticDataSource {
    data: RwLock<Dataset>,
    page_size: usize,
}

impl StaticDataSource {
    /// Build a source over an in-memory dataset
    pub fn new(dataset: Dataset, page_size: usize) -> Self {
        Self {
            data: RwLock::new(dataset),
            page_size: page_size.max(1),
        }
    }

    /// Load the dataset from a JSON file
    pub async fn load(path: PathBuf, page_size: usize) -> SourceResult<Self> {
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::DatasetNotFound {
                    path: path.to_string_lossy().to_string(),
                }
            } else {
                SourceError::IoError(e)
            }
        })?;

        let dataset: Dataset =
            serde_json::from_str(&content).map_err(|e| SourceError::InvalidDataset {
                message: e.to_string(),
            })?;

        log::info!(
            "Dataset loaded: {} employees, {} transactions",
            dataset.employees.len(),
            dataset.transactions.len()
        );

        Ok(Self::new(dataset, page_size))
    }
}

#[async_trait]
impl TransactionSource for StaticDataSource {
    async fn employees(&self) -> SourceResult<Vec<Employee>> {
        Ok(self.data.read().unwrap().employees.clone())
    }

    async fn transaction_page(
        &self,
        params: &PaginatedRequestParams,
    ) -> SourceResult<Paged<Transaction>> {
        let data = self.data.read().unwrap();
        let page_index = params.page.map(|cursor| cursor.0 as usize).unwrap_or(0);
        let start = page_index.saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size).min(data.transactions.len());

        let chunk = if start < data.transactions.len() {
            data.transactions[start..end].to_vec()
        } else {
            Vec::new()
        };

        let next_page = if end < data.transactions.len() {
            Some(PageCursor(page_index as u64 + 1))
        } else {
            None
        };

        Ok(Paged {
            data: chunk,
            next_page,
        })
    }

    async fn employee_transactions(
        &self,
        params: &EmployeeTransactionsParams,
    ) -> SourceResult<Vec<Transaction>> {
        let data = self.data.read().unwrap();

        // The empty-employee sentinel is resolved above this layer; any id
        // missing from the roster is a caller mistake.
        if !data.employees.iter().any(|e| e.id == params.employee_id) {
            return Err(SourceError::UnknownEmployee {
                id: params.employee_id.clone(),
            });
        }

        Ok(data
            .transactions
            .iter()
            .filter(|tx| tx.belongs_to(&params.employee_id))
            .cloned()
            .collect())
    }

    async fn set_transaction_approval(&self, params: &SetApprovalParams) -> SourceResult<()> {
        let mut data = self.data.write().unwrap();
        match data
            .transactions
            .iter_mut()
            .find(|tx| tx.id == params.transaction_id)
        {
            Some(tx) => {
                tx.approved = params.approved;
                Ok(())
            }
            None => Err(SourceError::UnknownTransaction {
                id: params.transaction_id.clone(),
            }),
        }
    }
}

// ==================== Tests ====================

//! Wire-level data model shared by the feed stores and the data source

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reserved id of the "all employees" selector entry. Never a roster entry.
pub const EMPTY_EMPLOYEE_ID: &str = "";

/// The "all employees" selector entry itself.
pub static EMPTY_EMPLOYEE: Lazy<Employee> = Lazy::new(|| Employee {
    id: EMPTY_EMPLOYEE_ID.to_string(),
    first_name: "All".to_string(),
    last_name: "Employees".to_string(),
});

/// Employee identity as loaded from the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique employee identifier
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Employee {
    /// Display name for selector rows
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this is the reserved "all employees" entry
    pub fn is_empty_sentinel(&self) -> bool {
        self.id == EMPTY_EMPLOYEE_ID
    }
}

/// A single card transaction
///
/// Created only by the data source and immutable afterwards; the feed layer
/// only moves transactions between lists. The `employee` field is an identity
/// copy embedded at creation time, not a live roster link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: String,
    /// Transaction amount
    pub amount: Decimal,
    /// Employee the transaction belongs to
    pub employee: Employee,
    /// Merchant name
    pub merchant: String,
    /// Transaction date (YYYY-MM-DD format)
    pub date: String,
    /// Whether the transaction has been approved
    pub approved: bool,
}

impl Transaction {
    /// Get the transaction date as NaiveDate
    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Check if the transaction belongs to a specific employee
    pub fn belongs_to(&self, employee_id: &str) -> bool {
        self.employee.id == employee_id
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!("{} - {} ({})", self.date, self.merchant, self.amount)
    }
}

/// Opaque continuation token for the paginated feed
///
/// Only the data source interprets the inner value; everything above it
/// passes the token back unchanged and null-checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(pub u64);

/// A single batch of the paginated feed as returned by the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    /// Batch contents, in source order
    pub data: Vec<T>,
    /// Cursor for the following page; `None` is the terminal-page sentinel
    pub next_page: Option<PageCursor>,
}

/// Parameters for a paginated feed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaginatedRequestParams {
    /// Cursor of the page to fetch; `None` requests the initial page
    pub page: Option<PageCursor>,
}

/// Parameters for a single-employee transaction request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeTransactionsParams {
    pub employee_id: String,
}

/// Parameters for an approval update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetApprovalParams {
    pub transaction_id: String,
    pub approved: bool,
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> Employee {
        Employee {
            id: "e1".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Nguyen".to_string(),
        }
    }

    #[test]
    fn test_employee_full_name() {
        assert_eq!(employee().full_name(), "Alice Nguyen");
    }

    #[test]
    fn test_empty_sentinel_is_not_a_roster_identity() {
        assert!(EMPTY_EMPLOYEE.is_empty_sentinel());
        assert!(!employee().is_empty_sentinel());
        assert_eq!(EMPTY_EMPLOYEE.id, EMPTY_EMPLOYEE_ID);
    }

    #[test]
    fn test_transaction_date_and_ownership() {
        let tx = Transaction {
            id: "t1".to_string(),
            amount: Decimal::new(12450, 2),
            employee: employee(),
            merchant: "Initech".to_string(),
            date: "2024-06-15".to_string(),
            approved: false,
        };

        assert_eq!(
            tx.date_naive(),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
        assert!(tx.belongs_to("e1"));
        assert!(!tx.belongs_to("e2"));
        assert!(tx.summary().contains("Initech"));
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let tx = Transaction {
            id: "t1".to_string(),
            amount: Decimal::new(100, 0),
            employee: employee(),
            merchant: "Initech".to_string(),
            date: "2024-06-15".to_string(),
            approved: true,
        };
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains("\"firstName\""));
        assert!(json.contains("\"lastName\""));

        let page = Paged {
            data: vec![tx],
            next_page: Some(PageCursor(1)),
        };
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"nextPage\":1"));
    }

    #[test]
    fn test_terminal_page_serializes_null_cursor() {
        let page: Paged<Transaction> = Paged {
            data: vec![],
            next_page: None,
        };
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"nextPage\":null"));
    }
}

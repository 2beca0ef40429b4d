//! Feed orchestration stores and controller
//!
//! Three state containers composed under one controller: the employee roster
//! (loaded once per session), the accumulating paginated feed, and the
//! single-employee filtered feed. Exactly one of the two feeds is active at
//! a time; the controller performs the mutual invalidation when the selector
//! switches modes and projects the active feed into a windowed unified
//! snapshot for the presentation layer.

pub mod error;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;

use spendview_config::FeedConfig;
use spendview_source::{
    Employee, EmployeeTransactionsParams, FetchRef, PageCursor, PaginatedRequestParams,
    Transaction,
};

pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};

// ==================== Feed Mode ====================

/// Which feed is authoritative for the unified view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMode {
    /// The paginated all-transactions feed
    All,
    /// The feed filtered to a single employee
    Employee { employee_id: String },
}

impl FeedMode {
    pub fn is_all(&self) -> bool {
        matches!(self, FeedMode::All)
    }

    pub fn employee_id(&self) -> Option<&str> {
        match self {
            FeedMode::All => None,
            FeedMode::Employee { employee_id } => Some(employee_id),
        }
    }
}

impl Serialize for FeedMode {
    // Wire shape: `"all"` or `{ "employeeId": id }`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeedMode::All => serializer.serialize_str("all"),
            FeedMode::Employee { employee_id } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("employeeId", employee_id)?;
                map.end()
            }
        }
    }
}

impl std::fmt::Display for FeedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedMode::All => write!(f, "all"),
            FeedMode::Employee { employee_id } => write!(f, "employee:{}", employee_id),
        }
    }
}

// ==================== Roster Store ====================

/// Employee roster, loaded once per session
///
/// A leaf store with no merge logic; mode switches never invalidate it.
pub struct RosterStore {
    fetch: FetchRef,
    employees: Option<Vec<Employee>>,
    loading: bool,
}

impl RosterStore {
    pub fn new(fetch: FetchRef) -> Self {
        Self {
            fetch,
            employees: None,
            loading: false,
        }
    }

    /// `None` until the first successful load
    pub fn employees(&self) -> Option<&[Employee]> {
        self.employees.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.employees.is_some()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Fetch the full roster. A fetch that yields no data leaves any
    /// previously loaded roster untouched.
    pub async fn load_all(&mut self) -> CoreResult<()> {
        self.loading = true;
        let result = self.fetch.employees().await;
        self.loading = false;

        match result? {
            Some(employees) => {
                log::debug!("roster loaded: {} employees", employees.len());
                self.employees = Some(employees);
            }
            None => log::debug!("roster fetch yielded no data, keeping previous state"),
        }
        Ok(())
    }
}

// ==================== Paginated Feed Store ====================

/// Outcome of a [`PaginatedFeedStore::fetch_next_page`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFetch {
    /// A page was merged into the accumulation
    Merged,
    /// The terminal page was already reached; no request was made
    Exhausted,
    /// The underlying fetch yielded no data; state unchanged
    Unavailable,
}

/// Accumulating, page-ordered transaction feed with a continuation cursor
pub struct PaginatedFeedStore {
    fetch: FetchRef,
    accumulated: Vec<Transaction>,
    cursor: Option<PageCursor>,
    initialized: bool,
    loading: bool,
}

impl PaginatedFeedStore {
    pub fn new(fetch: FetchRef) -> Self {
        Self {
            fetch,
            accumulated: Vec::new(),
            cursor: None,
            initialized: false,
            loading: false,
        }
    }

    /// Transactions merged so far, earliest page first
    pub fn accumulated(&self) -> &[Transaction] {
        &self.accumulated
    }

    /// Cursor of the next page; `None` after the terminal page (or before
    /// the first one)
    pub fn cursor(&self) -> Option<PageCursor> {
        self.cursor
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Whether a further page may exist for the current accumulation
    pub fn has_more(&self) -> bool {
        self.cursor.is_some() || !self.initialized
    }

    /// Fetch the next page and append it to the accumulation.
    ///
    /// Once the terminal page has been seen this is a no-op that makes no
    /// request. A fetch that yields no data (for example one suppressed by
    /// the in-flight guard) leaves the accumulation and cursor untouched.
    pub async fn fetch_next_page(&mut self) -> CoreResult<PageFetch> {
        if self.initialized && self.cursor.is_none() {
            log::debug!("no more transactions to fetch");
            return Ok(PageFetch::Exhausted);
        }

        let params = PaginatedRequestParams { page: self.cursor };
        self.loading = true;
        let result = self.fetch.transaction_page(&params).await;
        self.loading = false;

        match result? {
            Some(page) => {
                log::debug!(
                    "merged page of {} transactions, next cursor {:?}",
                    page.data.len(),
                    page.next_page
                );
                self.accumulated.extend(page.data);
                self.cursor = page.next_page;
                self.initialized = true;
                Ok(PageFetch::Merged)
            }
            None => {
                log::debug!("page fetch yielded no data, keeping previous state");
                Ok(PageFetch::Unavailable)
            }
        }
    }

    /// Invalidate: drop the accumulation and cursor
    pub fn reset(&mut self) {
        self.accumulated.clear();
        self.cursor = None;
        self.initialized = false;
    }
}

// ==================== Filtered Feed Store ====================

/// Transactions for exactly one employee; replaced wholesale on each load
pub struct FilteredFeedStore {
    fetch: FetchRef,
    employee_id: Option<String>,
    items: Vec<Transaction>,
    loading: bool,
}

impl FilteredFeedStore {
    pub fn new(fetch: FetchRef) -> Self {
        Self {
            fetch,
            employee_id: None,
            items: Vec::new(),
            loading: false,
        }
    }

    pub fn employee_id(&self) -> Option<&str> {
        self.employee_id.as_deref()
    }

    pub fn items(&self) -> &[Transaction] {
        &self.items
    }

    pub fn is_active(&self) -> bool {
        self.employee_id.is_some()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Replace the feed with the full transaction list for one employee.
    /// There are no partial or merge semantics here.
    pub async fn load_for_employee(&mut self, employee_id: &str) -> CoreResult<()> {
        let params = EmployeeTransactionsParams {
            employee_id: employee_id.to_string(),
        };
        self.loading = true;
        let result = self.fetch.employee_transactions(&params).await;
        self.loading = false;

        match result? {
            Some(items) => {
                self.items = items;
                self.employee_id = Some(employee_id.to_string());
            }
            None => log::debug!("employee feed fetch yielded no data, keeping previous state"),
        }
        Ok(())
    }

    /// Invalidate: back to the inactive state
    pub fn reset(&mut self) {
        self.employee_id = None;
        self.items.clear();
    }
}

// ==================== Unified Snapshot ====================

/// Unified view consumed by the presentation layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    /// Windowed prefix of the active feed
    pub transactions: Vec<Transaction>,
    pub is_loading: bool,
    /// Whether a "view more" gesture would fetch anything
    pub can_load_more: bool,
    pub mode: FeedMode,
}

// ==================== Feed Controller ====================

/// Composition root for the three stores.
///
/// Commands run one at a time and await their fetches to completion before
/// returning, so no mode switch can observe a half-finished load. The
/// exclusive borrow on every command is what enforces the "serialize, do not
/// queue" rule for the stores' `loading` windows.
pub struct FeedController {
    config: FeedConfig,
    roster: RosterStore,
    paginated: PaginatedFeedStore,
    filtered: FilteredFeedStore,
    mode: FeedMode,
    visible_count: usize,
    loading: bool,
}

impl FeedController {
    pub fn new(config: FeedConfig, fetch: FetchRef) -> Self {
        let visible_count = config.window_step;
        Self {
            roster: RosterStore::new(Arc::clone(&fetch)),
            paginated: PaginatedFeedStore::new(Arc::clone(&fetch)),
            filtered: FilteredFeedStore::new(fetch),
            mode: FeedMode::All,
            visible_count,
            loading: false,
            config,
        }
    }

    pub fn mode(&self) -> &FeedMode {
        &self.mode
    }

    /// Current window length (may exceed the active feed's length)
    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
            || self.roster.loading()
            || self.paginated.loading()
            || self.filtered.loading()
    }

    /// Roster for the selector; empty before the first load
    pub fn employees(&self) -> Vec<Employee> {
        self.roster
            .employees()
            .map(|employees| employees.to_vec())
            .unwrap_or_default()
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn paginated(&self) -> &PaginatedFeedStore {
        &self.paginated
    }

    pub fn filtered(&self) -> &FilteredFeedStore {
        &self.filtered
    }

    /// Run the startup entry into the all-transactions feed, exactly once
    pub async fn initialize(&mut self) -> CoreResult<()> {
        if self.roster.is_loaded() {
            return Ok(());
        }
        self.select_all_employees().await
    }

    /// Enter the all-transactions mode: invalidate the filtered feed, then
    /// load the roster (if needed) and the first page, strictly in that
    /// order.
    pub async fn select_all_employees(&mut self) -> CoreResult<()> {
        log::info!("selecting all-transactions feed");
        self.filtered.reset();

        self.loading = true;
        let result = self.enter_all_sequence().await;
        self.loading = false;
        result?;

        self.mode = FeedMode::All;
        Ok(())
    }

    // The roster must be fully loaded before the page fetch begins; the
    // sequencing is part of the contract, not an optimization target.
    async fn enter_all_sequence(&mut self) -> CoreResult<()> {
        if !self.roster.is_loaded() {
            self.roster.load_all().await?;
        }
        self.paginated.fetch_next_page().await?;
        Ok(())
    }

    /// Enter the single-employee mode: invalidate the paginated feed, then
    /// load that employee's transactions in full.
    pub async fn select_employee(&mut self, employee_id: &str) -> CoreResult<()> {
        log::info!("selecting employee feed: {}", employee_id);
        self.paginated.reset();

        self.loading = true;
        let result = self.filtered.load_for_employee(employee_id).await;
        self.loading = false;
        result?;

        self.mode = FeedMode::Employee {
            employee_id: employee_id.to_string(),
        };
        Ok(())
    }

    /// Fetch another page and widen the visible window in the same gesture.
    ///
    /// Only valid while the all-transactions feed is active; with the
    /// employee feed active the affordance must not be offered and a direct
    /// call is refused.
    pub async fn load_more(&mut self) -> CoreResult<()> {
        if !self.mode.is_all() {
            return Err(CoreError::LoadMoreUnavailable);
        }

        let outcome = self.paginated.fetch_next_page().await?;
        if outcome != PageFetch::Exhausted {
            self.visible_count += self.config.window_step;
        }
        Ok(())
    }

    /// Project the active feed into the unified view
    pub fn snapshot(&self) -> FeedSnapshot {
        let active: &[Transaction] = match self.mode {
            FeedMode::Employee { .. } => self.filtered.items(),
            FeedMode::All => self.paginated.accumulated(),
        };

        FeedSnapshot {
            transactions: active.iter().take(self.visible_count).cloned().collect(),
            is_loading: self.is_loading(),
            can_load_more: self.mode.is_all() && self.paginated.cursor().is_some(),
            mode: self.mode.clone(),
        }
    }
}

// ==================== Tests ====================

//! Console session state
//!
//! All mutable console state lives in one explicit [`ConsoleSession`]
//! passed to the controller — no ambient globals. The session is created
//! when the console mounts and reset when the operator navigates away.

use tracing::debug;

use crate::errors::{ConsoleError, Result};
use crate::gateway::SearchQuery;
use crate::models::LinkRecord;

use super::search::QuickFilter;

// ============ Selection set ============

/// Short codes currently chosen for a batch action, in selection order.
///
/// Cleared on batch-mode exit, on full refresh, and after any batch action
/// that invalidates membership (delete).
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    codes: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn select(&mut self, code: &str) {
        if !self.contains(code) {
            self.codes.push(code.to_string());
        }
    }

    pub fn deselect(&mut self, code: &str) {
        self.codes.retain(|c| c != code);
    }

    /// Flip one code; returns whether it is selected afterwards
    pub fn toggle(&mut self, code: &str) -> bool {
        if self.contains(code) {
            self.deselect(code);
            false
        } else {
            self.select(code);
            true
        }
    }

    pub fn select_all<'a>(&mut self, codes: impl IntoIterator<Item = &'a str>) {
        for code in codes {
            self.select(code);
        }
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Capture the selection at invocation time; a running batch operates
    /// on this snapshot even if the live selection changes under it
    pub fn snapshot(&self) -> Vec<String> {
        self.codes.clone()
    }
}

// ============ In-flight guard ============

/// Which long-running operation holds the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    WizardSubmit,
    Batch,
    Import,
}

impl PendingOp {
    fn label(&self) -> &'static str {
        match self {
            PendingOp::WizardSubmit => "wizard submission",
            PendingOp::Batch => "batch operation",
            PendingOp::Import => "import",
        }
    }
}

/// Explicit re-entrancy guard.
///
/// The UI disables triggering controls while a call is outstanding, but
/// the session enforces the single-flight rule itself rather than trusting
/// the view layer.
#[derive(Debug, Default)]
pub struct InFlight {
    current: Option<PendingOp>,
}

impl InFlight {
    pub fn begin(&mut self, op: PendingOp) -> Result<()> {
        match self.current {
            Some(running) => Err(ConsoleError::validation(format!(
                "a {} is already in progress",
                running.label()
            ))),
            None => {
                self.current = Some(op);
                Ok(())
            }
        }
    }

    pub fn finish(&mut self) {
        self.current = None;
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }
}

// ============ Session ============

/// Everything the console keeps between commands
#[derive(Debug, Default)]
pub struct ConsoleSession {
    pub selection: SelectionSet,
    pub in_flight: InFlight,
    /// Display-time predicate over the rendered page; None = show all
    pub quick_filter: Option<QuickFilter>,
    /// Structured search currently replacing the plain listing
    pub active_search: Option<SearchQuery>,
    pub batch_mode: bool,
    pub page: u64,
    pub total: u64,
    /// The currently rendered page of rows, as last fetched
    pub rows: Vec<LinkRecord>,
}

impl ConsoleSession {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    /// Entering/leaving batch mode always drops the selection
    pub fn toggle_batch_mode(&mut self) -> bool {
        self.batch_mode = !self.batch_mode;
        self.selection.clear();
        debug!(batch_mode = self.batch_mode, "batch mode toggled");
        self.batch_mode
    }

    /// Replace the rendered page. Selection clearing is the caller's
    /// decision: a full refresh clears it, a render-only update does not.
    pub fn set_page(&mut self, page: u64, rows: Vec<LinkRecord>, total: u64) {
        self.page = page;
        self.rows = rows;
        self.total = total;
    }

    /// Rows after the quick filter, for rendering
    pub fn visible_rows(&self) -> Vec<&LinkRecord> {
        match &self.quick_filter {
            Some(filter) if !filter.is_empty() => {
                self.rows.iter().filter(|r| filter.matches(r)).collect()
            }
            _ => self.rows.iter().collect(),
        }
    }

    /// Full reset, used when navigating away from the console
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

//! Console controller
//!
//! UI-agnostic command surface: a view layer (CLI today) binds its events
//! to these methods and renders the session state back; no console logic
//! lives in event-binding code. Every mutating operation refreshes the
//! rendered page from the server afterwards — `visit_count` and timestamps
//! are server-owned and may have changed concurrently, so the page is
//! never patched locally.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::errors::{ConsoleError, Result};
use crate::gateway::{
    ExportFormat, ImportSummary, LinkGateway, SearchQuery, UpdateLinkRequest,
};
use crate::models::LinkRecord;

use super::batch::{self, BatchExport, BatchReport};
use super::import;
use super::search::{QuickFilter, SearchForm};
use super::session::{ConsoleSession, PendingOp};
use super::wizard::CreationWizard;

// ============ Purge confirmation ============

/// Two independent acknowledgements required before a permanent delete is
/// issued. The view layer collects them (two prompts); the controller
/// refuses to call the API until both are present.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleConfirmation {
    first: bool,
    second: bool,
}

impl DoubleConfirmation {
    pub fn none() -> Self {
        Self::default()
    }

    /// Both prompts already answered
    pub fn confirmed() -> Self {
        Self {
            first: true,
            second: true,
        }
    }

    /// Record one acknowledgement; call twice for a complete confirmation
    pub fn acknowledge(&mut self) {
        if self.first {
            self.second = true;
        } else {
            self.first = true;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.first && self.second
    }
}

// ============ Controller ============

/// The console: one gateway, one session, one wizard
pub struct LinkConsole {
    gateway: Arc<dyn LinkGateway>,
    pub session: ConsoleSession,
    pub wizard: CreationWizard,
    page_size: u64,
}

impl LinkConsole {
    pub fn new(gateway: Arc<dyn LinkGateway>, page_size: u64) -> Self {
        Self {
            gateway,
            session: ConsoleSession::new(),
            wizard: CreationWizard::new(),
            page_size,
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    // ---- Listing / refresh ----

    /// Re-fetch the current page from the source of truth. An active
    /// search is re-issued; otherwise the plain listing is fetched. A full
    /// refresh invalidates the selection.
    pub async fn refresh(&mut self) -> Result<()> {
        let page = self.session.page.max(1);
        if let Some(query) = self.session.active_search.clone() {
            let query = query.with_page(page, self.page_size);
            let result = self.gateway.search_links(&query).await?;
            self.session.set_page(page, result.links, result.total);
        } else {
            let result = self.gateway.list_links(page, self.page_size).await?;
            self.session.set_page(page, result.links, result.total);
        }
        self.session.selection.clear();
        Ok(())
    }

    pub async fn goto_page(&mut self, page: u64) -> Result<()> {
        self.session.page = page.max(1);
        self.refresh().await
    }

    pub async fn get_link(&self, code: &str) -> Result<LinkRecord> {
        self.gateway.get_link(code).await
    }

    // ---- Wizard ----

    pub fn next_step(&mut self) -> Result<u8> {
        self.wizard.next()
    }

    pub fn prev_step(&mut self) -> u8 {
        self.wizard.prev()
    }

    pub fn reset_wizard(&mut self) {
        self.wizard.reset();
    }

    /// Submit the wizard at its final step: exactly one create call. On
    /// success the wizard resets and the list refreshes; on failure the
    /// draft is retained so the operator can correct and resubmit.
    pub async fn submit_wizard(&mut self) -> Result<LinkRecord> {
        if !self.wizard.at_final_step() {
            return Err(ConsoleError::invalid_state(format!(
                "wizard is at step {}; finish all steps before submitting",
                self.wizard.step()
            )));
        }
        self.session.in_flight.begin(PendingOp::WizardSubmit)?;

        let request = match self.wizard.build_request() {
            Ok(request) => request,
            Err(err) => {
                self.session.in_flight.finish();
                return Err(err);
            }
        };
        let created = match self.gateway.create_link(&request).await {
            Ok(record) => record,
            Err(err) => {
                // Draft stays as-is for correction
                self.session.in_flight.finish();
                return Err(err);
            }
        };
        self.session.in_flight.finish();

        info!(code = %created.short_code, "link created");
        self.wizard.reset();
        self.refresh().await?;
        Ok(created)
    }

    // ---- Lifecycle ----

    pub async fn update_link(
        &mut self,
        code: &str,
        request: &UpdateLinkRequest,
    ) -> Result<LinkRecord> {
        let updated = self.gateway.update_link(code, request).await?;
        self.refresh().await?;
        Ok(updated)
    }

    pub async fn soft_delete(&mut self, code: &str) -> Result<()> {
        self.gateway.soft_delete_link(code).await?;
        info!(code, "link soft-deleted");
        self.refresh().await?;
        Ok(())
    }

    /// Restore a soft-deleted link. The current status is read from the
    /// source of truth first; anything but `deleted` is refused locally.
    pub async fn restore(&mut self, code: &str) -> Result<LinkRecord> {
        let current = self.gateway.get_link(code).await?;
        if !current.can_restore() {
            return Err(ConsoleError::invalid_state(format!(
                "link '{}' has status '{}'; only deleted links can be restored",
                code, current.status
            )));
        }
        let restored = self.gateway.restore_link(code).await?;
        info!(code, "link restored");
        self.refresh().await?;
        Ok(restored)
    }

    /// Permanently delete a soft-deleted link and its analytics. Refused
    /// without a complete double confirmation, and refused for records not
    /// in the deleted state — both checks happen before any destructive
    /// call is issued.
    pub async fn purge(&mut self, code: &str, confirmation: DoubleConfirmation) -> Result<()> {
        if !confirmation.is_complete() {
            return Err(ConsoleError::validation(
                "permanent deletion requires double confirmation",
            ));
        }
        let current = self.gateway.get_link(code).await?;
        if !current.can_purge() {
            return Err(ConsoleError::invalid_state(format!(
                "link '{}' has status '{}'; soft-delete it before purging",
                code, current.status
            )));
        }
        self.gateway.purge_link(code).await?;
        info!(code, "link purged");
        self.refresh().await?;
        Ok(())
    }

    pub async fn trash_page(&self, page: u64) -> Result<Vec<LinkRecord>> {
        self.gateway.list_trash(page.max(1), self.page_size).await
    }

    // ---- Selection / batch ----

    pub fn toggle_batch_mode(&mut self) -> bool {
        self.session.toggle_batch_mode()
    }

    pub fn toggle_selection(&mut self, code: &str) -> bool {
        self.session.selection.toggle(code)
    }

    pub fn select_all_visible(&mut self) {
        let codes: Vec<String> = self
            .session
            .visible_rows()
            .iter()
            .map(|r| r.short_code.clone())
            .collect();
        self.session
            .selection
            .select_all(codes.iter().map(String::as_str));
    }

    /// Soft-delete the whole selection, one sequential call per item. The
    /// selection is cleared afterwards — its membership is stale either
    /// way — and the report tells partial from total failure.
    pub async fn run_batch_delete(&mut self) -> Result<BatchReport> {
        if self.session.selection.is_empty() {
            return Err(ConsoleError::validation("select at least one link"));
        }
        self.session.in_flight.begin(PendingOp::Batch)?;
        let snapshot = self.session.selection.snapshot();
        let report = batch::run_batch_delete(self.gateway.as_ref(), &snapshot).await;
        self.session.in_flight.finish();
        self.session.selection.clear();
        self.refresh().await?;
        Ok(report)
    }

    /// Export the selection's full records as one CSV artifact. Non-
    /// mutating: the selection is left intact.
    pub async fn run_batch_export(&mut self) -> Result<BatchExport> {
        if self.session.selection.is_empty() {
            return Err(ConsoleError::validation("select at least one link"));
        }
        self.session.in_flight.begin(PendingOp::Batch)?;
        let snapshot = self.session.selection.snapshot();
        let export = batch::run_batch_export(self.gateway.as_ref(), &snapshot).await;
        self.session.in_flight.finish();
        export
    }

    // ---- Import / export ----

    pub async fn import_file(&mut self, path: &Path) -> Result<ImportSummary> {
        let candidates = import::load_candidates(path)?;
        self.import_candidates(candidates).await
    }

    /// Submit parsed candidates as one bulk call and surface the server's
    /// summary verbatim
    pub async fn import_candidates(&mut self, candidates: Vec<Value>) -> Result<ImportSummary> {
        if candidates.is_empty() {
            return Err(ConsoleError::validation("nothing to import"));
        }
        self.session.in_flight.begin(PendingOp::Import)?;
        let result = import::submit_import(self.gateway.as_ref(), &candidates).await;
        self.session.in_flight.finish();
        let summary = result?;
        self.refresh().await?;
        Ok(summary)
    }

    pub async fn export_all(&self, format: ExportFormat) -> Result<Vec<u8>> {
        self.gateway.export_all(format).await
    }

    // ---- Search / filter ----

    pub fn set_quick_filter(&mut self, filter: Option<QuickFilter>) {
        self.session.quick_filter = filter;
    }

    /// Compile and issue an advanced search; the response replaces the
    /// rendered page and pagination state
    pub async fn apply_search(&mut self, form: &SearchForm) -> Result<u64> {
        let query = form.compile()?;
        let page = query.page.unwrap_or(1);
        let result = self.gateway.search_links(&query).await?;
        let total = result.total;
        self.session.active_search = Some(query);
        self.session.set_page(page, result.links, total);
        self.session.selection.clear();
        Ok(total)
    }

    /// Drop the active search and fetch a fresh unfiltered first page —
    /// not a cache replay
    pub async fn clear_search(&mut self) -> Result<()> {
        self.session.active_search = None;
        self.session.page = 1;
        self.refresh().await
    }

    pub fn active_search(&self) -> Option<&SearchQuery> {
        self.session.active_search.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::models::{LinkStatus, ServiceType, Strategy, Target};
    use chrono::Utc;

    fn console_with(gateway: Arc<MemoryGateway>) -> LinkConsole {
        LinkConsole::new(gateway, 20)
    }

    fn seed(gateway: &MemoryGateway, code: &str, status: LinkStatus, visit_count: u64) {
        gateway.insert(LinkRecord {
            short_code: code.to_string(),
            service_type: ServiceType::General,
            targets: vec![Target::url("https://example.com", 1)],
            strategy: Strategy::RoundRobin,
            status,
            visit_count,
            description: None,
            created_at: Utc::now(),
            updated_at: None,
            expire_at: None,
            deleted_at: None,
        });
    }

    fn wizard_to_final(console: &mut LinkConsole, target: &str) {
        console.wizard.draft_mut().service_type = Some(ServiceType::General);
        console.next_step().unwrap();
        console.wizard.draft_mut().target_input = target.to_string();
        console.next_step().unwrap();
    }

    #[tokio::test]
    async fn test_submit_wizard_creates_and_resets() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut console = console_with(gateway.clone());
        wizard_to_final(&mut console, "https://example.com/a");

        let created = console.submit_wizard().await.unwrap();
        assert_eq!(created.targets.len(), 1);
        assert_eq!(console.wizard.step(), 1);
        assert_eq!(console.session.rows.len(), 1);
        assert!(!console.session.in_flight.is_busy());
    }

    #[tokio::test]
    async fn test_submit_wizard_failure_retains_draft() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, "taken", LinkStatus::Active, 0);
        let mut console = console_with(gateway);
        wizard_to_final(&mut console, "https://example.com/a");
        console.wizard.draft_mut().short_code = "taken".into();

        let err = console.submit_wizard().await.unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));
        // Draft kept for correction, still at the final step
        assert_eq!(console.wizard.step(), 3);
        assert_eq!(console.wizard.draft().short_code, "taken");
        assert!(!console.session.in_flight.is_busy());
    }

    #[tokio::test]
    async fn test_submit_wizard_rejected_before_final_step() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut console = console_with(gateway.clone());
        console.wizard.draft_mut().service_type = Some(ServiceType::General);
        console.next_step().unwrap();

        let err = console.submit_wizard().await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidState(_)));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_in_flight_guard_blocks_second_submit() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut console = console_with(gateway.clone());
        wizard_to_final(&mut console, "https://example.com/a");

        console.session.in_flight.begin(PendingOp::WizardSubmit).unwrap();
        let err = console.submit_wizard().await.unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_restore_requires_deleted_status() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, "live", LinkStatus::Active, 0);
        let mut console = console_with(gateway);

        let err = console.restore("live").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_restore_deleted_link() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, "gone", LinkStatus::Deleted, 5);
        let mut console = console_with(gateway);

        let restored = console.restore("gone").await.unwrap();
        assert_eq!(restored.status, LinkStatus::Active);
        assert_eq!(restored.visit_count, 5);
    }

    #[tokio::test]
    async fn test_purge_requires_double_confirmation() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, "gone", LinkStatus::Deleted, 0);
        let mut console = console_with(gateway.clone());

        let err = console
            .purge("gone", DoubleConfirmation::none())
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));

        let mut half = DoubleConfirmation::none();
        half.acknowledge();
        let err = console.purge("gone", half).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));

        // Refused locally: nothing was sent
        assert_eq!(gateway.calls(), 0);

        console
            .purge("gone", DoubleConfirmation::confirmed())
            .await
            .unwrap();
        assert!(matches!(
            gateway.get_link("gone").await,
            Err(ConsoleError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_purge_rejects_non_deleted() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, "live", LinkStatus::Active, 0);
        let mut console = console_with(gateway.clone());

        let err = console
            .purge("live", DoubleConfirmation::confirmed())
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidState(_)));
        // Still present
        assert!(gateway.get_link("live").await.is_ok());
    }

    #[tokio::test]
    async fn test_batch_delete_clears_selection_and_reports() {
        let gateway = Arc::new(MemoryGateway::new());
        for code in ["a", "b", "c"] {
            seed(&gateway, code, LinkStatus::Active, 0);
        }
        gateway.fail_on("b");
        let mut console = console_with(gateway);

        console.session.selection.select("a");
        console.session.selection.select("b");
        console.session.selection.select("c");

        let report = console.run_batch_delete().await.unwrap();
        assert_eq!(report.success_count, 2);
        assert_eq!(report.failed_count, 1);
        assert!(console.session.selection.is_empty());
        assert!(!console.session.in_flight.is_busy());
    }

    #[tokio::test]
    async fn test_batch_export_keeps_selection() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, "a", LinkStatus::Active, 0);
        let mut console = console_with(gateway);

        console.session.selection.select("a");
        let export = console.run_batch_export().await.unwrap();
        assert_eq!(export.report.success_count, 1);
        assert_eq!(console.session.selection.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_over_empty_selection_rejected_locally() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut console = console_with(gateway.clone());

        let err = console.run_batch_export().await.unwrap_err();
        assert_eq!(err.message(), "select at least one link");
        let err = console.run_batch_delete().await.unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_status_round_trip_preserves_visit_count() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, "abc", LinkStatus::Active, 42);
        let mut console = console_with(gateway);

        let inactive = console
            .update_link("abc", &UpdateLinkRequest::status(LinkStatus::Inactive))
            .await
            .unwrap();
        assert_eq!(inactive.status, LinkStatus::Inactive);

        let active = console
            .update_link("abc", &UpdateLinkRequest::status(LinkStatus::Active))
            .await
            .unwrap();
        assert_eq!(active.status, LinkStatus::Active);
        // Server-owned field untouched by the console round trip
        assert_eq!(active.visit_count, 42);
    }

    #[tokio::test]
    async fn test_soft_delete_then_trash_listing() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, "abc", LinkStatus::Active, 0);
        let mut console = console_with(gateway);

        console.soft_delete("abc").await.unwrap();
        assert!(console.session.rows.is_empty());
        let trash = console.trash_page(1).await.unwrap();
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].short_code, "abc");
    }

    #[tokio::test]
    async fn test_apply_and_clear_search() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, "alpha", LinkStatus::Active, 0);
        seed(&gateway, "beta", LinkStatus::Active, 0);
        let mut console = console_with(gateway);

        let form = SearchForm {
            code: "alp".into(),
            ..SearchForm::default()
        };
        let total = console.apply_search(&form).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(console.session.rows.len(), 1);
        assert!(console.active_search().is_some());

        console.clear_search().await.unwrap();
        assert!(console.active_search().is_none());
        assert_eq!(console.session.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_quick_filter_narrows_visible_rows() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, "alpha", LinkStatus::Active, 0);
        seed(&gateway, "beta", LinkStatus::Active, 0);
        let mut console = console_with(gateway);
        console.refresh().await.unwrap();
        assert_eq!(console.session.visible_rows().len(), 2);

        console.set_quick_filter(Some(QuickFilter {
            keyword: "bet".into(),
            ..QuickFilter::default()
        }));
        let visible = console.session.visible_rows();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].short_code, "beta");

        console.set_quick_filter(None);
        assert_eq!(console.session.visible_rows().len(), 2);
    }

    #[tokio::test]
    async fn test_import_candidates_refreshes_list() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut console = console_with(gateway);
        let summary = console
            .import_candidates(vec![serde_json::json!({
                "short_code": "imp1",
                "service_type": "imagebed",
                "path": "/img/1.jpg"
            })])
            .await
            .unwrap();
        assert_eq!(summary.success_count, 1);
        assert_eq!(console.session.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_import_nothing_rejected_before_network() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut console = console_with(gateway.clone());
        let err = console.import_candidates(vec![]).await.unwrap_err();
        assert_eq!(err.message(), "nothing to import");
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_double_confirmation_acknowledge_sequence() {
        let mut confirmation = DoubleConfirmation::none();
        assert!(!confirmation.is_complete());
        confirmation.acknowledge();
        assert!(!confirmation.is_complete());
        confirmation.acknowledge();
        assert!(confirmation.is_complete());
    }
}

//! In-memory implementation of [`LinkGateway`]
//!
//! Backs tests and the offline demo mode. It reproduces the server's
//! lifecycle semantics — soft delete moves records to the trash, restore
//! and purge are only legal from the deleted state, import does per-record
//! accounting — so console flows behave the same as against a real
//! deployment. Failure injection (`fail_on`) and a call counter support
//! the batch/partial-failure tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::{ConsoleError, Result};
use crate::models::{LinkRecord, LinkStatus, ServiceType, Strategy, Target};
use crate::utils::{generate_random_code, GENERATED_CODE_LENGTH};

use super::types::{
    CreateLinkRequest, ExportFormat, ImportSummary, ListPage, SearchPage, SearchQuery,
    UpdateLinkRequest,
};
use super::LinkGateway;

const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Default)]
struct MemoryState {
    links: BTreeMap<String, LinkRecord>,
    fail_codes: HashSet<String>,
    calls: u64,
}

/// Offline gateway holding records in process memory
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing create validation (tests, demo)
    pub fn insert(&self, record: LinkRecord) {
        let mut state = self.state.lock().unwrap();
        state.links.insert(record.short_code.clone(), record);
    }

    /// Make every subsequent operation on `code` fail with a transport
    /// error, simulating a flaky backend for that record
    pub fn fail_on(&self, code: &str) {
        let mut state = self.state.lock().unwrap();
        state.fail_codes.insert(code.to_string());
    }

    /// How many gateway calls have been issued so far
    pub fn calls(&self) -> u64 {
        self.state.lock().unwrap().calls
    }

    /// A gateway pre-populated with a handful of records for demo runs
    pub fn demo() -> Self {
        let gateway = Self::new();
        let now = Utc::now();
        let samples = [
            ("docs", ServiceType::General, Target::url("https://example.com/docs", 1)),
            ("img1", ServiceType::Imagebed, Target::path("/uploads/cover.jpg", 1)),
            ("clip", ServiceType::Video, Target::path("/v/intro.mp4", 2)),
        ];
        for (code, service_type, target) in samples {
            gateway.insert(LinkRecord {
                short_code: code.to_string(),
                service_type,
                targets: vec![target],
                strategy: Strategy::RoundRobin,
                status: LinkStatus::Active,
                visit_count: 0,
                description: None,
                created_at: now,
                updated_at: None,
                expire_at: None,
                deleted_at: None,
            });
        }
        gateway
    }

    fn check_injected_failure(state: &MemoryState, code: &str) -> Result<()> {
        if state.fail_codes.contains(code) {
            Err(ConsoleError::transport(format!(
                "injected failure for '{}'",
                code
            )))
        } else {
            Ok(())
        }
    }

    fn paginate(records: Vec<LinkRecord>, page: u64, page_size: u64) -> Vec<LinkRecord> {
        let page = page.max(1);
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        records
            .into_iter()
            .skip(((page - 1) * page_size) as usize)
            .take(page_size as usize)
            .collect()
    }

    /// Parse one import candidate the way the server does: required
    /// short_code / service_type / destination, everything else defaulted
    fn import_one(state: &mut MemoryState, candidate: &serde_json::Value) -> Result<()> {
        let obj = candidate
            .as_object()
            .ok_or_else(|| ConsoleError::validation("candidate is not an object"))?;

        let code = obj
            .get("short_code")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConsoleError::validation("missing short_code"))?;
        if state.links.contains_key(code) {
            return Err(ConsoleError::validation(format!(
                "short code '{}' already exists",
                code
            )));
        }

        let service_type: ServiceType = obj
            .get("service_type")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .parse()
            .map_err(|_| ConsoleError::validation("invalid service_type"))?;

        let target = if service_type.uses_cdn_path() {
            let path = obj
                .get("path")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ConsoleError::validation("missing path"))?;
            Target::path(path, 1)
        } else {
            let url = obj
                .get("url")
                .or_else(|| obj.get("path"))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ConsoleError::validation("missing url"))?;
            Target::url(url, 1)
        };

        let strategy = obj
            .get("strategy")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        state.links.insert(
            code.to_string(),
            LinkRecord {
                short_code: code.to_string(),
                service_type,
                targets: vec![target],
                strategy,
                status: LinkStatus::Active,
                visit_count: 0,
                description: obj
                    .get("note")
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                created_at: Utc::now(),
                updated_at: None,
                expire_at: None,
                deleted_at: None,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl LinkGateway for MemoryGateway {
    async fn list_links(&self, page: u64, limit: u64) -> Result<ListPage> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        let mut live: Vec<LinkRecord> = state
            .links
            .values()
            .filter(|r| !r.status.is_deleted())
            .cloned()
            .collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.short_code.cmp(&b.short_code)));
        let total = live.len() as u64;
        Ok(ListPage {
            links: Self::paginate(live, page, limit),
            total,
        })
    }

    async fn get_link(&self, code: &str) -> Result<LinkRecord> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Self::check_injected_failure(&state, code)?;
        state
            .links
            .get(code)
            .cloned()
            .ok_or_else(|| ConsoleError::not_found(format!("link '{}' not found", code)))
    }

    async fn create_link(&self, req: &CreateLinkRequest) -> Result<LinkRecord> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;

        crate::models::validate_targets(req.service_type, &req.targets)?;

        let code = match &req.short_code {
            Some(code) if !code.is_empty() => {
                if state.links.contains_key(code) {
                    return Err(ConsoleError::validation(format!(
                        "short code '{}' already exists",
                        code
                    )));
                }
                code.clone()
            }
            _ => loop {
                let code = generate_random_code(GENERATED_CODE_LENGTH);
                if !state.links.contains_key(&code) {
                    break code;
                }
            },
        };

        let record = LinkRecord {
            short_code: code.clone(),
            service_type: req.service_type,
            targets: req.targets.clone(),
            strategy: req.strategy,
            status: LinkStatus::Active,
            visit_count: 0,
            description: req.description.clone(),
            created_at: Utc::now(),
            updated_at: None,
            expire_at: req.expires_at,
            deleted_at: None,
        };
        state.links.insert(code, record.clone());
        Ok(record)
    }

    async fn update_link(&self, code: &str, req: &UpdateLinkRequest) -> Result<LinkRecord> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Self::check_injected_failure(&state, code)?;
        let record = state
            .links
            .get_mut(code)
            .ok_or_else(|| ConsoleError::not_found(format!("link '{}' not found", code)))?;

        if let Some(targets) = &req.targets {
            crate::models::validate_targets(record.service_type, targets)?;
            record.targets = targets.clone();
        }
        if let Some(strategy) = req.strategy {
            record.strategy = strategy;
        }
        if let Some(status) = req.status {
            record.status = status;
            if !status.is_deleted() {
                record.deleted_at = None;
            }
        }
        if let Some(description) = &req.description {
            record.description = Some(description.clone());
        }
        if let Some(expires_at) = req.expires_at {
            record.expire_at = Some(expires_at);
        }
        record.updated_at = Some(Utc::now());
        Ok(record.clone())
    }

    async fn soft_delete_link(&self, code: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Self::check_injected_failure(&state, code)?;
        let record = state
            .links
            .get_mut(code)
            .ok_or_else(|| ConsoleError::not_found(format!("link '{}' not found", code)))?;
        record.status = LinkStatus::Deleted;
        record.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn purge_link(&self, code: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Self::check_injected_failure(&state, code)?;
        let record = state
            .links
            .get(code)
            .ok_or_else(|| ConsoleError::not_found(format!("link '{}' not found", code)))?;
        if !record.can_purge() {
            return Err(ConsoleError::invalid_state(format!(
                "link '{}' is not deleted; soft-delete it first",
                code
            )));
        }
        state.links.remove(code);
        Ok(())
    }

    async fn restore_link(&self, code: &str) -> Result<LinkRecord> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Self::check_injected_failure(&state, code)?;
        let record = state
            .links
            .get_mut(code)
            .ok_or_else(|| ConsoleError::not_found(format!("link '{}' not found", code)))?;
        if !record.can_restore() {
            return Err(ConsoleError::invalid_state(format!(
                "link '{}' is not deleted",
                code
            )));
        }
        record.status = LinkStatus::Active;
        record.deleted_at = None;
        record.updated_at = Some(Utc::now());
        Ok(record.clone())
    }

    async fn search_links(&self, query: &SearchQuery) -> Result<SearchPage> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        let matches: Vec<LinkRecord> = state
            .links
            .values()
            .filter(|r| {
                // Deleted records only show up when explicitly asked for
                if query.status.is_none() && r.status.is_deleted() {
                    return false;
                }
                if let Some(code) = &query.short_code {
                    if !r.short_code.contains(code.as_str()) {
                        return false;
                    }
                }
                if let Some(service_type) = query.service_type {
                    if r.service_type != service_type {
                        return false;
                    }
                }
                if let Some(status) = query.status {
                    if r.status != status {
                        return false;
                    }
                }
                if let Some(from) = query.date_from {
                    if r.created_at < from {
                        return false;
                    }
                }
                if let Some(to) = query.date_to {
                    if r.created_at > to {
                        return false;
                    }
                }
                if let Some(min) = query.visit_count_min {
                    if r.visit_count < min {
                        return false;
                    }
                }
                if let Some(max) = query.visit_count_max {
                    if r.visit_count > max {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        let total = matches.len() as u64;
        let page = query.page.unwrap_or(1);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        Ok(SearchPage {
            links: Self::paginate(matches, page, page_size),
            total,
        })
    }

    async fn import_links(&self, links: &[serde_json::Value]) -> Result<ImportSummary> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        let mut summary = ImportSummary {
            total: links.len() as u64,
            ..ImportSummary::default()
        };
        for candidate in links {
            match Self::import_one(&mut state, candidate) {
                Ok(()) => summary.success_count += 1,
                Err(_) => summary.failed_count += 1,
            }
        }
        Ok(summary)
    }

    async fn list_trash(&self, page: u64, page_size: u64) -> Result<Vec<LinkRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        let deleted: Vec<LinkRecord> = state
            .links
            .values()
            .filter(|r| r.status.is_deleted())
            .cloned()
            .collect();
        Ok(Self::paginate(deleted, page, page_size))
    }

    async fn export_all(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        let live: Vec<&LinkRecord> = state
            .links
            .values()
            .filter(|r| !r.status.is_deleted())
            .collect();
        match format {
            ExportFormat::Json => Ok(serde_json::to_vec_pretty(&live)?),
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.write_record([
                    "code",
                    "service_type",
                    "status",
                    "targets",
                    "visit_count",
                    "created_at",
                ])?;
                for record in live {
                    writer.write_record([
                        record.short_code.clone(),
                        record.service_type.to_string(),
                        record.status.to_string(),
                        serde_json::to_string(&record.targets)?,
                        record.visit_count.to_string(),
                        record.created_at.to_rfc3339(),
                    ])?;
                }
                writer
                    .into_inner()
                    .map_err(|e| ConsoleError::serialization(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::types::SecurityConfig;

    fn create_request(code: &str) -> CreateLinkRequest {
        CreateLinkRequest {
            short_code: Some(code.to_string()),
            service_type: ServiceType::General,
            targets: vec![Target::url("https://example.com", 1)],
            strategy: Strategy::RoundRobin,
            security_config: SecurityConfig::default(),
            description: None,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let gw = MemoryGateway::new();
        let rec = gw.create_link(&create_request("abc")).await.unwrap();
        assert_eq!(rec.short_code, "abc");
        assert_eq!(rec.status, LinkStatus::Active);
        assert_eq!(gw.get_link("abc").await.unwrap().short_code, "abc");
    }

    #[tokio::test]
    async fn test_create_duplicate_code_rejected() {
        let gw = MemoryGateway::new();
        gw.create_link(&create_request("abc")).await.unwrap();
        let err = gw.create_link(&create_request("abc")).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_generates_code_when_absent() {
        let gw = MemoryGateway::new();
        let mut req = create_request("");
        req.short_code = None;
        let rec = gw.create_link(&req).await.unwrap();
        assert_eq!(rec.short_code.len(), GENERATED_CODE_LENGTH);
    }

    #[tokio::test]
    async fn test_soft_delete_moves_to_trash() {
        let gw = MemoryGateway::new();
        gw.create_link(&create_request("abc")).await.unwrap();
        gw.soft_delete_link("abc").await.unwrap();

        let page = gw.list_links(1, 20).await.unwrap();
        assert!(page.links.is_empty());
        assert_eq!(page.total, 0);

        let trash = gw.list_trash(1, 20).await.unwrap();
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].status, LinkStatus::Deleted);
        assert!(trash[0].deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_restore_requires_deleted_state() {
        let gw = MemoryGateway::new();
        gw.create_link(&create_request("abc")).await.unwrap();
        let err = gw.restore_link("abc").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidState(_)));

        gw.soft_delete_link("abc").await.unwrap();
        let rec = gw.restore_link("abc").await.unwrap();
        assert_eq!(rec.status, LinkStatus::Active);
        assert!(rec.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_purge_requires_deleted_state() {
        let gw = MemoryGateway::new();
        gw.create_link(&create_request("abc")).await.unwrap();
        let err = gw.purge_link("abc").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidState(_)));

        gw.soft_delete_link("abc").await.unwrap();
        gw.purge_link("abc").await.unwrap();
        assert!(matches!(
            gw.get_link("abc").await,
            Err(ConsoleError::NotFound(_))
        ));
        // Purged code is free for reuse
        gw.create_link(&create_request("abc")).await.unwrap();
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let gw = MemoryGateway::new();
        gw.create_link(&create_request("abc")).await.unwrap();
        gw.fail_on("abc");
        assert!(matches!(
            gw.soft_delete_link("abc").await,
            Err(ConsoleError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_search_filters_and_counts() {
        let gw = MemoryGateway::new();
        gw.create_link(&create_request("alpha")).await.unwrap();
        gw.create_link(&create_request("beta")).await.unwrap();

        let query = SearchQuery {
            short_code: Some("alph".into()),
            ..SearchQuery::default()
        };
        let page = gw.search_links(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.links[0].short_code, "alpha");
    }

    #[tokio::test]
    async fn test_search_excludes_deleted_by_default() {
        let gw = MemoryGateway::new();
        gw.create_link(&create_request("abc")).await.unwrap();
        gw.soft_delete_link("abc").await.unwrap();

        let all = gw.search_links(&SearchQuery::default()).await.unwrap();
        assert_eq!(all.total, 0);

        let deleted = gw
            .search_links(&SearchQuery {
                status: Some(LinkStatus::Deleted),
                ..SearchQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(deleted.total, 1);
    }

    #[tokio::test]
    async fn test_import_accounting() {
        let gw = MemoryGateway::new();
        let candidates = vec![
            serde_json::json!({"short_code":"ok1","service_type":"imagebed","path":"/img/1.jpg"}),
            serde_json::json!({"short_code":"","service_type":"imagebed","path":"/img/2.jpg"}),
            serde_json::json!({"short_code":"ok2","service_type":"bogus","path":"/img/3.jpg"}),
        ];
        let summary = gw.import_links(&candidates).await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failed_count, 2);
    }

    #[tokio::test]
    async fn test_call_counter() {
        let gw = MemoryGateway::new();
        assert_eq!(gw.calls(), 0);
        gw.list_links(1, 20).await.unwrap();
        let _ = gw.get_link("missing").await;
        assert_eq!(gw.calls(), 2);
    }

    #[tokio::test]
    async fn test_export_all_csv_has_header() {
        let gw = MemoryGateway::new();
        let bytes = gw.export_all(ExportFormat::Csv).await.unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("code,service_type,status,targets,visit_count,created_at"));
    }
}

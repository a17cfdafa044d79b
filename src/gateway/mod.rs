//! Gateway layer: the console's only door to the link-management API
//!
//! The console core is written against the [`LinkGateway`] trait; the
//! concrete transport is chosen at startup:
//!
//! ```text
//! console core ──→ LinkGateway ──→ HttpGateway   (reqwest, X-API-Key)
//!                               └→ MemoryGateway (tests / offline demo)
//! ```
//!
//! `MemoryGateway` reproduces the server's lifecycle semantics (soft
//! delete, trash, restore, purge, import accounting) so console flows can
//! be exercised end-to-end without a backend.

mod http;
mod memory;
mod types;

pub use http::HttpGateway;
pub use memory::MemoryGateway;
pub use types::{
    CreateLinkRequest, ExportFormat, ImportSummary, ListPage, SearchPage, SearchQuery,
    SecurityConfig, UpdateLinkRequest,
};

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::LinkRecord;

/// HTTP contract of the link-management service, one method per endpoint.
///
/// Implementations surface non-2xx and malformed responses as
/// `ConsoleError::Transport` and never panic on them.
#[async_trait]
pub trait LinkGateway: Send + Sync {
    /// `GET /links?page&limit`
    async fn list_links(&self, page: u64, limit: u64) -> Result<ListPage>;

    /// `GET /links/{code}`
    async fn get_link(&self, code: &str) -> Result<LinkRecord>;

    /// `POST /links`
    async fn create_link(&self, req: &CreateLinkRequest) -> Result<LinkRecord>;

    /// `PUT /links/{code}`
    async fn update_link(&self, code: &str, req: &UpdateLinkRequest) -> Result<LinkRecord>;

    /// `DELETE /links/{code}` — soft delete, record moves to trash
    async fn soft_delete_link(&self, code: &str) -> Result<()>;

    /// `DELETE /links/{code}?permanent=true` — irreversible
    async fn purge_link(&self, code: &str) -> Result<()>;

    /// `PUT /links/{code}` with `{"status":"active"}`
    async fn restore_link(&self, code: &str) -> Result<LinkRecord>;

    /// `POST /links/search`
    async fn search_links(&self, query: &SearchQuery) -> Result<SearchPage>;

    /// `POST /links/import` with `{"links":[...]}`
    async fn import_links(&self, links: &[serde_json::Value]) -> Result<ImportSummary>;

    /// `GET /links/trash?page&page_size`
    async fn list_trash(&self, page: u64, page_size: u64) -> Result<Vec<LinkRecord>>;

    /// `GET /links/export?format=` — raw file stream
    async fn export_all(&self, format: ExportFormat) -> Result<Vec<u8>>;
}

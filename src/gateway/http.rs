//! HTTP implementation of [`LinkGateway`] backed by reqwest
//!
//! Success envelope is `{"data": ...}`, failure is `{"error": "..."}` (some
//! deployments use `"message"`). A non-2xx status or a body that fails to
//! parse is reported as `Transport`; the caller decides what to do with it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{ConsoleError, Result};
use crate::models::{LinkRecord, LinkStatus};

use super::types::{
    CreateLinkRequest, ExportFormat, ImportSummary, ListPage, SearchPage, SearchQuery,
    UpdateLinkRequest,
};
use super::LinkGateway;

const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    links: Vec<LinkRecord>,
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct TrashData {
    links: Vec<LinkRecord>,
}

/// Gateway speaking to a real deployment
pub struct HttpGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpGateway {
    /// `base_url` is the full API base, e.g. `http://127.0.0.1:8080/api/v1`
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<(StatusCode, Vec<u8>)> {
        let resp = builder
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ConsoleError::transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ConsoleError::transport(e.to_string()))?
            .to_vec();
        Ok((status, body))
    }

    /// Map a non-2xx response to an error, extracting the server's message
    /// when the body is the JSON error envelope
    fn check_status(status: StatusCode, body: Vec<u8>) -> Result<Vec<u8>> {
        if status.is_success() {
            return Ok(body);
        }
        let detail = serde_json::from_slice::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        if status == StatusCode::NOT_FOUND {
            Err(ConsoleError::not_found(detail))
        } else {
            Err(ConsoleError::transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                detail
            )))
        }
    }

    async fn request_data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let (status, body) = self.execute(builder).await?;
        let body = Self::check_status(status, body)?;
        serde_json::from_slice::<Envelope<T>>(&body)
            .map(|env| env.data)
            .map_err(|e| ConsoleError::transport(format!("invalid response body: {}", e)))
    }

    async fn request_empty(&self, builder: RequestBuilder) -> Result<()> {
        let (status, body) = self.execute(builder).await?;
        Self::check_status(status, body).map(|_| ())
    }
}

#[async_trait]
impl LinkGateway for HttpGateway {
    async fn list_links(&self, page: u64, limit: u64) -> Result<ListPage> {
        debug!(page, limit, "listing links");
        let builder = self
            .client
            .get(self.url("/links"))
            .query(&[("page", page), ("limit", limit)]);
        self.request_data(builder).await
    }

    async fn get_link(&self, code: &str) -> Result<LinkRecord> {
        let builder = self.client.get(self.url(&format!("/links/{}", code)));
        self.request_data(builder).await
    }

    async fn create_link(&self, req: &CreateLinkRequest) -> Result<LinkRecord> {
        debug!(service_type = %req.service_type, "creating link");
        let builder = self.client.post(self.url("/links")).json(req);
        self.request_data(builder).await
    }

    async fn update_link(&self, code: &str, req: &UpdateLinkRequest) -> Result<LinkRecord> {
        let builder = self
            .client
            .put(self.url(&format!("/links/{}", code)))
            .json(req);
        self.request_data(builder).await
    }

    async fn soft_delete_link(&self, code: &str) -> Result<()> {
        let builder = self.client.delete(self.url(&format!("/links/{}", code)));
        self.request_empty(builder).await
    }

    async fn purge_link(&self, code: &str) -> Result<()> {
        let builder = self
            .client
            .delete(self.url(&format!("/links/{}", code)))
            .query(&[("permanent", "true")]);
        self.request_empty(builder).await
    }

    async fn restore_link(&self, code: &str) -> Result<LinkRecord> {
        let req = UpdateLinkRequest::status(LinkStatus::Active);
        let builder = self
            .client
            .put(self.url(&format!("/links/{}", code)))
            .json(&req);
        self.request_data(builder).await
    }

    async fn search_links(&self, query: &SearchQuery) -> Result<SearchPage> {
        let builder = self.client.post(self.url("/links/search")).json(query);
        let data: SearchData = self.request_data(builder).await?;
        Ok(SearchPage {
            links: data.links,
            total: data.pagination.total,
        })
    }

    async fn import_links(&self, links: &[serde_json::Value]) -> Result<ImportSummary> {
        debug!(count = links.len(), "submitting bulk import");
        let body = serde_json::json!({ "links": links });
        let builder = self.client.post(self.url("/links/import")).json(&body);
        self.request_data(builder).await
    }

    async fn list_trash(&self, page: u64, page_size: u64) -> Result<Vec<LinkRecord>> {
        let builder = self
            .client
            .get(self.url("/links/trash"))
            .query(&[("page", page), ("page_size", page_size)]);
        let data: TrashData = self.request_data(builder).await?;
        Ok(data.links)
    }

    async fn export_all(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let builder = self
            .client
            .get(self.url("/links/export"))
            .query(&[("format", format.as_str())]);
        let (status, body) = self.execute(builder).await?;
        Self::check_status(status, body)
    }
}

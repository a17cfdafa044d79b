//! Request/response DTOs for the link-management API
//!
//! Field names are the wire names. Optional request fields use
//! `skip_serializing_if` so absent values are omitted entirely — the
//! server treats a present-but-empty field as a constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{LinkRecord, LinkStatus, ServiceType, Strategy, Target};

// ============ Create / Update ============

/// Per-link security options carried in the create payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub enable_cache: bool,
}

/// Payload for `POST /links`
#[derive(Debug, Clone, Serialize)]
pub struct CreateLinkRequest {
    /// Omitted → server generates a code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    pub service_type: ServiceType,
    pub targets: Vec<Target>,
    pub strategy: Strategy,
    pub security_config: SecurityConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial payload for `PUT /links/{code}`; every field optional, absent
/// fields are left untouched server-side
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateLinkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<Target>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LinkStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl UpdateLinkRequest {
    /// Shorthand for the status-only updates the lifecycle operations use
    pub fn status(status: LinkStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

// ============ Listing / search ============

/// One page of the main listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPage {
    pub links: Vec<LinkRecord>,
    pub total: u64,
}

/// Structured filter for `POST /links/search`.
///
/// Every field is optional; an all-empty query serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LinkStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_count_min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_count_max: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
}

impl SearchQuery {
    /// True when no filter field is set (page/page_size do not count)
    pub fn is_unconstrained(&self) -> bool {
        self.short_code.is_none()
            && self.service_type.is_none()
            && self.status.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.visit_count_min.is_none()
            && self.visit_count_max.is_none()
    }

    pub fn with_page(mut self, page: u64, page_size: u64) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }
}

/// One page of search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub links: Vec<LinkRecord>,
    pub total: u64,
}

// ============ Import / export ============

/// Server-side accounting for one bulk import, surfaced verbatim
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub success_count: u64,
    pub failed_count: u64,
    pub total: u64,
}

/// Format selector for the server-side full export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_search_query_serializes_to_zero_keys() {
        let query = SearchQuery::default();
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_search_query_omits_unset_fields() {
        let query = SearchQuery {
            short_code: Some("abc".into()),
            ..SearchQuery::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["short_code"], "abc");
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let req = UpdateLinkRequest::status(LinkStatus::Inactive);
        let value = serde_json::to_value(&req).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["status"], "inactive");
    }

    #[test]
    fn test_create_request_wire_shape() {
        let req = CreateLinkRequest {
            short_code: None,
            service_type: ServiceType::Imagebed,
            targets: vec![Target::path("/img/1.jpg", 1)],
            strategy: Strategy::RoundRobin,
            security_config: SecurityConfig::default(),
            description: None,
            expires_at: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("short_code"));
        assert!(!obj.contains_key("description"));
        assert_eq!(obj["service_type"], "imagebed");
        assert_eq!(obj["strategy"], "round_robin");
        assert_eq!(obj["targets"][0]["path"], "/img/1.jpg");
        assert_eq!(obj["targets"][0]["weight"], 1);
    }
}

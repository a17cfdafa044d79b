//! Link record model and lifecycle state machine
//!
//! Wire field names follow the management API (snake_case). The console
//! never writes server-owned fields (`visit_count`, timestamps); they are
//! deserialized for display only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::errors::{ConsoleError, Result};
use crate::utils::url_validator::validate_absolute_url;

// ============ Enums ============

/// Which target-shape variant a record uses.
///
/// `general` links carry absolute URLs; every other type carries a
/// CDN-resolved path (resolution is server-side and opaque to the console).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceType {
    General,
    Imagebed,
    File,
    Video,
    Api,
}

impl ServiceType {
    pub const ALL: [ServiceType; 5] = [
        ServiceType::General,
        ServiceType::Imagebed,
        ServiceType::File,
        ServiceType::Video,
        ServiceType::Api,
    ];

    /// True for types whose targets are CDN paths rather than URLs
    pub fn uses_cdn_path(&self) -> bool {
        !matches!(self, ServiceType::General)
    }
}

/// Record lifecycle status.
///
/// `expired` is set server-side by a time check; the console renders and
/// filters on it but never writes it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LinkStatus {
    Active,
    Inactive,
    Expired,
    Deleted,
}

impl LinkStatus {
    pub fn is_deleted(&self) -> bool {
        matches!(self, LinkStatus::Deleted)
    }
}

/// Distribution strategy across a record's targets.
///
/// `Unknown` absorbs server-side strategies this console version does not
/// know yet, so listing never fails on a newer backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    #[default]
    RoundRobin,
    Weighted,
    Geo,
    Unknown,
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Strategy::Unknown))
    }
}

// ============ Targets ============

/// One destination of a short code.
///
/// The variant is dictated by the record's service type: `general` records
/// carry `Url` targets, everything else carries `Path` targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Url { url: String, weight: u32 },
    Path { path: String, weight: u32 },
}

impl Target {
    pub fn url(url: impl Into<String>, weight: u32) -> Self {
        Target::Url {
            url: url.into(),
            weight,
        }
    }

    pub fn path(path: impl Into<String>, weight: u32) -> Self {
        Target::Path {
            path: path.into(),
            weight,
        }
    }

    /// The destination string, regardless of variant
    pub fn location(&self) -> &str {
        match self {
            Target::Url { url, .. } => url,
            Target::Path { path, .. } => path,
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            Target::Url { weight, .. } | Target::Path { weight, .. } => *weight,
        }
    }

    /// Check that this target has the shape `service_type` requires
    pub fn validate_for(&self, service_type: ServiceType) -> Result<()> {
        match (service_type.uses_cdn_path(), self) {
            (false, Target::Url { url, .. }) => validate_absolute_url(url)
                .map_err(|e| ConsoleError::invalid_url(e.to_string())),
            (true, Target::Path { path, .. }) => {
                if path.starts_with('/') {
                    Ok(())
                } else {
                    Err(ConsoleError::validation(format!(
                        "target path '{}' must start with '/'",
                        path
                    )))
                }
            }
            (false, Target::Path { path, .. }) => Err(ConsoleError::validation(format!(
                "general links need a URL target, got path '{}'",
                path
            ))),
            (true, Target::Url { url, .. }) => Err(ConsoleError::validation(format!(
                "{} links need a path target, got URL '{}'",
                service_type, url
            ))),
        }
    }
}

/// Validate a whole target list for a service type: non-empty, every
/// element shaped correctly.
pub fn validate_targets(service_type: ServiceType, targets: &[Target]) -> Result<()> {
    if targets.is_empty() {
        return Err(ConsoleError::validation("targets must not be empty"));
    }
    for target in targets {
        target.validate_for(service_type)?;
    }
    Ok(())
}

// ============ LinkRecord ============

/// One redirect record as the management API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRecord {
    pub short_code: String,
    pub service_type: ServiceType,
    pub targets: Vec<Target>,
    #[serde(default)]
    pub strategy: Strategy,
    pub status: LinkStatus,
    /// Server-owned; monotonically non-decreasing; display only
    #[serde(default)]
    pub visit_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl LinkRecord {
    /// A record can be restored only out of the deleted state
    pub fn can_restore(&self) -> bool {
        self.status.is_deleted()
    }

    /// Permanent deletion is the second step of delete-then-purge; it is
    /// only legal for records already soft-deleted
    pub fn can_purge(&self) -> bool {
        self.status.is_deleted()
    }

    pub fn validate_targets(&self) -> Result<()> {
        validate_targets(self.service_type, &self.targets)
    }
}

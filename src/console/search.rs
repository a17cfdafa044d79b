//! Search and filter composition
//!
//! Two mutually exclusive modes: a quick display-time predicate applied to
//! the rows already on screen, and an advanced form compiled into one
//! structured search request. Empty form fields are omitted from the
//! request entirely — a present-but-empty value would over-constrain the
//! server-side query.

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::{ConsoleError, Result};
use crate::gateway::SearchQuery;
use crate::models::{LinkRecord, LinkStatus, ServiceType};

// ============ Quick filter ============

/// Display-time predicate over the rendered page; non-destructive and
/// instantly reversible by clearing
#[derive(Debug, Clone, Default)]
pub struct QuickFilter {
    /// Case-insensitive substring over code, description and targets
    pub keyword: String,
    pub service_type: Option<ServiceType>,
    pub status: Option<LinkStatus>,
}

impl QuickFilter {
    pub fn is_empty(&self) -> bool {
        self.keyword.trim().is_empty() && self.service_type.is_none() && self.status.is_none()
    }

    pub fn matches(&self, record: &LinkRecord) -> bool {
        if let Some(service_type) = self.service_type {
            if record.service_type != service_type {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        let keyword = self.keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return true;
        }
        if record.short_code.to_lowercase().contains(&keyword) {
            return true;
        }
        if let Some(description) = &record.description {
            if description.to_lowercase().contains(&keyword) {
                return true;
            }
        }
        record
            .targets
            .iter()
            .any(|t| t.location().to_lowercase().contains(&keyword))
    }
}

// ============ Advanced search form ============

/// Raw operator input for the advanced search panel. `compile()` turns it
/// into the wire query, dropping every empty field.
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub code: String,
    pub service_type: Option<ServiceType>,
    pub status: Option<LinkStatus>,
    /// Inclusive lower bound, `YYYY-MM-DD` or RFC3339
    pub date_from: String,
    /// Inclusive upper bound, `YYYY-MM-DD` or RFC3339
    pub date_to: String,
    pub visit_min: String,
    pub visit_max: String,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl SearchForm {
    /// Compile to the structured request. Empty strings become absent
    /// fields; malformed dates and counts fail before any network call.
    pub fn compile(&self) -> Result<SearchQuery> {
        Ok(SearchQuery {
            short_code: non_empty(&self.code),
            service_type: self.service_type,
            status: self.status,
            date_from: parse_date_bound(&self.date_from, false)?,
            date_to: parse_date_bound(&self.date_to, true)?,
            visit_count_min: parse_count(&self.visit_min, "visit_count_min")?,
            visit_count_max: parse_count(&self.visit_max, "visit_count_max")?,
            page: self.page,
            page_size: self.page_size,
        })
    }
}

fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Accepts RFC3339 or a bare date; a bare date expands to the start (lower
/// bound) or end (upper bound) of that day
fn parse_date_bound(input: &str, end_of_day: bool) -> Result<Option<DateTime<Utc>>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|e| ConsoleError::date_parse(format!("'{}': {}", trimmed, e)))?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    Ok(time.map(|naive| naive.and_utc()))
}

fn parse_count(input: &str, field: &str) -> Result<Option<u64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConsoleError::validation(format!("{} must be a non-negative integer", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Strategy, Target};

    fn record(code: &str, service_type: ServiceType, status: LinkStatus) -> LinkRecord {
        LinkRecord {
            short_code: code.to_string(),
            service_type,
            targets: vec![Target::path("/img/photo.jpg", 1)],
            strategy: Strategy::RoundRobin,
            status,
            visit_count: 0,
            description: Some("team offsite".into()),
            created_at: Utc::now(),
            updated_at: None,
            expire_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn test_quick_filter_empty_matches_everything() {
        let filter = QuickFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&record("abc", ServiceType::Imagebed, LinkStatus::Active)));
    }

    #[test]
    fn test_quick_filter_keyword_searches_code_description_targets() {
        let rec = record("promo24", ServiceType::Imagebed, LinkStatus::Active);

        let by_code = QuickFilter {
            keyword: "PROMO".into(),
            ..QuickFilter::default()
        };
        assert!(by_code.matches(&rec));

        let by_description = QuickFilter {
            keyword: "offsite".into(),
            ..QuickFilter::default()
        };
        assert!(by_description.matches(&rec));

        let by_target = QuickFilter {
            keyword: "photo.jpg".into(),
            ..QuickFilter::default()
        };
        assert!(by_target.matches(&rec));

        let miss = QuickFilter {
            keyword: "zzz".into(),
            ..QuickFilter::default()
        };
        assert!(!miss.matches(&rec));
    }

    #[test]
    fn test_quick_filter_enum_constraints() {
        let rec = record("abc", ServiceType::Video, LinkStatus::Expired);
        let filter = QuickFilter {
            service_type: Some(ServiceType::Video),
            status: Some(LinkStatus::Expired),
            ..QuickFilter::default()
        };
        assert!(filter.matches(&rec));

        let wrong_status = QuickFilter {
            status: Some(LinkStatus::Active),
            ..QuickFilter::default()
        };
        assert!(!wrong_status.matches(&rec));
    }

    #[test]
    fn test_empty_form_compiles_to_zero_keys() {
        let query = SearchForm::default().compile().unwrap();
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_whitespace_only_fields_are_omitted() {
        let form = SearchForm {
            code: "   ".into(),
            visit_min: " ".into(),
            ..SearchForm::default()
        };
        let query = form.compile().unwrap();
        assert!(query.short_code.is_none());
        assert!(query.visit_count_min.is_none());
    }

    #[test]
    fn test_date_bounds_expand_bare_dates() {
        let form = SearchForm {
            date_from: "2026-01-15".into(),
            date_to: "2026-01-15".into(),
            ..SearchForm::default()
        };
        let query = form.compile().unwrap();
        let from = query.date_from.unwrap();
        let to = query.date_to.unwrap();
        assert!(from < to);
        assert_eq!(from.to_rfc3339(), "2026-01-15T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2026-01-15T23:59:59+00:00");
    }

    #[test]
    fn test_bad_date_fails_locally() {
        let form = SearchForm {
            date_from: "15/01/2026".into(),
            ..SearchForm::default()
        };
        assert!(matches!(
            form.compile().unwrap_err(),
            ConsoleError::DateParse(_)
        ));
    }

    #[test]
    fn test_bad_visit_count_fails_locally() {
        let form = SearchForm {
            visit_max: "-3".into(),
            ..SearchForm::default()
        };
        assert!(matches!(
            form.compile().unwrap_err(),
            ConsoleError::Validation(_)
        ));
    }

    #[test]
    fn test_compiled_query_carries_filters() {
        let form = SearchForm {
            code: "abc".into(),
            service_type: Some(ServiceType::Imagebed),
            visit_min: "10".into(),
            page: Some(2),
            page_size: Some(50),
            ..SearchForm::default()
        };
        let query = form.compile().unwrap();
        assert_eq!(query.short_code.as_deref(), Some("abc"));
        assert_eq!(query.service_type, Some(ServiceType::Imagebed));
        assert_eq!(query.visit_count_min, Some(10));
        assert_eq!(query.page, Some(2));
        assert!(!query.is_unconstrained());
    }
}

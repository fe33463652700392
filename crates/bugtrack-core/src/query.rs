//! List query shaping: filters, sort order and pagination.
//!
//! Query-string values are parsed leniently. Missing, empty or
//! unparseable values fall back to defaults instead of failing the request.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_SORT: &str = "-createdAt";

/// Raw list parameters as they appear in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl ListParams {
    /// Non-empty parameters as `(name, value)` pairs, in a stable order.
    pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("status", &self.status),
            ("priority", &self.priority),
            ("project", &self.project),
            ("sort", &self.sort),
            ("page", &self.page),
            ("limit", &self.limit),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (name, v))
        })
        .collect()
    }

    pub fn to_query(&self) -> BugQuery {
        BugQuery {
            filter: BugFilter {
                status: non_empty(&self.status),
                priority: non_empty(&self.priority),
                project: non_empty(&self.project),
            },
            sort: self
                .sort
                .as_deref()
                .map(SortSpec::parse)
                .unwrap_or_default(),
            pagination: Pagination::from_raw(self.page.as_deref(), self.limit.as_deref()),
        }
    }
}

/// A fully shaped list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugQuery {
    pub filter: BugFilter,
    pub sort: SortSpec,
    pub pagination: Pagination,
}

/// Exact-match filters, combined with AND. `None` means "any".
///
/// Values are kept as text: a value outside the enumerated set is not an
/// error, it just matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project: Option<String>,
}

impl BugFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.project.is_none()
    }
}

/// One-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Parses `page` and `limit` the way query strings are usually written:
    /// leading digits count, anything else (or a value below 1) falls back
    /// to the default.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: page.and_then(parse_positive).unwrap_or(DEFAULT_PAGE),
            limit: limit.and_then(parse_positive).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Number of matching items to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// `ceil(total / limit)`; zero when nothing matches.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit.max(1)))
    }
}

/// Sortable bug fields, named as they appear in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Status,
    Priority,
    Project,
    AssignedTo,
    ReportedBy,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            "title" => Self::Title,
            "status" => Self::Status,
            "priority" => Self::Priority,
            "project" => Self::Project,
            "assignedTo" => Self::AssignedTo,
            "reportedBy" => Self::ReportedBy,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Project => "project",
            Self::AssignedTo => "assignedTo",
            Self::ReportedBy => "reportedBy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Ordered list of sort keys. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec(Vec<SortKey>);

impl Default for SortSpec {
    fn default() -> Self {
        Self(vec![SortKey {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }])
    }
}

impl SortSpec {
    /// Parses `"-priority createdAt"` style specs. Keys are separated by
    /// spaces or commas; `-` means descending, `+` or no prefix ascending.
    /// Unknown and repeated fields are skipped.
    pub fn parse(spec: &str) -> Self {
        let mut keys: Vec<SortKey> = Vec::new();
        for token in spec.split(|c: char| c.is_whitespace() || c == ',') {
            let (direction, name) = match token.strip_prefix('-') {
                Some(rest) => (SortDirection::Desc, rest),
                None => (SortDirection::Asc, token.strip_prefix('+').unwrap_or(token)),
            };
            let Some(field) = SortField::parse(name) else {
                continue;
            };
            if keys.iter().any(|k| k.field == field) {
                continue;
            }
            keys.push(SortKey { field, direction });
        }
        if keys.is_empty() {
            Self::default()
        } else {
            Self(keys)
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    /// Direction of the leading key, used to break ties consistently.
    pub fn primary_direction(&self) -> SortDirection {
        self.0
            .first()
            .map(|k| k.direction)
            .unwrap_or(SortDirection::Desc)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

/// Reads the leading decimal digits of `raw` (after optional whitespace and
/// `+`), returning `None` when there are none, the number is below 1 or it
/// does not fit in a `u32`.
fn parse_positive(raw: &str) -> Option<u32> {
    let raw = raw.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let digits: &str = &raw[..raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len())];
    if digits.is_empty() {
        return None;
    }
    let value = digits.parse::<u32>().ok()?;
    (value >= 1).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(Pagination::from_raw(None, None), Pagination::new(1, 10));
        assert_eq!(Pagination::from_raw(Some(""), Some("abc")), Pagination::new(1, 10));
    }

    #[test]
    fn test_pagination_falls_back_below_one() {
        assert_eq!(Pagination::from_raw(Some("0"), Some("0")), Pagination::new(1, 10));
        assert_eq!(Pagination::from_raw(Some("-3"), Some("-5")), Pagination::new(1, 10));
    }

    #[test]
    fn test_pagination_reads_leading_digits() {
        let p = Pagination::from_raw(Some("2abc"), Some(" 25"));
        assert_eq!(p.page, 2);
        assert_eq!(p.limit, 25);
        assert_eq!(Pagination::from_raw(Some("3.9"), None).page, 3);
    }

    #[test]
    fn test_offset_and_total_pages() {
        let p = Pagination::new(3, 2);
        assert_eq!(p.offset(), 4);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(4), 2);
        assert_eq!(p.total_pages(5), 3);
        assert_eq!(Pagination::new(1, 10).total_pages(10), 1);
    }

    #[test]
    fn test_out_of_range_values_fall_back_to_defaults() {
        let p = Pagination::from_raw(Some("99999999999"), Some("99999999999999999999"));
        assert_eq!(p, Pagination::new(DEFAULT_PAGE, DEFAULT_LIMIT));

        let p = Pagination::from_raw(Some("4294967295"), Some("4294967295"));
        assert_eq!(p.page, u32::MAX);
        assert_eq!(p.limit, u32::MAX);
        assert!(p.offset() > 0);
    }

    #[test]
    fn test_sort_default() {
        let spec = SortSpec::default();
        assert_eq!(
            spec.keys(),
            &[SortKey {
                field: SortField::CreatedAt,
                direction: SortDirection::Desc
            }]
        );
        assert_eq!(SortSpec::parse(DEFAULT_SORT), spec);
    }

    #[test]
    fn test_sort_parses_multiple_keys() {
        let spec = SortSpec::parse("-priority title,+project");
        let keys: Vec<(SortField, SortDirection)> =
            spec.keys().iter().map(|k| (k.field, k.direction)).collect();
        assert_eq!(
            keys,
            vec![
                (SortField::Priority, SortDirection::Desc),
                (SortField::Title, SortDirection::Asc),
                (SortField::Project, SortDirection::Asc),
            ]
        );
        assert_eq!(spec.primary_direction(), SortDirection::Desc);
    }

    #[test]
    fn test_sort_skips_unknown_and_duplicate_fields() {
        let spec = SortSpec::parse("bogus -title title");
        assert_eq!(spec.keys().len(), 1);
        assert_eq!(spec.keys()[0].direction, SortDirection::Desc);

        assert_eq!(SortSpec::parse("nonsense"), SortSpec::default());
        assert_eq!(SortSpec::parse(""), SortSpec::default());
    }

    #[test]
    fn test_params_to_query_drops_empty_filters() {
        let params = ListParams {
            status: Some("open".to_string()),
            priority: Some(String::new()),
            project: None,
            sort: None,
            page: Some("2".to_string()),
            limit: Some("5".to_string()),
        };
        let query = params.to_query();
        assert_eq!(query.filter.status.as_deref(), Some("open"));
        assert!(query.filter.priority.is_none());
        assert_eq!(query.pagination, Pagination::new(2, 5));
        assert_eq!(query.sort, SortSpec::default());
    }

    #[test]
    fn test_params_to_pairs() {
        let params = ListParams {
            project: Some("Web App".to_string()),
            limit: Some("20".to_string()),
            status: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(params.to_pairs(), vec![("project", "Web App"), ("limit", "20")]);
        assert!(ListParams::default().to_query().filter.is_empty());
    }
}

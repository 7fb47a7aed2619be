//! List query parameters.
//!
//! A [`ResourceQuery`] identifies one list request. Two queries are the same
//! cache entry exactly when every field is equal, so the setters normalize
//! their inputs (trimmed search, no empty filters) before storing them.
//!
//! The setters also carry the paging rules: any change to the effective
//! search term, a filter, the sort, or the page size sends the view back to
//! page 1.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    Asc,
    #[default]
    Desc,
}

impl SortType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sortable columns understood by the list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Name,
    Title,
    Username,
    Email,
    CreatedAt,
    UpdatedAt,
    StartDate,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Username => "username",
            Self::Email => "email",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::StartDate => "start_date",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Title => "Title",
            Self::Username => "Username",
            Self::Email => "Email",
            Self::CreatedAt => "Created",
            Self::UpdatedAt => "Updated",
            Self::StartDate => "Start date",
        }
    }
}

/// Rejected query parameters.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Pages are 1-based.
    #[error("page must be at least 1 (got {0})")]
    PageOutOfRange(u32),
    /// Page size must be positive.
    #[error("limit must be greater than 0")]
    ZeroLimit,
}

/// Full parameter set of one list request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_type: SortType,
    pub filters: BTreeMap<String, String>,
}

impl ResourceQuery {
    /// First page with the given page size and the server's default ordering.
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            search: None,
            sort_by: None,
            sort_type: SortType::default(),
            filters: BTreeMap::new(),
        }
    }

    /// Builder form of [`set_sort`](Self::set_sort).
    pub fn sorted(mut self, sort_by: SortBy, sort_type: SortType) -> Self {
        self.set_sort(Some(sort_by), sort_type);
        self
    }

    /// Builder form of [`set_filter`](Self::set_filter).
    pub fn filter(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_filter(key, Some(value.into()));
        self
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page < 1 {
            return Err(QueryError::PageOutOfRange(self.page));
        }
        if self.limit == 0 {
            return Err(QueryError::ZeroLimit);
        }
        Ok(())
    }

    /// Update the search term. Returns `true` if the effective term changed.
    pub fn set_search(&mut self, term: &str) -> bool {
        let term = term.trim();
        let next = (!term.is_empty()).then(|| term.to_string());
        if next == self.search {
            return false;
        }
        self.search = next;
        self.page = 1;
        true
    }

    /// Set or clear a resource-specific filter. Returns `true` on change.
    pub fn set_filter(&mut self, key: &str, value: Option<String>) -> bool {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let changed = match value {
            Some(v) => self.filters.insert(key.to_string(), v.clone()) != Some(v),
            None => self.filters.remove(key).is_some(),
        };
        if changed {
            self.page = 1;
        }
        changed
    }

    pub fn set_sort(&mut self, sort_by: Option<SortBy>, sort_type: SortType) -> bool {
        if self.sort_by == sort_by && self.sort_type == sort_type {
            return false;
        }
        self.sort_by = sort_by;
        self.sort_type = sort_type;
        self.page = 1;
        true
    }

    pub fn set_limit(&mut self, limit: u32) -> bool {
        let limit = limit.max(1);
        if limit == self.limit {
            return false;
        }
        self.limit = limit;
        self.page = 1;
        true
    }

    /// Move to `page`, clamped to 1.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Query-string pairs in wire order. Unset optional fields are omitted.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        if let Some(sort_by) = self.sort_by {
            params.push(("sort_by".to_string(), sort_by.as_str().to_string()));
        }
        params.push(("sort_type".to_string(), self.sort_type.as_str().to_string()));
        params.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}

impl Default for ResourceQuery {
    fn default() -> Self {
        Self::new(crate::config::query::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(page: u32) -> ResourceQuery {
        let mut query = ResourceQuery::new(10);
        query.set_page(page);
        query
    }

    #[test]
    fn test_new_starts_at_first_page() {
        let query = ResourceQuery::new(12);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 12);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut query = ResourceQuery::new(10);
        query.page = 0;
        assert_eq!(query.validate(), Err(QueryError::PageOutOfRange(0)));
        query.page = 1;
        query.limit = 0;
        assert_eq!(query.validate(), Err(QueryError::ZeroLimit));
        assert_eq!(
            QueryError::PageOutOfRange(0).to_string(),
            "page must be at least 1 (got 0)"
        );
    }

    #[test]
    fn test_search_change_resets_page() {
        let mut query = on_page(5);
        assert!(query.set_search("report"));
        assert_eq!(query.page, 1);
        assert_eq!(query.search.as_deref(), Some("report"));
    }

    #[test]
    fn test_same_effective_search_keeps_page() {
        let mut query = on_page(1);
        query.set_search("report");
        query.set_page(3);
        assert!(!query.set_search("  report "));
        assert_eq!(query.page, 3);
    }

    #[test]
    fn test_blank_search_is_omitted() {
        let mut query = on_page(2);
        assert!(!query.set_search("   "));
        assert_eq!(query.search, None);
        assert_eq!(query.page, 2);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut query = on_page(4);
        assert!(query.set_filter("role", Some("admin".into())));
        assert_eq!(query.page, 1);

        query.set_page(4);
        assert!(!query.set_filter("role", Some("admin".into())));
        assert_eq!(query.page, 4);

        assert!(query.set_filter("role", None));
        assert_eq!(query.page, 1);
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_empty_filter_value_clears() {
        let mut query = ResourceQuery::new(10).filter("role", "admin");
        assert!(query.set_filter("role", Some(String::new())));
        assert!(!query.filters.contains_key("role"));
    }

    #[test]
    fn test_limit_and_sort_reset_page() {
        let mut query = on_page(3);
        assert!(query.set_limit(25));
        assert_eq!(query.page, 1);

        query.set_page(3);
        assert!(query.set_sort(Some(SortBy::Name), SortType::Asc));
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_set_page_clamps_to_one() {
        let mut query = on_page(3);
        assert!(query.set_page(0));
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_params_omit_unset_fields() {
        let params = ResourceQuery::new(10).to_params();
        let keys: Vec<_> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["page", "limit", "sort_type"]);
        assert!(params.iter().all(|(_, v)| v != "null" && !v.is_empty()));
    }

    #[test]
    fn test_params_full() {
        let mut query = ResourceQuery::new(20)
            .sorted(SortBy::CreatedAt, SortType::Asc)
            .filter("folder_id", "f-1");
        query.set_search("q3 report");
        assert_eq!(
            query.to_params(),
            vec![
                ("page".into(), "1".into()),
                ("limit".into(), "20".into()),
                ("search".into(), "q3 report".into()),
                ("sort_by".into(), "created_at".into()),
                ("sort_type".into(), "asc".into()),
                ("folder_id".into(), "f-1".into()),
            ]
        );
    }

    #[test]
    fn test_identity_is_field_equality() {
        let a = ResourceQuery::new(10).filter("role", "user");
        let b = ResourceQuery::new(10).filter("role", "user");
        let c = ResourceQuery::new(10).filter("role", "admin");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_sort_type_toggle() {
        assert_eq!(SortType::Asc.toggled(), SortType::Desc);
        assert_eq!(SortType::Desc.toggled(), SortType::Asc);
        assert_eq!(SortBy::StartDate.as_str(), "start_date");
    }
}

//! Response envelopes for list and mutation endpoints.

use serde::{Deserialize, Serialize};

/// Pagination metadata of a list response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    /// Derive the metadata for `page` of a `total_items` collection.
    ///
    /// An empty collection has zero pages and no neighbours.
    pub fn compute(page: u32, limit: u32, total_items: u64) -> Self {
        let limit = limit.max(1);
        let page = page.max(1);
        let total_pages = total_items.div_ceil(u64::from(limit)) as u32;
        Self {
            page,
            limit,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: total_items > 0 && page > 1,
        }
    }

    /// Enforce the empty-collection policy on server-provided metadata.
    ///
    /// Pages are 1-based whatever the server sends.
    pub fn normalized(self) -> Self {
        let meta = Self {
            page: self.page.max(1),
            ..self
        };
        if meta.total_items == 0 {
            return Self {
                total_pages: 0,
                has_next: false,
                has_prev: false,
                ..meta
            };
        }
        meta
    }

    /// 1-based index of the first item on this page, 0 when empty.
    pub fn first_item(&self) -> u64 {
        if self.total_items == 0 {
            return 0;
        }
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit) + 1
    }

    /// 1-based index of the last item on this page, 0 when empty.
    pub fn last_item(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.limit)).min(self.total_items)
    }
}

/// Server envelope of a list endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PaginatedResult<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply [`PageMeta::normalized`] after ingestion.
    pub fn normalized(mut self) -> Self {
        self.meta = self.meta.normalized();
        self
    }
}

/// Envelope of a create/update/delete endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse<T = serde_json::Value> {
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// One slot in a pagination control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Gap,
}

/// Page links around `current`, always including the first and last page.
///
/// `radius` is the number of neighbours shown on each side of the current
/// page; skipped ranges collapse into a single [`PageLink::Gap`].
pub fn page_window(current: u32, total_pages: u32, radius: u32) -> Vec<PageLink> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let start = current.saturating_sub(radius).max(1);
    let end = (current + radius).min(total_pages);

    let mut links = Vec::new();
    if start > 1 {
        links.push(PageLink::Page(1));
        if start > 2 {
            links.push(PageLink::Gap);
        }
    }
    links.extend((start..=end).map(PageLink::Page));
    if end < total_pages {
        if end + 1 < total_pages {
            links.push(PageLink::Gap);
        }
        links.push(PageLink::Page(total_pages));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Gap, Page};

    #[test]
    fn test_compute_empty_collection() {
        let meta = PageMeta::compute(1, 12, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
        assert_eq!(meta.first_item(), 0);
        assert_eq!(meta.last_item(), 0);
    }

    #[test]
    fn test_compute_empty_collection_on_later_page() {
        let meta = PageMeta::compute(5, 12, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_compute_middle_page() {
        let meta = PageMeta::compute(2, 10, 35);
        assert_eq!(meta.total_pages, 4);
        assert!(meta.has_next);
        assert!(meta.has_prev);
        assert_eq!(meta.first_item(), 11);
        assert_eq!(meta.last_item(), 20);
    }

    #[test]
    fn test_compute_last_page() {
        let meta = PageMeta::compute(4, 10, 35);
        assert!(!meta.has_next);
        assert_eq!(meta.last_item(), 35);
    }

    #[test]
    fn test_normalize_zero_page_with_items() {
        let meta = PageMeta {
            page: 0,
            limit: 10,
            total_items: 25,
            total_pages: 3,
            has_next: true,
            has_prev: false,
        }
        .normalized();
        assert_eq!(meta.page, 1);
        assert_eq!(meta.first_item(), 1);
        assert_eq!(meta.last_item(), 10);
    }

    #[test]
    fn test_normalize_inconsistent_server_meta() {
        let meta = PageMeta {
            page: 3,
            limit: 10,
            total_items: 0,
            total_pages: 1,
            has_next: true,
            has_prev: true,
        }
        .normalized();
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_empty_folder_listing_is_success() {
        let body = r#"{"items":[],"meta":{"page":1,"limit":12,"total_items":0,"total_pages":0,"has_next":false,"has_prev":false}}"#;
        let result: PaginatedResult<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.meta, PageMeta::compute(1, 12, 0));
    }

    #[test]
    fn test_mutation_response_without_data() {
        let resp: MutationResponse = serde_json::from_str(r#"{"message":"Deleted"}"#).unwrap();
        assert_eq!(resp.message, "Deleted");
        assert_eq!(resp.data, None);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 0, 1), vec![]);
        assert_eq!(page_window(1, 1, 1), vec![Page(1)]);
        assert_eq!(page_window(1, 3, 1), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(
            page_window(5, 10, 1),
            vec![Page(1), Gap, Page(4), Page(5), Page(6), Gap, Page(10)]
        );
        assert_eq!(
            page_window(2, 10, 1),
            vec![Page(1), Page(2), Page(3), Gap, Page(10)]
        );
        assert_eq!(
            page_window(10, 10, 1),
            vec![Page(1), Gap, Page(9), Page(10)]
        );
        assert_eq!(page_window(3, 4, 1), vec![Page(1), Page(2), Page(3), Page(4)]);
    }
}

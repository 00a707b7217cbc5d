//! Pagination control state.

use crate::models::PageInfo;

/// Marker for an ellipsis slot in [`Pagination::visible_pages`].
pub const ELLIPSIS: u32 = 0;

/// State behind First/Prev/Next/Last controls.
///
/// Pages are 1-based. Navigation never produces a page beyond
/// `total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page being shown
    pub current_page: u32,
    /// Number of pages
    pub total_pages: u32,
    /// Items across all pages
    pub total_items: u64,
    /// Page size
    pub per_page: u32,
}

impl Pagination {
    pub fn new(current_page: u32, total_pages: u32, total_items: u64, per_page: u32) -> Self {
        let mut pagination = Self { current_page, total_pages, total_items, per_page };
        pagination.current_page = pagination.clamp(current_page);
        pagination
    }

    /// Last reachable page; an empty list still shows page 1.
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    /// Prev/First enabled.
    pub fn can_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Next/Last enabled.
    pub fn can_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.last_page())
    }

    /// Page to request for a jump to `page`.
    pub fn go_to(&self, page: u32) -> u32 {
        self.clamp(page)
    }

    /// Next page, or `None` when already on the last one.
    pub fn next(&self) -> Option<u32> {
        self.can_next().then(|| self.current_page + 1)
    }

    /// Previous page, or `None` on the first one.
    pub fn prev(&self) -> Option<u32> {
        self.can_prev().then(|| self.current_page - 1)
    }

    /// Target of the Last button, `None` when disabled.
    pub fn last(&self) -> Option<u32> {
        self.can_next().then(|| self.total_pages)
    }

    /// Target of the First button, `None` when disabled.
    pub fn first(&self) -> Option<u32> {
        self.can_prev().then_some(1)
    }

    /// Page numbers to render, with [`ELLIPSIS`] where pages are skipped.
    pub fn visible_pages(&self) -> Vec<u32> {
        let current = self.current_page;
        let total = self.total_pages;
        let mut pages = Vec::new();

        if total <= 7 {
            pages.extend(1..=total);
            return pages;
        }

        pages.push(1);
        if current > 3 {
            pages.push(ELLIPSIS);
        }

        let start = current.saturating_sub(1).max(2);
        let end = (current + 1).min(total - 1);
        for p in start..=end {
            if !pages.contains(&p) {
                pages.push(p);
            }
        }

        if current < total - 2 {
            pages.push(ELLIPSIS);
        }
        if !pages.contains(&total) {
            pages.push(total);
        }

        pages
    }

    /// `"11-20 of 57"` style range summary.
    pub fn range_label(&self) -> String {
        if self.total_items == 0 {
            return "0 items".to_string();
        }
        let start = u64::from(self.current_page - 1) * u64::from(self.per_page) + 1;
        let end = (start + u64::from(self.per_page) - 1).min(self.total_items);
        format!("{}-{} of {}", start, end, self.total_items)
    }
}

impl From<PageInfo> for Pagination {
    fn from(info: PageInfo) -> Self {
        Self::new(info.page, info.total_pages, info.total, info.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_disabled_on_last_page() {
        let p = Pagination::new(5, 5, 50, 10);
        assert!(!p.can_next());
        assert_eq!(p.next(), None);
        assert_eq!(p.last(), None);
        assert!(p.can_prev());
        assert_eq!(p.prev(), Some(4));
    }

    #[test]
    fn test_never_beyond_total() {
        let p = Pagination::new(9, 5, 50, 10);
        assert_eq!(p.current_page, 5);
        assert_eq!(p.go_to(42), 5);
        assert_eq!(p.go_to(0), 1);
    }

    #[test]
    fn test_empty_list() {
        let p = Pagination::new(1, 0, 0, 10);
        assert!(!p.can_next());
        assert!(!p.can_prev());
        assert_eq!(p.visible_pages(), Vec::<u32>::new());
        assert_eq!(p.range_label(), "0 items");
    }

    #[test]
    fn test_visible_pages_with_ellipsis() {
        assert_eq!(Pagination::new(1, 5, 50, 10).visible_pages(), vec![1, 2, 3, 4, 5]);
        assert_eq!(Pagination::new(1, 10, 100, 10).visible_pages(), vec![1, 2, ELLIPSIS, 10]);
        assert_eq!(
            Pagination::new(5, 10, 100, 10).visible_pages(),
            vec![1, ELLIPSIS, 4, 5, 6, ELLIPSIS, 10]
        );
        assert_eq!(Pagination::new(10, 10, 100, 10).visible_pages(), vec![1, ELLIPSIS, 9, 10]);
    }

    #[test]
    fn test_range_label() {
        assert_eq!(Pagination::new(2, 6, 57, 10).range_label(), "11-20 of 57");
        assert_eq!(Pagination::new(6, 6, 57, 10).range_label(), "51-57 of 57");
    }
}

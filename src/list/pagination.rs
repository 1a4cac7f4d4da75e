use serde::Serialize;

use crate::models::pagination::ServerPagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PaginationState {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items: 0,
            total_pages: 0,
        }
    }

    pub fn total_pages_for(total_items: u64, page_size: u32) -> u64 {
        total_items.div_ceil(u64::from(page_size.max(1)))
    }

    pub fn set_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    /// Back to page 1. Returns false when already there.
    pub fn on_filter_changed(&mut self) -> bool {
        if self.current_page == 1 {
            return false;
        }
        self.current_page = 1;
        true
    }

    /// Take the server's numbers after a successful current fetch; the page
    /// count is kept consistent with `total_items` and `page_size`.
    pub fn commit(&mut self, server: &ServerPagination) {
        if server.current_page > 0 {
            self.current_page = server.current_page;
        }
        if server.page_size > 0 {
            self.page_size = server.page_size;
        }
        self.total_items = server.total_items;
        let expected = Self::total_pages_for(self.total_items, self.page_size);
        if server.total_pages != expected {
            log::warn!(
                "[Pagination] Server reported {} pages for {} items at {} per page, using {}",
                server.total_pages,
                server.total_items,
                self.page_size,
                expected
            );
        }
        self.total_pages = expected;
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.current_page) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling_division() {
        assert_eq!(PaginationState::total_pages_for(125, 12), 11);
        assert_eq!(PaginationState::total_pages_for(120, 12), 10);
        assert_eq!(PaginationState::total_pages_for(0, 12), 0);
        assert_eq!(PaginationState::total_pages_for(1, 12), 1);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut p = PaginationState::new(12);
        p.set_page(4);
        p.set_page_size(24);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.page_size, 24);
    }

    #[test]
    fn test_filter_change_only_resets_when_needed() {
        let mut p = PaginationState::new(12);
        assert!(!p.on_filter_changed());
        p.set_page(3);
        assert!(p.on_filter_changed());
        assert_eq!(p.current_page, 1);
    }

    #[test]
    fn test_commit_recomputes_inconsistent_total_pages() {
        let mut p = PaginationState::new(12);
        p.commit(&ServerPagination {
            current_page: 2,
            page_size: 12,
            total_items: 125,
            total_pages: 10,
        });
        assert_eq!(p.current_page, 2);
        assert_eq!(p.total_items, 125);
        assert_eq!(p.total_pages, 11);
        assert!(p.has_next());
        assert!(p.has_previous());
    }
}

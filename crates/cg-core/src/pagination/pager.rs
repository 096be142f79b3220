//! Stateful pager that clamps on write

use super::{describe, total_pages, PaginationDescriptor, PaginationState};
use crate::error::{GridError, GridResult};

/// Current page over a collection whose size can change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    total_items: usize,
}

impl Pager {
    /// Create a pager at page 1
    pub fn new(page_size: usize) -> GridResult<Self> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page: 1,
            page_size,
            total_items: 0,
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    /// Update the collection size, pulling the page back into range
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.page = self.page.clamp(1, self.total_pages());
    }

    /// Change the page size while keeping the first visible item on screen
    pub fn set_page_size(&mut self, page_size: usize) -> GridResult<()> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize(page_size));
        }
        let first_item = (self.page - 1) * self.page_size;
        self.page_size = page_size;
        self.page = (first_item / page_size + 1).clamp(1, self.total_pages());
        Ok(())
    }

    /// Jump to `page`, clamped into `1..=total_pages`. Returns the page landed on.
    pub fn seek_to(&mut self, page: usize) -> usize {
        let clamped = page.clamp(1, self.total_pages());
        if clamped != page {
            tracing::debug!(requested = page, clamped, "page request clamped");
        }
        self.page = clamped;
        clamped
    }

    /// Navigate forward by one page
    pub fn next(&mut self) -> GridResult<usize> {
        if self.page >= self.total_pages() {
            return Err(GridError::AtLastPage);
        }
        self.page += 1;
        Ok(self.page)
    }

    /// Navigate backward by one page
    pub fn previous(&mut self) -> GridResult<usize> {
        if self.page <= 1 {
            return Err(GridError::AtFirstPage);
        }
        self.page -= 1;
        Ok(self.page)
    }

    pub fn first(&mut self) -> usize {
        self.seek_to(1)
    }

    pub fn last(&mut self) -> usize {
        self.seek_to(self.total_pages())
    }

    pub fn state(&self) -> PaginationState {
        PaginationState {
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
        }
    }

    pub fn describe(&self) -> PaginationDescriptor {
        describe(self.page, self.page_size, self.total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(total: usize) -> Pager {
        let mut pager = Pager::new(10).unwrap();
        pager.set_total_items(total);
        pager
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert_eq!(Pager::new(0), Err(GridError::InvalidPageSize(0)));
        assert_eq!(pager(5).set_page_size(0), Err(GridError::InvalidPageSize(0)));
    }

    #[test]
    fn test_seek_clamps() {
        let mut pager = pager(95);
        assert_eq!(pager.seek_to(11), 10);
        assert_eq!(pager.seek_to(0), 1);
        assert_eq!(pager.seek_to(4), 4);
    }

    #[test]
    fn test_next_previous_boundaries() {
        let mut pager = pager(25);
        assert_eq!(pager.previous(), Err(GridError::AtFirstPage));
        assert_eq!(pager.next(), Ok(2));
        assert_eq!(pager.next(), Ok(3));
        assert_eq!(pager.next(), Err(GridError::AtLastPage));
        assert_eq!(pager.first(), 1);
        assert_eq!(pager.last(), 3);
    }

    #[test]
    fn test_shrinking_total_reclamps() {
        let mut pager = pager(95);
        pager.seek_to(9);
        pager.set_total_items(12);
        assert_eq!(pager.page(), 2);
        pager.set_total_items(0);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_page_size_change_keeps_first_item() {
        let mut pager = pager(95);
        pager.seek_to(5); // items 41..=50
        pager.set_page_size(25).unwrap();
        assert_eq!(pager.page(), 2); // items 26..=50
        assert_eq!(pager.describe().range, Some((26, 50)));
    }
}

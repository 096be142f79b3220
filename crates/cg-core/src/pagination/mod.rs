//! Pagination: slicing, page descriptors and a stateful pager

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

mod pager;
mod window;

pub use pager::Pager;
pub use window::{windowed_page_numbers, PageItem};

/// Page number, page size and total item count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
}

impl PaginationState {
    /// Rejects a zero page size; a page outside `1..=total_pages` is clamped
    pub fn new(page: usize, page_size: usize, total_items: usize) -> GridResult<Self> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize(page_size));
        }
        let mut state = Self {
            page,
            page_size,
            total_items,
        };
        state.page = state.clamp_page(page);
        Ok(state)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    pub fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages())
    }

    pub fn describe(&self) -> PaginationDescriptor {
        describe(self.page, self.page_size, self.total_items)
    }
}

/// `ceil(total_items / page_size)`, never below 1.
///
/// `page_size` must be at least 1; a zero size is treated as 1.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Bounds `(start, end)` of `page` within a collection of `len` items.
/// Out-of-range pages (including page 0) yield an empty range at `len`.
pub fn page_bounds(page: usize, page_size: usize, len: usize) -> (usize, usize) {
    if page == 0 {
        return (len, len);
    }
    let start = (page - 1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    (start, end)
}

/// Sub-slice of `records` shown on `page`. Pages past the end are empty.
pub fn slice<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    let (start, end) = page_bounds(page, page_size, records.len());
    &records[start..end]
}

/// Everything a renderer needs to draw pagination controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDescriptor {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    /// False when everything fits on one page; controls are then not drawn
    pub visible: bool,
    pub pages: Vec<PageItem>,
    /// 1-based first and last item numbers on this page
    pub range: Option<(usize, usize)>,
}

/// Describe `page` of a `total_items` collection split into `page_size` pages
pub fn describe(page: usize, page_size: usize, total_items: usize) -> PaginationDescriptor {
    let total_pages = total_pages(total_items, page_size);
    let (start, end) = page_bounds(page, page_size.max(1), total_items);

    PaginationDescriptor {
        page,
        page_size,
        total_items,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
        visible: total_items > page_size,
        pages: windowed_page_numbers(page, total_pages),
        range: (start < end).then_some((start + 1, end)),
    }
}

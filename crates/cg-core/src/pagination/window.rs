use serde::{Deserialize, Serialize};

/// An entry in the page-number strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Page numbers around `current`, with the first and last page always
/// present and an ellipsis wherever more than one page is skipped. A single
/// skipped page is left out without a marker.
///
/// The window is `current-1 ..= current+1`, clipped to `1..=total_pages`.
/// `current` is clamped into range first.
pub fn windowed_page_numbers(current: usize, total_pages: usize) -> Vec<PageItem> {
    let total_pages = total_pages.max(1);
    let current = current.clamp(1, total_pages);
    let start = current.saturating_sub(1).max(1);
    let end = (current + 1).min(total_pages);

    let mut items = Vec::with_capacity(end - start + 5);
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 3 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total_pages {
        if end + 2 < total_pages {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total_pages));
    }
    items
}

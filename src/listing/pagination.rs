use std::num::NonZeroUsize;

/// One rendered page of a filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
}

/// Number of pages needed for `len` items; an empty list still has one page
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Slice out 1-indexed page `current_page`.
///
/// No clamping happens here: a page past the end (or page 0) yields an empty slice,
/// and callers keep `current_page` in range.
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize, current_page: usize) -> PageSlice<'_, T> {
    let size = page_size.get();
    let start = current_page
        .saturating_sub(1)
        .saturating_mul(size)
        .min(items.len());
    let end = if current_page == 0 {
        start
    } else {
        current_page.saturating_mul(size).min(items.len())
    };

    PageSlice {
        items: &items[start..end],
        total_pages: total_pages(items.len(), page_size),
    }
}

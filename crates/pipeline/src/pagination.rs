//! Caller-held pagination state.

use serde::Serialize;

/// Default number of recommendations per page
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Offset into a ranked list plus a page size.
///
/// The engine never stores this; callers keep a cursor per session and pass
/// it in on each request. `advance` pages forward, `reset` goes back to the
/// top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    offset: usize,
    page_size: usize,
}

impl PageCursor {
    /// Cursor at offset 0. A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self::at(0, page_size)
    }

    pub fn at(offset: usize, page_size: usize) -> Self {
        Self {
            offset,
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Move to the next page
    pub fn advance(&mut self) {
        self.offset = self.offset.saturating_add(self.page_size);
    }

    /// Back to the first page
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// The `[offset, offset + page_size)` slice of `items`, clipped to its
    /// end. Empty when the offset is past the end.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.offset >= items.len() {
            return &[];
        }
        let end = self.offset.saturating_add(self.page_size).min(items.len());
        &items[self.offset..end]
    }

    /// Whether anything lies beyond the current page
    pub fn has_more(&self, total: usize) -> bool {
        self.offset.saturating_add(self.page_size) < total
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

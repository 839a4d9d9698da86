// Fixed-size window over the photo list of the current query. The window
// never owns items, it only slices whatever sequence it is given.

/// Number of photos shown per page.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PageWindow {
    #[must_use]
    pub const fn new(page_index: usize) -> Self {
        Self {
            page_index,
            page_size: PAGE_SIZE,
        }
    }

    #[must_use]
    pub const fn start(&self) -> usize {
        self.page_index * self.page_size
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.start() + self.page_size
    }

    /// The visible part of `items`, clamped to its length. A window past
    /// the end yields an empty slice.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.start().min(items.len());
        let end = self.end().min(items.len());
        &items[start..end]
    }

    /// "Previous Page" is offered on every page but the first.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    /// "Next Page" is offered whenever the visible slice is full. When the
    /// total is an exact multiple of the page size this offers one extra,
    /// empty page.
    #[must_use]
    pub fn offers_next<T>(&self, items: &[T]) -> bool {
        self.slice(items).len() >= self.page_size
    }

    /// Guard for the next-page transition: `page_index < total / page_size`.
    #[must_use]
    pub const fn can_advance(&self, total: usize) -> bool {
        self.page_index < total / self.page_size
    }

    /// Human readable item range of this page, 1-based and inclusive.
    /// `None` for an empty page.
    #[must_use]
    pub fn item_range(&self, total: usize) -> Option<(usize, usize)> {
        let end = self.end().min(total);
        if self.start() >= end {
            None
        } else {
            Some((self.start() + 1, end))
        }
    }
}

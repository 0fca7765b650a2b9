//! Incremental display over an in-memory result array

use mesa_core::constants::DEFAULT_PAGE_SIZE;

/// How many of `total` results are revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    shown: usize,
    total: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            shown: 0,
            total: 0,
        }
    }

    /// Start over for a result array of `total` items, showing the first page.
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.shown = self.page_size.min(total);
    }

    /// Reveal the next page. Returns the new shown count; terminal at `total`.
    pub fn load_more(&mut self) -> usize {
        self.shown = (self.shown + self.page_size).min(self.total);
        self.shown
    }

    pub fn has_more(&self) -> bool {
        self.shown < self.total
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.shown.min(items.len())]
    }
}

/// A result array together with its pagination. Replacing the results resets it.
#[derive(Debug, Clone)]
pub struct PagedResults<T> {
    items: Vec<T>,
    pagination: Pagination,
}

impl<T> PagedResults<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::new(page_size),
        }
    }

    pub fn set_results(&mut self, items: Vec<T>) {
        self.pagination.reset(items.len());
        self.items = items;
    }

    pub fn load_more(&mut self) -> &[T] {
        self.pagination.load_more();
        self.visible()
    }

    pub fn visible(&self) -> &[T] {
        self.pagination.visible(&self.items)
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn all(&self) -> &[T] {
        &self.items
    }
}

/// `items` with the first page of `page_size` revealed.
pub fn paginate<T>(items: Vec<T>, page_size: usize) -> PagedResults<T> {
    let mut paged = PagedResults::new(page_size);
    paged.set_results(items);
    paged
}

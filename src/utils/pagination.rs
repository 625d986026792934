//! Client-side pagination of search results

/// Tracks the current page over a list whose length may change between
/// polls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `total` items, at least one
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Index range of the current page within `total` items
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        let page = self.page.min(self.page_count(total) - 1);
        let start = page * self.page_size;
        start.min(total)..(start + self.page_size).min(total)
    }

    /// Items on the current page
    pub fn page_items<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }

    pub fn next(&mut self, total: usize) {
        if self.page + 1 < self.page_count(total) {
            self.page += 1;
        }
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Pulls the page back in range after the list shrank
    pub fn clamp(&mut self, total: usize) {
        self.page = self.page.min(self.page_count(total) - 1);
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_items_and_navigation() {
        let items: Vec<u32> = (0..23).collect();
        let mut p = Paginator::new(10);
        assert_eq!(p.page_count(items.len()), 3);
        assert_eq!(p.page_items(&items), &items[0..10]);

        p.next(items.len());
        p.next(items.len());
        assert_eq!(p.page_items(&items), &items[20..23]);

        p.next(items.len());
        assert_eq!(p.page(), 2);

        p.prev();
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let p = Paginator::new(10);
        assert_eq!(p.page_count(0), 1);
        assert!(p.page_items::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut p = Paginator::new(5);
        p.next(20);
        p.next(20);
        p.next(20);
        assert_eq!(p.page(), 3);

        p.clamp(7);
        assert_eq!(p.page(), 1);
        assert_eq!(p.range(7), 5..7);
    }

    #[test]
    fn test_zero_page_size_is_one() {
        assert_eq!(Paginator::new(0).page_size(), 1);
    }
}

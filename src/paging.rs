//! Fixed-size pages over the filtered view.

/// Rows per page when none is configured.
pub const DEFAULT_ROWS_PER_PAGE: usize = 4;

/// One entry in the page-number strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageButton {
    pub number: usize,
    pub current: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
    rows_per_page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_PAGE)
    }
}

impl Pager {
    /// A pager on page 1. A zero page size is treated as 1.
    pub fn new(rows_per_page: usize) -> Self {
        Self { current_page: 1, rows_per_page: rows_per_page.max(1) }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.rows_per_page)
    }

    /// Rows of `filtered` on the current page. Empty when the page is past the end.
    pub fn slice<'a, T>(&self, filtered: &'a [T]) -> &'a [T] {
        let start = (self.current_page - 1).saturating_mul(self.rows_per_page);
        if start >= filtered.len() {
            return &[];
        }
        let end = start.saturating_add(self.rows_per_page).min(filtered.len());
        &filtered[start..end]
    }

    /// Move to page `n` if it exists. Returns whether the page changed.
    pub fn go_to_page(&mut self, n: usize, total_pages: usize) -> bool {
        if n < 1 || n > total_pages {
            return false;
        }
        let changed = self.current_page != n;
        self.current_page = n;
        changed
    }

    pub fn previous(&mut self, total_pages: usize) -> bool {
        match self.current_page.checked_sub(1) {
            Some(n) => self.go_to_page(n, total_pages),
            None => false,
        }
    }

    pub fn next(&mut self, total_pages: usize) -> bool {
        self.go_to_page(self.current_page + 1, total_pages)
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page != 1
    }

    /// Compares against `total_pages` exactly, so with zero pages "Next"
    /// reads as enabled even though pressing it does nothing.
    pub fn can_go_next(&self, total_pages: usize) -> bool {
        self.current_page != total_pages
    }

    pub fn page_buttons(&self, total_pages: usize) -> Vec<PageButton> {
        (1..=total_pages)
            .map(|number| PageButton { number, current: number == self.current_page })
            .collect()
    }

    /// Pull the current page back into `1..=max(total_pages, 1)`.
    pub fn clamp(&mut self, total_pages: usize) {
        self.current_page = self.current_page.clamp(1, total_pages.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_rows_by_four_make_three_pages() {
        let rows: Vec<usize> = (0..10).collect();
        let mut pager = Pager::new(4);
        let total = pager.total_pages(rows.len());
        assert_eq!(total, 3);
        assert_eq!(pager.slice(&rows), &[0, 1, 2, 3]);

        assert!(pager.go_to_page(2, total));
        assert_eq!(pager.slice(&rows), &[4, 5, 6, 7]);

        assert!(!pager.go_to_page(4, total));
        assert_eq!(pager.current_page(), 2);
        assert!(!pager.go_to_page(0, total));
        assert_eq!(pager.current_page(), 2);

        pager.go_to_page(3, total);
        assert_eq!(pager.slice(&rows), &[8, 9]);
    }

    #[test]
    fn empty_view_has_zero_pages() {
        let pager = Pager::new(4);
        let rows: Vec<u8> = vec![];
        assert_eq!(pager.total_pages(0), 0);
        assert!(pager.page_buttons(0).is_empty());
        assert!(pager.slice(&rows).is_empty());
        assert!(!pager.can_go_previous());
        assert!(pager.can_go_next(0));
    }

    #[test]
    fn stale_page_shows_empty_slice_until_clamped() {
        let rows: Vec<usize> = (0..10).collect();
        let mut pager = Pager::new(4);
        pager.go_to_page(3, 3);
        let narrowed = &rows[..2];
        assert!(pager.slice(narrowed).is_empty());
        pager.clamp(pager.total_pages(narrowed.len()));
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.slice(narrowed), &[0, 1]);
    }

    #[test]
    fn navigation_affordances() {
        let mut pager = Pager::new(4);
        assert!(!pager.can_go_previous());
        assert!(pager.can_go_next(3));
        assert!(!pager.previous(3));
        assert!(pager.next(3));
        assert!(pager.next(3));
        assert!(!pager.can_go_next(3));
        assert!(!pager.next(3));
        let buttons = pager.page_buttons(3);
        assert_eq!(buttons.len(), 3);
        assert!(buttons[2].current);
        assert!(!buttons[0].current);
    }
}

/// Items revealed per page, and the size of the first page.
pub const PAGE_SIZE: usize = 10;

/// What a near-bottom scroll signal did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Growth is paused until the user picks a continuation option.
    PromptShown,
    /// The window grew to the given size.
    Grew(usize),
    /// Everything is already visible.
    Exhausted,
}

/// Infinite-scroll window with a one-time continuation gate per search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    visible_count: usize,
    has_continued: bool,
    show_continue_options: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            visible_count: PAGE_SIZE,
            has_continued: false,
            show_continue_options: false,
        }
    }
}

impl Pagination {
    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn has_continued(&self) -> bool {
        self.has_continued
    }

    pub fn show_continue_options(&self) -> bool {
        self.show_continue_options
    }

    pub fn on_near_bottom(&mut self, total: usize) -> ScrollOutcome {
        if !self.has_continued {
            self.show_continue_options = true;
            return ScrollOutcome::PromptShown;
        }
        if self.visible_count < total {
            self.visible_count += PAGE_SIZE;
            ScrollOutcome::Grew(self.visible_count)
        } else {
            ScrollOutcome::Exhausted
        }
    }

    /// "Continue scrolling": opens the gate and hides the prompt.
    pub fn continue_scrolling(&mut self) {
        self.has_continued = true;
        self.show_continue_options = false;
    }

    /// Back to the first page with the gate closed. Used for every new search,
    /// including "try a suggested topic".
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of items to render out of `total`.
    pub fn clamp(&self, total: usize) -> usize {
        self.visible_count.min(total)
    }

    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.clamp(items.len())]
    }
}

/// Scroll position of the issue list, in terminal rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// Rows scrolled past the top of the viewport
    pub scroll_top: usize,
    /// Visible rows
    pub client_height: usize,
    /// Total rows of content
    pub scroll_height: usize,
}

impl ScrollMetrics {
    /// Rows of content left below the viewport.
    pub fn distance_to_bottom(&self) -> usize {
        self.scroll_height
            .saturating_sub(self.scroll_top + self.client_height)
    }
}

/// Decides whether a scroll landed close enough to the end of the list
/// to ask for more. Holds no state and changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollListener {
    threshold: usize,
}

impl ScrollListener {
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold: threshold as usize,
        }
    }

    pub fn observe(&self, metrics: ScrollMetrics) -> bool {
        metrics.scroll_top + metrics.client_height + self.threshold >= metrics.scroll_height
    }
}

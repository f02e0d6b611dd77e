//! Scroll offset to path progress

use serde::{Deserialize, Serialize};

/// Normalized progress in [0, 1] for a scroll offset within a page
///
/// A page that cannot scroll (content no taller than the viewport) always
/// reports 0.
pub fn progress_from_scroll(scroll_y: f32, scroll_height: f32, viewport_height: f32) -> f32 {
    let range = scroll_height - viewport_height;
    if range > 0.0 {
        (scroll_y / range).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Scroll state for hosts without a scrollable document
///
/// The page is `pages` viewports tall; wheel input moves the offset and the
/// offset never leaves the scrollable range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualScroll {
    offset: f32,
    pages: f32,
    viewport_height: f32,
}

impl VirtualScroll {
    pub fn new(pages: f32, viewport_height: f32) -> Self {
        Self {
            offset: 0.0,
            pages: pages.max(1.0),
            viewport_height: viewport_height.max(0.0),
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn page_height(&self) -> f32 {
        self.pages * self.viewport_height
    }

    fn range(&self) -> f32 {
        (self.page_height() - self.viewport_height).max(0.0)
    }

    /// Move by `delta` pixels; positive scrolls down the page
    pub fn scroll_by(&mut self, delta: f32) {
        self.offset = (self.offset + delta).clamp(0.0, self.range());
    }

    /// Jump to an absolute offset
    pub fn scroll_to(&mut self, offset: f32) {
        self.offset = offset.clamp(0.0, self.range());
    }

    /// Viewport changed size; keep the same progress
    pub fn resize(&mut self, viewport_height: f32) {
        let progress = self.progress();
        self.viewport_height = viewport_height.max(0.0);
        self.offset = progress * self.range();
    }

    pub fn progress(&self) -> f32 {
        progress_from_scroll(self.offset, self.page_height(), self.viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_from_scroll() {
        assert_eq!(progress_from_scroll(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(progress_from_scroll(1000.0, 3000.0, 1000.0), 0.5);
        assert_eq!(progress_from_scroll(2000.0, 3000.0, 1000.0), 1.0);
    }

    #[test]
    fn test_progress_is_clamped() {
        // Overscroll (e.g. rubber-banding) stays inside [0, 1]
        assert_eq!(progress_from_scroll(-50.0, 3000.0, 1000.0), 0.0);
        assert_eq!(progress_from_scroll(2500.0, 3000.0, 1000.0), 1.0);
    }

    #[test]
    fn test_page_without_scroll_range() {
        assert_eq!(progress_from_scroll(100.0, 800.0, 800.0), 0.0);
        assert_eq!(progress_from_scroll(100.0, 600.0, 800.0), 0.0);
    }

    #[test]
    fn test_virtual_scroll_clamps() {
        let mut scroll = VirtualScroll::new(5.0, 1000.0);
        scroll.scroll_by(-200.0);
        assert_eq!(scroll.offset(), 0.0);

        scroll.scroll_by(2000.0);
        assert_eq!(scroll.progress(), 0.5);

        scroll.scroll_by(1e6);
        assert_eq!(scroll.offset(), 4000.0);
        assert_eq!(scroll.progress(), 1.0);
    }

    #[test]
    fn test_virtual_scroll_resize_keeps_progress() {
        let mut scroll = VirtualScroll::new(4.0, 1000.0);
        scroll.scroll_to(1500.0);
        assert_eq!(scroll.progress(), 0.5);

        scroll.resize(500.0);
        assert_eq!(scroll.progress(), 0.5);
        assert_eq!(scroll.offset(), 750.0);
    }

    #[test]
    fn test_single_page_never_progresses() {
        let mut scroll = VirtualScroll::new(1.0, 900.0);
        scroll.scroll_by(300.0);
        assert_eq!(scroll.offset(), 0.0);
        assert_eq!(scroll.progress(), 0.0);
    }
}

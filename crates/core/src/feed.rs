//! Scroll-follow rules for an infinite-scroll message feed.
//!
//! The feed loads older pages at the top and receives new items at the
//! bottom. [`FeedFollower`] tracks whether the reader has scrolled away from
//! the bottom ("detached") and tells the renderer what to do after each
//! change. It holds no rendering state of its own, so any client (web, TUI,
//! test harness) can drive it.

/// Distance from the bottom, in pixels, within which the feed still counts
/// as following new content.
pub const DEFAULT_DETACH_THRESHOLD: f64 = 48.0;

/// What the renderer should do after a feed change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedAction {
    /// Leave the viewport where it is.
    Stay,
    /// Jump to the newest item.
    ScrollToBottom,
    /// Content was inserted above the viewport; move the scroll offset down
    /// by this many pixels so the visible items do not shift.
    PreserveAnchor { shift_by: f64 },
}

#[derive(Debug, Clone)]
pub struct FeedFollower {
    detached: bool,
    threshold: f64,
    content_height: Option<f64>,
}

impl Default for FeedFollower {
    fn default() -> Self {
        Self::new(DEFAULT_DETACH_THRESHOLD)
    }
}

impl FeedFollower {
    pub fn new(threshold: f64) -> Self {
        Self {
            detached: false,
            threshold: threshold.max(0.0),
            content_height: None,
        }
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// The reader scrolled; `offset_from_bottom` is the distance between the
    /// bottom of the viewport and the bottom of the content.
    pub fn on_scroll(&mut self, offset_from_bottom: f64) {
        self.detached = offset_from_bottom > self.threshold;
    }

    /// An older page was inserted at the top.
    pub fn on_prepend(&mut self, added_height: f64) -> FeedAction {
        if let Some(height) = self.content_height.as_mut() {
            *height += added_height;
        }
        if self.detached && added_height > 0.0 {
            FeedAction::PreserveAnchor {
                shift_by: added_height,
            }
        } else {
            FeedAction::Stay
        }
    }

    /// New items arrived at the bottom. Unless `suppress_scroll` is set the
    /// feed jumps to them and re-attaches.
    pub fn on_append(&mut self, suppress_scroll: bool) -> FeedAction {
        if suppress_scroll {
            return FeedAction::Stay;
        }
        self.detached = false;
        FeedAction::ScrollToBottom
    }

    /// Rendered content height changed (e.g. a streamed message grew).
    pub fn on_resize(&mut self, new_height: f64) -> FeedAction {
        let changed = match self.content_height {
            Some(previous) => (previous - new_height).abs() > f64::EPSILON,
            None => true,
        };
        self.content_height = Some(new_height);

        if changed && !self.detached {
            FeedAction::ScrollToBottom
        } else {
            FeedAction::Stay
        }
    }
}

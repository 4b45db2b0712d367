//! Scroll-derived view values.
//!
//! Everything here is recomputed from a single observed scroll offset; the
//! view never mutates these values on its own.

use serde::Serialize;

/// Offset past which the scroll-to-top control appears.
pub const SCROLL_TO_TOP_THRESHOLD: f64 = 400.0;

/// Hero background moves at this fraction of the scroll speed.
pub const PARALLAX_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollView {
    /// Normalised scroll offset in pixels, never negative.
    pub offset: f64,
    /// Vertical translation applied to the hero background.
    pub parallax_offset: f64,
    pub show_scroll_to_top: bool,
}

impl ScrollView {
    pub fn from_offset(offset: f64) -> Self {
        // Overscroll bounce reports negative offsets.
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        Self {
            offset,
            parallax_offset: offset * PARALLAX_FACTOR,
            show_scroll_to_top: offset > SCROLL_TO_TOP_THRESHOLD,
        }
    }
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::from_offset(0.0)
    }
}

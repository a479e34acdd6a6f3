//! Glyph metrics seam.
//!
//! The label-count estimation needs the width/height of candidate label
//! strings, which only the renderer knows. The renderer side implements
//! [`FontMetrics`]; the engine ships a fixed-advance fallback matching the
//! dialog bitmap font so headless callers (and tests) get sane estimates.

/// Text measurement interface consumed by label generation.
pub trait FontMetrics {
    /// Width of `text` in pixels.
    fn text_width(&self, text: &str) -> i32;
    /// Line height in pixels, independent of content.
    fn text_height(&self) -> i32;
}

/// Fixed-advance metrics of the stock dialog font.
#[derive(Clone, Copy, Debug, Default)]
pub struct DialogFont;

impl DialogFont {
    pub const CHAR_WIDTH: i32 = 7;
    pub const CHAR_HEIGHT: i32 = 14;
}

impl FontMetrics for DialogFont {
    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * Self::CHAR_WIDTH
    }

    fn text_height(&self) -> i32 {
        Self::CHAR_HEIGHT
    }
}

impl<T: FontMetrics + ?Sized> FontMetrics for &T {
    fn text_width(&self, text: &str) -> i32 {
        (**self).text_width(text)
    }

    fn text_height(&self) -> i32 {
        (**self).text_height()
    }
}

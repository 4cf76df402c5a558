//! Font measurement contract

use std::fmt;

/// Point size at text scale 1, and the height of one text row
pub const DEFAULT_LINE_HEIGHT: f32 = 9.0;

/// Measures text for layout. Rasterization belongs to the renderer.
pub trait FontProvider: fmt::Debug {
    /// Advance width of `text` at `point_size`
    fn string_width(&self, text: &str, point_size: f32) -> f32;

    fn char_width(&self, ch: char, point_size: f32) -> f32 {
        let mut buf = [0u8; 4];
        self.string_width(ch.encode_utf8(&mut buf), point_size)
    }

    /// Distance between consecutive baselines
    fn line_height(&self, point_size: f32) -> f32 {
        point_size
    }

    /// Distance from the top of a row to its baseline
    fn baseline(&self, point_size: f32) -> f32 {
        point_size * 7.0 / 9.0
    }
}

/// Every glyph has the same advance, with an optional narrower space.
///
/// Advances are given at [`DEFAULT_LINE_HEIGHT`] and scale linearly with the
/// point size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidthFont {
    advance: f32,
    space_advance: f32,
}

impl Default for FixedWidthFont {
    fn default() -> Self {
        Self::new(6.0)
    }
}

impl FixedWidthFont {
    pub fn new(advance: f32) -> Self {
        Self {
            advance,
            space_advance: advance,
        }
    }

    pub fn with_space_advance(mut self, advance: f32) -> Self {
        self.space_advance = advance;
        self
    }

    pub fn advance(&self) -> f32 {
        self.advance
    }
}

impl FontProvider for FixedWidthFont {
    fn string_width(&self, text: &str, point_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, point_size)).sum()
    }

    fn char_width(&self, ch: char, point_size: f32) -> f32 {
        let advance = if ch == ' ' { self.space_advance } else { self.advance };
        advance * point_size / DEFAULT_LINE_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_scales_with_point_size() {
        let font = FixedWidthFont::default();
        assert_eq!(font.string_width("abc", DEFAULT_LINE_HEIGHT), 18.0);
        assert_eq!(font.string_width("abc", DEFAULT_LINE_HEIGHT * 2.0), 36.0);
        assert_eq!(font.string_width("", DEFAULT_LINE_HEIGHT), 0.0);
    }

    #[test]
    fn test_narrow_space() {
        let font = FixedWidthFont::new(6.0).with_space_advance(4.0);
        assert_eq!(font.string_width("a b", DEFAULT_LINE_HEIGHT), 16.0);
    }
}

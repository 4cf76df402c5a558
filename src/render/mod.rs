//! Drawing backends
//!
//! [`Window::draw`](crate::component::Window::draw) walks the tree and hands
//! each component's resolved bounds to a [`Renderer`]. The crate ships one
//! backend, [`SvgRenderer`], which writes a static SVG document.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::SvgRenderer;

use crate::constraints::Rgba;
use crate::svg::SvgImage;

/// Axis-aligned rectangle in window pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }
}

/// Image content a component can display
#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    /// Encoded bitmap bytes, e.g. PNG, with their MIME type
    Raster { mime: String, data: Vec<u8> },
    /// Parsed path data
    Vector(SvgImage),
}

impl Image {
    pub fn raster(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Image::Raster {
            mime: mime.into(),
            data,
        }
    }

    /// Guess the MIME type from a file extension
    pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }
}

/// Sink for the primitives a component tree draws
pub trait Renderer {
    /// Fill a rectangle, rounding corners by `radius`
    fn draw_rect(&mut self, rect: Rect, radius: f32, color: Rgba);

    /// Draw one line of text with its top-left corner at `(x, y)`
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba);

    /// Draw an image stretched over `rect`
    fn draw_image(&mut self, rect: Rect, image: &Image, tint: Rgba);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert!(rect.contains(10.0, 20.0));
        assert!(!rect.contains(40.0, 30.0));
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 20.0, 5.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 25.0, 15.0));
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(Image::mime_for_extension("PNG"), Some("image/png"));
        assert_eq!(Image::mime_for_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(Image::mime_for_extension("bmp"), None);
    }
}

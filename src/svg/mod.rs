//! SVG path data: parsing, geometry and a tolerant loader

mod element;
mod parser;

pub use element::{bounding_box, Arc, BoundingBox, PathElement, Point, CURVE_STEPS, ELLIPSE_VERTEX_COUNT};
pub use parser::{parse_path, PathParser};

use tracing::warn;

/// Parse several `d` attributes, skipping any that are malformed.
///
/// A bad element is logged and dropped; the others still load.
pub fn load_path_data(paths: &[&str]) -> Vec<PathElement> {
    let mut elements = Vec::new();
    for (index, data) in paths.iter().enumerate() {
        match parse_path(data) {
            Ok(parsed) => elements.extend(parsed),
            Err(err) => warn!(index, position = err.position, "skipping malformed path: {}", err.message),
        }
    }
    elements
}

/// Vector image made of path segments
#[derive(Debug, Clone, PartialEq)]
pub struct SvgImage {
    pub elements: Vec<PathElement>,
    /// Intrinsic size; defaults to the bounds of the segments
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub stroke_width: f32,
}

impl SvgImage {
    pub fn new(elements: Vec<PathElement>) -> Self {
        Self {
            elements,
            width: None,
            height: None,
            stroke_width: 1.0,
        }
    }

    /// Load from `d` attributes, skipping malformed ones
    pub fn from_path_data(paths: &[&str]) -> Self {
        Self::new(load_path_data(paths))
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: f32) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        bounding_box(&self.elements)
    }

    /// Intrinsic size, falling back to the far corner of the bounds
    pub fn size(&self) -> (f32, f32) {
        let corner = self.bounds().map_or(Point::default(), |b| b.max);
        (
            self.width.unwrap_or(corner.x.max(0.0)),
            self.height.unwrap_or(corner.y.max(0.0)),
        )
    }
}

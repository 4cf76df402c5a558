//! SVG output for a drawn component tree

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::component::Window;
use crate::constraints::Rgba;
use crate::svg::{PathElement, Point, SvgImage};

use super::{Image, Rect, Renderer, SvgConfig};

/// Collects drawn primitives as SVG elements
#[derive(Debug)]
pub struct SvgRenderer {
    config: SvgConfig,
    elements: Vec<String>,
    indent: usize,
}

impl SvgRenderer {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            elements: vec![],
            indent: 1,
        }
    }

    /// Number of elements drawn so far
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn prefix(&self) -> String {
        self.config.prefix().to_string()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn push(&mut self, element: String) {
        let line = format!("{}{}", self.indent_str(), element);
        self.elements.push(line);
    }

    fn add_vector(&mut self, rect: Rect, image: &SvgImage, tint: Rgba) {
        let (width, height) = image.size();
        let sx = if width > 0.0 { rect.width / width } else { 1.0 };
        let sy = if height > 0.0 { rect.height / height } else { 1.0 };
        let place = |p: Point| Point::new(rect.x + p.x * sx, rect.y + p.y * sy);

        let d = image
            .elements
            .iter()
            .map(|element| path_to_d(element, place))
            .collect::<Vec<_>>()
            .join(" ");
        let prefix = self.prefix();
        self.push(format!(
            r#"<path class="{prefix}image {prefix}vector" d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            d,
            tint.to_hex(),
            num(image.stroke_width),
        ));
    }

    /// Assemble the document with a viewBox covering `viewport`
    pub fn finish(self, viewport: Rect) -> String {
        let viewbox = self.config.viewbox(viewport);
        let nl = self.newline();

        let mut svg = String::new();
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            num(viewbox.x),
            num(viewbox.y),
            num(viewbox.width),
            num(viewbox.height),
        ));
        svg.push_str(nl);
        for element in &self.elements {
            svg.push_str(element);
            svg.push_str(nl);
        }
        svg.push_str("</svg>");
        svg.push_str(nl);
        svg
    }
}

impl Renderer for SvgRenderer {
    fn draw_rect(&mut self, rect: Rect, radius: f32, color: Rgba) {
        if color.a == 0 {
            return;
        }
        let prefix = self.prefix();
        let corners = if radius > 0.0 {
            format!(r#" rx="{}""#, num(radius))
        } else {
            String::new()
        };
        self.push(format!(
            r#"<rect class="{prefix}rect" x="{}" y="{}" width="{}" height="{}"{corners} fill="{}"/>"#,
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height),
            color.to_hex(),
        ));
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba) {
        let prefix = self.prefix();
        let element = format!(
            r#"<text class="{prefix}text" x="{}" y="{}" font-family="{}" font-size="{}" dominant-baseline="hanging" fill="{}">{}</text>"#,
            num(x),
            num(y),
            escape_xml(&self.config.font_family),
            num(size),
            color.to_hex(),
            escape_xml(text),
        );
        self.push(element);
    }

    fn draw_image(&mut self, rect: Rect, image: &Image, tint: Rgba) {
        match image {
            Image::Raster { mime, data } => {
                let prefix = self.prefix();
                self.push(format!(
                    r#"<image class="{prefix}image" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" href="data:{};base64,{}"/>"#,
                    num(rect.x),
                    num(rect.y),
                    num(rect.width),
                    num(rect.height),
                    escape_xml(mime),
                    STANDARD.encode(data),
                ));
            }
            Image::Vector(vector) => self.add_vector(rect, vector, tint),
        }
    }
}

/// Draw a window into a standalone SVG document sized to the window
pub fn render_window(window: &Window, config: &SvgConfig) -> String {
    let mut renderer = SvgRenderer::new(config.clone());
    window.draw(&mut renderer);
    let viewport = Rect::new(0.0, 0.0, window.config().width, window.config().height);
    renderer.finish(viewport)
}

/// Numbers rounded to two decimals, without trailing zeros
fn num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

fn path_to_d(element: &PathElement, place: impl Fn(Point) -> Point) -> String {
    let vertices = element.vertices();
    let Some((first, rest)) = vertices.split_first() else {
        return String::new();
    };
    let first = place(*first);
    let mut d = format!("M{} {}", num(first.x), num(first.y));
    for point in rest {
        let point = place(*point);
        d.push_str(&format!(" L{} {}", num(point.x), num(point.y)));
    }
    d
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::config::WindowConfig;
    use crate::constraints::{ColorConstraint, Constraint, ConstraintType::*};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_num_trims_zeros() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(2.5), "2.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_transparent_rect_is_skipped() {
        let mut renderer = SvgRenderer::new(SvgConfig::default());
        renderer.draw_rect(Rect::new(0.0, 0.0, 5.0, 5.0), 0.0, Rgba::TRANSPARENT);
        assert!(renderer.is_empty());
    }

    #[test]
    fn test_raster_image_is_inlined() {
        let mut renderer = SvgRenderer::new(SvgConfig::default());
        let image = Image::raster("image/png", b"png".to_vec());
        renderer.draw_image(Rect::new(0.0, 0.0, 4.0, 4.0), &image, Rgba::WHITE);
        let svg = renderer.finish(Rect::new(0.0, 0.0, 4.0, 4.0));
        assert!(svg.contains(r#"href="data:image/png;base64,cG5n""#));
    }

    #[test]
    fn test_vector_image_scaled_to_bounds() {
        let mut renderer = SvgRenderer::new(SvgConfig::default().without_class_prefix());
        let image = SvgImage::from_path_data(&["M0,0 L10,10"]).with_size(10.0, 10.0);
        renderer.draw_image(Rect::new(5.0, 5.0, 20.0, 20.0), &Image::Vector(image), Rgba::BLACK);
        let svg = renderer.finish(Rect::new(0.0, 0.0, 30.0, 30.0));
        assert!(svg.contains(r##"d="M5 5 L25 25" fill="none" stroke="#000000""##));
    }

    #[test]
    fn test_render_window() {
        let mut window = Window::new(WindowConfig::default().with_size(200.0, 100.0));
        let root = window.root();
        let panel = window.spawn(root, "panel").unwrap();
        window.set_constraint(panel, X, Constraint::center()).unwrap();
        window.set_constraint(panel, Y, Constraint::pixels(10.0)).unwrap();
        window.set_constraint(panel, Width, Constraint::relative(0.5)).unwrap();
        window.set_constraint(panel, Height, Constraint::pixels(40.0)).unwrap();
        window.set_constraint(panel, Radius, Constraint::pixels(4.0)).unwrap();
        window
            .set_color(panel, ColorConstraint::constant(Rgba::rgb(0x33, 0x66, 0x99)))
            .unwrap();
        let label = window.spawn(panel, "label").unwrap();
        window.set_text(label, "Hi & bye").unwrap();
        window.set_constraint(label, X, Constraint::pixels(2.0)).unwrap();
        window.set_constraint(label, Y, Constraint::pixels(2.0)).unwrap();

        let svg = render_window(&window, &SvgConfig::default().with_standalone(false));
        assert_snapshot!(svg, @r##"
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100">
          <rect class="trellis-rect" x="50" y="10" width="100" height="40" rx="4" fill="#336699"/>
          <text class="trellis-text" x="52" y="12" font-family="sans-serif" font-size="9" dominant-baseline="hanging" fill="#ffffff">Hi &amp; bye</text>
        </svg>
        "##);
    }
}

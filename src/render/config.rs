//! Output options for [`SvgRenderer`](super::SvgRenderer)

use super::Rect;

/// How a drawn window is serialized.
///
/// The defaults produce a document whose viewBox is exactly the window, so
/// a snapshot lines up pixel for pixel with the resolved component bounds.
/// Every element carries a class (`rect`, `text`, `image`, `vector`) behind
/// the configured prefix so a stylesheet can restyle output after the fact.
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Extra space around the window in the viewBox. Zero keeps component
    /// coordinates and SVG user units identical.
    pub viewbox_padding: f32,

    /// Emit the `<?xml ...?>` declaration
    pub standalone: bool,

    /// One element per line, indented
    pub pretty_print: bool,

    /// Namespace for element classes; `None` writes bare class names
    pub class_prefix: Option<String>,

    /// `font-family` of text elements. Layout measures text with a
    /// [`FontProvider`](crate::text::FontProvider), not with this font.
    pub font_family: String,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            viewbox_padding: 0.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("trellis-".to_string()),
            font_family: "sans-serif".to_string(),
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewbox_padding(mut self, padding: f32) -> Self {
        self.viewbox_padding = padding;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub(crate) fn prefix(&self) -> &str {
        self.class_prefix.as_deref().unwrap_or("")
    }

    /// The viewBox for a window occupying `viewport`
    pub fn viewbox(&self, viewport: Rect) -> Rect {
        let padding = self.viewbox_padding;
        Rect::new(
            viewport.x - padding,
            viewport.y - padding,
            viewport.width + 2.0 * padding,
            viewport.height + 2.0 * padding,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewbox_is_the_window() {
        let config = SvgConfig::default();
        let window = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(config.viewbox(window), window);
        assert_eq!(config.prefix(), "trellis-");
    }

    #[test]
    fn test_padding_grows_viewbox_on_every_side() {
        let config = SvgConfig::new().with_viewbox_padding(8.0).without_class_prefix();
        let viewbox = config.viewbox(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(viewbox, Rect::new(-8.0, -8.0, 216.0, 116.0));
        assert_eq!(config.prefix(), "");
    }

    #[test]
    fn test_builder_pattern() {
        let config = SvgConfig::new()
            .with_standalone(false)
            .with_pretty_print(false)
            .with_font_family("monospace");
        assert!(!config.standalone);
        assert!(!config.pretty_print);
        assert_eq!(config.font_family, "monospace");
    }
}

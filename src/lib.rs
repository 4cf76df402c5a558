//! Trellis - constraint-driven UI component core
//!
//! Every component in a [`Window`] has one constraint per property (x, y,
//! width, height, radius, text scale and color). Constraints are small
//! formulas evaluated lazily and cached per frame; they may read the
//! parent, siblings, children or the component's own other properties.
//!
//! # Example
//!
//! ```rust
//! use trellis::component::{Window, WindowConfig};
//! use trellis::constraints::ConstraintType;
//! use trellis::dsl::parse_constraint;
//!
//! let mut window = Window::new(WindowConfig::default().with_size(200.0, 100.0));
//! let panel = window.spawn(window.root(), "panel").unwrap();
//! window
//!     .set_constraint(panel, ConstraintType::Width, parse_constraint("50% - 10px").unwrap())
//!     .unwrap();
//! assert_eq!(window.width(panel), 90.0);
//! ```
//!
//! Cyclic layouts cannot be evaluated meaningfully. The [`resolution`]
//! module finds such cycles, either statically from declared dependencies
//! or by tracing a real evaluation.

pub mod animation;
pub mod component;
pub mod constraints;
pub mod dsl;
pub mod error;
pub mod render;
pub mod resolution;
pub mod scene;
pub mod svg;
pub mod text;

pub use component::{ComponentId, Window, WindowConfig};
pub use constraints::{ColorConstraint, Constraint, ConstraintType, Rgba};
pub use error::{ConstraintError, DslError, PathParseError};
pub use render::{Renderer, SvgConfig, SvgRenderer};
pub use scene::{Scene, SceneError};

use thiserror::Error;

/// Any error the crate's entry points can produce
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error("expression error: {0}")]
    Dsl(#[from] DslError),

    #[error("path data error: {0}")]
    Path(#[from] PathParseError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Graph(#[from] resolution::GraphError),
}

/// Build a scene from TOML and render its first frame as SVG
pub fn render_scene(source: &str, config: &SvgConfig) -> Result<String, TrellisError> {
    let window = Scene::from_str(source)?.build()?;
    Ok(render::svg::render_window(&window, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_scene() {
        let svg = render_scene(
            "[[component]]\nname = \"box\"\nwidth = \"10px\"\nheight = \"10px\"\n",
            &SvgConfig::default(),
        )
        .unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"width="10" height="10""#));
    }

    #[test]
    fn test_errors_convert() {
        let err: TrellisError = dsl::parse_constraint("50% +").unwrap_err().into();
        assert!(matches!(err, TrellisError::Dsl(_)));
    }
}

//! Scene files: a component tree described in TOML
//!
//! ```toml
//! [window]
//! width = 400.0
//! height = 300.0
//!
//! [[component]]
//! name = "panel"
//! x = "center"
//! width = "50% - 10px"
//! height = "aspect(0.5)"
//! color = "#336699"
//!
//! [[component]]
//! name = "title"
//! parent = "panel"
//! text = "Hello"
//!
//! [[animation]]
//! component = "panel"
//! property = "width"
//! strategy = "OUT_EXP"
//! time = 0.5
//! to = "80%"
//! ```
//!
//! Components are created in file order, so a parent must appear before its
//! children. Expressions may name any component in the file through `to()`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::animation::{Animations, UnknownStrategy};
use crate::component::config::WindowConfig;
use crate::component::{ComponentId, Window};
use crate::constraints::{ColorConstraint, Constraint, ConstraintType};
use crate::dsl::{parse_color_with, parse_constraint_with};
use crate::error::{ConstraintError, DslError};
use crate::render::Image;
use crate::svg::SvgImage;

/// Errors that can occur when loading or building a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse scene TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("'{component}' {property}: {source}")]
    Expression {
        component: String,
        property: String,
        expression: String,
        #[source]
        source: DslError,
    },

    #[error("'{component}' names unknown parent '{parent}'")]
    UnknownParent { component: String, parent: String },

    #[error("animation targets unknown component '{0}'")]
    UnknownComponent(String),

    #[error("'{0}' is not an animatable property")]
    UnknownProperty(String),

    #[error("unsupported image format: {}", .0.display())]
    UnsupportedImage(PathBuf),

    #[error(transparent)]
    Strategy(#[from] UnknownStrategy),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

impl SceneError {
    /// Human-readable report, with source context for expression errors
    pub fn report(&self) -> String {
        match self {
            SceneError::Expression {
                component,
                property,
                expression,
                source,
            } => source.format(expression, &format!("{component}.{property}")),
            other => other.to_string(),
        }
    }
}

/// One `[[component]]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComponentDef {
    pub name: String,
    /// Defaults to the window root
    pub parent: Option<String>,
    pub text: Option<String>,
    /// Raster image file, relative to the scene file
    pub image: Option<PathBuf>,
    /// SVG path data drawn as a vector image
    pub path: Vec<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub radius: Option<String>,
    pub text_scale: Option<String>,
    pub color: Option<String>,
}

impl ComponentDef {
    fn numeric(&self) -> impl Iterator<Item = (ConstraintType, &str)> {
        [
            (ConstraintType::X, &self.x),
            (ConstraintType::Y, &self.y),
            (ConstraintType::Width, &self.width),
            (ConstraintType::Height, &self.height),
            (ConstraintType::Radius, &self.radius),
            (ConstraintType::TextScale, &self.text_scale),
        ]
        .into_iter()
        .filter_map(|(ty, source)| source.as_deref().map(|s| (ty, s)))
    }
}

/// One `[[animation]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationDef {
    pub component: String,
    /// `x`, `y`, `width`, `height`, `radius`, `text_scale` or `color`
    pub property: String,
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Duration in seconds
    pub time: f32,
    /// Target expression
    pub to: String,
    #[serde(default)]
    pub delay: f32,
}

fn default_strategy() -> String {
    "LINEAR".to_string()
}

enum Target {
    Numeric(ConstraintType),
    Color,
}

fn animation_target(property: &str) -> Option<Target> {
    let ty = match property {
        "x" => ConstraintType::X,
        "y" => ConstraintType::Y,
        "width" => ConstraintType::Width,
        "height" => ConstraintType::Height,
        "radius" => ConstraintType::Radius,
        "text_scale" => ConstraintType::TextScale,
        "color" => return Some(Target::Color),
        _ => return None,
    };
    Some(Target::Numeric(ty))
}

/// A parsed scene file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default, rename = "component")]
    pub components: Vec<ComponentDef>,

    #[serde(default, rename = "animation")]
    pub animations: Vec<AnimationDef>,

    /// Directory image paths are resolved against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        let mut scene = Self::from_str(&content)?;
        scene.base_dir = path.parent().map(Path::to_path_buf);
        Ok(scene)
    }

    /// Parse a scene from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Create the window and every component, then attach constraints and
    /// start the declared animations.
    pub fn build(&self) -> Result<Window, SceneError> {
        let mut window = Window::new(self.window.clone());

        let mut ids = Vec::with_capacity(self.components.len());
        for def in &self.components {
            let parent = match &def.parent {
                None => window.root(),
                Some(parent) => window.find(parent).ok_or_else(|| SceneError::UnknownParent {
                    component: def.name.clone(),
                    parent: parent.clone(),
                })?,
            };
            ids.push(window.spawn(parent, def.name.clone())?);
        }

        let mut numeric: Vec<(ComponentId, ConstraintType, Constraint)> = Vec::new();
        let mut colors: Vec<(ComponentId, ColorConstraint)> = Vec::new();
        {
            let names = |name: &str| window.find(name);
            for (def, &id) in self.components.iter().zip(&ids) {
                for (ty, source) in def.numeric() {
                    let constraint = parse_constraint_with(source, &names)
                        .map_err(|e| expression_error(&def.name, ty.pretty_name(), source, e))?;
                    numeric.push((id, ty, constraint));
                }
                if let Some(source) = &def.color {
                    let color = parse_color_with(source, &names)
                        .map_err(|e| expression_error(&def.name, "Color", source, e))?;
                    colors.push((id, color));
                }
            }
        }
        for (id, ty, constraint) in numeric {
            window.set_constraint(id, ty, constraint)?;
        }
        for (id, color) in colors {
            window.set_color(id, color)?;
        }

        for (def, &id) in self.components.iter().zip(&ids) {
            if let Some(text) = &def.text {
                window.set_text(id, text.clone())?;
            }
            if let Some(image) = self.load_image(def)? {
                window.set_image(id, image)?;
            }
        }

        for animation in &self.animations {
            self.start_animation(&mut window, animation)?;
        }

        debug!(
            components = self.components.len(),
            animations = self.animations.len(),
            "built scene"
        );
        Ok(window)
    }

    fn load_image(&self, def: &ComponentDef) -> Result<Option<Image>, SceneError> {
        if let Some(path) = &def.image {
            let resolved = match &self.base_dir {
                Some(dir) => dir.join(path),
                None => path.clone(),
            };
            let mime = resolved
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(Image::mime_for_extension)
                .ok_or_else(|| SceneError::UnsupportedImage(path.clone()))?;
            let data = std::fs::read(&resolved)?;
            return Ok(Some(Image::raster(mime, data)));
        }
        if def.path.is_empty() {
            return Ok(None);
        }
        let paths: Vec<&str> = def.path.iter().map(String::as_str).collect();
        Ok(Some(Image::Vector(SvgImage::from_path_data(&paths))))
    }

    fn start_animation(&self, window: &mut Window, def: &AnimationDef) -> Result<(), SceneError> {
        let id = window
            .find(&def.component)
            .ok_or_else(|| SceneError::UnknownComponent(def.component.clone()))?;
        let target = animation_target(&def.property)
            .ok_or_else(|| SceneError::UnknownProperty(def.property.clone()))?;
        let strategy: Animations = def.strategy.parse()?;

        match target {
            Target::Numeric(ty) => {
                let to = parse_constraint_with(&def.to, &|name: &str| window.find(name))
                    .map_err(|e| expression_error(&def.component, ty.pretty_name(), &def.to, e))?;
                to.check_supports(ty)?;
                window.animate(id, |anim| {
                    anim.set_animation(ty, strategy, def.time, to, def.delay);
                })?;
            }
            Target::Color => {
                let to = parse_color_with(&def.to, &|name: &str| window.find(name))
                    .map_err(|e| expression_error(&def.component, "Color", &def.to, e))?;
                window.animate(id, |anim| {
                    anim.set_color_animation(strategy, def.time, to, def.delay);
                })?;
            }
        }
        Ok(())
    }
}

fn expression_error(component: &str, property: &str, expression: &str, source: DslError) -> SceneError {
    SceneError::Expression {
        component: component.to_string(),
        property: property.to_string(),
        expression: expression.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Rgba;
    use pretty_assertions::assert_eq;

    const PANEL: &str = r##"
[window]
width = 200.0
height = 100.0
animation_fps = 10

[[component]]
name = "panel"
x = "center"
y = "10px"
width = "50%"
height = "aspect(0.5)"
color = "#336699"

[[component]]
name = "title"
parent = "panel"
text = "Hello"
x = "to(sibling(2), panel)"
"##;

    #[test]
    fn test_build_panel() {
        let window = Scene::from_str(PANEL).unwrap().build().unwrap();
        let panel = window.find("panel").unwrap();
        let title = window.find("title").unwrap();

        assert_eq!(window.parent(title), Some(panel));
        assert_eq!(window.width(panel), 100.0);
        assert_eq!(window.height(panel), 50.0);
        assert_eq!(window.left(panel), 50.0);
        assert_eq!(window.color(panel), Rgba::rgb(0x33, 0x66, 0x99));
        assert_eq!(window.component(title).map(|c| c.text()), Some("Hello"));
    }

    #[test]
    fn test_unknown_parent() {
        let source = r#"
[[component]]
name = "child"
parent = "nobody"
"#;
        let err = Scene::from_str(source).unwrap().build().unwrap_err();
        assert!(matches!(err, SceneError::UnknownParent { .. }));
        assert_eq!(err.to_string(), "'child' names unknown parent 'nobody'");
    }

    #[test]
    fn test_bad_expression_reports_source() {
        let source = r#"
[[component]]
name = "box"
width = "50% +"
"#;
        let err = Scene::from_str(source).unwrap().build().unwrap_err();
        let SceneError::Expression { property, expression, .. } = &err else {
            panic!("expected expression error, got {err:?}");
        };
        assert_eq!(property, "Width");
        assert_eq!(expression, "50% +");
        assert!(err.report().contains("box.Width"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let source = r#"
[[component]]
name = "box"
colour = "white"
"#;
        assert!(matches!(Scene::from_str(source), Err(SceneError::ParseError(_))));
    }

    #[test]
    fn test_path_becomes_vector_image() {
        let source = r#"
[[component]]
name = "icon"
path = ["M0,0 L10,10"]
"#;
        let window = Scene::from_str(source).unwrap().build().unwrap();
        let icon = window.find("icon").unwrap();
        let image = window.component(icon).and_then(|c| c.image());
        assert!(matches!(image, Some(Image::Vector(svg)) if svg.elements.len() == 1));
    }

    #[test]
    fn test_animation_runs_to_target() {
        let source = format!(
            "{PANEL}\n[[animation]]\ncomponent = \"panel\"\nproperty = \"width\"\ntime = 1.0\nto = \"80%\"\n"
        );
        let mut window = Scene::from_str(&source).unwrap().build().unwrap();
        let panel = window.find("panel").unwrap();
        assert_eq!(window.width(panel), 100.0);
        for _ in 0..10 {
            window.animation_frame();
        }
        assert_eq!(window.width(panel), 160.0);
    }

    #[test]
    fn test_unknown_strategy() {
        let source = format!(
            "{PANEL}\n[[animation]]\ncomponent = \"panel\"\nproperty = \"x\"\nstrategy = \"WOBBLE\"\ntime = 1.0\nto = \"0px\"\n"
        );
        let err = Scene::from_str(&source).unwrap().build().unwrap_err();
        assert_eq!(err.to_string(), "unknown animation strategy 'WOBBLE'");
    }
}

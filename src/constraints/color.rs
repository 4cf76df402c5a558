//! Color values and color constraints

use std::cell::Cell;
use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;

use super::cache::ValueCache;
use super::EvalContext;
use crate::animation::AnimationComponent;
use crate::component::ComponentId;
use crate::error::ConstraintError;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Channel-wise interpolation; `t` outside `[0, 1]` extrapolates and clamps
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        fn channel(from: u8, to: u8, t: f32) -> u8 {
            let value = from as f32 + (to as f32 - from as f32) * t;
            value.round().clamp(0.0, 255.0) as u8
        }

        Rgba::new(
            channel(self.r, other.r, t),
            channel(self.g, other.g, t),
            channel(self.b, other.b, t),
            channel(self.a, other.a, t),
        )
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Rgba> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|n| n * 17);
                Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Every color constraint shape
#[derive(Debug)]
pub enum ColorKind {
    Constant(Rgba),
    /// Fixed RGB with the target's alpha scaled by `alpha`
    AlphaAspect { color: Rgba, alpha: f32 },
    /// The target's color
    Inherited,
    /// Cycles through hues once per frame
    Rainbow {
        alpha: u8,
        speed: f32,
        step: Cell<u32>,
        current: Cell<Rgba>,
    },
    Animated(Box<AnimationComponent<ColorConstraint>>),
}

impl ColorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ColorKind::Constant(_) => "ConstantColorConstraint",
            ColorKind::AlphaAspect { .. } => "AlphaAspectColorConstraint",
            ColorKind::Inherited => "InheritedColorConstraint",
            ColorKind::Rainbow { .. } => "RainbowColorConstraint",
            ColorKind::Animated(_) => "AnimationComponent",
        }
    }
}

#[derive(Debug)]
struct ColorNode {
    kind: ColorKind,
    constrain_to: Option<ComponentId>,
    cache: ValueCache<Rgba>,
}

/// Shared handle to a color constraint. Colors only ever depend on the
/// parent (or explicit target) chain, so they never form cycles.
#[derive(Debug, Clone)]
pub struct ColorConstraint(Rc<ColorNode>);

impl ColorConstraint {
    fn from_kind(kind: ColorKind, constrain_to: Option<ComponentId>) -> Self {
        Self(Rc::new(ColorNode {
            kind,
            constrain_to,
            cache: ValueCache::new(Rgba::WHITE),
        }))
    }

    pub fn constant(color: Rgba) -> Self {
        Self::from_kind(ColorKind::Constant(color), None)
    }

    pub fn alpha_aspect(color: Rgba, alpha: f32) -> Self {
        Self::from_kind(ColorKind::AlphaAspect { color, alpha }, None)
    }

    pub fn inherited() -> Self {
        Self::from_kind(ColorKind::Inherited, None)
    }

    pub fn rainbow(alpha: u8, speed: f32) -> Self {
        Self::rainbow_from_step(alpha, speed, 0)
    }

    /// Rainbow starting at a given step of its cycle
    pub fn rainbow_from_step(alpha: u8, speed: f32, step: u32) -> Self {
        Self::from_kind(
            ColorKind::Rainbow {
                alpha,
                speed,
                step: Cell::new(step),
                current: Cell::new(Rgba::WHITE),
            },
            None,
        )
    }

    pub fn animated(animation: AnimationComponent<ColorConstraint>) -> Self {
        Self::from_kind(ColorKind::Animated(Box::new(animation)), None)
    }

    /// Read the color from `target` instead of the parent
    pub fn to(&self, target: ComponentId) -> Result<ColorConstraint, ConstraintError> {
        match &self.0.kind {
            ColorKind::AlphaAspect { color, alpha } => Ok(Self::from_kind(
                ColorKind::AlphaAspect {
                    color: *color,
                    alpha: *alpha,
                },
                Some(target),
            )),
            ColorKind::Inherited => Ok(Self::from_kind(ColorKind::Inherited, Some(target))),
            other => Err(ConstraintError::rebind(other.name())),
        }
    }

    pub fn kind(&self) -> &ColorKind {
        &self.0.kind
    }

    pub fn name(&self) -> &'static str {
        self.0.kind.name()
    }

    pub fn as_animation(&self) -> Option<&AnimationComponent<ColorConstraint>> {
        match &self.0.kind {
            ColorKind::Animated(animation) => Some(animation),
            _ => None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.0.cache.is_dirty()
    }

    /// Resolve the color, reusing the cached value while clean
    pub fn value(&self, cx: &EvalContext<'_>, component: ComponentId) -> Rgba {
        if self.0.cache.is_dirty() {
            self.0.cache.record_computation();
            let color = self.compute(cx, component);
            self.0.cache.store(color);
        }
        self.0.cache.get()
    }

    fn compute(&self, cx: &EvalContext<'_>, component: ComponentId) -> Rgba {
        match &self.0.kind {
            ColorKind::Constant(color) => *color,
            ColorKind::AlphaAspect { color, alpha } => {
                let target = cx.target_or_parent(component, self.0.constrain_to);
                let a = (cx.color(target).a as f32 * alpha) as i32;
                color.with_alpha(a.clamp(0, 255) as u8)
            }
            ColorKind::Inherited => {
                cx.color(cx.target_or_parent(component, self.0.constrain_to))
            }
            ColorKind::Rainbow { current, .. } => current.get(),
            ColorKind::Animated(animation) => {
                let start = animation.old_value().value(cx, component);
                let end = animation.new_value().value(cx, component);
                start.lerp(end, animation.percent_complete())
            }
        }
    }

    pub fn animation_frame(&self) {
        self.0.cache.mark_dirty();
        match &self.0.kind {
            ColorKind::Rainbow {
                alpha,
                speed,
                step,
                current,
            } => {
                let next = step.get().wrapping_add(1);
                step.set(next);
                let phase = next as f64 / *speed as f64;
                let channel = |offset: f64| {
                    let value = ((phase + offset).sin() + 0.75) * 170.0;
                    (value as i32).clamp(0, 255) as u8
                };
                current.set(Rgba::new(
                    channel(0.0),
                    channel(2.0 * PI / 3.0),
                    channel(4.0 * PI / 3.0),
                    *alpha,
                ));
            }
            ColorKind::Animated(animation) => {
                animation.advance();
                animation.old_value().animation_frame();
                animation.new_value().animation_frame();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        assert_eq!(Rgba::from_hex("#ff8000"), Some(Rgba::rgb(255, 128, 0)));
        assert_eq!(Rgba::from_hex("fff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::from_hex("#00000080"), Some(Rgba::new(0, 0, 0, 128)));
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::from_hex("#gg0000"), None);
        assert_eq!(Rgba::new(1, 2, 3, 4).to_hex(), "#01020304");
        assert_eq!(Rgba::BLACK.to_string(), "#000000");
    }

    #[test]
    fn test_lerp_endpoints() {
        let from = Rgba::BLACK;
        let to = Rgba::WHITE;
        assert_eq!(from.lerp(to, 0.0), from);
        assert_eq!(from.lerp(to, 1.0), to);
        assert_eq!(from.lerp(to, 0.5), Rgba::rgb(128, 128, 128));
        assert_eq!(from.lerp(to, 2.0), to);
    }

    #[test]
    fn test_rainbow_steps_deterministically() {
        let a = ColorConstraint::rainbow(200, 50.0);
        let b = ColorConstraint::rainbow(200, 50.0);
        a.animation_frame();
        b.animation_frame();
        let (ColorKind::Rainbow { current: ca, .. }, ColorKind::Rainbow { current: cb, .. }) =
            (a.kind(), b.kind())
        else {
            panic!("expected rainbow constraints");
        };
        assert_eq!(ca.get(), cb.get());
        assert_eq!(ca.get().a, 200);
        // sin(1/50) + 0.75 scaled by 170
        assert_eq!(ca.get().r, 130);
    }

    #[test]
    fn test_only_relative_colors_rebind() {
        use crate::component::Window;
        use crate::component::config::WindowConfig;

        let mut window = Window::new(WindowConfig::default());
        let id = window.create("box");
        assert!(ColorConstraint::inherited().to(id).is_ok());
        assert!(ColorConstraint::alpha_aspect(Rgba::BLACK, 0.5).to(id).is_ok());
        assert!(ColorConstraint::constant(Rgba::BLACK).to(id).is_err());
        assert!(ColorConstraint::rainbow(255, 50.0).to(id).is_err());
    }
}

//! Constraint primitives
//!
//! Every visual property of a component is a [`Constraint`]: a function of
//! other components' resolved properties, evaluated lazily and memoized until
//! the next animation frame. Constraints compose into expression trees
//! (sums, differences, clamps, animations) and can declare their
//! dependencies to a [`ConstraintVisitor`] without being evaluated.

mod cache;
pub mod color;
pub mod context;
pub mod debug;
mod numeric;
pub mod visitor;

pub use color::{ColorConstraint, ColorKind, Rgba};
pub use context::EvalContext;
pub use debug::{
    ConstraintDebugger, CycleSafeConstraintDebugger, NoopConstraintDebugger,
    RecalculatingConstraintDebugger,
};
pub use visitor::ConstraintVisitor;

use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::rc::Rc;

use crate::animation::AnimationComponent;
use crate::component::ComponentId;
use crate::error::ConstraintError;

use cache::ValueCache;

/// The property of a component a constraint resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintType {
    X,
    Y,
    Width,
    Height,
    Radius,
    Color,
    TextScale,
    FontProvider,
}

impl ConstraintType {
    /// Numeric properties that take part in dependency resolution
    pub const RESOLVED: [ConstraintType; 6] = [
        ConstraintType::X,
        ConstraintType::Y,
        ConstraintType::Width,
        ConstraintType::Height,
        ConstraintType::TextScale,
        ConstraintType::Radius,
    ];

    pub fn pretty_name(self) -> &'static str {
        match self {
            ConstraintType::X => "X",
            ConstraintType::Y => "Y",
            ConstraintType::Width => "Width",
            ConstraintType::Height => "Height",
            ConstraintType::Radius => "Radius",
            ConstraintType::Color => "Color",
            ConstraintType::TextScale => "TextScale",
            ConstraintType::FontProvider => "FontProvider",
        }
    }

    /// Whether values of this property are plain numbers
    pub fn is_numeric(self) -> bool {
        !matches!(self, ConstraintType::Color | ConstraintType::FontProvider)
    }

    /// The formula a property is computed with. Text scale shares the
    /// height formulas.
    pub(crate) fn axis(self) -> ConstraintType {
        match self {
            ConstraintType::TextScale => ConstraintType::Height,
            other => other,
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty_name())
    }
}

/// Identity of a constraint instance (shared clones compare equal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(usize);

/// Operators that combine two constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Additive,
    Subtractive,
    Max,
    Min,
    CoerceAtMost,
    CoerceAtLeast,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Additive => "AdditiveConstraint",
            BinaryOp::Subtractive => "SubtractiveConstraint",
            BinaryOp::Max => "MaxConstraint",
            BinaryOp::Min => "MinConstraint",
            BinaryOp::CoerceAtMost => "CoerceAtMostConstraint",
            BinaryOp::CoerceAtLeast => "CoerceAtLeastConstraint",
        }
    }
}

/// How [`ConstraintKind::Rounding`] rounds its operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingMode {
    Floor,
    Ceil,
    #[default]
    Round,
}

impl RoundingMode {
    pub fn apply(self, value: f32) -> f32 {
        match self {
            RoundingMode::Floor => value.floor(),
            RoundingMode::Ceil => value.ceil(),
            RoundingMode::Round => value.round(),
        }
    }
}

/// Extension point for constraint kinds defined outside this crate.
///
/// Implementations must keep `visit` in step with the reads `evaluate`
/// performs, or cycle detection will miss their dependencies.
pub trait CustomConstraint: fmt::Debug {
    /// Display name used by diagnostics
    fn name(&self) -> &str;

    fn supports(&self, ty: ConstraintType) -> bool;

    fn evaluate(&self, cx: &EvalContext<'_>, component: ComponentId, ty: ConstraintType) -> f32;

    fn visit(&self, visitor: &mut ConstraintVisitor<'_>, ty: ConstraintType);

    /// Advance per-frame state. Caching is handled by the wrapper.
    fn animation_frame(&self) {}

    /// Properties shown by inspection tooling
    fn debug_properties(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Every numeric constraint shape
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    /// A fixed offset from the target's near (or far) edge, or a fixed size
    Pixel {
        value: f32,
        align_opposite: bool,
        align_outside: bool,
    },
    /// A fraction of the target's size
    Relative(f32),
    /// A fraction of the window's size
    RelativeWindow(f32),
    /// Centered within the target
    Center,
    /// Directly after the previous sibling
    Sibling { padding: f32, align_opposite: bool },
    /// After the previous sibling if it fits on the same row, else on a new row
    CramSibling { padding: f32 },
    /// Derived from the orthogonal property of the same component
    Aspect(f32),
    /// Whatever space the target has left
    Fill { use_siblings: bool },
    /// Sum of the children's sizes plus padding between them
    ChildBasedSize { padding: f32 },
    /// Size of the largest child
    ChildBasedMaxSize,
    /// Distance spanned by the children
    ChildBasedRange,
    /// Keeps the text's aspect ratio
    TextAspect,
    /// Text measured at a fixed scale
    ScaledText { scale: f32 },
    Binary {
        op: BinaryOp,
        left: Constraint,
        right: Constraint,
    },
    CoerceIn {
        value: Constraint,
        min: Constraint,
        max: Constraint,
    },
    Scale { inner: Constraint, factor: f32 },
    Rounding { inner: Constraint, mode: RoundingMode },
    Animated(Box<AnimationComponent<Constraint>>),
    Custom(Rc<dyn CustomConstraint>),
}

impl ConstraintKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::Pixel { .. } => "PixelConstraint",
            ConstraintKind::Relative(_) => "RelativeConstraint",
            ConstraintKind::RelativeWindow(_) => "RelativeWindowConstraint",
            ConstraintKind::Center => "CenterConstraint",
            ConstraintKind::Sibling { .. } => "SiblingConstraint",
            ConstraintKind::CramSibling { .. } => "CramSiblingConstraint",
            ConstraintKind::Aspect(_) => "AspectConstraint",
            ConstraintKind::Fill { .. } => "FillConstraint",
            ConstraintKind::ChildBasedSize { .. } => "ChildBasedSizeConstraint",
            ConstraintKind::ChildBasedMaxSize => "ChildBasedMaxSizeConstraint",
            ConstraintKind::ChildBasedRange => "ChildBasedRangeConstraint",
            ConstraintKind::TextAspect => "TextAspectConstraint",
            ConstraintKind::ScaledText { .. } => "ScaledTextConstraint",
            ConstraintKind::Binary { op, .. } => op.name(),
            ConstraintKind::CoerceIn { .. } => "CoerceInConstraint",
            ConstraintKind::Scale { .. } => "ScaleConstraint",
            ConstraintKind::Rounding { .. } => "RoundingConstraint",
            ConstraintKind::Animated(_) => "AnimationComponent",
            ConstraintKind::Custom(_) => "CustomConstraint",
        }
    }
}

#[derive(Debug)]
struct Node {
    kind: ConstraintKind,
    constrain_to: Option<ComponentId>,
    cache: ValueCache<f32>,
}

/// A shared handle to a numeric constraint instance.
///
/// Cloning shares the instance, including its cache, so one constraint can
/// sit in several slots or expression trees at once.
#[derive(Clone)]
pub struct Constraint(Rc<Node>);

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("kind", &self.0.kind)
            .field("constrain_to", &self.0.constrain_to)
            .finish()
    }
}

// ============================================================================
// Construction
// ============================================================================

impl Constraint {
    pub fn new(kind: ConstraintKind) -> Self {
        Self(Rc::new(Node {
            kind,
            constrain_to: None,
            cache: ValueCache::new(0.0),
        }))
    }

    pub fn pixels(value: f32) -> Self {
        Self::pixels_aligned(value, false, false)
    }

    /// Pixel offset measured from the far edge and/or outside the target
    pub fn pixels_aligned(value: f32, align_opposite: bool, align_outside: bool) -> Self {
        Self::new(ConstraintKind::Pixel {
            value,
            align_opposite,
            align_outside,
        })
    }

    pub fn relative(value: f32) -> Self {
        Self::new(ConstraintKind::Relative(value))
    }

    pub fn relative_window(value: f32) -> Self {
        Self::new(ConstraintKind::RelativeWindow(value))
    }

    pub fn center() -> Self {
        Self::new(ConstraintKind::Center)
    }

    pub fn sibling(padding: f32) -> Self {
        Self::new(ConstraintKind::Sibling {
            padding,
            align_opposite: false,
        })
    }

    /// Sibling layout growing from the far edge toward the near one
    pub fn sibling_opposite(padding: f32) -> Self {
        Self::new(ConstraintKind::Sibling {
            padding,
            align_opposite: true,
        })
    }

    pub fn cram_sibling(padding: f32) -> Self {
        Self::new(ConstraintKind::CramSibling { padding })
    }

    pub fn aspect(value: f32) -> Self {
        Self::new(ConstraintKind::Aspect(value))
    }

    /// Target's size minus every other child's size
    pub fn fill() -> Self {
        Self::new(ConstraintKind::Fill { use_siblings: true })
    }

    /// From this component's position to the target's far edge
    pub fn fill_remaining() -> Self {
        Self::new(ConstraintKind::Fill {
            use_siblings: false,
        })
    }

    pub fn child_based_size(padding: f32) -> Self {
        Self::new(ConstraintKind::ChildBasedSize { padding })
    }

    pub fn child_based_max_size() -> Self {
        Self::new(ConstraintKind::ChildBasedMaxSize)
    }

    pub fn child_based_range() -> Self {
        Self::new(ConstraintKind::ChildBasedRange)
    }

    pub fn text_aspect() -> Self {
        Self::new(ConstraintKind::TextAspect)
    }

    pub fn scaled_text(scale: f32) -> Self {
        Self::new(ConstraintKind::ScaledText { scale })
    }

    pub fn custom(custom: impl CustomConstraint + 'static) -> Self {
        Self::new(ConstraintKind::Custom(Rc::new(custom)))
    }

    pub fn animated(animation: AnimationComponent<Constraint>) -> Self {
        Self::new(ConstraintKind::Animated(Box::new(animation)))
    }

    fn binary(op: BinaryOp, left: Constraint, right: Constraint) -> Self {
        Self::new(ConstraintKind::Binary { op, left, right })
    }

    pub fn max(self, other: Constraint) -> Self {
        Self::binary(BinaryOp::Max, self, other)
    }

    pub fn min(self, other: Constraint) -> Self {
        Self::binary(BinaryOp::Min, self, other)
    }

    pub fn coerce_at_most(self, max: Constraint) -> Self {
        Self::binary(BinaryOp::CoerceAtMost, self, max)
    }

    pub fn coerce_at_least(self, min: Constraint) -> Self {
        Self::binary(BinaryOp::CoerceAtLeast, self, min)
    }

    pub fn coerce_in(self, min: Constraint, max: Constraint) -> Self {
        Self::new(ConstraintKind::CoerceIn {
            value: self,
            min,
            max,
        })
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(ConstraintKind::Scale {
            inner: self,
            factor,
        })
    }

    pub fn rounded(self, mode: RoundingMode) -> Self {
        Self::new(ConstraintKind::Rounding { inner: self, mode })
    }

    /// Rebind this constraint to measure against `target` instead of the
    /// parent. Returns a fresh instance with its own cache.
    pub fn to(&self, target: ComponentId) -> Result<Constraint, ConstraintError> {
        let kind = &self.0.kind;
        match kind {
            ConstraintKind::Binary { .. }
            | ConstraintKind::CoerceIn { .. }
            | ConstraintKind::Scale { .. }
            | ConstraintKind::Rounding { .. }
            | ConstraintKind::Animated(_)
            | ConstraintKind::CramSibling { .. }
            | ConstraintKind::RelativeWindow(_)
            | ConstraintKind::TextAspect
            | ConstraintKind::ScaledText { .. }
            | ConstraintKind::Custom(_) => Err(ConstraintError::rebind(kind.name())),
            _ => Ok(Self(Rc::new(Node {
                kind: kind.clone(),
                constrain_to: Some(target),
                cache: ValueCache::new(0.0),
            }))),
        }
    }
}

impl Add for Constraint {
    type Output = Constraint;

    fn add(self, rhs: Constraint) -> Constraint {
        Constraint::binary(BinaryOp::Additive, self, rhs)
    }
}

impl Sub for Constraint {
    type Output = Constraint;

    fn sub(self, rhs: Constraint) -> Constraint {
        Constraint::binary(BinaryOp::Subtractive, self, rhs)
    }
}

impl Mul<f32> for Constraint {
    type Output = Constraint;

    fn mul(self, rhs: f32) -> Constraint {
        self.scaled(rhs)
    }
}

// ============================================================================
// Inspection
// ============================================================================

impl Constraint {
    pub fn id(&self) -> ConstraintId {
        ConstraintId(Rc::as_ptr(&self.0) as usize)
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.0.kind
    }

    pub fn name(&self) -> &'static str {
        self.0.kind.name()
    }

    /// Name shown in diagnostics; custom constraints report their own
    pub fn display_name(&self) -> &str {
        match &self.0.kind {
            ConstraintKind::Custom(custom) => custom.name(),
            kind => kind.name(),
        }
    }

    pub fn constrain_to(&self) -> Option<ComponentId> {
        self.0.constrain_to
    }

    /// Whether this constraint has a formula for `ty`
    pub fn supports(&self, ty: ConstraintType) -> bool {
        use ConstraintType::*;

        if !ty.is_numeric() {
            return false;
        }
        let axis = ty.axis();
        match &self.0.kind {
            ConstraintKind::Pixel { .. }
            | ConstraintKind::Relative(_)
            | ConstraintKind::RelativeWindow(_)
            | ConstraintKind::Aspect(_) => true,
            ConstraintKind::Center
            | ConstraintKind::Sibling { .. }
            | ConstraintKind::CramSibling { .. } => matches!(axis, X | Y),
            ConstraintKind::Fill { .. }
            | ConstraintKind::ChildBasedSize { .. }
            | ConstraintKind::ChildBasedMaxSize => matches!(axis, Width | Height | Radius),
            ConstraintKind::ChildBasedRange
            | ConstraintKind::TextAspect
            | ConstraintKind::ScaledText { .. } => matches!(axis, Width | Height),
            ConstraintKind::Binary { left, right, .. } => left.supports(ty) && right.supports(ty),
            ConstraintKind::CoerceIn { value, min, max } => {
                value.supports(ty) && min.supports(ty) && max.supports(ty)
            }
            ConstraintKind::Scale { inner, .. } | ConstraintKind::Rounding { inner, .. } => {
                inner.supports(ty)
            }
            ConstraintKind::Animated(animation) => {
                animation.old_value().supports(ty) && animation.new_value().supports(ty)
            }
            ConstraintKind::Custom(custom) => custom.supports(ty),
        }
    }

    /// Fail with [`ConstraintError::UnsupportedType`] unless `ty` is supported
    pub fn check_supports(&self, ty: ConstraintType) -> Result<(), ConstraintError> {
        if self.supports(ty) {
            Ok(())
        } else {
            Err(ConstraintError::unsupported(self.name(), ty))
        }
    }

    /// Properties shown by inspection tooling, in declaration order
    pub fn debug_properties(&self) -> Vec<(String, String)> {
        fn prop(key: &str, value: impl ToString) -> (String, String) {
            (key.to_string(), value.to_string())
        }

        let mut props = Vec::new();
        match &self.0.kind {
            ConstraintKind::Pixel {
                value,
                align_opposite,
                align_outside,
            } => {
                props.push(prop("value", value));
                props.push(prop("alignOpposite", align_opposite));
                props.push(prop("alignOutside", align_outside));
            }
            ConstraintKind::Relative(value)
            | ConstraintKind::RelativeWindow(value)
            | ConstraintKind::Aspect(value) => props.push(prop("value", value)),
            ConstraintKind::Center
            | ConstraintKind::ChildBasedMaxSize
            | ConstraintKind::ChildBasedRange
            | ConstraintKind::TextAspect => {}
            ConstraintKind::Sibling {
                padding,
                align_opposite,
            } => {
                props.push(prop("padding", padding));
                props.push(prop("alignOpposite", align_opposite));
            }
            ConstraintKind::CramSibling { padding } | ConstraintKind::ChildBasedSize { padding } => {
                props.push(prop("padding", padding))
            }
            ConstraintKind::Fill { use_siblings } => props.push(prop("useSiblings", use_siblings)),
            ConstraintKind::ScaledText { scale } => props.push(prop("scale", scale)),
            ConstraintKind::Binary { left, right, .. } => {
                props.push(prop("first", left));
                props.push(prop("second", right));
            }
            ConstraintKind::CoerceIn { value, min, max } => {
                props.push(prop("value", value));
                props.push(prop("min", min));
                props.push(prop("max", max));
            }
            ConstraintKind::Scale { inner, factor } => {
                props.push(prop("constraint", inner));
                props.push(prop("factor", factor));
            }
            ConstraintKind::Rounding { inner, mode } => {
                props.push(prop("constraint", inner));
                props.push(prop("mode", format!("{:?}", mode)));
            }
            ConstraintKind::Animated(animation) => {
                props.push(prop("strategy", format!("{:?}", animation.strategy())));
                props.push(prop("totalFrames", animation.total_frames()));
                props.push(prop("delayFrames", animation.delay_frames()));
                props.push(prop("elapsedFrames", animation.elapsed_frames()));
                props.push(prop("paused", animation.is_paused()));
                props.push(prop("old", animation.old_value()));
                props.push(prop("new", animation.new_value()));
            }
            ConstraintKind::Custom(custom) => {
                props.push(prop("name", custom.name()));
                props.extend(custom.debug_properties());
            }
        }
        if let Some(target) = self.0.constrain_to {
            props.push(prop("constrainTo", format!("#{}", target.index())));
        }
        props
    }

    /// The animation wrapped by this constraint, if any
    pub fn as_animation(&self) -> Option<&AnimationComponent<Constraint>> {
        match &self.0.kind {
            ConstraintKind::Animated(animation) => Some(animation),
            _ => None,
        }
    }

    /// Whether this constraint is an animation that has not finished
    pub fn is_animating(&self) -> bool {
        self.as_animation().is_some_and(|a| !a.is_complete())
    }

    pub fn pause_if_supported(&self) {
        if let Some(animation) = self.as_animation() {
            animation.pause();
        }
    }

    pub fn resume_if_supported(&self) {
        if let Some(animation) = self.as_animation() {
            animation.resume();
        }
    }

    pub fn stop_if_supported(&self) {
        if let Some(animation) = self.as_animation() {
            animation.stop();
        }
    }
}

// ============================================================================
// Evaluation
// ============================================================================

impl Constraint {
    /// Resolve this constraint for `component`'s `ty` property.
    ///
    /// Goes through the context's debugger when one is installed, otherwise
    /// returns the cached value, recomputing it first if dirty.
    pub fn value(&self, cx: &EvalContext<'_>, component: ComponentId, ty: ConstraintType) -> f32 {
        match cx.debugger() {
            Some(debugger) => debugger.evaluate(self, ty, component, cx),
            None => self.cached(cx, component, ty),
        }
    }

    /// Cached evaluation without consulting a debugger for this node.
    /// Reads of other properties still go through `cx`.
    pub fn cached(&self, cx: &EvalContext<'_>, component: ComponentId, ty: ConstraintType) -> f32 {
        if self.0.cache.is_dirty() {
            let value = self.compute(cx, component, ty);
            self.0.cache.store(value);
        }
        self.0.cache.get()
    }

    /// Run the formula unconditionally, bypassing the cache.
    ///
    /// Positions and sizes are snapped to real pixels.
    pub fn compute(&self, cx: &EvalContext<'_>, component: ComponentId, ty: ConstraintType) -> f32 {
        self.0.cache.record_computation();
        let raw = numeric::evaluate(self, cx, component, ty);
        match ty {
            ConstraintType::X
            | ConstraintType::Y
            | ConstraintType::Width
            | ConstraintType::Height => cx.window().round_to_real_pixels(raw),
            _ => raw,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.0.cache.is_dirty()
    }

    pub fn mark_dirty(&self) {
        self.0.cache.mark_dirty();
    }

    /// Last stored value, stale or not
    pub fn cached_value(&self) -> f32 {
        self.0.cache.get()
    }

    /// Overwrite the cache and mark it clean
    pub fn store(&self, value: f32) {
        self.0.cache.store(value);
    }

    /// Number of times the formula has run
    pub fn computations(&self) -> u64 {
        self.0.cache.computations()
    }

    /// Per-tick hook: marks this constraint and every constraint beneath it
    /// dirty, and advances animations.
    pub fn animation_frame(&self) {
        self.0.cache.mark_dirty();
        match &self.0.kind {
            ConstraintKind::Binary { left, right, .. } => {
                left.animation_frame();
                right.animation_frame();
            }
            ConstraintKind::CoerceIn { value, min, max } => {
                value.animation_frame();
                min.animation_frame();
                max.animation_frame();
            }
            ConstraintKind::Scale { inner, .. } | ConstraintKind::Rounding { inner, .. } => {
                inner.animation_frame();
            }
            ConstraintKind::Animated(animation) => {
                animation.advance();
                animation.old_value().animation_frame();
                animation.new_value().animation_frame();
            }
            ConstraintKind::Custom(custom) => custom.animation_frame(),
            _ => {}
        }
    }

    /// Declare which properties evaluating `ty` reads, without evaluating
    pub fn visit(&self, visitor: &mut ConstraintVisitor<'_>, ty: ConstraintType) {
        if ty.is_numeric() {
            numeric::visit(self, visitor, ty);
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn num(value: f32) -> String {
            let rounded = (value * 1000.0).round() / 1000.0;
            format!("{}", rounded)
        }

        match &self.0.kind {
            ConstraintKind::Pixel {
                value,
                align_opposite,
                align_outside,
            } => {
                write!(f, "{}px", num(*value))?;
                if *align_opposite {
                    f.write_str(" opposite")?;
                }
                if *align_outside {
                    f.write_str(" outside")?;
                }
                Ok(())
            }
            ConstraintKind::Relative(value) => write!(f, "{}%", num(value * 100.0)),
            ConstraintKind::RelativeWindow(value) => write!(f, "window({}%)", num(value * 100.0)),
            ConstraintKind::Center => f.write_str("center"),
            ConstraintKind::Sibling {
                padding,
                align_opposite: false,
            } => write!(f, "sibling({})", num(*padding)),
            ConstraintKind::Sibling {
                padding,
                align_opposite: true,
            } => write!(f, "sibling_opposite({})", num(*padding)),
            ConstraintKind::CramSibling { padding } => write!(f, "cram({})", num(*padding)),
            ConstraintKind::Aspect(value) => write!(f, "aspect({})", num(*value)),
            ConstraintKind::Fill { use_siblings: true } => f.write_str("fill"),
            ConstraintKind::Fill {
                use_siblings: false,
            } => f.write_str("fill_remaining"),
            ConstraintKind::ChildBasedSize { padding } => write!(f, "children({})", num(*padding)),
            ConstraintKind::ChildBasedMaxSize => f.write_str("children_max"),
            ConstraintKind::ChildBasedRange => f.write_str("children_range"),
            ConstraintKind::TextAspect => f.write_str("text_aspect"),
            ConstraintKind::ScaledText { scale } => write!(f, "text({})", num(*scale)),
            ConstraintKind::Binary { op, left, right } => match op {
                BinaryOp::Additive => write!(f, "({} + {})", left, right),
                BinaryOp::Subtractive => write!(f, "({} - {})", left, right),
                BinaryOp::Max => write!(f, "max({}, {})", left, right),
                BinaryOp::Min => write!(f, "min({}, {})", left, right),
                BinaryOp::CoerceAtMost => write!(f, "at_most({}, {})", left, right),
                BinaryOp::CoerceAtLeast => write!(f, "at_least({}, {})", left, right),
            },
            ConstraintKind::CoerceIn { value, min, max } => {
                write!(f, "clamp({}, {}, {})", value, min, max)
            }
            ConstraintKind::Scale { inner, factor } => write!(f, "({} * {})", inner, num(*factor)),
            ConstraintKind::Rounding { inner, mode } => {
                let name = match mode {
                    RoundingMode::Floor => "floor",
                    RoundingMode::Ceil => "ceil",
                    RoundingMode::Round => "round",
                };
                write!(f, "{}({})", name, inner)
            }
            ConstraintKind::Animated(animation) => {
                write!(f, "animate({} -> {})", animation.old_value(), animation.new_value())
            }
            ConstraintKind::Custom(custom) => write!(f, "custom({})", custom.name()),
        }
    }
}

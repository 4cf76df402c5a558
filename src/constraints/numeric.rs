//! Formulas and dependency declarations for every numeric constraint kind.
//!
//! `evaluate` and `visit` are kept side by side per kind: each read a formula
//! performs through [`EvalContext`] must be declared by the matching visit.

use super::{
    BinaryOp, Constraint, ConstraintKind, ConstraintType, ConstraintVisitor, EvalContext,
};
use crate::component::ComponentId;
use crate::text::DEFAULT_LINE_HEIGHT;

/// Tolerance when deciding whether a crammed component fits on the row
const CRAM_PRECISION: f32 = 0.01;

pub(super) fn evaluate(
    constraint: &Constraint,
    cx: &EvalContext<'_>,
    component: ComponentId,
    ty: ConstraintType,
) -> f32 {
    let axis = ty.axis();
    let target = constraint.constrain_to();

    match constraint.kind() {
        ConstraintKind::Pixel {
            value,
            align_opposite,
            align_outside,
        } => pixel(cx, component, target, *value, *align_opposite, *align_outside, axis),
        ConstraintKind::Relative(value) => {
            let t = cx.target_or_parent(component, target);
            relative(cx, t, *value, axis)
        }
        ConstraintKind::RelativeWindow(value) => relative(cx, cx.window().root(), *value, axis),
        ConstraintKind::Center => {
            let t = cx.target_or_parent(component, target);
            match axis {
                ConstraintType::X => {
                    cx.left(t) + cx.round_to_real_pixels(cx.width(t) / 2.0 - cx.width(component) / 2.0)
                }
                ConstraintType::Y => {
                    cx.top(t)
                        + cx.round_to_real_pixels(cx.height(t) / 2.0 - cx.height(component) / 2.0)
                }
                _ => 0.0,
            }
        }
        ConstraintKind::Sibling {
            padding,
            align_opposite,
        } => sibling(cx, component, target, *padding, *align_opposite, axis),
        ConstraintKind::CramSibling { padding } => cram_sibling(cx, component, *padding, axis),
        ConstraintKind::Aspect(value) => {
            let holder = target.unwrap_or(component);
            match axis {
                ConstraintType::X => cx.top(holder) * value,
                ConstraintType::Y => cx.left(holder) * value,
                ConstraintType::Width => cx.height(holder) * value,
                ConstraintType::Height => cx.width(holder) * value,
                ConstraintType::Radius => cx.radius(holder) * value,
                _ => 0.0,
            }
        }
        ConstraintKind::Fill { use_siblings } => fill(cx, component, target, *use_siblings, axis),
        ConstraintKind::ChildBasedSize { padding } => {
            let holder = target.unwrap_or(component);
            let children = cx.window().children(holder);
            let gaps = children.len().saturating_sub(1) as f32 * padding;
            match axis {
                ConstraintType::Width => {
                    children
                        .iter()
                        .map(|&c| cx.width(c) + horizontal_padding(cx, c))
                        .sum::<f32>()
                        + gaps
                }
                ConstraintType::Height => {
                    children
                        .iter()
                        .map(|&c| cx.height(c) + vertical_padding(cx, c))
                        .sum::<f32>()
                        + gaps
                }
                ConstraintType::Radius => {
                    children.iter().map(|&c| cx.height(c)).sum::<f32>() * 2.0
                }
                _ => 0.0,
            }
        }
        ConstraintKind::ChildBasedMaxSize => {
            let holder = target.unwrap_or(component);
            let children = cx.window().children(holder);
            match axis {
                ConstraintType::Width => largest(children.iter().map(|&c| {
                    let width = cx.width(c);
                    (width + horizontal_padding(cx, c), width)
                })),
                ConstraintType::Height => largest(children.iter().map(|&c| {
                    let height = cx.height(c);
                    (height + vertical_padding(cx, c), height)
                })),
                ConstraintType::Radius => {
                    largest(children.iter().map(|&c| {
                        let height = cx.height(c);
                        (height, height)
                    })) * 2.0
                }
                _ => 0.0,
            }
        }
        ConstraintKind::ChildBasedRange => {
            let vertical = match axis {
                ConstraintType::Width => false,
                ConstraintType::Height => true,
                _ => return 0.0,
            };
            let children = cx.window().children(component);
            if children.is_empty() {
                return 0.0;
            }
            let (min, max) = children.iter().fold(
                (f32::INFINITY, f32::NEG_INFINITY),
                |(min, max), &c| {
                    if vertical {
                        (min.min(cx.top(c)), max.max(cx.bottom(c)))
                    } else {
                        (min.min(cx.left(c)), max.max(cx.right(c)))
                    }
                },
            );
            (max - min).max(0.0)
        }
        ConstraintKind::TextAspect => {
            let text_width = cx.font(component).string_width(cx.text(component), DEFAULT_LINE_HEIGHT);
            match axis {
                ConstraintType::Width => text_width * cx.height(component) / DEFAULT_LINE_HEIGHT,
                ConstraintType::Height if text_width > 0.0 => {
                    DEFAULT_LINE_HEIGHT * cx.width(component) / text_width
                }
                _ => 0.0,
            }
        }
        ConstraintKind::ScaledText { scale } => match axis {
            ConstraintType::Width => {
                scale * cx.font(component).string_width(cx.text(component), DEFAULT_LINE_HEIGHT)
            }
            ConstraintType::Height => scale * DEFAULT_LINE_HEIGHT,
            _ => 0.0,
        },
        ConstraintKind::Binary { op, left, right } => {
            let l = left.value(cx, component, ty);
            let r = right.value(cx, component, ty);
            match op {
                BinaryOp::Additive => match axis {
                    ConstraintType::X => l + r - cx.left(cx.parent_or_root(component)),
                    ConstraintType::Y => l + r - cx.top(cx.parent_or_root(component)),
                    _ => l + r,
                },
                BinaryOp::Subtractive => match axis {
                    ConstraintType::X => l - r + cx.left(cx.parent_or_root(component)),
                    ConstraintType::Y => l - r + cx.top(cx.parent_or_root(component)),
                    _ => l - r,
                },
                BinaryOp::Max | BinaryOp::CoerceAtLeast => l.max(r),
                BinaryOp::Min | BinaryOp::CoerceAtMost => l.min(r),
            }
        }
        ConstraintKind::CoerceIn { value, min, max } => {
            let v = value.value(cx, component, ty);
            let lo = min.value(cx, component, ty);
            let hi = max.value(cx, component, ty);
            v.max(lo).min(hi)
        }
        ConstraintKind::Scale { inner, factor } => inner.value(cx, component, ty) * factor,
        ConstraintKind::Rounding { inner, mode } => mode.apply(inner.value(cx, component, ty)),
        ConstraintKind::Animated(animation) => {
            let start = animation.old_value().value(cx, component, ty);
            let end = animation.new_value().value(cx, component, ty);
            start + (end - start) * animation.percent_complete()
        }
        ConstraintKind::Custom(custom) => custom.evaluate(cx, component, ty),
    }
}

pub(super) fn visit(constraint: &Constraint, visitor: &mut ConstraintVisitor<'_>, ty: ConstraintType) {
    use ConstraintType::*;

    let axis = ty.axis();
    let target = constraint.constrain_to();

    match constraint.kind() {
        ConstraintKind::Pixel {
            align_opposite,
            align_outside,
            ..
        } => {
            let (position, size) = match axis {
                X => (X, Width),
                Y => (Y, Height),
                _ => return,
            };
            visitor.visit_target(target, position);
            if *align_opposite {
                visitor.visit_target(target, size);
            }
            if align_opposite != align_outside {
                visitor.visit_self(size);
            }
        }
        ConstraintKind::Relative(_) => match axis {
            X => {
                visitor.visit_target(target, X);
                visitor.visit_target(target, Width);
            }
            Y => {
                visitor.visit_target(target, Y);
                visitor.visit_target(target, Height);
            }
            Width | Radius => visitor.visit_target(target, Width),
            Height => visitor.visit_target(target, Height),
            _ => {}
        },
        // Only reads the window itself
        ConstraintKind::RelativeWindow(_) => {}
        ConstraintKind::Center => {
            let size = match axis {
                X => Width,
                Y => Height,
                _ => return,
            };
            visitor.visit_target(target, axis);
            visitor.visit_target(target, size);
            visitor.visit_self(size);
        }
        ConstraintKind::Sibling { align_opposite, .. } => {
            let size = match axis {
                X => Width,
                Y => Height,
                _ => return,
            };
            if target.is_some() {
                visitor.visit_target(target, axis);
                if *align_opposite {
                    visitor.visit_self(size);
                } else {
                    visitor.visit_target(target, size);
                }
                return;
            }
            let index = visitor.index_in_parent();
            if index == 0 {
                visitor.visit_parent(axis);
                if *align_opposite {
                    visitor.visit_parent(size);
                    visitor.visit_self(size);
                }
                return;
            }
            if *align_opposite {
                visitor.visit_self(size);
            }
            for n in (0..index).rev() {
                visitor.visit_sibling(axis, n);
                visitor.visit_sibling(size, n);
            }
        }
        ConstraintKind::CramSibling { .. } => {
            if !matches!(axis, X | Y) {
                return;
            }
            let index = visitor.index_in_parent();
            if index == 0 {
                visitor.visit_parent(axis);
                return;
            }
            visitor.visit_sibling(X, index - 1);
            visitor.visit_sibling(Width, index - 1);
            visitor.visit_self(Width);
            visitor.visit_parent(X);
            visitor.visit_parent(Width);
            if axis == Y {
                for n in (0..index).rev() {
                    visitor.visit_sibling(Y, n);
                    visitor.visit_sibling(Height, n);
                }
            }
        }
        ConstraintKind::Aspect(_) => {
            let read = match axis {
                X => Y,
                Y => X,
                Width => Height,
                Height => Width,
                Radius => Radius,
                _ => return,
            };
            visitor.visit_holder(target, read);
        }
        ConstraintKind::Fill { use_siblings } => {
            let (position, size) = match axis {
                Width => (X, Width),
                Height => (Y, Height),
                Radius => (X, Width),
                _ => return,
            };
            visitor.visit_target(target, size);
            if *use_siblings {
                visitor.visit_other_children(target, size);
            } else {
                visitor.visit_target(target, position);
                visitor.visit_self(position);
            }
        }
        ConstraintKind::ChildBasedSize { .. } | ConstraintKind::ChildBasedMaxSize => {
            let read = match axis {
                Width => Width,
                Height | Radius => Height,
                _ => return,
            };
            visitor.visit_children_of_holder(target, read);
        }
        ConstraintKind::ChildBasedRange => {
            let (position, size) = match axis {
                Width => (X, Width),
                Height => (Y, Height),
                _ => return,
            };
            visitor.visit_children(position);
            visitor.visit_children(size);
        }
        ConstraintKind::TextAspect => match axis {
            Width => visitor.visit_self(Height),
            Height => visitor.visit_self(Width),
            _ => {}
        },
        // Reads only the component's text
        ConstraintKind::ScaledText { .. } => {}
        ConstraintKind::Binary { op, left, right } => {
            left.visit(visitor, ty);
            right.visit(visitor, ty);
            if matches!(op, BinaryOp::Additive | BinaryOp::Subtractive) && matches!(axis, X | Y) {
                visitor.visit_parent(axis);
            }
        }
        ConstraintKind::CoerceIn { value, min, max } => {
            value.visit(visitor, ty);
            min.visit(visitor, ty);
            max.visit(visitor, ty);
        }
        ConstraintKind::Scale { inner, .. } | ConstraintKind::Rounding { inner, .. } => {
            inner.visit(visitor, ty)
        }
        ConstraintKind::Animated(animation) => {
            animation.old_value().visit(visitor, ty);
            animation.new_value().visit(visitor, ty);
        }
        ConstraintKind::Custom(custom) => custom.visit(visitor, ty),
    }
}

// ============================================================================
// Positioning helpers
// ============================================================================

fn pixel(
    cx: &EvalContext<'_>,
    component: ComponentId,
    target: Option<ComponentId>,
    value: f32,
    opposite: bool,
    outside: bool,
    axis: ConstraintType,
) -> f32 {
    let t = cx.target_or_parent(component, target);
    match axis {
        ConstraintType::X => match (opposite, outside) {
            (true, true) => cx.right(t) + value,
            (true, false) => cx.right(t) - value - cx.width(component),
            (false, true) => cx.left(t) - cx.width(component) - value,
            (false, false) => cx.left(t) + value,
        },
        ConstraintType::Y => match (opposite, outside) {
            (true, true) => cx.bottom(t) + value,
            (true, false) => cx.bottom(t) - value - cx.height(component),
            (false, true) => cx.top(t) - cx.height(component) - value,
            (false, false) => cx.top(t) + value,
        },
        _ => value,
    }
}

fn relative(cx: &EvalContext<'_>, t: ComponentId, value: f32, axis: ConstraintType) -> f32 {
    match axis {
        ConstraintType::X => cx.left(t) + cx.width(t) * value,
        ConstraintType::Y => cx.top(t) + cx.height(t) * value,
        ConstraintType::Width => cx.width(t) * value,
        ConstraintType::Height => cx.height(t) * value,
        ConstraintType::Radius => cx.width(t) * value / 2.0,
        _ => 0.0,
    }
}

fn sibling(
    cx: &EvalContext<'_>,
    component: ComponentId,
    target: Option<ComponentId>,
    padding: f32,
    opposite: bool,
    axis: ConstraintType,
) -> f32 {
    let horizontal = match axis {
        ConstraintType::X => true,
        ConstraintType::Y => false,
        _ => return 0.0,
    };

    if let Some(t) = target {
        return match (horizontal, opposite) {
            (true, false) => cx.right(t) + padding,
            (true, true) => cx.left(t) - cx.width(component) - padding,
            (false, false) => cx.bottom(t) + padding,
            (false, true) => cx.top(t) - cx.height(component) - padding,
        };
    }

    let parent = cx.parent_or_root(component);
    let siblings = cx.window().children(parent);
    let index = cx.window().index_in_parent(component).unwrap_or(0);
    let previous = match index.checked_sub(1).and_then(|i| siblings.get(i)) {
        Some(&previous) => previous,
        None => {
            return match (horizontal, opposite) {
                (true, false) => cx.left(parent),
                (true, true) => cx.right(parent) - cx.width(component),
                (false, false) => cx.top(parent),
                (false, true) => cx.bottom(parent) - cx.height(component),
            }
        }
    };

    let before = &siblings[..index];
    match (horizontal, opposite) {
        (true, false) => rightmost_point(cx, previous, before) + padding,
        (true, true) => leftmost_point(cx, previous, before) - cx.width(component) - padding,
        (false, false) => lowest_point(cx, previous, before) + padding,
        (false, true) => highest_point(cx, previous, before) - cx.height(component) - padding,
    }
}

fn cram_sibling(cx: &EvalContext<'_>, component: ComponentId, padding: f32, axis: ConstraintType) -> f32 {
    let parent = cx.parent_or_root(component);
    let siblings = cx.window().children(parent);
    let index = cx.window().index_in_parent(component).unwrap_or(0);
    let Some(&previous) = index.checked_sub(1).and_then(|i| siblings.get(i)) else {
        return match axis {
            ConstraintType::X => cx.left(parent),
            ConstraintType::Y => cx.top(parent),
            _ => 0.0,
        };
    };

    let fits = cx.right(previous) + cx.width(component) + padding
        <= cx.right(parent) + CRAM_PRECISION;
    match axis {
        ConstraintType::X if fits => cx.right(previous) + padding,
        ConstraintType::X => cx.left(parent),
        ConstraintType::Y if fits => cx.top(previous),
        ConstraintType::Y => lowest_point(cx, previous, &siblings[..index]) + padding,
        _ => 0.0,
    }
}

/// Far right edge of the run of siblings sharing `previous`'s left edge
fn rightmost_point(cx: &EvalContext<'_>, previous: ComponentId, before: &[ComponentId]) -> f32 {
    let left = cx.left(previous);
    let mut point = cx.right(previous);
    for &child in before.iter().rev() {
        if cx.left(child) != left {
            break;
        }
        point = point.max(cx.right(child));
    }
    point
}

fn leftmost_point(cx: &EvalContext<'_>, previous: ComponentId, before: &[ComponentId]) -> f32 {
    let right = cx.right(previous);
    let mut point = cx.left(previous);
    for &child in before.iter().rev() {
        if cx.right(child) != right {
            break;
        }
        point = point.min(cx.left(child));
    }
    point
}

fn lowest_point(cx: &EvalContext<'_>, previous: ComponentId, before: &[ComponentId]) -> f32 {
    let top = cx.top(previous);
    let mut point = cx.bottom(previous);
    for &child in before.iter().rev() {
        if cx.top(child) != top {
            break;
        }
        point = point.max(cx.bottom(child));
    }
    point
}

fn highest_point(cx: &EvalContext<'_>, previous: ComponentId, before: &[ComponentId]) -> f32 {
    let bottom = cx.bottom(previous);
    let mut point = cx.top(previous);
    for &child in before.iter().rev() {
        if cx.bottom(child) != bottom {
            break;
        }
        point = point.min(cx.top(child));
    }
    point
}

// ============================================================================
// Sizing helpers
// ============================================================================

fn fill(
    cx: &EvalContext<'_>,
    component: ComponentId,
    target: Option<ComponentId>,
    use_siblings: bool,
    axis: ConstraintType,
) -> f32 {
    let t = cx.target_or_parent(component, target);
    let vertical = match axis {
        ConstraintType::Width | ConstraintType::Radius => false,
        ConstraintType::Height => true,
        _ => return 0.0,
    };
    let size = |id| if vertical { cx.height(id) } else { cx.width(id) };
    let start = |id| if vertical { cx.top(id) } else { cx.left(id) };

    let filled = if use_siblings {
        cx.window()
            .children(t)
            .iter()
            .filter(|&&c| c != component)
            .fold(size(t), |remaining, &c| remaining - size(c))
    } else {
        start(t) + size(t) - start(component)
    };

    if axis == ConstraintType::Radius {
        filled / 2.0
    } else {
        filled
    }
}

/// Horizontal padding a child's x constraint places before it
fn horizontal_padding(cx: &EvalContext<'_>, child: ComponentId) -> f32 {
    let Some(constraints) = cx.window().constraints(child) else {
        return 0.0;
    };
    let first = cx.window().index_in_parent(child).unwrap_or(0) == 0;
    match constraints.x.kind() {
        ConstraintKind::Sibling { padding, .. } => {
            if first && constraints.x.constrain_to().is_none() {
                0.0
            } else {
                *padding
            }
        }
        // Assumes the crammed child stays on its row
        ConstraintKind::CramSibling { padding } if !first => *padding,
        _ => 0.0,
    }
}

/// Vertical padding a child's y constraint places above it
fn vertical_padding(cx: &EvalContext<'_>, child: ComponentId) -> f32 {
    let Some(constraints) = cx.window().constraints(child) else {
        return 0.0;
    };
    let first = cx.window().index_in_parent(child).unwrap_or(0) == 0;
    match constraints.y.kind() {
        ConstraintKind::Sibling { padding, .. } => {
            if first && constraints.y.constrain_to().is_none() {
                0.0
            } else {
                *padding
            }
        }
        _ => 0.0,
    }
}

/// Value paired with the largest key, or zero for an empty iterator
fn largest(pairs: impl Iterator<Item = (f32, f32)>) -> f32 {
    pairs
        .fold(None, |best: Option<(f32, f32)>, (key, value)| match best {
            Some((best_key, _)) if best_key >= key => best,
            _ => Some((key, value)),
        })
        .map(|(_, value)| value)
        .unwrap_or(0.0)
}

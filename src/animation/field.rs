//! Animations of plain values held in shared cells

use std::cell::Cell;
use std::rc::Rc;

use super::AnimationComponent;
use crate::constraints::Rgba;

/// A value that can be interpolated by a field animation
pub trait Animatable: Copy + 'static {
    fn interpolate(from: Self, to: Self, percent: f32) -> Self;
}

impl Animatable for f32 {
    fn interpolate(from: Self, to: Self, percent: f32) -> Self {
        from + percent * (to - from)
    }
}

impl Animatable for f64 {
    fn interpolate(from: Self, to: Self, percent: f32) -> Self {
        from + f64::from(percent) * (to - from)
    }
}

impl Animatable for i32 {
    /// Truncates toward zero
    fn interpolate(from: Self, to: Self, percent: f32) -> Self {
        (from as f32 + percent * (to - from) as f32) as i32
    }
}

impl Animatable for Rgba {
    fn interpolate(from: Self, to: Self, percent: f32) -> Self {
        from.lerp(to, percent)
    }
}

/// Type-erased field animation owned by the window
pub(crate) trait FieldAnimation {
    /// Advance one frame and write the interpolated value
    fn advance(&self);

    fn is_complete(&self) -> bool;

    /// Address of the animated cell
    fn field_address(&self) -> usize;
}

/// Drives one cell from its value at creation to a target
pub(crate) struct Tween<V: Animatable> {
    field: Rc<Cell<V>>,
    animation: AnimationComponent<V>,
}

impl<V: Animatable> Tween<V> {
    pub(crate) fn new(field: Rc<Cell<V>>, animation: AnimationComponent<V>) -> Self {
        Self { field, animation }
    }
}

pub(crate) fn field_address<V>(field: &Rc<Cell<V>>) -> usize {
    Rc::as_ptr(field) as *const () as usize
}

impl<V: Animatable> FieldAnimation for Tween<V> {
    fn advance(&self) {
        self.animation.advance();
        let value = if self.animation.is_complete() {
            *self.animation.new_value()
        } else {
            V::interpolate(
                *self.animation.old_value(),
                *self.animation.new_value(),
                self.animation.percent_complete(),
            )
        };
        self.field.set(value);
    }

    fn is_complete(&self) -> bool {
        self.animation.is_complete()
    }

    fn field_address(&self) -> usize {
        field_address(&self.field)
    }
}

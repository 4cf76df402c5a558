//! Animation: easing strategies, frame-counted animation components, batched
//! constraint animations and field animations.

mod animating;
mod component;
mod field;
mod strategy;

pub use animating::{AnimatingConstraints, CompleteAction};
pub use component::AnimationComponent;
pub use field::Animatable;
pub(crate) use field::{field_address, FieldAnimation, Tween};
pub use strategy::{AnimationStrategy, Animations, UnknownStrategy};

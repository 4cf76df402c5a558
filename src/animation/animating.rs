//! Batches of simultaneous property animations on one component

use std::fmt;

use super::{AnimationComponent, AnimationStrategy};
use crate::component::{ComponentId, Constraints, Window};
use crate::constraints::{ColorConstraint, Constraint, ConstraintType};

/// Callback fired once every animated slot has settled
pub type CompleteAction = Box<dyn FnOnce(&mut Window, ComponentId)>;

/// A component's constraint set while animations run.
///
/// Starts as a copy of the component's constraints. Each `set_*_animation`
/// call replaces one slot with an animation from the old constraint to a
/// target. Completed slots collapse to their target; once nothing animates
/// and the extra delay has run out, the window installs the plain set and
/// fires the completion callback.
pub struct AnimatingConstraints {
    component: ComponentId,
    fps: u32,
    old: Constraints,
    current: Constraints,
    extra_delay_frames: i32,
    on_complete: Option<CompleteAction>,
}

impl fmt::Debug for AnimatingConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatingConstraints")
            .field("component", &self.component)
            .field("fps", &self.fps)
            .field("current", &self.current)
            .field("extra_delay_frames", &self.extra_delay_frames)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl AnimatingConstraints {
    pub fn new(component: ComponentId, fps: u32, old: Constraints) -> Self {
        Self {
            component,
            fps,
            current: old.clone(),
            old,
            extra_delay_frames: 0,
            on_complete: None,
        }
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    /// Constraints in effect this frame
    pub fn current(&self) -> &Constraints {
        &self.current
    }

    pub(crate) fn current_mut(&mut self) -> &mut Constraints {
        &mut self.current
    }

    /// Constraints the animations start from
    pub fn old(&self) -> &Constraints {
        &self.old
    }

    fn frames(&self, seconds: f32) -> u32 {
        // Saturating cast: negative durations become zero frames
        (seconds * self.fps as f32) as u32
    }

    /// Replace the numeric slot `ty` with an animation toward `target`
    pub fn set_animation(
        &mut self,
        ty: ConstraintType,
        strategy: impl AnimationStrategy + 'static,
        time: f32,
        target: Constraint,
        delay: f32,
    ) -> &mut Self {
        let total = self.frames(time);
        let delay = self.frames(delay);
        let Some(old) = self.old.get(ty).cloned() else {
            tracing::warn!(%ty, "property cannot be animated");
            return self;
        };
        if let Some(slot) = self.current.get_mut(ty) {
            *slot = Constraint::animated(AnimationComponent::new(strategy, total, old, target, delay));
        }
        self
    }

    pub fn set_x_animation(
        &mut self,
        strategy: impl AnimationStrategy + 'static,
        time: f32,
        target: Constraint,
        delay: f32,
    ) -> &mut Self {
        self.set_animation(ConstraintType::X, strategy, time, target, delay)
    }

    pub fn set_y_animation(
        &mut self,
        strategy: impl AnimationStrategy + 'static,
        time: f32,
        target: Constraint,
        delay: f32,
    ) -> &mut Self {
        self.set_animation(ConstraintType::Y, strategy, time, target, delay)
    }

    pub fn set_width_animation(
        &mut self,
        strategy: impl AnimationStrategy + 'static,
        time: f32,
        target: Constraint,
        delay: f32,
    ) -> &mut Self {
        self.set_animation(ConstraintType::Width, strategy, time, target, delay)
    }

    pub fn set_height_animation(
        &mut self,
        strategy: impl AnimationStrategy + 'static,
        time: f32,
        target: Constraint,
        delay: f32,
    ) -> &mut Self {
        self.set_animation(ConstraintType::Height, strategy, time, target, delay)
    }

    pub fn set_radius_animation(
        &mut self,
        strategy: impl AnimationStrategy + 'static,
        time: f32,
        target: Constraint,
        delay: f32,
    ) -> &mut Self {
        self.set_animation(ConstraintType::Radius, strategy, time, target, delay)
    }

    pub fn set_text_scale_animation(
        &mut self,
        strategy: impl AnimationStrategy + 'static,
        time: f32,
        target: Constraint,
        delay: f32,
    ) -> &mut Self {
        self.set_animation(ConstraintType::TextScale, strategy, time, target, delay)
    }

    pub fn set_color_animation(
        &mut self,
        strategy: impl AnimationStrategy + 'static,
        time: f32,
        target: ColorConstraint,
        delay: f32,
    ) -> &mut Self {
        let total = self.frames(time);
        let delay = self.frames(delay);
        self.current.color = ColorConstraint::animated(AnimationComponent::new(
            strategy,
            total,
            self.old.color.clone(),
            target,
            delay,
        ));
        self
    }

    /// Postpone completion by `delay` seconds without changing any value
    pub fn set_extra_delay(&mut self, delay: f32) -> &mut Self {
        self.extra_delay_frames = (delay * self.fps as f32) as i32;
        self
    }

    pub fn on_complete(&mut self, action: impl FnOnce(&mut Window, ComponentId) + 'static) -> &mut Self {
        self.on_complete = Some(Box::new(action));
        self
    }

    /// Remove the completion callback, e.g. to wrap it in a new one
    pub fn take_on_complete(&mut self) -> Option<CompleteAction> {
        self.on_complete.take()
    }

    /// Whether any slot still holds an unfinished animation
    pub fn is_animating(&self) -> bool {
        self.current.numeric().any(|(_, c)| c.is_animating())
            || self
                .current
                .color
                .as_animation()
                .is_some_and(|a| !a.is_complete())
    }

    /// Collapse finished slots to their targets and count down the extra
    /// delay. Returns true once the whole batch is done.
    pub fn update_completion(&mut self, dt: i32) -> bool {
        let mut any_animating = false;

        for ty in ConstraintType::RESOLVED {
            let Some(slot) = self.current.get_mut(ty) else {
                continue;
            };
            let settled = match slot.as_animation() {
                Some(animation) if animation.is_complete() => Some(animation.new_value().clone()),
                Some(_) => {
                    any_animating = true;
                    None
                }
                None => None,
            };
            if let Some(target) = settled {
                *slot = target;
            }
        }

        let settled_color = match self.current.color.as_animation() {
            Some(animation) if animation.is_complete() => Some(animation.new_value().clone()),
            Some(_) => {
                any_animating = true;
                None
            }
            None => None,
        };
        if let Some(color) = settled_color {
            self.current.color = color;
        }

        if self.extra_delay_frames > 0 {
            any_animating = true;
            self.extra_delay_frames -= dt;
        }

        !any_animating
    }

    /// Consume the batch, yielding the settled constraints and callback
    pub fn finish(self) -> (Constraints, Option<CompleteAction>) {
        (self.current, self.on_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animations;
    use crate::component::config::WindowConfig;

    #[test]
    fn test_completed_slots_collapse_to_target() {
        let mut window = Window::new(WindowConfig::default().with_animation_fps(10));
        let id = window.create("box");
        let target = Constraint::pixels(40.0);

        let mut animation = window.make_animation(id).unwrap();
        animation.set_width_animation(Animations::Linear, 0.2, target.clone(), 0.0);
        assert!(animation.is_animating());
        assert!(!animation.update_completion(1));

        for _ in 0..2 {
            animation.current().width.animation_frame();
        }
        assert!(animation.update_completion(1));
        assert_eq!(animation.current().width.id(), target.id());
    }

    #[test]
    fn test_extra_delay_postpones_completion() {
        let mut window = Window::new(WindowConfig::default().with_animation_fps(10));
        let id = window.create("box");

        let mut animation = window.make_animation(id).unwrap();
        animation.set_extra_delay(0.3);
        assert!(!animation.update_completion(1));
        assert!(!animation.update_completion(1));
        assert!(!animation.update_completion(1));
        assert!(animation.update_completion(1));
    }
}

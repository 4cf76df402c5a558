//! Frame-counted interpolation between two values

use std::cell::Cell;
use std::rc::Rc;

use super::AnimationStrategy;

/// An eased transition from `old` to `new` over a fixed number of frames.
///
/// `T` is either a constraint (evaluated each frame and interpolated) or a
/// plain value for field animations. Frame state lives in cells so the
/// animation can be advanced through shared constraint handles.
#[derive(Debug, Clone)]
pub struct AnimationComponent<T> {
    strategy: Rc<dyn AnimationStrategy>,
    total_frames: u32,
    delay_frames: u32,
    elapsed: Cell<u32>,
    paused: Cell<bool>,
    old: T,
    new: T,
}

impl<T> AnimationComponent<T> {
    pub fn new(
        strategy: impl AnimationStrategy + 'static,
        total_frames: u32,
        old: T,
        new: T,
        delay_frames: u32,
    ) -> Self {
        Self::with_shared_strategy(Rc::new(strategy), total_frames, old, new, delay_frames)
    }

    pub fn with_shared_strategy(
        strategy: Rc<dyn AnimationStrategy>,
        total_frames: u32,
        old: T,
        new: T,
        delay_frames: u32,
    ) -> Self {
        Self {
            strategy,
            total_frames,
            delay_frames,
            elapsed: Cell::new(0),
            paused: Cell::new(false),
            old,
            new,
        }
    }

    pub fn strategy(&self) -> &dyn AnimationStrategy {
        self.strategy.as_ref()
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn delay_frames(&self) -> u32 {
        self.delay_frames
    }

    pub fn elapsed_frames(&self) -> u32 {
        self.elapsed.get()
    }

    pub fn old_value(&self) -> &T {
        &self.old
    }

    pub fn new_value(&self) -> &T {
        &self.new
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    /// One tick: count a frame unless paused or already complete
    pub fn advance(&self) {
        if self.is_complete() || self.paused.get() {
            return;
        }
        self.elapsed.set(self.elapsed.get().saturating_add(1));
    }

    pub fn pause(&self) {
        self.paused.set(true);
    }

    pub fn resume(&self) {
        self.paused.set(false);
    }

    /// Jump straight to the end
    pub fn stop(&self) {
        self.elapsed
            .set(self.total_frames.saturating_add(self.delay_frames));
    }

    pub fn is_complete(&self) -> bool {
        i64::from(self.elapsed.get()) - i64::from(self.delay_frames) >= i64::from(self.total_frames)
    }

    /// Eased progress. Exactly zero while the delay runs, so the start
    /// value holds for every strategy.
    pub fn percent_complete(&self) -> f32 {
        let elapsed = self.elapsed.get();
        if elapsed <= self.delay_frames && self.delay_frames > 0 {
            return 0.0;
        }
        let progress = if self.total_frames == 0 {
            1.0
        } else {
            let frames = elapsed.saturating_sub(self.delay_frames) as f32;
            (frames / self.total_frames as f32).min(1.0)
        };
        self.strategy.value(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animations;

    #[test]
    fn test_completes_after_total_frames() {
        let animation = AnimationComponent::new(Animations::Linear, 3, 0.0f32, 1.0, 0);
        assert!(!animation.is_complete());
        for _ in 0..3 {
            animation.advance();
        }
        assert!(animation.is_complete());
        assert_eq!(animation.percent_complete(), 1.0);

        animation.advance();
        assert_eq!(animation.elapsed_frames(), 3);
    }

    #[test]
    fn test_delay_holds_start() {
        let animation = AnimationComponent::new(Animations::InExp, 4, 0.0f32, 1.0, 2);
        animation.advance();
        assert_eq!(animation.percent_complete(), 0.0);
        animation.advance();
        assert_eq!(animation.percent_complete(), 0.0);
        animation.advance();
        assert!(animation.percent_complete() > 0.0);
    }

    #[test]
    fn test_pause_and_stop() {
        let animation = AnimationComponent::new(Animations::Linear, 10, 0.0f32, 1.0, 5);
        animation.pause();
        animation.advance();
        assert_eq!(animation.elapsed_frames(), 0);
        animation.resume();
        animation.advance();
        assert_eq!(animation.elapsed_frames(), 1);
        animation.stop();
        assert!(animation.is_complete());
        assert_eq!(animation.elapsed_frames(), 15);
    }

    #[test]
    fn test_zero_frames_is_complete() {
        let animation = AnimationComponent::new(Animations::Linear, 0, 0.0f32, 1.0, 0);
        assert!(animation.is_complete());
        assert_eq!(animation.percent_complete(), 1.0);
    }
}

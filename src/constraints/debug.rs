//! Pluggable interception of constraint evaluation.
//!
//! A debugger installed in an [`EvalContext`] sees every numeric constraint
//! evaluation, including the nested reads a formula performs. Debuggers
//! compose by wrapping an inner debugger.

use std::cell::RefCell;
use std::collections::HashSet;

use super::{Constraint, ConstraintId, ConstraintType, EvalContext};
use crate::component::ComponentId;

/// Value returned in place of a constraint that is already being evaluated.
/// Non-zero so the component stays visible when highlighted.
pub const CYCLE_PLACEHOLDER: f32 = 10.0;

pub trait ConstraintDebugger {
    fn evaluate(
        &self,
        constraint: &Constraint,
        ty: ConstraintType,
        component: ComponentId,
        cx: &EvalContext<'_>,
    ) -> f32;
}

/// Plain cached evaluation
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopConstraintDebugger;

impl ConstraintDebugger for NoopConstraintDebugger {
    fn evaluate(
        &self,
        constraint: &Constraint,
        ty: ConstraintType,
        component: ComponentId,
        cx: &EvalContext<'_>,
    ) -> f32 {
        constraint.cached(cx, component, ty)
    }
}

/// Forces every constraint to recompute the first time it is seen
#[derive(Debug, Default)]
pub struct RecalculatingConstraintDebugger<D = NoopConstraintDebugger> {
    inner: D,
    visited: RefCell<HashSet<ConstraintId>>,
}

impl<D: ConstraintDebugger> RecalculatingConstraintDebugger<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            visited: RefCell::new(HashSet::new()),
        }
    }
}

impl<D: ConstraintDebugger> ConstraintDebugger for RecalculatingConstraintDebugger<D> {
    fn evaluate(
        &self,
        constraint: &Constraint,
        ty: ConstraintType,
        component: ComponentId,
        cx: &EvalContext<'_>,
    ) -> f32 {
        if self.visited.borrow_mut().insert(constraint.id()) {
            constraint.mark_dirty();
        }
        self.inner.evaluate(constraint, ty, component, cx)
    }
}

/// Breaks evaluation cycles by answering [`CYCLE_PLACEHOLDER`] for any
/// constraint already on the evaluation stack
#[derive(Debug, Default)]
pub struct CycleSafeConstraintDebugger<D = NoopConstraintDebugger> {
    inner: D,
    stack: RefCell<HashSet<ConstraintId>>,
}

impl<D: ConstraintDebugger> CycleSafeConstraintDebugger<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            stack: RefCell::new(HashSet::new()),
        }
    }
}

impl<D: ConstraintDebugger> ConstraintDebugger for CycleSafeConstraintDebugger<D> {
    fn evaluate(
        &self,
        constraint: &Constraint,
        ty: ConstraintType,
        component: ComponentId,
        cx: &EvalContext<'_>,
    ) -> f32 {
        let id = constraint.id();
        if !self.stack.borrow_mut().insert(id) {
            return CYCLE_PLACEHOLDER;
        }
        let value = self.inner.evaluate(constraint, ty, component, cx);
        self.stack.borrow_mut().remove(&id);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::config::WindowConfig;
    use crate::component::Window;
    use crate::constraints::ConstraintType;

    fn cyclic_window() -> (Window, ComponentId) {
        let mut window = Window::new(WindowConfig::default().with_size(200.0, 100.0));
        let root = window.root();
        let id = window.spawn(root, "box").unwrap();
        window
            .set_constraint(id, ConstraintType::Width, Constraint::aspect(2.0))
            .unwrap();
        window
            .set_constraint(id, ConstraintType::Height, Constraint::aspect(0.5))
            .unwrap();
        (window, id)
    }

    #[test]
    fn test_cycle_safe_returns_placeholder() {
        let (window, id) = cyclic_window();
        let debugger = CycleSafeConstraintDebugger::new(RecalculatingConstraintDebugger::<NoopConstraintDebugger>::default());
        let cx = EvalContext::with_debugger(&window, &debugger);
        // width = 2 * height, height = 0.5 * width: the inner width read hits the guard
        assert_eq!(cx.width(id), 2.0 * 0.5 * CYCLE_PLACEHOLDER);
    }

    #[test]
    fn test_recalculating_marks_dirty_once() {
        let mut window = Window::new(WindowConfig::default().with_size(200.0, 100.0));
        let root = window.root();
        let id = window.spawn(root, "box").unwrap();
        window
            .set_constraint(id, ConstraintType::Width, Constraint::relative(0.5))
            .unwrap();

        assert_eq!(window.width(id), 100.0);
        let before = window.constraints(id).unwrap().width.computations();

        let debugger = RecalculatingConstraintDebugger::<NoopConstraintDebugger>::default();
        let cx = EvalContext::with_debugger(&window, &debugger);
        assert_eq!(cx.width(id), 100.0);
        assert_eq!(cx.width(id), 100.0);
        let after = window.constraints(id).unwrap().width.computations();
        assert_eq!(after, before + 1);
    }
}

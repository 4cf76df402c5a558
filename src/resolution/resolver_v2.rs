//! Dynamic cycle detection by tracing real evaluation

use std::cell::RefCell;
use std::collections::HashSet;

use tracing::debug;

use super::resolver::ResolverNode;
use crate::component::{ComponentId, Window};
use crate::constraints::{Constraint, ConstraintDebugger, ConstraintId, ConstraintType, EvalContext};

/// Debugger that keeps the stack of properties being evaluated and records
/// every re-entry as a cycle.
///
/// Each constraint is recomputed the first time it is seen. A re-entered
/// property answers its stale cached value so evaluation can finish.
#[derive(Debug, Default)]
pub struct CycleSearchingDebugger {
    visited: RefCell<HashSet<ConstraintId>>,
    stack: RefCell<Vec<ResolverNode>>,
    cycles: RefCell<Vec<Vec<ResolverNode>>>,
}

impl CycleSearchingDebugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cycles recorded so far, in discovery order
    pub fn cycles(&self) -> Vec<Vec<ResolverNode>> {
        self.cycles.borrow().clone()
    }

    pub fn into_cycles(self) -> Vec<Vec<ResolverNode>> {
        self.cycles.into_inner()
    }
}

impl ConstraintDebugger for CycleSearchingDebugger {
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
        if !constraint.is_dirty() {
            return constraint.cached_value();
        }

        let node = ResolverNode::new(component, constraint.clone(), ty);
        let reentry = self.stack.borrow().iter().position(|n| n == &node);
        if let Some(start) = reentry {
            let cycle = self.stack.borrow()[start..].to_vec();
            self.cycles.borrow_mut().push(cycle);
            return constraint.cached_value();
        }

        self.stack.borrow_mut().push(node);
        let value = constraint.compute(cx, component, ty);
        self.stack.borrow_mut().pop();
        constraint.store(value);
        value
    }
}

/// Evaluates every property of a subtree under a [`CycleSearchingDebugger`].
///
/// Sees exactly the reads formulas perform for the current tree state,
/// including ones a constraint forgot to declare.
#[derive(Debug)]
pub struct ConstraintResolverV2<'w> {
    window: &'w Window,
    root: ComponentId,
}

impl<'w> ConstraintResolverV2<'w> {
    pub fn new(window: &'w Window) -> Self {
        Self {
            window,
            root: window.root(),
        }
    }

    pub fn with_root(mut self, root: ComponentId) -> Self {
        self.root = root;
        self
    }

    /// Every cycle exercised by evaluating the subtree
    pub fn cycles(&self) -> Vec<Vec<ResolverNode>> {
        let debugger = CycleSearchingDebugger::new();
        {
            let cx = EvalContext::with_debugger(self.window, &debugger);
            for component in self.window.descendants(self.root) {
                for ty in ConstraintType::RESOLVED {
                    cx.get(component, ty);
                }
            }
        }
        let cycles = debugger.into_cycles();
        debug!(count = cycles.len(), "traced constraint evaluation");
        cycles
    }

    /// The first cycle found, if any
    pub fn cyclic_nodes(&self) -> Option<Vec<ResolverNode>> {
        self.cycles().into_iter().next()
    }
}

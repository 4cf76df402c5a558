//! Checks declared dependencies against the reads formulas actually perform

use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::component::{ComponentId, Window};
use crate::constraints::{Constraint, ConstraintDebugger, ConstraintType, ConstraintVisitor, EvalContext};

type Property = (ComponentId, ConstraintType);

/// A runtime read that the reading constraint's `visit` never declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UndeclaredDependency {
    pub reader: Property,
    pub read: Property,
}

impl UndeclaredDependency {
    pub fn describe(&self, window: &Window) -> String {
        format!(
            "'{}' {} reads '{}' {} without declaring it",
            window.name(self.reader.0),
            self.reader.1,
            window.name(self.read.0),
            self.read.1
        )
    }
}

/// Debugger recording which property reads which while evaluating.
///
/// Slot constraints are evaluated at most once; re-entered or finished
/// slots answer their cached value so cyclic trees still terminate.
#[derive(Debug, Default)]
pub struct DependencyRecorder {
    stack: RefCell<Vec<Property>>,
    done: RefCell<HashSet<Property>>,
    reads: RefCell<BTreeSet<(Property, Property)>>,
}

impl DependencyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(reader, read)` pair observed, sorted
    pub fn reads(&self) -> Vec<(Property, Property)> {
        self.reads.borrow().iter().copied().collect()
    }
}

impl ConstraintDebugger for DependencyRecorder {
    fn evaluate(
        &self,
        constraint: &Constraint,
        ty: ConstraintType,
        component: ComponentId,
        cx: &EvalContext<'_>,
    ) -> f32 {
        let is_slot = cx
            .window()
            .constraint(component, ty)
            .is_some_and(|slot| slot.id() == constraint.id());
        // Operands of a composite run under their parent's entry
        if !is_slot {
            return constraint.compute(cx, component, ty);
        }

        let property = (component, ty);
        if let Some(&reader) = self.stack.borrow().last() {
            self.reads.borrow_mut().insert((reader, property));
        }
        if self.done.borrow().contains(&property) || self.stack.borrow().contains(&property) {
            return constraint.cached_value();
        }

        self.stack.borrow_mut().push(property);
        let value = constraint.compute(cx, component, ty);
        self.stack.borrow_mut().pop();
        constraint.store(value);
        self.done.borrow_mut().insert(property);
        value
    }
}

/// Evaluate the whole window under a [`DependencyRecorder`] and report
/// every observed read missing from the static declarations.
pub fn audit_dependencies(window: &Window) -> Vec<UndeclaredDependency> {
    let recorder = DependencyRecorder::new();
    {
        let cx = EvalContext::with_debugger(window, &recorder);
        for component in window.descendants(window.root()) {
            for ty in ConstraintType::RESOLVED {
                cx.get(component, ty);
            }
        }
    }

    let reads = recorder.reads();
    debug!(reads = reads.len(), "recorded runtime dependencies");

    reads
        .into_iter()
        .filter(|&(reader, read)| !ConstraintVisitor::collect(window, reader.0, reader.1).contains(&read))
        .map(|(reader, read)| UndeclaredDependency { reader, read })
        .collect()
}

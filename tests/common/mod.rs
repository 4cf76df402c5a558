//! Helpers shared by the integration suites

#![allow(dead_code)]

use trellis::component::{ComponentId, Window, WindowConfig};
use trellis::constraints::{ConstraintType, ConstraintVisitor, CustomConstraint, EvalContext};

/// Reads one property of another component and declares the read
#[derive(Debug)]
pub struct ReadProperty {
    pub target: ComponentId,
    pub ty: ConstraintType,
}

impl ReadProperty {
    pub fn new(target: ComponentId, ty: ConstraintType) -> Self {
        Self { target, ty }
    }
}

impl CustomConstraint for ReadProperty {
    fn name(&self) -> &str {
        "ReadProperty"
    }

    fn supports(&self, _ty: ConstraintType) -> bool {
        true
    }

    fn evaluate(&self, cx: &EvalContext<'_>, _component: ComponentId, _ty: ConstraintType) -> f32 {
        cx.get(self.target, self.ty) + 1.0
    }

    fn visit(&self, visitor: &mut ConstraintVisitor<'_>, _ty: ConstraintType) {
        visitor.visit_component(self.target, self.ty);
    }
}

pub fn window(width: f32, height: f32) -> Window {
    Window::new(WindowConfig::default().with_size(width, height))
}

/// Spawn `names` as direct children of the root
pub fn spawn_all<const N: usize>(window: &mut Window, names: [&str; N]) -> [ComponentId; N] {
    let root = window.root();
    names.map(|name| window.spawn(root, name).unwrap())
}

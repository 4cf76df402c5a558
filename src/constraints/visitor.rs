//! Static dependency declaration

use super::ConstraintType;
use crate::component::{ComponentId, Window};

/// Collects the `(component, property)` pairs a constraint reads.
///
/// Created for one component; constraints call the `visit_*` methods
/// relative to it. Reads of the root are dropped since the window
/// rectangle never depends on anything.
#[derive(Debug)]
pub struct ConstraintVisitor<'w> {
    window: &'w Window,
    component: ComponentId,
    dependencies: Vec<(ComponentId, ConstraintType)>,
}

impl<'w> ConstraintVisitor<'w> {
    pub fn new(window: &'w Window, component: ComponentId) -> Self {
        Self {
            window,
            component,
            dependencies: Vec::new(),
        }
    }

    /// Dependencies of `component`'s `ty` constraint
    pub fn collect(
        window: &'w Window,
        component: ComponentId,
        ty: ConstraintType,
    ) -> Vec<(ComponentId, ConstraintType)> {
        let mut visitor = Self::new(window, component);
        if let Some(constraint) = window.constraint(component, ty) {
            constraint.visit(&mut visitor, ty);
        }
        visitor.dependencies
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn dependencies(&self) -> &[(ComponentId, ConstraintType)] {
        &self.dependencies
    }

    pub fn into_dependencies(self) -> Vec<(ComponentId, ConstraintType)> {
        self.dependencies
    }

    fn parent(&self) -> ComponentId {
        self.window
            .parent(self.component)
            .unwrap_or(self.window.root())
    }

    /// Position of the visited component among its siblings
    pub fn index_in_parent(&self) -> usize {
        self.window.index_in_parent(self.component).unwrap_or(0)
    }

    pub fn visit_component(&mut self, component: ComponentId, ty: ConstraintType) {
        if component == self.window.root() {
            return;
        }
        let dependency = (component, ty);
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
    }

    pub fn visit_self(&mut self, ty: ConstraintType) {
        self.visit_component(self.component, ty);
    }

    pub fn visit_parent(&mut self, ty: ConstraintType) {
        self.visit_component(self.parent(), ty);
    }

    /// Visit the sibling at `index` in the parent's child list
    pub fn visit_sibling(&mut self, ty: ConstraintType, index: usize) {
        if let Some(&sibling) = self.window.children(self.parent()).get(index) {
            self.visit_component(sibling, ty);
        }
    }

    pub fn visit_children(&mut self, ty: ConstraintType) {
        self.visit_children_of(self.component, ty);
    }

    pub fn visit_children_of(&mut self, component: ComponentId, ty: ConstraintType) {
        let window = self.window;
        for &child in window.children(component) {
            self.visit_component(child, ty);
        }
    }

    /// The explicit target if any, otherwise the parent
    pub fn visit_target(&mut self, target: Option<ComponentId>, ty: ConstraintType) {
        match target {
            Some(target) => self.visit_component(target, ty),
            None => self.visit_parent(ty),
        }
    }

    /// The explicit target if any, otherwise the visited component itself
    pub fn visit_holder(&mut self, target: Option<ComponentId>, ty: ConstraintType) {
        match target {
            Some(target) => self.visit_component(target, ty),
            None => self.visit_self(ty),
        }
    }

    pub fn visit_children_of_holder(&mut self, target: Option<ComponentId>, ty: ConstraintType) {
        self.visit_children_of(target.unwrap_or(self.component), ty);
    }

    /// Every child of the target (or parent) except the visited component
    pub fn visit_other_children(&mut self, target: Option<ComponentId>, ty: ConstraintType) {
        let window = self.window;
        let container = target.unwrap_or_else(|| self.parent());
        for &child in window.children(container) {
            if child != self.component {
                self.visit_component(child, ty);
            }
        }
    }
}

//! Evaluation context handed to every constraint formula

use std::rc::Rc;

use super::{ConstraintDebugger, ConstraintType, Rgba};
use crate::component::{ComponentId, Window};
use crate::text::FontProvider;

/// Read-only view of the component tree during evaluation.
///
/// Every property read a formula performs goes through one of the accessors
/// here, so an installed [`ConstraintDebugger`] observes all of them. The
/// root component resolves to the window rectangle; dropped components
/// resolve to zero.
#[derive(Clone, Copy)]
pub struct EvalContext<'w> {
    window: &'w Window,
    debugger: Option<&'w dyn ConstraintDebugger>,
}

impl<'w> EvalContext<'w> {
    pub fn new(window: &'w Window) -> Self {
        Self {
            window,
            debugger: None,
        }
    }

    pub fn with_debugger(window: &'w Window, debugger: &'w dyn ConstraintDebugger) -> Self {
        Self {
            window,
            debugger: Some(debugger),
        }
    }

    pub fn window(&self) -> &'w Window {
        self.window
    }

    pub fn debugger(&self) -> Option<&'w dyn ConstraintDebugger> {
        self.debugger
    }

    /// Resolve one numeric property of `id`
    pub fn get(&self, id: ComponentId, ty: ConstraintType) -> f32 {
        if id == self.window.root() {
            return match ty {
                ConstraintType::Width => self.window.config().width,
                ConstraintType::Height => self.window.config().height,
                ConstraintType::TextScale => 1.0,
                _ => 0.0,
            };
        }
        let Some(constraint) = self.window.constraint(id, ty) else {
            return 0.0;
        };
        if !constraint.supports(ty) {
            return 0.0;
        }
        constraint.value(self, id, ty)
    }

    pub fn left(&self, id: ComponentId) -> f32 {
        self.get(id, ConstraintType::X)
    }

    pub fn top(&self, id: ComponentId) -> f32 {
        self.get(id, ConstraintType::Y)
    }

    pub fn width(&self, id: ComponentId) -> f32 {
        self.get(id, ConstraintType::Width)
    }

    pub fn height(&self, id: ComponentId) -> f32 {
        self.get(id, ConstraintType::Height)
    }

    pub fn right(&self, id: ComponentId) -> f32 {
        self.left(id) + self.width(id)
    }

    pub fn bottom(&self, id: ComponentId) -> f32 {
        self.top(id) + self.height(id)
    }

    pub fn radius(&self, id: ComponentId) -> f32 {
        self.get(id, ConstraintType::Radius)
    }

    pub fn text_scale(&self, id: ComponentId) -> f32 {
        self.get(id, ConstraintType::TextScale)
    }

    pub fn color(&self, id: ComponentId) -> Rgba {
        if id == self.window.root() {
            return Rgba::WHITE;
        }
        match self.window.constraints(id) {
            Some(constraints) => constraints.color.value(self, id),
            None => Rgba::TRANSPARENT,
        }
    }

    pub fn font(&self, _id: ComponentId) -> Rc<dyn FontProvider> {
        self.window.font()
    }

    pub fn text(&self, id: ComponentId) -> &'w str {
        self.window.text(id).unwrap_or("")
    }

    /// The component's parent, or the root for detached components
    pub fn parent_or_root(&self, id: ComponentId) -> ComponentId {
        self.window.parent(id).unwrap_or(self.window.root())
    }

    /// The explicit target if set, else the parent, else the root
    pub fn target_or_parent(&self, id: ComponentId, target: Option<ComponentId>) -> ComponentId {
        target.unwrap_or_else(|| self.parent_or_root(id))
    }

    /// Snap a coordinate to the physical pixel grid
    pub fn round_to_real_pixels(&self, value: f32) -> f32 {
        self.window.round_to_real_pixels(value)
    }
}

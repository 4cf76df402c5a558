//! Component tree
//!
//! Components live in an arena owned by the [`Window`] and are addressed by
//! [`ComponentId`]. The child lists are the only ownership edges; parent
//! links are plain ids. Index 0 is the root, which resolves to the window
//! rectangle.

pub mod config;

pub use config::WindowConfig;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::animation::{
    field_address, AnimatingConstraints, Animatable, AnimationComponent, AnimationStrategy,
    CompleteAction, FieldAnimation, Tween,
};
use crate::constraints::{ColorConstraint, Constraint, ConstraintType, EvalContext, Rgba};
use crate::error::ConstraintError;
use crate::render::{Image, Rect, Renderer};
use crate::text::{FixedWidthFont, FontProvider, DEFAULT_LINE_HEIGHT};

/// Handle to a component in a [`Window`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Constraint sets
// ============================================================================

/// One constraint per property of a component
#[derive(Debug, Clone)]
pub struct Constraints {
    pub x: Constraint,
    pub y: Constraint,
    pub width: Constraint,
    pub height: Constraint,
    pub radius: Constraint,
    pub text_scale: Constraint,
    pub color: ColorConstraint,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            x: Constraint::pixels(0.0),
            y: Constraint::pixels(0.0),
            width: Constraint::pixels(0.0),
            height: Constraint::pixels(0.0),
            radius: Constraint::pixels(0.0),
            text_scale: Constraint::pixels(1.0),
            color: ColorConstraint::constant(Rgba::WHITE),
        }
    }
}

impl Constraints {
    /// The numeric constraint for `ty`; `None` for color and font
    pub fn get(&self, ty: ConstraintType) -> Option<&Constraint> {
        match ty {
            ConstraintType::X => Some(&self.x),
            ConstraintType::Y => Some(&self.y),
            ConstraintType::Width => Some(&self.width),
            ConstraintType::Height => Some(&self.height),
            ConstraintType::Radius => Some(&self.radius),
            ConstraintType::TextScale => Some(&self.text_scale),
            ConstraintType::Color | ConstraintType::FontProvider => None,
        }
    }

    pub fn get_mut(&mut self, ty: ConstraintType) -> Option<&mut Constraint> {
        match ty {
            ConstraintType::X => Some(&mut self.x),
            ConstraintType::Y => Some(&mut self.y),
            ConstraintType::Width => Some(&mut self.width),
            ConstraintType::Height => Some(&mut self.height),
            ConstraintType::Radius => Some(&mut self.radius),
            ConstraintType::TextScale => Some(&mut self.text_scale),
            ConstraintType::Color | ConstraintType::FontProvider => None,
        }
    }

    /// Every numeric slot with its property
    pub fn numeric(&self) -> impl Iterator<Item = (ConstraintType, &Constraint)> {
        ConstraintType::RESOLVED
            .into_iter()
            .filter_map(move |ty| self.get(ty).map(|c| (ty, c)))
    }

    /// Dirty every slot and advance animations
    pub fn animation_frame(&self) {
        for (_, constraint) in self.numeric() {
            constraint.animation_frame();
        }
        self.color.animation_frame();
    }
}

/// A component's constraints, possibly mid-animation
#[derive(Debug)]
pub enum ConstraintSet {
    Plain(Constraints),
    Animating(Box<AnimatingConstraints>),
}

impl ConstraintSet {
    pub fn current(&self) -> &Constraints {
        match self {
            ConstraintSet::Plain(constraints) => constraints,
            ConstraintSet::Animating(animating) => animating.current(),
        }
    }

    fn current_mut(&mut self) -> &mut Constraints {
        match self {
            ConstraintSet::Plain(constraints) => constraints,
            ConstraintSet::Animating(animating) => animating.current_mut(),
        }
    }
}

type AnimationHook = Rc<dyn Fn(&mut AnimatingConstraints)>;

/// A node in the component tree
pub struct Component {
    name: String,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    constraints: ConstraintSet,
    text: String,
    image: Option<Rc<Image>>,
    hidden: bool,
    last_index: Option<usize>,
    before_hide: Vec<AnimationHook>,
    after_unhide: Vec<AnimationHook>,
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("text", &self.text)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

impl Component {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            constraints: ConstraintSet::Plain(Constraints::default()),
            text: String::new(),
            image: None,
            hidden: false,
            last_index: None,
            before_hide: Vec::new(),
            after_unhide: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    pub fn constraint_set(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

// ============================================================================
// Window
// ============================================================================

/// Owner of the component tree and the per-frame animation clock
pub struct Window {
    config: WindowConfig,
    components: Vec<Component>,
    font: Rc<dyn FontProvider>,
    fields: Vec<Box<dyn FieldAnimation>>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("config", &self.config)
            .field("components", &self.components.len())
            .field("font", &self.font)
            .field("field_animations", &self.fields.len())
            .finish()
    }
}

impl Window {
    pub fn new(config: WindowConfig) -> Self {
        Self::with_font(config, Rc::new(FixedWidthFont::default()))
    }

    pub fn with_font(config: WindowConfig, font: Rc<dyn FontProvider>) -> Self {
        Self {
            config,
            components: vec![Component::new("window")],
            font,
            fields: Vec::new(),
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn root(&self) -> ComponentId {
        ComponentId(0)
    }

    pub fn font(&self) -> Rc<dyn FontProvider> {
        Rc::clone(&self.font)
    }

    pub fn set_font(&mut self, font: Rc<dyn FontProvider>) {
        self.font = font;
    }

    /// Snap to the physical pixel grid of the configured scale factor
    pub fn round_to_real_pixels(&self, value: f32) -> f32 {
        let scale = self.config.scale_factor;
        if scale <= 0.0 {
            return value;
        }
        (value * scale).round() / scale
    }

    /// Every component id, attached or not
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> {
        (0..self.components.len()).map(ComponentId)
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component, ConstraintError> {
        self.components
            .get_mut(id.0)
            .ok_or(ConstraintError::UnknownComponent(id))
    }

    fn require(&self, id: ComponentId) -> Result<&Component, ConstraintError> {
        self.component(id).ok_or(ConstraintError::UnknownComponent(id))
    }

    pub fn name(&self, id: ComponentId) -> &str {
        self.component(id).map(Component::name).unwrap_or("<unknown>")
    }

    /// First component with the given name
    pub fn find(&self, name: &str) -> Option<ComponentId> {
        self.ids().find(|&id| self.name(id) == name)
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.component(id).and_then(|c| c.parent)
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.component(id).map(Component::children).unwrap_or(&[])
    }

    /// Position among the parent's children; `None` when detached or hidden
    pub fn index_in_parent(&self, id: ComponentId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn text(&self, id: ComponentId) -> Option<&str> {
        self.component(id).map(Component::text)
    }

    pub fn is_hidden(&self, id: ComponentId) -> bool {
        self.component(id).is_some_and(Component::is_hidden)
    }

    /// All descendants of `id` in depth-first pre-order, excluding `id`
    pub fn descendants(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        let mut stack: Vec<ComponentId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    // ------------------------------------------------------------------------
    // Tree edits
    // ------------------------------------------------------------------------

    /// Create a detached component
    pub fn create(&mut self, name: impl Into<String>) -> ComponentId {
        self.components.push(Component::new(name));
        ComponentId(self.components.len() - 1)
    }

    /// Create a component and attach it as the last child of `parent`
    pub fn spawn(
        &mut self,
        parent: ComponentId,
        name: impl Into<String>,
    ) -> Result<ComponentId, ConstraintError> {
        self.require(parent)?;
        let id = self.create(name);
        self.add_child(parent, id)?;
        Ok(id)
    }

    /// Attach `child` as the last child of `parent`
    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), ConstraintError> {
        self.require(parent)?;
        let existing = self.require(child)?.parent;
        if let Some(existing) = existing {
            return Err(ConstraintError::AlreadyAttached {
                child: self.name(child).to_string(),
                parent: self.name(existing).to_string(),
            });
        }

        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return Err(ConstraintError::TreeCycle {
                    child: self.name(child).to_string(),
                    parent: self.name(parent).to_string(),
                });
            }
            ancestor = self.parent(current);
        }

        self.component_mut(child)?.parent = Some(parent);
        self.component_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach `child` from `parent`. The child keeps its constraints and
    /// subtree and can be attached elsewhere.
    pub fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), ConstraintError> {
        self.require(child)?;
        let children = &mut self.component_mut(parent)?.children;
        let before = children.len();
        children.retain(|&c| c != child);
        if children.len() != before || self.parent(child) == Some(parent) {
            let component = self.component_mut(child)?;
            component.parent = None;
            component.hidden = false;
            component.last_index = None;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Constraints
    // ------------------------------------------------------------------------

    /// The constraints currently in effect for `id`
    pub fn constraints(&self, id: ComponentId) -> Option<&Constraints> {
        self.component(id).map(|c| c.constraints.current())
    }

    pub fn constraint(&self, id: ComponentId, ty: ConstraintType) -> Option<&Constraint> {
        self.constraints(id).and_then(|c| c.get(ty))
    }

    /// Attach `constraint` to the `ty` property of `id`
    pub fn set_constraint(
        &mut self,
        id: ComponentId,
        ty: ConstraintType,
        constraint: Constraint,
    ) -> Result<(), ConstraintError> {
        constraint.check_supports(ty)?;
        let component = self.component_mut(id)?;
        match component.constraints.current_mut().get_mut(ty) {
            Some(slot) => {
                *slot = constraint;
                Ok(())
            }
            None => Err(ConstraintError::unsupported(constraint.name(), ty)),
        }
    }

    pub fn set_color(&mut self, id: ComponentId, color: ColorConstraint) -> Result<(), ConstraintError> {
        self.component_mut(id)?.constraints.current_mut().color = color;
        Ok(())
    }

    pub fn set_text(&mut self, id: ComponentId, text: impl Into<String>) -> Result<(), ConstraintError> {
        self.component_mut(id)?.text = text.into();
        Ok(())
    }

    pub fn set_image(&mut self, id: ComponentId, image: Image) -> Result<(), ConstraintError> {
        self.component_mut(id)?.image = Some(Rc::new(image));
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Resolved values
    // ------------------------------------------------------------------------

    /// Resolve one numeric property without a debugger
    pub fn evaluate(&self, id: ComponentId, ty: ConstraintType) -> f32 {
        EvalContext::new(self).get(id, ty)
    }

    pub fn left(&self, id: ComponentId) -> f32 {
        EvalContext::new(self).left(id)
    }

    pub fn top(&self, id: ComponentId) -> f32 {
        EvalContext::new(self).top(id)
    }

    pub fn right(&self, id: ComponentId) -> f32 {
        EvalContext::new(self).right(id)
    }

    pub fn bottom(&self, id: ComponentId) -> f32 {
        EvalContext::new(self).bottom(id)
    }

    pub fn width(&self, id: ComponentId) -> f32 {
        EvalContext::new(self).width(id)
    }

    pub fn height(&self, id: ComponentId) -> f32 {
        EvalContext::new(self).height(id)
    }

    pub fn radius(&self, id: ComponentId) -> f32 {
        EvalContext::new(self).radius(id)
    }

    pub fn text_scale(&self, id: ComponentId) -> f32 {
        EvalContext::new(self).text_scale(id)
    }

    pub fn color(&self, id: ComponentId) -> Rgba {
        EvalContext::new(self).color(id)
    }

    pub fn bounds(&self, id: ComponentId) -> Rect {
        let cx = EvalContext::new(self);
        Rect::new(cx.left(id), cx.top(id), cx.width(id), cx.height(id))
    }

    /// Strictly inside the component's bounds
    pub fn is_point_inside(&self, id: ComponentId, x: f32, y: f32) -> bool {
        let cx = EvalContext::new(self);
        x > cx.left(id) && x < cx.right(id) && y > cx.top(id) && y < cx.bottom(id)
    }

    /// Deepest component under the point, preferring later siblings
    pub fn hit_test(&self, x: f32, y: f32) -> ComponentId {
        let mut current = self.root();
        'descend: loop {
            for &child in self.children(current).iter().rev() {
                if self.is_point_inside(child, x, y) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    // ------------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------------

    /// Start a batch of animations from the component's current constraints
    pub fn make_animation(&self, id: ComponentId) -> Result<AnimatingConstraints, ConstraintError> {
        let component = self.require(id)?;
        Ok(AnimatingConstraints::new(
            id,
            self.config.animation_fps,
            component.constraints.current().clone(),
        ))
    }

    /// Install a batch built with [`Window::make_animation`]
    pub fn animate_to(&mut self, id: ComponentId, animation: AnimatingConstraints) -> Result<(), ConstraintError> {
        self.component_mut(id)?.constraints = ConstraintSet::Animating(Box::new(animation));
        tracing::debug!(component = %self.name(id), "animation started");
        Ok(())
    }

    /// Build and install a batch in one step
    pub fn animate(
        &mut self,
        id: ComponentId,
        build: impl FnOnce(&mut AnimatingConstraints),
    ) -> Result<(), ConstraintError> {
        let mut animation = self.make_animation(id)?;
        build(&mut animation);
        self.animate_to(id, animation)
    }

    /// Animations applied when the component is hidden without `instantly`
    pub fn animate_before_hide(
        &mut self,
        id: ComponentId,
        hook: impl Fn(&mut AnimatingConstraints) + 'static,
    ) -> Result<(), ConstraintError> {
        self.component_mut(id)?.before_hide.push(Rc::new(hook));
        Ok(())
    }

    /// Animations applied whenever the component is unhidden
    pub fn animate_after_unhide(
        &mut self,
        id: ComponentId,
        hook: impl Fn(&mut AnimatingConstraints) + 'static,
    ) -> Result<(), ConstraintError> {
        self.component_mut(id)?.after_unhide.push(Rc::new(hook));
        Ok(())
    }

    /// Remove the component from its parent's children, remembering its
    /// position. Unless `instantly`, the before-hide animations run first
    /// and removal happens when they complete.
    pub fn hide(&mut self, id: ComponentId, instantly: bool) -> Result<(), ConstraintError> {
        if instantly {
            let parent = self.require(id)?.parent;
            let index = self.index_in_parent(id);
            if let (Some(parent), Some(index)) = (parent, index) {
                self.component_mut(parent)?.children.remove(index);
            }
            let component = self.component_mut(id)?;
            if index.is_some() {
                component.last_index = index;
            }
            component.hidden = true;
            return Ok(());
        }

        let hooks = self.require(id)?.before_hide.clone();
        let mut animation = self.make_animation(id)?;
        for hook in &hooks {
            hook(&mut animation);
        }
        let previous = animation.take_on_complete();
        animation.on_complete(move |window, id| {
            if let Some(previous) = previous {
                previous(window, id);
            }
            if let Err(err) = window.hide(id, true) {
                tracing::warn!(%err, "deferred hide failed");
            }
        });
        self.animate_to(id, animation)
    }

    /// Put a hidden component back under its parent and run the after-unhide
    /// animations. With `use_last_position` it returns to its old index when
    /// that index is still in range.
    pub fn unhide(&mut self, id: ComponentId, use_last_position: bool) -> Result<(), ConstraintError> {
        let (parent, last_index, hooks) = {
            let component = self.require(id)?;
            (component.parent, component.last_index, component.after_unhide.clone())
        };
        let Some(parent) = parent else {
            return Ok(());
        };
        if self.children(parent).contains(&id) {
            return Ok(());
        }

        let children = &mut self.component_mut(parent)?.children;
        match last_index {
            Some(index) if use_last_position && index < children.len() => children.insert(index, id),
            _ => children.push(id),
        }
        self.component_mut(id)?.hidden = false;

        let mut animation = self.make_animation(id)?;
        for hook in &hooks {
            hook(&mut animation);
        }
        self.animate_to(id, animation)
    }

    /// Animate a shared value toward `target`. Any running animation of the
    /// same cell is replaced. A zero duration sets the value immediately;
    /// negative durations or delays are ignored.
    pub fn animate_field<V: Animatable>(
        &mut self,
        field: &Rc<Cell<V>>,
        strategy: impl AnimationStrategy + 'static,
        time: f32,
        target: V,
        delay: f32,
    ) {
        if time < 0.0 || delay < 0.0 {
            tracing::warn!(time, delay, "ignoring field animation with negative timing");
            return;
        }
        if time == 0.0 {
            field.set(target);
            return;
        }

        let fps = self.config.animation_fps as f32;
        let animation =
            AnimationComponent::new(strategy, (time * fps) as u32, field.get(), target, (delay * fps) as u32);
        let address = field_address(field);
        self.fields.retain(|f| f.field_address() != address);
        self.fields
            .insert(0, Box::new(Tween::new(Rc::clone(field), animation)));
    }

    /// Number of running field animations
    pub fn field_animations(&self) -> usize {
        self.fields.len()
    }

    /// Advance the clock one frame.
    ///
    /// Dirties and advances every attached constraint, collapses finished
    /// animation batches, ticks field animations, then fires completion
    /// callbacks.
    pub fn animation_frame(&mut self) {
        let attached = self.descendants(self.root());
        for &id in &attached {
            if let Some(component) = self.components.get(id.0) {
                component.constraints.current().animation_frame();
            }
        }

        let mut completed: Vec<(ComponentId, Option<CompleteAction>)> = Vec::new();
        for &id in &attached {
            let Some(component) = self.components.get_mut(id.0) else {
                continue;
            };
            let done = match &mut component.constraints {
                ConstraintSet::Animating(animating) => animating.update_completion(1),
                ConstraintSet::Plain(_) => false,
            };
            if !done {
                continue;
            }
            let placeholder = ConstraintSet::Plain(Constraints::default());
            if let ConstraintSet::Animating(animating) =
                std::mem::replace(&mut component.constraints, placeholder)
            {
                let (constraints, action) = animating.finish();
                component.constraints = ConstraintSet::Plain(constraints);
                completed.push((id, action));
            }
        }

        for field in &self.fields {
            field.advance();
        }
        self.fields.retain(|f| !f.is_complete());

        for (id, action) in completed {
            tracing::debug!(component = %self.name(id), "animation complete");
            if let Some(action) = action {
                action(self, id);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Draw every attached component, parents before children
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let cx = EvalContext::new(self);
        for id in self.descendants(self.root()) {
            let Some(component) = self.component(id) else {
                continue;
            };
            let bounds = Rect::new(cx.left(id), cx.top(id), cx.width(id), cx.height(id));
            let color = cx.color(id);
            if let Some(image) = component.image() {
                renderer.draw_image(bounds, image, color);
            } else if component.text.is_empty() {
                renderer.draw_rect(bounds, cx.radius(id), color);
            }
            if !component.text.is_empty() {
                let size = cx.text_scale(id) * DEFAULT_LINE_HEIGHT;
                renderer.draw_text(&component.text, bounds.x, bounds.y, size, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animations;
    use ConstraintType::*;

    fn window() -> Window {
        Window::new(WindowConfig::default().with_size(200.0, 100.0).with_animation_fps(60))
    }

    #[test]
    fn test_tree_edits() {
        let mut window = window();
        let root = window.root();
        let a = window.spawn(root, "a").unwrap();
        let b = window.spawn(a, "b").unwrap();

        assert_eq!(window.parent(b), Some(a));
        assert_eq!(window.descendants(root), vec![a, b]);
        assert!(matches!(
            window.add_child(b, a),
            Err(ConstraintError::AlreadyAttached { .. })
        ));

        window.remove_child(root, a).unwrap();
        assert!(matches!(window.add_child(b, a), Err(ConstraintError::TreeCycle { .. })));
        assert!(window.descendants(root).is_empty());
    }

    #[test]
    fn test_unsupported_property_is_rejected() {
        let mut window = window();
        let a = window.spawn(window.root(), "a").unwrap();
        let err = window.set_constraint(a, Width, Constraint::center()).unwrap_err();
        assert_eq!(err, ConstraintError::unsupported("CenterConstraint", Width));
    }

    #[test]
    fn test_relative_layout() {
        let mut window = window();
        let a = window.spawn(window.root(), "a").unwrap();
        window.set_constraint(a, X, Constraint::center()).unwrap();
        window.set_constraint(a, Width, Constraint::relative(0.5)).unwrap();
        window.set_constraint(a, Height, Constraint::pixels(10.0)).unwrap();

        assert_eq!(window.width(a), 100.0);
        assert_eq!(window.left(a), 50.0);
        assert_eq!(window.bottom(a), 10.0);
    }

    #[test]
    fn test_hit_test_prefers_last_child() {
        let mut window = window();
        let root = window.root();
        let a = window.spawn(root, "a").unwrap();
        let b = window.spawn(root, "b").unwrap();
        for id in [a, b] {
            window.set_constraint(id, Width, Constraint::pixels(50.0)).unwrap();
            window.set_constraint(id, Height, Constraint::pixels(50.0)).unwrap();
        }
        assert_eq!(window.hit_test(10.0, 10.0), b);
        assert_eq!(window.hit_test(150.0, 80.0), root);
    }

    #[test]
    fn test_hide_and_unhide_restore_position() {
        let mut window = window();
        let root = window.root();
        let a = window.spawn(root, "a").unwrap();
        let b = window.spawn(root, "b").unwrap();
        let c = window.spawn(root, "c").unwrap();

        window.hide(b, true).unwrap();
        assert_eq!(window.children(root), &[a, c]);
        assert!(window.is_hidden(b));
        assert_eq!(window.index_in_parent(b), None);

        window.unhide(b, true).unwrap();
        assert_eq!(window.children(root), &[a, b, c]);
    }

    #[test]
    fn test_animated_hide_waits_for_animation() {
        let mut window = window();
        let root = window.root();
        let a = window.spawn(root, "a").unwrap();
        window
            .animate_before_hide(a, |anim| {
                anim.set_width_animation(Animations::Linear, 0.5, Constraint::pixels(0.0), 0.0);
            })
            .unwrap();

        window.hide(a, false).unwrap();
        assert_eq!(window.children(root), &[a]);
        for _ in 0..29 {
            window.animation_frame();
        }
        assert_eq!(window.children(root), &[a]);
        window.animation_frame();
        assert!(window.children(root).is_empty());
    }

    #[test]
    fn test_field_animation_replaces_previous() {
        let mut window = window();
        let field = Rc::new(Cell::new(0.0f32));
        window.animate_field(&field, Animations::Linear, 1.0, 10.0, 0.0);
        window.animate_field(&field, Animations::Linear, 1.0, 20.0, 0.0);
        assert_eq!(window.field_animations(), 1);

        window.animate_field(&field, Animations::Linear, -1.0, 5.0, 0.0);
        assert_eq!(window.field_animations(), 1);

        for _ in 0..60 {
            window.animation_frame();
        }
        assert_eq!(field.get(), 20.0);
        assert_eq!(window.field_animations(), 0);

        window.animate_field(&field, Animations::Linear, 0.0, 3.0, 0.0);
        assert_eq!(field.get(), 3.0);
    }
}

//! Declared dependencies cover every read the built-in constraints perform

mod common;

use common::{window, ReadProperty};
use pretty_assertions::assert_eq;
use trellis::animation::{AnimationComponent, Animations};
use trellis::component::Window;
use trellis::constraints::{Constraint, ConstraintType::*, RoundingMode};
use trellis::resolution::{
    audit_dependencies, ConstraintResolver, ConstraintResolverV2, DependencyRecorder, UndeclaredDependency,
};

/// A tree using every built-in numeric constraint in a slot it supports
fn catalogue() -> Window {
    let mut window = window(400.0, 300.0);
    let root = window.root();

    let panel = window.spawn(root, "panel").unwrap();
    window.set_constraint(panel, X, Constraint::center()).unwrap();
    window.set_constraint(panel, Y, Constraint::pixels_aligned(10.0, true, false)).unwrap();
    window
        .set_constraint(
            panel,
            Width,
            Constraint::relative(0.5).coerce_in(Constraint::pixels(10.0), Constraint::pixels(300.0)),
        )
        .unwrap();
    window.set_constraint(panel, Height, Constraint::pixels(120.0)).unwrap();
    window.set_constraint(panel, Radius, Constraint::relative(0.1)).unwrap();

    let a = window.spawn(panel, "a").unwrap();
    window.set_constraint(a, X, Constraint::sibling(4.0)).unwrap();
    window.set_constraint(a, Y, Constraint::sibling(2.0)).unwrap();
    window.set_constraint(a, Width, Constraint::pixels(30.0)).unwrap();
    window.set_constraint(a, Height, Constraint::aspect(0.5)).unwrap();

    let b = window.spawn(panel, "b").unwrap();
    window.set_text(b, "hello").unwrap();
    window.set_constraint(b, X, Constraint::cram_sibling(3.0)).unwrap();
    window.set_constraint(b, Y, Constraint::cram_sibling(3.0)).unwrap();
    window.set_constraint(b, Width, Constraint::text_aspect()).unwrap();
    window.set_constraint(b, Height, Constraint::scaled_text(1.5)).unwrap();

    let c = window.spawn(panel, "c").unwrap();
    window.set_constraint(c, X, Constraint::sibling(2.0)).unwrap();
    window.set_constraint(c, Y, Constraint::sibling(1.0)).unwrap();
    window.set_constraint(c, Width, Constraint::fill_remaining()).unwrap();
    window.set_constraint(c, Height, Constraint::fill()).unwrap();

    let stack = window.spawn(root, "stack").unwrap();
    window.set_constraint(stack, X, Constraint::relative_window(0.1)).unwrap();
    window
        .set_constraint(stack, Y, Constraint::pixels(5.0) + Constraint::relative(0.1))
        .unwrap();
    window.set_constraint(stack, Width, Constraint::child_based_max_size()).unwrap();
    window.set_constraint(stack, Height, Constraint::child_based_size(2.0)).unwrap();
    window
        .set_constraint(stack, Radius, Constraint::pixels(3.0).scaled(2.0).rounded(RoundingMode::Floor))
        .unwrap();

    let inner = window.spawn(stack, "inner").unwrap();
    window
        .set_constraint(inner, X, Constraint::pixels_aligned(2.0, true, true) - Constraint::pixels(1.0))
        .unwrap();
    window.set_constraint(inner, Y, Constraint::sibling_opposite(1.0)).unwrap();
    window.set_constraint(inner, Width, Constraint::pixels(20.0) - Constraint::pixels(5.0)).unwrap();
    window.set_constraint(inner, Height, Constraint::pixels(20.0)).unwrap();

    let below = window.spawn(stack, "below").unwrap();
    window.set_constraint(below, Y, Constraint::sibling(1.0)).unwrap();
    window.set_constraint(below, Width, Constraint::pixels(25.0)).unwrap();
    window.set_constraint(below, Height, Constraint::pixels(8.0)).unwrap();

    let range = window.spawn(root, "range").unwrap();
    window
        .set_constraint(range, X, Constraint::pixels(1.0).max(Constraint::relative(0.1)))
        .unwrap();
    window
        .set_constraint(range, Y, Constraint::pixels(1.0).min(Constraint::center()))
        .unwrap();
    window.set_constraint(range, Width, Constraint::child_based_range()).unwrap();
    window.set_constraint(range, Height, Constraint::child_based_range()).unwrap();

    let r1 = window.spawn(range, "r1").unwrap();
    window.set_constraint(r1, X, Constraint::pixels(5.0)).unwrap();
    window.set_constraint(r1, Width, Constraint::pixels(10.0)).unwrap();
    window.set_constraint(r1, Height, Constraint::pixels(10.0)).unwrap();
    let r2 = window.spawn(range, "r2").unwrap();
    window.set_constraint(r2, X, Constraint::pixels(20.0)).unwrap();
    window.set_constraint(r2, Y, Constraint::pixels(15.0)).unwrap();

    let moving = window.spawn(root, "moving").unwrap();
    window
        .set_constraint(
            moving,
            Width,
            Constraint::animated(AnimationComponent::new(
                Animations::InOutCubic,
                10,
                Constraint::pixels(10.0),
                Constraint::relative(0.5),
                2,
            )),
        )
        .unwrap();
    window
        .set_constraint(
            moving,
            Height,
            Constraint::relative(0.2)
                .coerce_at_most(Constraint::pixels(40.0))
                .coerce_at_least(Constraint::aspect(0.1)),
        )
        .unwrap();
    window
        .set_constraint(moving, X, Constraint::custom(ReadProperty::new(panel, Width)))
        .unwrap();

    window
}

#[test]
fn test_every_builtin_declares_its_reads() {
    let window = catalogue();
    let missing = audit_dependencies(&window);
    let described: Vec<String> = missing.iter().map(|m| m.describe(&window)).collect();
    assert_eq!(described, Vec::<String>::new());
}

#[test]
fn test_catalogue_is_acyclic() {
    let window = catalogue();
    assert!(ConstraintResolver::new(&window).unwrap().cyclic_nodes().is_none());
    assert!(ConstraintResolverV2::new(&window).cycles().is_empty());
}

#[test]
fn test_audit_holds_after_frames() {
    let mut window = catalogue();
    for _ in 0..5 {
        window.animation_frame();
    }
    assert!(audit_dependencies(&window).is_empty());
}

#[test]
fn test_recorder_sees_sibling_reads() {
    let mut window = window(400.0, 300.0);
    let root = window.root();
    let a = window.spawn(root, "a").unwrap();
    let b = window.spawn(root, "b").unwrap();
    window.set_constraint(a, Width, Constraint::pixels(30.0)).unwrap();
    window.set_constraint(b, X, Constraint::sibling(4.0)).unwrap();

    let recorder = DependencyRecorder::new();
    {
        let cx = trellis::constraints::EvalContext::with_debugger(&window, &recorder);
        assert_eq!(cx.left(b), 34.0);
    }
    let reads = recorder.reads();
    assert!(reads.contains(&((b, X), (a, X))));
    assert!(reads.contains(&((b, X), (a, Width))));
}

/// Reads the window's width without declaring anything
#[derive(Debug)]
struct Forgetful {
    other: trellis::ComponentId,
}

impl trellis::constraints::CustomConstraint for Forgetful {
    fn name(&self) -> &str {
        "Forgetful"
    }

    fn supports(&self, _ty: trellis::ConstraintType) -> bool {
        true
    }

    fn evaluate(
        &self,
        cx: &trellis::constraints::EvalContext<'_>,
        _component: trellis::ComponentId,
        _ty: trellis::ConstraintType,
    ) -> f32 {
        cx.height(self.other) / 2.0
    }

    fn visit(&self, _visitor: &mut trellis::constraints::ConstraintVisitor<'_>, _ty: trellis::ConstraintType) {}
}

#[test]
fn test_forgetful_custom_is_reported_in_catalogue() {
    let mut window = catalogue();
    let panel = window.find("panel").unwrap();
    let extra = window.spawn(window.root(), "extra").unwrap();
    window
        .set_constraint(extra, Height, Constraint::custom(Forgetful { other: panel }))
        .unwrap();

    assert_eq!(
        audit_dependencies(&window),
        vec![UndeclaredDependency {
            reader: (extra, Height),
            read: (panel, Height),
        }]
    );
}

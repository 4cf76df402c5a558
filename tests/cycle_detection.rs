//! Static and dynamic cycle detection over whole component trees

mod common;

use common::{spawn_all, window, ReadProperty};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use trellis::component::ComponentId;
use trellis::constraints::Constraint;
use trellis::constraints::ConstraintType::{self, *};
use trellis::resolution::{
    describe_cycles, ConstraintResolver, ConstraintResolverV2, DirectedAcyclicGraph, GraphError,
    ResolverNode,
};

fn properties(cycle: &[ResolverNode]) -> Vec<(ComponentId, ConstraintType)> {
    cycle.iter().map(|n| (n.component(), n.ty())).collect()
}

/// Rotate so the cycle starts at `first`, making comparisons order-stable
fn rotated(mut cycle: Vec<(ComponentId, ConstraintType)>, first: (ComponentId, ConstraintType)) -> Vec<(ComponentId, ConstraintType)> {
    if let Some(start) = cycle.iter().position(|p| *p == first) {
        cycle.rotate_left(start);
    }
    cycle
}

#[test]
fn test_three_component_cycle_found_statically() {
    let mut window = window(400.0, 300.0);
    let [a, b, c] = spawn_all(&mut window, ["a", "b", "c"]);
    window.set_constraint(a, X, Constraint::custom(ReadProperty::new(b, Width))).unwrap();
    window.set_constraint(b, Width, Constraint::custom(ReadProperty::new(c, Height))).unwrap();
    window.set_constraint(c, Height, Constraint::custom(ReadProperty::new(a, X))).unwrap();

    let resolver = ConstraintResolver::new(&window).unwrap();
    let cycle = resolver.cyclic_nodes().expect("cycle");
    assert_eq!(
        rotated(properties(&cycle), (a, X)),
        vec![(a, X), (b, Width), (c, Height)]
    );
}

#[test]
fn test_three_component_cycle_found_dynamically() {
    let mut window = window(400.0, 300.0);
    let [a, b, c] = spawn_all(&mut window, ["a", "b", "c"]);
    window.set_constraint(a, X, Constraint::custom(ReadProperty::new(b, Width))).unwrap();
    window.set_constraint(b, Width, Constraint::custom(ReadProperty::new(c, Height))).unwrap();
    window.set_constraint(c, Height, Constraint::custom(ReadProperty::new(a, X))).unwrap();

    let cycles = ConstraintResolverV2::new(&window).cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(
        rotated(properties(&cycles[0]), (a, X)),
        vec![(a, X), (b, Width), (c, Height)]
    );
}

#[test]
fn test_chain_ending_at_root_has_no_cycle() {
    let mut window = window(400.0, 300.0);
    let [a, b, c] = spawn_all(&mut window, ["a", "b", "c"]);
    window.set_constraint(a, X, Constraint::custom(ReadProperty::new(b, Width))).unwrap();
    window.set_constraint(b, Width, Constraint::custom(ReadProperty::new(c, Height))).unwrap();
    window.set_constraint(c, Height, Constraint::relative(0.5)).unwrap();

    assert_eq!(ConstraintResolver::new(&window).unwrap().cyclic_nodes(), None);
    assert!(ConstraintResolverV2::new(&window).cycles().is_empty());
    // c.height = 150, b.width = 151, a.x = 152
    assert_eq!(window.left(a), 152.0);
}

#[test]
fn test_sibling_chain_is_acyclic() {
    let mut window = window(400.0, 300.0);
    let [a, b, c] = spawn_all(&mut window, ["a", "b", "c"]);
    for id in [a, b, c] {
        window.set_constraint(id, X, Constraint::sibling(5.0)).unwrap();
        window.set_constraint(id, Width, Constraint::pixels(20.0)).unwrap();
        window.set_constraint(id, Height, Constraint::aspect(1.0)).unwrap();
    }

    assert_eq!(ConstraintResolver::new(&window).unwrap().cyclic_nodes(), None);
    assert!(ConstraintResolverV2::new(&window).cycles().is_empty());
    assert_eq!(window.left(c), 50.0);
}

#[test]
fn test_center_inside_child_based_parent_is_a_cycle() {
    let mut window = window(400.0, 300.0);
    let [parent] = spawn_all(&mut window, ["parent"]);
    let child = window.spawn(parent, "child").unwrap();
    window.set_constraint(parent, Width, Constraint::child_based_size(0.0)).unwrap();
    window.set_constraint(child, Width, Constraint::fill()).unwrap();

    let cycle = ConstraintResolver::new(&window).unwrap().cyclic_nodes().expect("cycle");
    let props = properties(&cycle);
    assert!(props.contains(&(parent, Width)));
    assert!(props.contains(&(child, Width)));
}

#[test]
fn test_cycle_report_snapshot() {
    let mut window = window(400.0, 300.0);
    let [header, body] = spawn_all(&mut window, ["header", "body"]);
    window
        .set_constraint(header, Height, Constraint::custom(ReadProperty::new(body, Height)))
        .unwrap();
    window
        .set_constraint(body, Height, Constraint::custom(ReadProperty::new(header, Height)))
        .unwrap();

    let cycles = ConstraintResolverV2::new(&window).cycles();
    assert_snapshot!(describe_cycles(&window, &cycles), @"cycle 1: 'header' Height (ReadProperty) -> 'body' Height (ReadProperty) -> 'header' Height (ReadProperty)");
}

#[test]
fn test_graph_rejects_misuse() {
    let mut graph = DirectedAcyclicGraph::new();
    graph.add_vertices(["a", "b"]).unwrap();
    assert!(matches!(graph.add_edge(&"a", &"a"), Err(GraphError::SelfLoop(_))));
    assert!(matches!(graph.add_edge(&"a", &"z"), Err(GraphError::UnknownVertex(_))));
    graph.add_edge(&"a", &"b").unwrap();
    assert!(matches!(graph.add_vertex("c"), Err(GraphError::VertexAfterEdge(_))));
}

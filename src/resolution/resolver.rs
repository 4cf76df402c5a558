//! Static cycle detection from declared dependencies

use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::{debug, warn};

use super::graph::{DirectedAcyclicGraph, GraphError};
use crate::component::{ComponentId, Window};
use crate::constraints::{Constraint, ConstraintType, ConstraintVisitor};

/// One property of one component, together with the constraint computing it.
///
/// Identity is the triple `(component, constraint instance, property)`.
#[derive(Clone)]
pub struct ResolverNode {
    component: ComponentId,
    constraint: Constraint,
    ty: ConstraintType,
}

impl ResolverNode {
    pub fn new(component: ComponentId, constraint: Constraint, ty: ConstraintType) -> Self {
        Self {
            component,
            constraint,
            ty,
        }
    }

    /// The node for whatever constraint currently sits in `component`'s `ty` slot
    pub fn for_slot(window: &Window, component: ComponentId, ty: ConstraintType) -> Option<Self> {
        window
            .constraint(component, ty)
            .map(|constraint| Self::new(component, constraint.clone(), ty))
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn ty(&self) -> ConstraintType {
        self.ty
    }

    /// `'name' Property (ConstraintName)`
    pub fn describe(&self, window: &Window) -> String {
        format!(
            "'{}' {} ({})",
            window.name(self.component),
            self.ty,
            self.constraint.display_name()
        )
    }
}

impl PartialEq for ResolverNode {
    fn eq(&self, other: &Self) -> bool {
        self.component == other.component
            && self.ty == other.ty
            && self.constraint.id() == other.constraint.id()
    }
}

impl Eq for ResolverNode {}

impl Hash for ResolverNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.component.hash(state);
        self.constraint.id().hash(state);
        self.ty.hash(state);
    }
}

impl fmt::Debug for ResolverNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.component, self.ty, self.constraint.display_name())
    }
}

/// Builds the dependency graph of a subtree from each constraint's
/// declared reads and searches it for cycles.
///
/// Only as accurate as the declarations; see
/// [`ConstraintResolverV2`](super::ConstraintResolverV2) for the runtime view.
#[derive(Debug)]
pub struct ConstraintResolver<'w> {
    window: &'w Window,
    graph: DirectedAcyclicGraph<ResolverNode>,
    self_cycle: Option<ResolverNode>,
}

impl<'w> ConstraintResolver<'w> {
    /// Resolver over every component in the window
    pub fn new(window: &'w Window) -> Result<Self, GraphError> {
        Self::for_subtree(window, window.root())
    }

    /// Resolver over the descendants of `root`
    pub fn for_subtree(window: &'w Window, root: ComponentId) -> Result<Self, GraphError> {
        let components = window.descendants(root);

        let mut graph = DirectedAcyclicGraph::new();
        for &component in &components {
            for ty in ConstraintType::RESOLVED {
                if let Some(node) = ResolverNode::for_slot(window, component, ty) {
                    graph.add_vertex(node)?;
                }
            }
        }

        let mut self_cycle = None;
        let mut edges = Vec::new();
        for &component in &components {
            for ty in ConstraintType::RESOLVED {
                let Some(from) = ResolverNode::for_slot(window, component, ty) else {
                    continue;
                };
                for (dep_component, dep_ty) in ConstraintVisitor::collect(window, component, ty) {
                    let Some(to) = ResolverNode::for_slot(window, dep_component, dep_ty) else {
                        continue;
                    };
                    if to == from {
                        self_cycle.get_or_insert_with(|| from.clone());
                    } else if graph.contains(&to) {
                        edges.push((from.clone(), to));
                    } else {
                        warn!(
                            from = %from.describe(window),
                            to = %to.describe(window),
                            "dependency outside the resolved subtree, skipping"
                        );
                    }
                }
            }
        }
        for (from, to) in &edges {
            graph.add_edge(from, to)?;
        }

        debug!(
            vertices = graph.vertices().len(),
            edges = graph.edge_count(),
            "built constraint dependency graph"
        );

        Ok(Self {
            window,
            graph,
            self_cycle,
        })
    }

    pub fn window(&self) -> &'w Window {
        self.window
    }

    pub fn graph(&self) -> &DirectedAcyclicGraph<ResolverNode> {
        &self.graph
    }

    /// The first cycle found, or `None` when the declared dependencies are
    /// acyclic. A property that reads itself is reported as a cycle of one.
    pub fn cyclic_nodes(&self) -> Option<Vec<ResolverNode>> {
        if let Some(node) = &self.self_cycle {
            return Some(vec![node.clone()]);
        }
        self.graph.cyclic_loop()
    }
}

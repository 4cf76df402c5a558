//! Dependency graphs and cycle detection over the component tree.
//!
//! Two detectors are provided. [`ConstraintResolver`] builds a graph from
//! the dependencies constraints declare through their `visit` hooks.
//! [`ConstraintResolverV2`] traces actual evaluation and also catches reads
//! a constraint forgot to declare. [`audit_dependencies`] reports exactly
//! those forgotten reads.

mod audit;
mod diagnostics;
mod graph;
mod resolver;
mod resolver_v2;

pub use audit::{audit_dependencies, DependencyRecorder, UndeclaredDependency};
pub use diagnostics::{describe_cycle, describe_cycles};
pub use graph::{DirectedAcyclicGraph, GraphError};
pub use resolver::{ConstraintResolver, ResolverNode};
pub use resolver_v2::{ConstraintResolverV2, CycleSearchingDebugger};

//! Human-readable cycle reports

use super::resolver::ResolverNode;
use crate::component::Window;

/// Render a cycle as `A -> B -> ... -> A`
pub fn describe_cycle(window: &Window, cycle: &[ResolverNode]) -> String {
    let Some(first) = cycle.first() else {
        return String::new();
    };
    cycle
        .iter()
        .chain(std::iter::once(first))
        .map(|node| node.describe(window))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Multi-line report listing every cycle, numbered from 1
pub fn describe_cycles(window: &Window, cycles: &[Vec<ResolverNode>]) -> String {
    if cycles.is_empty() {
        return "no cycles found".to_string();
    }
    cycles
        .iter()
        .enumerate()
        .map(|(i, cycle)| format!("cycle {}: {}", i + 1, describe_cycle(window, cycle)))
        .collect::<Vec<_>>()
        .join("\n")
}

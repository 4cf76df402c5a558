//! Directed graph over a fixed vertex set, with cycle search

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

/// Misuse of the graph construction API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("cannot add vertex {0} after an edge has been added")]
    VertexAfterEdge(String),

    #[error("vertex {0} was already added")]
    DuplicateVertex(String),

    #[error("{0} is not a vertex")]
    UnknownVertex(String),

    #[error("cannot add an edge between {0} and itself")]
    SelfLoop(String),
}

/// Square bit matrix, one row per source vertex
#[derive(Debug, Clone, Default)]
struct AdjacencyMatrix {
    size: usize,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl AdjacencyMatrix {
    fn new(size: usize) -> Self {
        let words_per_row = size.div_ceil(64);
        Self {
            size,
            words_per_row,
            bits: vec![0; size * words_per_row],
        }
    }

    fn set(&mut self, from: usize, to: usize) {
        self.bits[from * self.words_per_row + to / 64] |= 1 << (to % 64);
    }

    fn get(&self, from: usize, to: usize) -> bool {
        self.bits[from * self.words_per_row + to / 64] & (1 << (to % 64)) != 0
    }

    /// First target of `from` at or after `start`
    fn next_edge(&self, from: usize, start: usize) -> Option<usize> {
        (start..self.size).find(|&to| self.get(from, to))
    }
}

/// Graph whose vertices are all declared before the first edge.
///
/// Despite the name, cycles are allowed; finding them is the point.
#[derive(Debug, Clone)]
pub struct DirectedAcyclicGraph<T> {
    vertices: Vec<T>,
    index: HashMap<T, usize>,
    edges: Option<AdjacencyMatrix>,
}

impl<T> Default for DirectedAcyclicGraph<T> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
            edges: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl<T: Clone + Eq + Hash + Debug> DirectedAcyclicGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: T) -> Result<&mut Self, GraphError> {
        if self.edges.is_some() {
            return Err(GraphError::VertexAfterEdge(format!("{vertex:?}")));
        }
        if self.index.contains_key(&vertex) {
            return Err(GraphError::DuplicateVertex(format!("{vertex:?}")));
        }
        self.index.insert(vertex.clone(), self.vertices.len());
        self.vertices.push(vertex);
        Ok(self)
    }

    pub fn add_vertices(&mut self, vertices: impl IntoIterator<Item = T>) -> Result<&mut Self, GraphError> {
        for vertex in vertices {
            self.add_vertex(vertex)?;
        }
        Ok(self)
    }

    /// Add an edge `from -> to`. Freezes the vertex set.
    pub fn add_edge(&mut self, from: &T, to: &T) -> Result<&mut Self, GraphError> {
        let size = self.vertices.len();
        let edges = self.edges.get_or_insert_with(|| AdjacencyMatrix::new(size));
        if from == to {
            return Err(GraphError::SelfLoop(format!("{from:?}")));
        }
        let from_index = *self
            .index
            .get(from)
            .ok_or_else(|| GraphError::UnknownVertex(format!("{from:?}")))?;
        let to_index = *self
            .index
            .get(to)
            .ok_or_else(|| GraphError::UnknownVertex(format!("{to:?}")))?;
        edges.set(from_index, to_index);
        Ok(self)
    }

    pub fn add_edges<'a>(
        &mut self,
        edges: impl IntoIterator<Item = (&'a T, &'a T)>,
    ) -> Result<&mut Self, GraphError>
    where
        T: 'a,
    {
        for (from, to) in edges {
            self.add_edge(from, to)?;
        }
        Ok(self)
    }

    pub fn vertices(&self) -> &[T] {
        &self.vertices
    }

    pub fn contains(&self, vertex: &T) -> bool {
        self.index.contains_key(vertex)
    }

    pub fn has_edge(&self, from: &T, to: &T) -> bool {
        match (&self.edges, self.index.get(from), self.index.get(to)) {
            (Some(edges), Some(&from), Some(&to)) => edges.get(from, to),
            _ => false,
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges
            .as_ref()
            .map_or(0, |edges| edges.bits.iter().map(|word| word.count_ones() as usize).sum())
    }

    /// Depth-first search with in-progress and done marks. Returns the
    /// first cycle found, in edge order, starting at the vertex the search
    /// ran back into. `None` when the graph is acyclic.
    pub fn cyclic_loop(&self) -> Option<Vec<T>> {
        let edges = self.edges.as_ref()?;
        let mut marks = vec![Mark::Unvisited; self.vertices.len()];

        for start in 0..self.vertices.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::InProgress;
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

            while let Some(&(vertex, cursor)) = stack.last() {
                let Some(target) = edges.next_edge(vertex, cursor) else {
                    marks[vertex] = Mark::Done;
                    stack.pop();
                    continue;
                };
                if let Some(top) = stack.last_mut() {
                    top.1 = target + 1;
                }

                match marks[target] {
                    Mark::Done => {}
                    Mark::InProgress => {
                        let from = stack.iter().position(|&(v, _)| v == target).unwrap_or(0);
                        return Some(
                            stack[from..]
                                .iter()
                                .map(|&(v, _)| self.vertices[v].clone())
                                .collect(),
                        );
                    }
                    Mark::Unvisited => {
                        marks[target] = Mark::InProgress;
                        stack.push((target, 0));
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn graph(vertices: &[&'static str]) -> DirectedAcyclicGraph<&'static str> {
        let mut graph = DirectedAcyclicGraph::new();
        graph.add_vertices(vertices.iter().copied()).unwrap();
        graph
    }

    #[test]
    fn test_finds_three_cycle() {
        let mut graph = graph(&["root", "a", "b", "c"]);
        graph
            .add_edges([(&"a", &"b"), (&"b", &"c"), (&"c", &"a"), (&"c", &"root")])
            .unwrap();
        assert_eq!(graph.cyclic_loop(), Some(vec!["a", "b", "c"]));
    }

    #[test]
    fn test_chain_is_acyclic() {
        let mut graph = graph(&["root", "a", "b", "c"]);
        graph
            .add_edges([(&"a", &"b"), (&"b", &"c"), (&"c", &"root")])
            .unwrap();
        assert_eq!(graph.cyclic_loop(), None);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_cycle_reached_from_acyclic_prefix() {
        let mut graph = graph(&["start", "x", "y"]);
        graph
            .add_edges([(&"start", &"x"), (&"x", &"y"), (&"y", &"x")])
            .unwrap();
        assert_eq!(graph.cyclic_loop(), Some(vec!["x", "y"]));
    }

    #[test]
    fn test_misuse_is_rejected() {
        let mut graph = graph(&["a", "b"]);
        assert_eq!(
            graph.add_vertex("a").err(),
            Some(GraphError::DuplicateVertex("\"a\"".to_string()))
        );
        assert!(matches!(graph.add_edge(&"a", &"a"), Err(GraphError::SelfLoop(_))));
        assert!(matches!(graph.add_edge(&"a", &"z"), Err(GraphError::UnknownVertex(_))));
        assert!(matches!(graph.add_vertex("c"), Err(GraphError::VertexAfterEdge(_))));
    }

    #[test]
    fn test_wide_graph() {
        let names: Vec<String> = (0..130).map(|i| format!("v{i}")).collect();
        let mut graph = DirectedAcyclicGraph::new();
        graph.add_vertices(names.iter().cloned()).unwrap();
        for pair in names.windows(2) {
            graph.add_edge(&pair[0], &pair[1]).unwrap();
        }
        assert_eq!(graph.cyclic_loop(), None);
        graph.add_edge(&names[129], &names[64]).unwrap();
        assert_eq!(graph.cyclic_loop().map(|c| c.len()), Some(66));
    }
}

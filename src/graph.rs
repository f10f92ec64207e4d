/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{HashSet, VecDeque};
use std::fmt;
use petgraph::dot::{Config, Dot};
use petgraph::graphmap::{NodeTrait, UnGraphMap};
use crate::{algorithms, Error, Matching};

/// A vertex identity. Any copyable, ordered, hashable value qualifies; the
/// ordering carries no meaning beyond providing a deterministic enumeration
/// order.
pub trait Vertex: NodeTrait + fmt::Debug {}

impl<T: NodeTrait + fmt::Debug> Vertex for T {}

/// A simple undirected graph, the substrate for matching computations.
///
/// Storage and traversal are delegated to a `petgraph` adjacency map by
/// composition; the matching algorithms only consume the minimal surface
/// exposed here (vertex/edge iteration, adjacency lookup, insertion).
#[derive(Clone, Debug)]
pub struct Graph<V: Vertex> {
    inner: UnGraphMap<V, ()>,
}

impl<V: Vertex> Graph<V> {
    /// Construct an empty graph.
    pub fn new() -> Self {
        Self { inner: UnGraphMap::new() }
    }

    /// Construct a graph from a flat sequence of vertices interpreted
    /// pairwise as edges: `[1,2, 1,3]` yields edges `(1,2)` and `(1,3)`.
    pub fn from_flat(vertices: &[V]) -> Self {
        assert!(vertices.len() % 2 == 0, "expected an even number of vertices");
        let mut graph = Self::new();
        for pair in vertices.chunks(2) {
            graph.add_edge(pair[0], pair[1]);
        }
        graph
    }

    /// Construct a graph from a list of edges given as vertex pairs.
    pub fn from_edges(edges: &[(V, V)]) -> Self {
        let mut graph = Self::new();
        for &(a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Add a single vertex. Adding a vertex twice has no effect.
    pub fn add_vertex(&mut self, vertex: V) {
        self.inner.add_node(vertex);
    }

    /// Add an edge between two vertices, inserting either endpoint if it is
    /// not yet present. Duplicate edges collapse; self-loops are rejected.
    pub fn add_edge(&mut self, a: V, b: V) {
        assert!(a != b, "graph must be simple, rejecting self-loop at {a:?}");
        self.inner.add_edge(a, b, ());
    }

    /// Number of vertices in the graph.
    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// All vertices in sorted order.
    pub fn vertices(&self) -> Vec<V> {
        let mut vertices: Vec<_> = self.inner.nodes().collect();
        vertices.sort_unstable();
        vertices
    }

    /// Iterate over the edges of the graph.
    pub fn edges(&self) -> impl Iterator<Item = (V, V)> + '_ {
        self.inner.all_edges().map(|(a, b, _)| (a, b))
    }

    /// The neighbors of a vertex in sorted order. This is the deterministic
    /// adjacency enumeration order used by the matching algorithms.
    pub fn neighbors(&self, vertex: V) -> Vec<V> {
        let mut neighbors: Vec<_> = self.inner.neighbors(vertex).collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// Whether every vertex is reachable from every other vertex. Graphs
    /// with zero or one vertices are trivially connected.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.inner.nodes().next() else {
            return true;
        };

        // Plain breadth-first traversal from an arbitrary vertex
        let mut seen = HashSet::from([start]);
        let mut frontier = VecDeque::from([start]);
        while let Some(vertex) = frontier.pop_front() {
            for neighbor in self.inner.neighbors(vertex) {
                if seen.insert(neighbor) {
                    frontier.push_back(neighbor);
                }
            }
        }

        seen.len() == self.inner.node_count()
    }

    /// Greedily construct an inclusion-maximal matching: no further edge of
    /// the graph can be added to it, but it is not necessarily a largest one.
    pub fn maximal_matching(&self) -> Matching<V> {
        algorithms::maximal_matching(self)
    }

    /// Compute a maximum cardinality matching, i.e. one with the greatest
    /// possible number of edges over all matchings of this graph.
    ///
    /// Fails with [`Error::DisconnectedGraph`] if the graph is not
    /// connected.
    pub fn maximum_cardinality_matching(&self) -> Result<Matching<V>, Error<V>> {
        algorithms::maximum_cardinality_matching(self)
    }

    /// Run a single stage of the maximum cardinality matching search: search
    /// for one augmenting path relative to `matching` and apply it.
    ///
    /// With `root: Some(v)` the search is rooted at the single exposed
    /// vertex `v`; with `None` it runs from all currently exposed vertices
    /// simultaneously. The result has either the size of `matching` (no
    /// augmenting path exists from the searched roots) or that size plus
    /// one.
    pub fn mcm_stage(&self, matching: &Matching<V>, root: Option<V>) -> Matching<V> {
        algorithms::mcm_stage(self, matching, root)
    }

    /// Serialize the graph to the
    /// [Graphviz DOT format](https://graphviz.org/doc/info/lang.html).
    pub fn to_dot(&self) -> String {
        format!("{:?}", Dot::with_config(&self.inner, &[Config::EdgeNoLabel]))
    }
}

impl<V: Vertex> Default for Graph<V> {
    fn default() -> Self {
        Self::new()
    }
}

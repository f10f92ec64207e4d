/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{HashMap, VecDeque};
use log::{debug, trace};
use crate::graph::Vertex;
use crate::{Error, Graph, Matching};

use super::maximal::maximal_matching;

/// Per-stage tag of a vertex in the alternating forest. An even vertex is
/// reachable from its tree root by an alternating path of even length, an
/// odd vertex by one of odd length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Label {
    Unlabeled,
    Even,
    Odd,
}

/// Compute a maximum cardinality matching of the given graph.
///
/// Starting from a greedy maximal matching, every stage searches for an
/// augmenting path from all exposed vertices at once and applies it. The
/// first stage that cannot grow the matching proves it maximum, since a
/// matching is maximum exactly when no augmenting path exists.
///
/// Fails with [`Error::DisconnectedGraph`] before any search begins if the
/// graph is not connected.
pub fn maximum_cardinality_matching<V: Vertex>(graph: &Graph<V>) -> Result<Matching<V>, Error<V>> {
    if !graph.is_connected() {
        return Err(Error::DisconnectedGraph);
    }

    let mut matching = maximal_matching(graph);
    debug!("starting from a maximal matching of size {}", matching.len());

    loop {
        let augmented = mcm_stage(graph, &matching, None);
        if augmented.len() == matching.len() {
            debug!("fixed point reached, matching of size {} is maximum", matching.len());
            return Ok(matching);
        }
        matching = augmented;
    }
}

/// Run a single stage of the maximum cardinality matching search.
///
/// A stage searches the graph for one augmenting path relative to
/// `matching`, contracting blossoms as they are discovered, and applies the
/// path if it finds one. The result is either one edge larger than
/// `matching` or identical to it; the latter proves that no augmenting path
/// exists from the searched roots.
///
/// With `root: Some(v)` the search is rooted at the single exposed vertex
/// `v` (a covered root trivially yields no augmenting path and returns the
/// matching unchanged). With `None` every exposed vertex roots its own tree
/// and the search runs over the whole forest at once.
pub fn mcm_stage<V: Vertex>(graph: &Graph<V>, matching: &Matching<V>, root: Option<V>) -> Matching<V> {
    let mut stage = Stage::new(graph, matching);

    let roots = match root {
        Some(vertex) => {
            let root = stage.index_of(vertex);
            if stage.mate[root].is_some() {
                trace!("root {vertex:?} is already matched, nothing to augment");
                return matching.clone();
            }
            vec![root]
        }
        None => stage.exposed(),
    };

    if stage.search(&roots) {
        stage.into_matching()
    } else {
        matching.clone()
    }
}

/// The mutable context of one search stage: the alternating forest, the
/// blossom base table and the working copy of the matching. A fresh `Stage`
/// is created per call and consumed on return, so stages never share state.
///
/// The graph is snapshot into dense indices up front (vertices and
/// adjacency lists in sorted order) and all bookkeeping below is in terms
/// of those indices. Contracting a blossom never touches the snapshot; it
/// only redirects the `base` table, and nested blossoms simply redirect
/// again.
struct Stage<V> {
    /// Dense index to vertex, in sorted order.
    vertices: Vec<V>,
    /// Sorted adjacency lists over dense indices.
    adjacency: Vec<Vec<usize>>,
    /// Working copy of the matching as a mate table.
    mate: Vec<Option<usize>>,
    label: Vec<Label>,
    /// For a non-root labeled vertex, the neighbor through which it was
    /// labeled. Contraction re-aims these pointers around the blossom cycle
    /// so that augmentation can route through it by plain chain-walking.
    parent: Vec<Option<usize>>,
    /// Blossom redirection table: `base[v]` is the base vertex standing in
    /// for `v` after contraction, or `v` itself outside any blossom.
    base: Vec<usize>,
    /// Tree root of every labeled vertex.
    root: Vec<usize>,
    /// Unprocessed even vertices.
    frontier: VecDeque<usize>,
}

impl<V: Vertex> Stage<V> {
    fn new(graph: &Graph<V>, matching: &Matching<V>) -> Self {
        let vertices = graph.vertices();
        let index: HashMap<V, usize> = vertices
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i))
            .collect();

        let adjacency = vertices
            .iter()
            .map(|&v| graph.neighbors(v).into_iter().map(|w| index[&w]).collect())
            .collect();

        let mut mate = vec![None; vertices.len()];
        for &(a, b) in matching.iter() {
            let (a, b) = (
                *index.get(&a).expect("matching covers a vertex that is not in the graph"),
                *index.get(&b).expect("matching covers a vertex that is not in the graph"),
            );
            mate[a] = Some(b);
            mate[b] = Some(a);
        }

        let count = vertices.len();
        Self {
            vertices,
            adjacency,
            mate,
            label: vec![Label::Unlabeled; count],
            parent: vec![None; count],
            base: (0..count).collect(),
            root: (0..count).collect(),
            frontier: VecDeque::new(),
        }
    }

    fn index_of(&self, vertex: V) -> usize {
        self.vertices
            .binary_search(&vertex)
            .expect("root vertex is not in the graph")
    }

    /// All exposed vertices, in sorted order.
    fn exposed(&self) -> Vec<usize> {
        (0..self.vertices.len())
            .filter(|&v| self.mate[v].is_none())
            .collect()
    }

    /// Search for a single augmenting path from the given roots and apply
    /// it to the mate table. Returns whether the matching was augmented.
    fn search(&mut self, roots: &[usize]) -> bool {
        for &root in roots {
            self.label[root] = Label::Even;
            self.frontier.push_back(root);
        }
        trace!("searching from {} root(s)", roots.len());

        while let Some(v) = self.frontier.pop_front() {
            for i in 0..self.adjacency[v].len() {
                let w = self.adjacency[v][i];

                // Edges internal to a blossom and the edge to the own mate
                // never extend the forest
                if self.base[v] == self.base[w] || self.mate[v] == Some(w) {
                    continue;
                }

                match self.label[w] {
                    Label::Even if self.root[v] == self.root[w] => {
                        // Two even vertices of the same tree close an odd
                        // cycle through their common ancestor
                        self.contract(v, w);
                    }
                    Label::Even => {
                        // Two even vertices of different trees are joined by
                        // an augmenting path between the two roots
                        self.augment(v, w);
                        return true;
                    }
                    Label::Unlabeled => match self.mate[w] {
                        Some(x) => {
                            // The tree grows by the matched pair (w, x)
                            trace!(
                                "labeling {:?} odd and {:?} even",
                                self.vertices[w],
                                self.vertices[x]
                            );
                            self.label[w] = Label::Odd;
                            self.parent[w] = Some(v);
                            self.root[w] = self.root[v];
                            self.label[x] = Label::Even;
                            self.root[x] = self.root[v];
                            self.frontier.push_back(x);
                        }
                        None => {
                            // An exposed vertex outside the forest ends an
                            // augmenting path (only reachable when searching
                            // from a single root)
                            self.augment(v, w);
                            return true;
                        }
                    },
                    Label::Odd => {}
                }
            }
        }

        false
    }

    /// Contract the blossom closed by the edge `(v, w)`: redirect the bases
    /// of the whole cycle to the nearest common ancestor of `v` and `w`,
    /// relabel the absorbed odd vertices even and re-aim parent pointers
    /// around the cycle so later augmentation can pass through it.
    fn contract(&mut self, v: usize, w: usize) {
        let base = self.common_ancestor(v, w);
        let mut in_blossom = vec![false; self.vertices.len()];

        self.mark_cycle(v, base, w, &mut in_blossom);
        self.mark_cycle(w, base, v, &mut in_blossom);

        let mut members = Vec::new();
        for u in 0..self.vertices.len() {
            if in_blossom[self.base[u]] {
                members.push(self.vertices[u]);
                self.base[u] = base;
                if self.label[u] != Label::Even {
                    self.label[u] = Label::Even;
                    self.frontier.push_back(u);
                }
            }
        }

        debug!(
            "contracted blossom with base {:?} absorbing {members:?}",
            self.vertices[base]
        );
    }

    /// Walk the tree path from `v` down to the blossom base, marking the
    /// bases on it and re-aiming the parent pointer of every even vertex on
    /// the path at `child`, its cycle neighbor on the far side. The odd
    /// vertices keep their original parent pointers, which together with
    /// the re-aimed ones encodes both directions around the cycle.
    fn mark_cycle(&mut self, mut v: usize, base: usize, mut child: usize, in_blossom: &mut [bool]) {
        while self.base[v] != base {
            let mate = self.mate[v].expect("non-root even vertex has a mate");
            in_blossom[self.base[v]] = true;
            in_blossom[self.base[mate]] = true;
            self.parent[v] = Some(child);
            child = mate;
            v = self.parent[mate].expect("odd vertex has a parent");
        }
    }

    /// The nearest common ancestor of `v` and `w` in their tree, in terms
    /// of blossom bases: ascend from `v` to the root marking every base on
    /// the way, then ascend from `w` until hitting a marked base.
    fn common_ancestor(&self, v: usize, w: usize) -> usize {
        let mut seen = vec![false; self.vertices.len()];

        let mut a = self.base[v];
        loop {
            seen[a] = true;
            match self.mate[a] {
                None => break, // Reached the tree root
                Some(mate) => {
                    let parent = self.parent[mate].expect("odd vertex has a parent");
                    a = self.base[parent];
                }
            }
        }

        let mut b = self.base[w];
        while !seen[b] {
            let mate = self.mate[b].expect("non-root even vertex has a mate");
            let parent = self.parent[mate].expect("odd vertex has a parent");
            b = self.base[parent];
        }
        b
    }

    /// Apply the augmenting path that ends with the edge `(v, w)`, where
    /// `v` is an even vertex and `w` is either an exposed vertex outside
    /// the forest or an even vertex of another tree. Matched and unmatched
    /// edges are flipped along the alternating paths from both endpoints
    /// to their roots, which grows the matching by exactly one edge.
    fn augment(&mut self, v: usize, w: usize) {
        debug!(
            "augmenting along the path through ({:?}, {:?})",
            self.vertices[v], self.vertices[w]
        );

        let up_from_v = self.mate[v];
        let up_from_w = self.mate[w];
        self.flip(up_from_v);
        self.flip(up_from_w);
        self.mate[v] = Some(w);
        self.mate[w] = Some(v);
    }

    /// Re-match the alternating tree path above an odd vertex, iteratively
    /// following parent pointers up to the root. Each step matches an odd
    /// vertex to its parent and carries the parent's former mate upward.
    fn flip(&mut self, mut next: Option<usize>) {
        while let Some(u) = next {
            let parent = self.parent[u].expect("odd vertex has a parent");
            next = self.mate[parent];
            self.mate[u] = Some(parent);
            self.mate[parent] = Some(u);
        }
    }

    /// Read the final matching back out of the mate table.
    fn into_matching(self) -> Matching<V> {
        let mut matching = Matching::new();
        for (v, mate) in self.mate.iter().enumerate() {
            if let Some(w) = *mate {
                if v < w {
                    matching.push(self.vertices[v], self.vertices[w]);
                }
            }
        }
        matching
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disjoint<V: Vertex>(matching: &Matching<V>) -> bool {
        matching.vertices().len() == 2 * matching.len()
    }

    #[test]
    fn a_stage_augments_a_maximal_but_not_maximum_matching() {
        // A triangle (2-3-4) with the tails 1 and 5-6 attached; the maximal
        // matching leaves 1 and 6 exposed
        let g = Graph::from_flat(&[1, 2, 2, 3, 2, 4, 3, 4, 4, 5, 5, 6]);
        let maximal = Matching::try_from_edges([(2, 3), (4, 5)]).unwrap();

        let m = mcm_stage(&g, &maximal, None);
        assert_eq!(m.len(), 3);
        assert_eq!(m.vertices(), g.vertices());
        assert!(disjoint(&m));
    }

    #[test]
    fn a_stage_grows_the_matching_by_at_most_one_edge() {
        let g = Graph::from_flat(&[1, 2, 2, 3, 2, 4, 3, 4, 4, 5, 5, 6]);
        let maximal = Matching::try_from_edges([(2, 3), (4, 5)]).unwrap();

        let m = mcm_stage(&g, &maximal, None);
        assert_eq!(m.len(), maximal.len() + 1);

        // The next stage is a fixed point
        let again = mcm_stage(&g, &m, None);
        assert_eq!(again.len(), m.len());
    }

    #[test]
    fn textbook_augmentation_example_reaches_a_perfect_matching() {
        // The 10-vertex example from West's "Introduction to Graph Theory",
        // p. 143, rooted at the exposed vertex u
        let edges = "ua ac cf fg gh ce ef ub bd de bx";
        let flat: Vec<char> = edges
            .split_whitespace()
            .flat_map(|e| e.chars())
            .collect();
        let g = Graph::from_flat(&flat);
        let m = Matching::try_from_edges([('a', 'c'), ('f', 'e'), ('g', 'h'), ('b', 'd')]).unwrap();

        assert_eq!(g.vertex_count(), 10);
        let mcm = mcm_stage(&g, &m, Some('u'));
        assert_eq!(mcm.len(), 5);
        assert_eq!(mcm.vertices(), g.vertices());
        assert!(disjoint(&mcm));
    }

    #[test]
    fn an_odd_cycle_without_an_augmenting_path_is_a_fixed_point() {
        // A five-cycle with a single exposed vertex contracts to a blossom
        // but admits no augmenting path
        let g = Graph::from_flat(&[1, 2, 2, 3, 3, 4, 4, 5, 5, 1]);
        let m = Matching::try_from_edges([(2, 3), (4, 5)]).unwrap();

        let result = mcm_stage(&g, &m, Some(1));
        assert_eq!(result.len(), 2);
        assert_eq!(result.to_vec(), m.to_vec());
    }

    #[test]
    fn an_augmenting_path_routes_through_a_contracted_blossom() {
        // The five-cycle again, now with the pendant edge (3, 6). From root
        // 1 the search contracts the blossom and then escapes through it to
        // the exposed vertex 6
        let g = Graph::from_flat(&[1, 2, 2, 3, 3, 4, 4, 5, 5, 1, 3, 6]);
        let m = Matching::try_from_edges([(2, 3), (4, 5)]).unwrap();

        let result = mcm_stage(&g, &m, Some(1));
        assert_eq!(result.len(), 3);
        assert_eq!(result.vertices(), g.vertices());
        assert!(disjoint(&result));
    }

    #[test]
    fn a_stage_rooted_at_a_matched_vertex_changes_nothing() {
        let g = Graph::from_flat(&[1, 2, 2, 3]);
        let m = Matching::try_from_edges([(1, 2)]).unwrap();

        let result = mcm_stage(&g, &m, Some(2));
        assert_eq!(result.to_vec(), m.to_vec());
    }

    #[test]
    fn driver_handles_trivial_graphs() {
        let empty: Graph<u32> = Graph::new();
        assert!(maximum_cardinality_matching(&empty).unwrap().is_empty());

        let mut single = Graph::new();
        single.add_vertex(1);
        assert!(maximum_cardinality_matching(&single).unwrap().is_empty());

        let pair = Graph::from_flat(&[1, 2]);
        let m = maximum_cardinality_matching(&pair).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m.vertices(), vec![1, 2]);
    }

    #[test]
    fn driver_recovers_from_a_greedy_trap() {
        // The greedy pass matches 1 with 2, stranding 3 and 4; one stage
        // rematches along the path 3-1-2-4
        let g = Graph::from_edges(&[(3, 1), (1, 2), (2, 4)]);
        let m = maximum_cardinality_matching(&g).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.vertices(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn driver_needs_multiple_stages_for_two_greedy_traps() {
        // Two greedy traps bridged by the edge (2, 6) between matched
        // vertices; the maximal matching has size 2, the maximum size 4
        let g = Graph::from_edges(&[(3, 1), (1, 2), (2, 4), (7, 5), (5, 6), (6, 8), (2, 6)]);
        let m = maximum_cardinality_matching(&g).unwrap();
        assert_eq!(m.len(), 4);
        assert_eq!(m.vertices(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(disjoint(&m));
    }

    #[test]
    fn driver_rejects_disconnected_graphs() {
        let mut g = Graph::new();
        g.add_vertex(1);
        g.add_vertex(2);
        assert_eq!(
            maximum_cardinality_matching(&g).unwrap_err(),
            Error::DisconnectedGraph
        );
    }
}

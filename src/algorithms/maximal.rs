use crate::graph::Vertex;
use crate::{Graph, Matching};

/// Greedily construct an inclusion-maximal matching in a single pass.
///
/// Vertices are visited in sorted order and each unmatched vertex is paired
/// with its first unmatched neighbor. The result admits no further edge of
/// the graph, but it is not necessarily a maximum matching. Runs in O(V+E)
/// and tolerates disconnected graphs and isolated vertices.
pub fn maximal_matching<V: Vertex>(graph: &Graph<V>) -> Matching<V> {
    let mut matching = Matching::new();

    for vertex in graph.vertices() {
        if matching.covers(vertex) {
            continue;
        }
        for neighbor in graph.neighbors(vertex) {
            if !matching.covers(neighbor) {
                matching.push(vertex, neighbor);
                break;
            }
        }
    }

    matching
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_empty_graph_yields_an_empty_matching() {
        let g: Graph<u32> = Graph::new();
        assert!(maximal_matching(&g).is_empty());
    }

    #[test]
    fn a_single_vertex_yields_an_empty_matching() {
        let mut g = Graph::new();
        g.add_vertex(1);
        assert!(maximal_matching(&g).is_empty());
    }

    #[test]
    fn two_connected_vertices_yield_one_edge() {
        let g = Graph::from_flat(&[1, 2]);
        assert_eq!(maximal_matching(&g).to_vec(), vec![(1, 2)]);
    }

    #[test]
    fn the_complete_graph_on_four_vertices_yields_two_disjoint_edges() {
        let g = Graph::from_flat(&[1, 2, 1, 3, 1, 4, 2, 3, 2, 4, 3, 4]);
        let m = maximal_matching(&g);
        assert_eq!(m.len(), 2);
        assert_eq!(m.vertices(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn disconnected_graphs_are_tolerated() {
        let mut g = Graph::from_flat(&[1, 2]);
        g.add_vertex(3);
        let m = maximal_matching(&g);
        assert_eq!(m.to_vec(), vec![(1, 2)]);
    }

    #[test]
    fn greedy_choice_is_not_necessarily_maximum() {
        // Matching 1 with 2 strands both 3 and 4; a maximum matching of this
        // path has two edges
        let g = Graph::from_edges(&[(3, 1), (1, 2), (2, 4)]);
        let m = maximal_matching(&g);
        assert_eq!(m.to_vec(), vec![(1, 2)]);
    }

    #[test]
    fn the_result_admits_no_further_edge() {
        let g = Graph::from_flat(&[1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 4]);
        let m = maximal_matching(&g);
        for (a, b) in g.edges() {
            assert!(m.covers(a) || m.covers(b));
        }
    }
}

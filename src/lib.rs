//! Matchings on general (non-bipartite) undirected graphs.
//!
//! [`Graph::maximal_matching`] builds an inclusion-maximal matching with a
//! greedy sweep, and [`Graph::maximum_cardinality_matching`] grows it into a
//! provably largest matching by repeated augmenting-path search with blossom
//! contraction. Individual search phases are exposed via [`Graph::mcm_stage`].

pub mod algorithms;
mod error;
mod graph;
mod matching;

pub use error::Error;
pub use graph::{Graph, Vertex};
pub use matching::Matching;

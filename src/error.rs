use std::fmt;
use thiserror::Error as ThisError;

/// Errors reported by matching computations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Error<V: fmt::Debug> {
    /// Maximum cardinality matching requires a connected graph. Maximal
    /// matching does not; it tolerates disconnected graphs and isolated
    /// vertices.
    #[error("graph is not connected")]
    DisconnectedGraph,

    /// A matching must be vertex-disjoint: constructing one from an edge
    /// list where two edges share a vertex (or an edge is a self-loop)
    /// fails fast instead of producing an invalid matching.
    #[error("vertex {0:?} appears in more than one matching edge")]
    SharedVertex(V),
}

//! MeshError: unified error type for mesh-ghost public APIs
//!
//! Every fallible operation of the crate (mesh construction, ghost codec,
//! ghost exchange) reports through this single enum so callers can match on
//! one type regardless of which layer failed.

use crate::topology::index::MeshType;
use thiserror::Error;

/// Unified error type for mesh-ghost operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A polygon references a vertex that does not exist.
    #[error("vertex {vertex} (polygon {polygon:?}) is out of range for a mesh with {num_vertices} vertices")]
    VertexOutOfRange {
        polygon: Option<usize>,
        vertex: usize,
        num_vertices: usize,
    },
    /// A polygon has fewer than three vertices or repeats a vertex consecutively.
    #[error("polygon {polygon} is degenerate ({len} vertices)")]
    DegeneratePolygon { polygon: usize, len: usize },
    /// A vertex has a single neighbour along the boundary.
    #[error("vertex {vertex} dangles on the boundary (near polygon {polygon:?})")]
    DanglingVertex {
        vertex: usize,
        polygon: Option<usize>,
    },
    /// Number of vertex coordinates does not match the vertex count.
    #[error("expected {expected} vertex positions, got {found}")]
    PositionCountMismatch { expected: usize, found: usize },
    /// A half-edge does not return to itself after four dual steps.
    #[error("inconsistent {mesh_type} structure: half-edge ({node}, {position}) does not close its dual cycle")]
    InconsistentStructure {
        mesh_type: MeshType,
        node: usize,
        position: usize,
    },
    /// A local face number outside the reference element.
    #[error("face number {face} is out of range for a {element} (expected < {faces})")]
    InvalidFaceNumber {
        element: &'static str,
        face: i32,
        faces: usize,
    },
    /// The same global vertex id occurs twice in one element.
    #[error("vertex id {id} occurs more than once in ghost element")]
    DuplicateVertexId { id: i32 },
    /// A face vertex id that is not one of the element's vertices.
    #[error("outer vertex id {id} is not a vertex of the ghost element")]
    ForeignOuterVertex { id: i32 },
    /// The stream ended before a value could be read.
    #[error("unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },
    /// A frame header or record tag does not match what this build understands.
    #[error("wire mismatch: {0}")]
    WireMismatch(String),
    /// A communication failure with a specific neighbour.
    #[error("communication error with rank {neighbor}: {message}")]
    CommError { neighbor: usize, message: String },
}

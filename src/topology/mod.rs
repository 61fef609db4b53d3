//! Primal/dual half-edge mesh topology.
//!
//! This module provides the building blocks of the polygon mesh:
//! - packed typed indices for nodes and half-edges of both mesh types
//! - ragged CSR storage for polygons and adjacency rows
//! - the boundary detector and adjacency builder
//! - the half-edge cycle checker
//!
//! Most users will only touch [`Mesh`], which runs the whole pipeline.

pub mod index;
pub mod mesh;
pub mod multi_vector;
pub mod structure;
pub mod validation;

pub use index::{HalfEdgeIndex, IndexRange, MeshType, NodeIndex};
pub use mesh::{GlobalCoordinate, Mesh, MeshOptions};
pub use multi_vector::MultiVector;
pub use structure::{Link, MeshStructure, boundaries, mesh_structure};
pub use validation::{StructureCheck, check_structure};

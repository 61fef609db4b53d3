#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-ghost
//!
//! mesh-ghost provides two building blocks for distributed unstructured grids:
//!
//! - a primal/dual half-edge mesh built from a planar polygon soup, where every
//!   half-edge knows its dual and open boundaries are closed by synthetic
//!   entities so that both meshes are watertight
//! - ghost element records for hexahedra and tetrahedra, with a fixed
//!   little-endian wire format and a framed neighbour exchange over a
//!   pluggable communicator (serial, in-process, MPI)
//!
//! ## Usage
//!
//! ```
//! use mesh_ghost::prelude::*;
//!
//! let vertices = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
//! let polygons = MultiVector::from(vec![vec![0, 1, 2, 3]]);
//! let mesh = Mesh::new(vertices, &polygons)?;
//! assert_eq!(mesh.num_cells(MeshType::Primal), 1);
//! assert_eq!(mesh.num_boundaries(MeshType::Dual), 4);
//! # Ok::<(), mesh_ghost::mesh_error::MeshError>(())
//! ```
//!
//! ## Features
//! - `rayon`: compute dual node positions in parallel
//! - `mpi-support`: [`algs::communicator`] gains an MPI backend
//! - `check-invariants` / `strict-invariants`: keep invariant checks in
//!   release builds

pub mod algs;
pub mod debug_invariants;
pub mod ghost;
pub mod mesh_error;
pub mod stream;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::communicator::{CommTag, Communicator, GhostCommTags, NoComm, RayonComm, Wait};
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::communicator::MpiComm;
    pub use crate::algs::ghost_exchange::{exchange_ghosts, pack_ghosts, unpack_ghosts};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::ghost::{
        FaceCode, GhostInfo, GhostKind, GhostVertex, Hexa, HexaElement, HexaGhostInfo,
        SimplexTypeFlag, Tetra, TetraElement, TetraGhostInfo, read_ghost, write_ghost,
    };
    pub use crate::mesh_error::MeshError;
    pub use crate::stream::{InStream, OutStream, StreamValue};
    pub use crate::topology::{
        GlobalCoordinate, HalfEdgeIndex, Mesh, MeshOptions, MeshType, MultiVector, NodeIndex,
        StructureCheck,
    };
}

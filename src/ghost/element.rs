//! Reference elements and sender-side element views.

use crate::mesh_error::MeshError;
use crate::stream::{InStream, OutStream};
use serde::{Deserialize, Serialize};

pub const HEXA_VERTICES: usize = 8;
pub const HEXA_FACES: usize = 6;
pub const HEXA_FACE_VERTICES: usize = 4;

/// Local vertices of each hexahedron face.
pub const HEXA_FACE_VERTEX: [[usize; HEXA_FACE_VERTICES]; HEXA_FACES] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [0, 4, 7, 3],
];

/// Face across the hexahedron from each face.
pub const HEXA_OPPOSITE_FACE: [usize; HEXA_FACES] = [1, 0, 4, 5, 2, 3];

pub const TETRA_VERTICES: usize = 4;
pub const TETRA_FACES: usize = 4;

/// Local vertices of each tetrahedron face; face `i` omits vertex `i`.
pub const TETRA_FACE_VERTEX: [[usize; 3]; TETRA_FACES] =
    [[1, 3, 2], [0, 2, 3], [0, 3, 1], [0, 1, 2]];

/// Global id and coordinates of one element vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GhostVertex {
    pub id: i32,
    pub point: [f64; 3],
}

impl GhostVertex {
    pub const fn new(id: i32, point: [f64; 3]) -> Self {
        Self { id, point }
    }
}

/// Bisection tag of a tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SimplexTypeFlag {
    pub orientation: u8,
    pub simplex_type: u8,
}

impl SimplexTypeFlag {
    /// Encoded width in bytes.
    pub const SIZE: usize = 2;

    pub const fn new(orientation: u8, simplex_type: u8) -> Self {
        Self {
            orientation,
            simplex_type,
        }
    }

    pub fn write<S: OutStream + ?Sized>(&self, stream: &mut S) {
        stream.put_byte(self.orientation);
        stream.put_byte(self.simplex_type);
    }

    pub fn read<S: InStream + ?Sized>(stream: &mut S) -> Result<Self, MeshError> {
        let orientation = stream.get_byte()?;
        let simplex_type = stream.get_byte()?;
        Ok(Self::new(orientation, simplex_type))
    }
}

/// A hexahedron as the sender sees it.
pub trait HexaElement {
    /// Local vertex `i`, `0..8`.
    fn vertex(&self, i: usize) -> GhostVertex;
}

/// A tetrahedron as the sender sees it.
pub trait TetraElement {
    /// Local vertex `i`, `0..4`.
    fn vertex(&self, i: usize) -> GhostVertex;
    fn orientation(&self) -> bool;
    fn simplex_type_flag(&self) -> SimplexTypeFlag;
}

/// Owned hexahedron.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hexa {
    pub vertices: [GhostVertex; HEXA_VERTICES],
}

impl Hexa {
    pub fn new(vertices: [GhostVertex; HEXA_VERTICES]) -> Self {
        Self { vertices }
    }

    /// Axis-aligned box `origin + [0, size]^3` in reference vertex order.
    pub fn axis_aligned(ids: [i32; HEXA_VERTICES], origin: [f64; 3], size: f64) -> Self {
        const CORNERS: [[f64; 3]; HEXA_VERTICES] = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ];
        Self::new(std::array::from_fn(|i| {
            let c = CORNERS[i];
            GhostVertex::new(
                ids[i],
                [
                    origin[0] + size * c[0],
                    origin[1] + size * c[1],
                    origin[2] + size * c[2],
                ],
            )
        }))
    }
}

impl HexaElement for Hexa {
    #[inline]
    fn vertex(&self, i: usize) -> GhostVertex {
        self.vertices[i]
    }
}

/// Owned tetrahedron.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tetra {
    pub vertices: [GhostVertex; TETRA_VERTICES],
    pub orientation: bool,
    pub flag: SimplexTypeFlag,
}

impl Tetra {
    pub fn new(
        vertices: [GhostVertex; TETRA_VERTICES],
        orientation: bool,
        flag: SimplexTypeFlag,
    ) -> Self {
        Self {
            vertices,
            orientation,
            flag,
        }
    }
}

impl TetraElement for Tetra {
    #[inline]
    fn vertex(&self, i: usize) -> GhostVertex {
        self.vertices[i]
    }

    #[inline]
    fn orientation(&self) -> bool {
        self.orientation
    }

    #[inline]
    fn simplex_type_flag(&self) -> SimplexTypeFlag {
        self.flag
    }
}

/// Element ids pairwise distinct and every outer id among them.
pub(crate) fn check_vertex_ids(vertices: &[i32], outer_vertices: &[i32]) -> Result<(), MeshError> {
    for (i, id) in vertices.iter().enumerate() {
        if vertices[..i].contains(id) {
            return Err(MeshError::DuplicateVertexId { id: *id });
        }
    }
    match outer_vertices.iter().find(|id| !vertices.contains(id)) {
        Some(&id) => Err(MeshError::ForeignOuterVertex { id }),
        None => Ok(()),
    }
}

//! Ghost record of a tetrahedron.

use super::FaceCode;
use super::element::{SimplexTypeFlag, TETRA_FACES, TETRA_VERTICES, TetraElement, check_vertex_ids};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::stream::{InStream, OutStream};
use serde::{Deserialize, Serialize};

/// Tetrahedron behind a process boundary: its four vertex ids, the vertex
/// across from the internal face and the bisection tag.
///
/// The element's orientation travels as the `mirrored` bit of the face code.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TetraGhostInfo {
    points: [[f64; 3]; 1],
    vertices: [i32; TETRA_VERTICES],
    outer_vertices: [i32; 1],
    face: FaceCode,
    flag: SimplexTypeFlag,
}

fn face_code(face: usize, orientation: bool) -> Result<FaceCode, MeshError> {
    u8::try_from(face)
        .ok()
        .filter(|&f| usize::from(f) < TETRA_FACES)
        .and_then(|f| FaceCode::new(f, orientation))
        .ok_or_else(|| MeshError::InvalidFaceNumber {
            element: "tetrahedron",
            face: i32::try_from(face).unwrap_or(i32::MAX),
            faces: TETRA_FACES,
        })
}

impl TetraGhostInfo {
    pub const NUM_POINTS: usize = 1;

    /// Encoded size including the trailing simplex flag.
    pub const WIRE_SIZE: usize = 1 + 4 * TETRA_VERTICES + 4 + 24 + SimplexTypeFlag::SIZE;

    pub fn from_element<E: TetraElement + ?Sized>(element: &E, face: usize) -> Result<Self, MeshError> {
        let code = face_code(face, element.orientation())?;
        // a tetrahedron's "opposite face" is the vertex not on `face`
        let apex = element.vertex(face);
        Ok(Self {
            points: [apex.point],
            vertices: std::array::from_fn(|i| element.vertex(i).id),
            outer_vertices: [apex.id],
            face: code,
            flag: element.simplex_type_flag(),
        })
    }

    /// Write the record for `element` straight to `stream`.
    pub fn write_ghost_info<S, E>(stream: &mut S, face: usize, element: &E) -> Result<(), MeshError>
    where
        S: OutStream + ?Sized,
        E: TetraElement + ?Sized,
    {
        let code = face_code(face, element.orientation())?;
        stream.write_value(code.to_wire());
        for i in 0..TETRA_VERTICES {
            stream.write_value(element.vertex(i).id);
        }
        let apex = element.vertex(face);
        stream.write_value(apex.id);
        stream.write_point(&apex.point);
        element.simplex_type_flag().write(stream);
        Ok(())
    }

    pub fn inline_ghost_element<S: OutStream + ?Sized>(&self, stream: &mut S) {
        stream.write_value(self.face.to_wire());
        for &id in &self.vertices {
            stream.write_value(id);
        }
        stream.write_value(self.outer_vertices[0]);
        stream.write_point(&self.points[0]);
        self.flag.write(stream);
    }

    /// Receiver side.
    pub fn read_data<S: InStream + ?Sized>(stream: &mut S) -> Result<Self, MeshError> {
        let raw = stream.read_value::<i8>()?;
        let face = FaceCode::from_wire(raw);
        if face.face() as usize >= TETRA_FACES {
            return Err(MeshError::InvalidFaceNumber {
                element: "tetrahedron",
                face: raw.into(),
                faces: TETRA_FACES,
            });
        }
        let mut vertices = [0; TETRA_VERTICES];
        for id in &mut vertices {
            *id = stream.read_value()?;
        }
        let outer = stream.read_value()?;
        let point = stream.read_point()?;
        let flag = SimplexTypeFlag::read(stream)?;
        let info = Self {
            points: [point],
            vertices,
            outer_vertices: [outer],
            face,
            flag,
        };
        crate::debug_invariants!(info.validate_invariants(), "TetraGhostInfo::read_data");
        Ok(info)
    }

    #[inline]
    pub fn point(&self, i: usize) -> &[f64; 3] {
        &self.points[i]
    }

    #[inline]
    pub fn points(&self) -> &[[f64; 3]; 1] {
        &self.points
    }

    #[inline]
    pub fn nop(&self) -> usize {
        Self::NUM_POINTS
    }

    #[inline]
    pub fn internal_face(&self) -> usize {
        self.face.face() as usize
    }

    /// Orientation of the sending element.
    #[inline]
    pub fn orientation(&self) -> bool {
        self.face.mirrored()
    }

    #[inline]
    pub fn face_code(&self) -> FaceCode {
        self.face
    }

    #[inline]
    pub fn vertices(&self) -> &[i32; TETRA_VERTICES] {
        &self.vertices
    }

    #[inline]
    pub fn outer_vertices(&self) -> &[i32; 1] {
        &self.outer_vertices
    }

    #[inline]
    pub fn simplex_type_flag(&self) -> SimplexTypeFlag {
        self.flag
    }
}

impl DebugInvariants for TetraGhostInfo {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        if self.internal_face() >= TETRA_FACES {
            return Err(MeshError::InvalidFaceNumber {
                element: "tetrahedron",
                face: self.face.to_wire().into(),
                faces: TETRA_FACES,
            });
        }
        check_vertex_ids(&self.vertices, &self.outer_vertices)?;
        // the apex must be the vertex the face omits
        if self.vertices[self.internal_face()] != self.outer_vertices[0] {
            return Err(MeshError::ForeignOuterVertex {
                id: self.outer_vertices[0],
            });
        }
        Ok(())
    }
}

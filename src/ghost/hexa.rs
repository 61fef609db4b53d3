//! Ghost record of a hexahedron.

use super::FaceCode;
use super::element::{
    HEXA_FACE_VERTEX, HEXA_FACE_VERTICES, HEXA_FACES, HEXA_OPPOSITE_FACE, HEXA_VERTICES,
    HexaElement, check_vertex_ids,
};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::stream::{InStream, OutStream};
use serde::{Deserialize, Serialize};

/// Hexahedron behind a process boundary, reduced to what the receiver needs:
/// all eight vertex ids plus the face across from the internal face.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HexaGhostInfo {
    points: [[f64; 3]; HEXA_FACE_VERTICES],
    vertices: [i32; HEXA_VERTICES],
    outer_vertices: [i32; HEXA_FACE_VERTICES],
    face: FaceCode,
}

fn face_code(face: usize) -> Result<FaceCode, MeshError> {
    u8::try_from(face)
        .ok()
        .filter(|&f| usize::from(f) < HEXA_FACES)
        .and_then(|f| FaceCode::new(f, false))
        .ok_or_else(|| MeshError::InvalidFaceNumber {
            element: "hexahedron",
            face: i32::try_from(face).unwrap_or(i32::MAX),
            faces: HEXA_FACES,
        })
}

impl HexaGhostInfo {
    /// Points carried per record.
    pub const NUM_POINTS: usize = HEXA_FACE_VERTICES;

    /// Encoded size: face byte, ids, then id and coordinates per point.
    pub const WIRE_SIZE: usize = 1 + 4 * HEXA_VERTICES + (4 + 24) * HEXA_FACE_VERTICES;

    /// Sender side: capture `element` as seen across internal face `face`.
    pub fn from_element<E: HexaElement + ?Sized>(element: &E, face: usize) -> Result<Self, MeshError> {
        let face = face_code(face)?;
        let opposite = HEXA_OPPOSITE_FACE[face.face() as usize];
        let mut points = [[0.0; 3]; HEXA_FACE_VERTICES];
        let mut outer_vertices = [0; HEXA_FACE_VERTICES];
        for (k, &local) in HEXA_FACE_VERTEX[opposite].iter().enumerate() {
            let v = element.vertex(local);
            points[k] = v.point;
            outer_vertices[k] = v.id;
        }
        Ok(Self {
            points,
            vertices: std::array::from_fn(|i| element.vertex(i).id),
            outer_vertices,
            face,
        })
    }

    /// Write the record for `element` straight to `stream`.
    ///
    /// Produces the same bytes as [`from_element`](Self::from_element)
    /// followed by [`inline_ghost_element`](Self::inline_ghost_element).
    pub fn write_ghost_info<S, E>(stream: &mut S, face: usize, element: &E) -> Result<(), MeshError>
    where
        S: OutStream + ?Sized,
        E: HexaElement + ?Sized,
    {
        let code = face_code(face)?;
        stream.write_value(code.to_wire());
        for i in 0..HEXA_VERTICES {
            stream.write_value(element.vertex(i).id);
        }
        for &local in &HEXA_FACE_VERTEX[HEXA_OPPOSITE_FACE[face]] {
            let v = element.vertex(local);
            stream.write_value(v.id);
            stream.write_point(&v.point);
        }
        Ok(())
    }

    pub fn inline_ghost_element<S: OutStream + ?Sized>(&self, stream: &mut S) {
        stream.write_value(self.face.to_wire());
        for &id in &self.vertices {
            stream.write_value(id);
        }
        for (id, point) in self.outer_vertices.iter().zip(&self.points) {
            stream.write_value(*id);
            stream.write_point(point);
        }
    }

    /// Receiver side.
    pub fn read_data<S: InStream + ?Sized>(stream: &mut S) -> Result<Self, MeshError> {
        let raw = stream.read_value::<i8>()?;
        let face = FaceCode::from_wire(raw);
        if face.mirrored() || face.face() as usize >= HEXA_FACES {
            return Err(MeshError::InvalidFaceNumber {
                element: "hexahedron",
                face: raw.into(),
                faces: HEXA_FACES,
            });
        }
        let mut vertices = [0; HEXA_VERTICES];
        for id in &mut vertices {
            *id = stream.read_value()?;
        }
        let mut points = [[0.0; 3]; HEXA_FACE_VERTICES];
        let mut outer_vertices = [0; HEXA_FACE_VERTICES];
        for (id, point) in outer_vertices.iter_mut().zip(&mut points) {
            *id = stream.read_value()?;
            *point = stream.read_point()?;
        }
        let info = Self {
            points,
            vertices,
            outer_vertices,
            face,
        };
        crate::debug_invariants!(info.validate_invariants(), "HexaGhostInfo::read_data");
        Ok(info)
    }

    #[inline]
    pub fn point(&self, i: usize) -> &[f64; 3] {
        &self.points[i]
    }

    #[inline]
    pub fn points(&self) -> &[[f64; 3]; HEXA_FACE_VERTICES] {
        &self.points
    }

    /// Number of points.
    #[inline]
    pub fn nop(&self) -> usize {
        Self::NUM_POINTS
    }

    #[inline]
    pub fn internal_face(&self) -> usize {
        self.face.face() as usize
    }

    #[inline]
    pub fn face_code(&self) -> FaceCode {
        self.face
    }

    #[inline]
    pub fn vertices(&self) -> &[i32; HEXA_VERTICES] {
        &self.vertices
    }

    #[inline]
    pub fn outer_vertices(&self) -> &[i32; HEXA_FACE_VERTICES] {
        &self.outer_vertices
    }
}

impl DebugInvariants for HexaGhostInfo {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        if self.face.mirrored() || self.internal_face() >= HEXA_FACES {
            return Err(MeshError::InvalidFaceNumber {
                element: "hexahedron",
                face: self.face.to_wire().into(),
                faces: HEXA_FACES,
            });
        }
        check_vertex_ids(&self.vertices, &self.outer_vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost::element::Hexa;

    fn cube() -> Hexa {
        Hexa::axis_aligned([10, 11, 12, 13, 14, 15, 16, 17], [0.0; 3], 1.0)
    }

    #[test]
    fn bottom_face_sends_top_points() {
        let info = HexaGhostInfo::from_element(&cube(), 0).unwrap();
        assert_eq!(info.internal_face(), 0);
        assert_eq!(info.outer_vertices(), &[14, 15, 16, 17]);
        assert!(info.points().iter().all(|p| p[2] == 1.0));
        assert_eq!(info.nop(), 4);
        info.validate_invariants().unwrap();
    }

    #[test]
    fn static_writer_matches_inline() {
        let hexa = cube();
        for face in 0..HEXA_FACES {
            let mut direct = Vec::new();
            HexaGhostInfo::write_ghost_info(&mut direct, face, &hexa).unwrap();
            let mut inline = Vec::new();
            HexaGhostInfo::from_element(&hexa, face)
                .unwrap()
                .inline_ghost_element(&mut inline);
            assert_eq!(direct, inline);
            assert_eq!(direct.len(), HexaGhostInfo::WIRE_SIZE);
        }
    }

    #[test]
    fn face_out_of_range() {
        assert_eq!(
            HexaGhostInfo::from_element(&cube(), 6),
            Err(MeshError::InvalidFaceNumber {
                element: "hexahedron",
                face: 6,
                faces: 6
            })
        );
    }

    #[test]
    fn mirrored_hexa_face_is_rejected() {
        let mut bytes = Vec::new();
        HexaGhostInfo::write_ghost_info(&mut bytes, 2, &cube()).unwrap();
        bytes[0] = (-3i8) as u8;
        let mut input: &[u8] = &bytes;
        assert!(matches!(
            HexaGhostInfo::read_data(&mut input),
            Err(MeshError::InvalidFaceNumber { face: -3, .. })
        ));
    }

    #[test]
    fn truncated_record() {
        let mut bytes = Vec::new();
        HexaGhostInfo::write_ghost_info(&mut bytes, 1, &cube()).unwrap();
        bytes.truncate(bytes.len() - 1);
        let mut input: &[u8] = &bytes;
        assert!(matches!(
            HexaGhostInfo::read_data(&mut input),
            Err(MeshError::UnexpectedEof { needed: 8, remaining: 7 })
        ));
    }
}

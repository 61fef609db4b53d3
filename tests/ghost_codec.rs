mod util;
use util::*;

use bytes::BytesMut;
use mesh_ghost::ghost::element::{HEXA_FACE_VERTEX, HEXA_OPPOSITE_FACE, TETRA_FACES};
use mesh_ghost::mesh_error::MeshError;
use mesh_ghost::prelude::*;
use proptest::prelude::*;

#[test]
fn hexa_roundtrip_every_face() {
    let hexa = cube(40);
    for face in 0..6 {
        let mut out = BytesMut::new();
        HexaGhostInfo::write_ghost_info(&mut out, face, &hexa).unwrap();
        let mut input = out.freeze();
        let info = read_ghost(&mut input, GhostKind::Hexa).unwrap();
        assert_eq!(input.remaining_bytes(), 0);

        assert_eq!(info.internal_face(), face);
        assert_eq!(info.vertices(), &[40, 41, 42, 43, 44, 45, 46, 47]);
        assert_eq!(info.nop(), 4);
        let opposite = HEXA_FACE_VERTEX[HEXA_OPPOSITE_FACE[face]];
        for (k, &local) in opposite.iter().enumerate() {
            assert_eq!(info.outer_vertices()[k], 40 + local as i32);
            assert_eq!(info.point(k), &hexa.vertices[local].point);
        }
        assert_eq!(info.simplex_type_flag(), None);
    }
}

#[test]
fn tetra_roundtrip_carries_orientation_and_flag() {
    for orientation in [false, true] {
        let t = tetra(7, orientation);
        for face in 0..TETRA_FACES {
            let mut out = Vec::new();
            TetraGhostInfo::write_ghost_info(&mut out, face, &t).unwrap();
            assert_eq!((out[0] as i8) < 0, orientation);

            let mut input: &[u8] = &out;
            let GhostInfo::Tetra(info) = read_ghost(&mut input, GhostKind::Tetra).unwrap() else {
                panic!("expected a tetra record");
            };
            assert_eq!(info.internal_face(), face);
            assert_eq!(info.orientation(), orientation);
            assert_eq!(info.vertices(), &[7, 8, 9, 10]);
            assert_eq!(info.outer_vertices(), &[7 + face as i32]);
            assert_eq!(info.point(0), &t.vertices[face].point);
            assert_eq!(info.simplex_type_flag(), t.flag);
        }
    }
}

#[test]
fn records_are_untagged_and_concatenate() {
    let mut out = Vec::new();
    write_ghost(&mut out, &HexaGhostInfo::from_element(&cube(0), 2).unwrap().into());
    write_ghost(&mut out, &TetraGhostInfo::from_element(&tetra(100, true), 1).unwrap().into());
    assert_eq!(out.len(), HexaGhostInfo::WIRE_SIZE + TetraGhostInfo::WIRE_SIZE);

    let mut input: &[u8] = &out;
    let first = read_ghost(&mut input, GhostKind::Hexa).unwrap();
    let second = read_ghost(&mut input, GhostKind::Tetra).unwrap();
    assert_eq!(first.kind(), GhostKind::Hexa);
    assert_eq!(second.internal_face(), 1);
    assert!(input.is_empty());
}

#[test]
fn invalid_faces() {
    let mut out = Vec::new();
    assert_eq!(
        HexaGhostInfo::write_ghost_info(&mut out, 6, &cube(0)),
        Err(MeshError::InvalidFaceNumber {
            element: "hexahedron",
            face: 6,
            faces: 6
        })
    );
    assert!(out.is_empty(), "nothing written for a rejected face");
    assert!(matches!(
        TetraGhostInfo::from_element(&tetra(0, false), 4),
        Err(MeshError::InvalidFaceNumber { faces: 4, .. })
    ));
}

#[test]
fn empty_stream_is_eof() {
    let mut input: &[u8] = &[];
    assert_eq!(
        read_ghost(&mut input, GhostKind::Tetra),
        Err(MeshError::UnexpectedEof {
            needed: 1,
            remaining: 0
        })
    );
}

#[test]
fn ghost_info_serde_json() {
    let info: GhostInfo = TetraGhostInfo::from_element(&tetra(3, false), 0).unwrap().into();
    let json = serde_json::to_string(&info).unwrap();
    let back: GhostInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(back, info);
}

proptest! {
    #[test]
    fn tetra_face_and_orientation_survive(
        face in 0usize..4,
        orientation in any::<bool>(),
        first in -1000i32..1000,
        z in -1.0e6f64..1.0e6,
    ) {
        let mut t = tetra(first, orientation);
        t.vertices[face].point[2] = z;
        let mut out = Vec::new();
        TetraGhostInfo::write_ghost_info(&mut out, face, &t).unwrap();
        let mut input: &[u8] = &out;
        let info = TetraGhostInfo::read_data(&mut input).unwrap();
        prop_assert_eq!(info.internal_face(), face);
        prop_assert_eq!(info.orientation(), orientation);
        prop_assert_eq!(info.point(0)[2], z);
        prop_assert_eq!(info.outer_vertices()[0], first + face as i32);
    }
}

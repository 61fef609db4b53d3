//! Ghost element records exchanged across process boundaries.
//!
//! A ghost record describes an element that lives on a neighbouring rank
//! and touches this rank through one internal face. The sender writes it with
//! [`write_ghost`] (or the per-variant `write_ghost_info`), the receiver
//! rebuilds it with [`read_ghost`]. Records carry no tag and no length: both
//! sides must agree on the [`GhostKind`] out of band.
//!
//! Wire layout, little-endian:
//!
//! ```text
//! [face: i8][element vertex ids: N x i32][per face vertex: id i32, x y z f64]
//! [orientation u8][simplex type u8]      (tetrahedra only)
//! ```

pub mod element;
pub mod hexa;
pub mod tetra;

pub use element::{GhostVertex, Hexa, HexaElement, SimplexTypeFlag, Tetra, TetraElement};
pub use hexa::HexaGhostInfo;
pub use tetra::TetraGhostInfo;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::stream::{InStream, OutStream};
use serde::{Deserialize, Serialize};

/// Local face number plus the orientation bit that shares its wire byte.
///
/// Encoded as `face` when not mirrored and `-face - 1` when mirrored, so the
/// face number is limited to [`FaceCode::MAX_FACE`]. Serialized as the wire
/// byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i8", into = "i8")]
pub struct FaceCode {
    face: u8,
    mirrored: bool,
}

impl FaceCode {
    /// Largest face number a signed byte can carry in both orientations.
    pub const MAX_FACE: u8 = i8::MAX as u8;

    /// `None` when `face` exceeds [`MAX_FACE`](Self::MAX_FACE).
    #[inline]
    pub const fn new(face: u8, mirrored: bool) -> Option<Self> {
        if face > Self::MAX_FACE {
            None
        } else {
            Some(Self { face, mirrored })
        }
    }

    #[inline]
    pub const fn face(self) -> u8 {
        self.face
    }

    #[inline]
    pub const fn mirrored(self) -> bool {
        self.mirrored
    }

    /// Signed wire byte.
    #[inline]
    pub const fn to_wire(self) -> i8 {
        // face <= 127, so neither branch overflows
        if self.mirrored {
            -(self.face as i8) - 1
        } else {
            self.face as i8
        }
    }

    /// Every byte decodes; negative values are mirrored.
    #[inline]
    pub const fn from_wire(raw: i8) -> Self {
        if raw < 0 {
            Self {
                face: (-(raw as i16) - 1) as u8,
                mirrored: true,
            }
        } else {
            Self {
                face: raw as u8,
                mirrored: false,
            }
        }
    }
}

impl From<i8> for FaceCode {
    #[inline]
    fn from(raw: i8) -> Self {
        Self::from_wire(raw)
    }
}

impl From<FaceCode> for i8 {
    #[inline]
    fn from(code: FaceCode) -> Self {
        code.to_wire()
    }
}

/// Which record layout a stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GhostKind {
    Tetra = 0,
    Hexa = 1,
}

impl GhostKind {
    #[inline]
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Result<Self, MeshError> {
        match byte {
            0 => Ok(GhostKind::Tetra),
            1 => Ok(GhostKind::Hexa),
            other => Err(MeshError::WireMismatch(format!("unknown ghost kind {other}"))),
        }
    }

    /// Encoded size of one record of this kind.
    pub const fn wire_size(self) -> usize {
        match self {
            GhostKind::Tetra => TetraGhostInfo::WIRE_SIZE,
            GhostKind::Hexa => HexaGhostInfo::WIRE_SIZE,
        }
    }
}

/// A ghost record of either element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GhostInfo {
    Tetra(TetraGhostInfo),
    Hexa(HexaGhostInfo),
}

impl GhostInfo {
    #[inline]
    pub fn kind(&self) -> GhostKind {
        match self {
            GhostInfo::Tetra(_) => GhostKind::Tetra,
            GhostInfo::Hexa(_) => GhostKind::Hexa,
        }
    }

    pub fn read_data<S: InStream + ?Sized>(stream: &mut S, kind: GhostKind) -> Result<Self, MeshError> {
        Ok(match kind {
            GhostKind::Tetra => GhostInfo::Tetra(TetraGhostInfo::read_data(stream)?),
            GhostKind::Hexa => GhostInfo::Hexa(HexaGhostInfo::read_data(stream)?),
        })
    }

    pub fn inline_ghost_element<S: OutStream + ?Sized>(&self, stream: &mut S) {
        match self {
            GhostInfo::Tetra(t) => t.inline_ghost_element(stream),
            GhostInfo::Hexa(h) => h.inline_ghost_element(stream),
        }
    }

    pub fn point(&self, i: usize) -> &[f64; 3] {
        match self {
            GhostInfo::Tetra(t) => t.point(i),
            GhostInfo::Hexa(h) => h.point(i),
        }
    }

    pub fn nop(&self) -> usize {
        match self {
            GhostInfo::Tetra(t) => t.nop(),
            GhostInfo::Hexa(h) => h.nop(),
        }
    }

    pub fn internal_face(&self) -> usize {
        self.face_code().face() as usize
    }

    pub fn face_code(&self) -> FaceCode {
        match self {
            GhostInfo::Tetra(t) => t.face_code(),
            GhostInfo::Hexa(h) => h.face_code(),
        }
    }

    pub fn vertices(&self) -> &[i32] {
        match self {
            GhostInfo::Tetra(t) => t.vertices(),
            GhostInfo::Hexa(h) => h.vertices(),
        }
    }

    pub fn outer_vertices(&self) -> &[i32] {
        match self {
            GhostInfo::Tetra(t) => t.outer_vertices(),
            GhostInfo::Hexa(h) => h.outer_vertices(),
        }
    }

    /// Bisection tag; hexahedra have none.
    pub fn simplex_type_flag(&self) -> Option<SimplexTypeFlag> {
        match self {
            GhostInfo::Tetra(t) => Some(t.simplex_type_flag()),
            GhostInfo::Hexa(_) => None,
        }
    }
}

impl From<TetraGhostInfo> for GhostInfo {
    fn from(info: TetraGhostInfo) -> Self {
        GhostInfo::Tetra(info)
    }
}

impl From<HexaGhostInfo> for GhostInfo {
    fn from(info: HexaGhostInfo) -> Self {
        GhostInfo::Hexa(info)
    }
}

impl DebugInvariants for GhostInfo {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        match self {
            GhostInfo::Tetra(t) => t.validate_invariants(),
            GhostInfo::Hexa(h) => h.validate_invariants(),
        }
    }
}

/// Write one record.
#[inline]
pub fn write_ghost<S: OutStream + ?Sized>(stream: &mut S, info: &GhostInfo) {
    info.inline_ghost_element(stream);
}

/// Read one record of a known kind.
#[inline]
pub fn read_ghost<S: InStream + ?Sized>(stream: &mut S, kind: GhostKind) -> Result<GhostInfo, MeshError> {
    GhostInfo::read_data(stream, kind)
}

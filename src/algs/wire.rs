//! Fixed, versioned, little-endian frame headers for ghost exchange.

use crate::mesh_error::MeshError;
use bytemuck::{Pod, Zeroable};
use std::mem::size_of;

pub fn cast_slice<T: Pod>(v: &[T]) -> &[u8] {
    bytemuck::cast_slice(v)
}

pub fn cast_slice_mut<T: Pod>(v: &mut [T]) -> &mut [u8] {
    bytemuck::cast_slice_mut(v)
}

/// Bump when the layout or semantics change in incompatible ways.
pub const WIRE_VERSION: u16 = 1;

/// Frame kind: a batch of ghost records, each prefixed by its kind byte.
pub const KIND_GHOST_FRAME: u16 = 1;

// All multi-byte integers below are little-endian on the wire.
// They are stored pre-LE with `.to_le()` and decoded with `.from_le()`.

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireHdr {
    pub version_le: u16,  // = WIRE_VERSION.to_le()
    pub kind_le: u16,     // KIND_GHOST_FRAME
    pub reserved_le: u32, // keep zero
}

impl WireHdr {
    pub const SIZE: usize = 8;

    pub fn new(kind: u16) -> Self {
        Self {
            version_le: WIRE_VERSION.to_le(),
            kind_le: kind.to_le(),
            reserved_le: 0,
        }
    }
    pub fn kind(&self) -> u16 {
        u16::from_le(self.kind_le)
    }
    pub fn version(&self) -> u16 {
        u16::from_le(self.version_le)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireCount {
    pub n_le: u32, // count of following records or bytes
}

impl WireCount {
    pub const SIZE: usize = 4;

    /// Fails when `n` does not fit the 32-bit wire field.
    pub fn try_new(n: usize) -> Result<Self, MeshError> {
        let n = u32::try_from(n).map_err(|_| {
            MeshError::WireMismatch(format!("count {n} exceeds the 32-bit wire field"))
        })?;
        Ok(Self { n_le: n.to_le() })
    }

    pub const fn zero() -> Self {
        Self { n_le: 0 }
    }
    pub fn get(&self) -> usize {
        u32::from_le(self.n_le) as usize
    }
}

const _: () = {
    assert!(size_of::<WireHdr>() == WireHdr::SIZE);
    assert!(size_of::<WireCount>() == WireCount::SIZE);
};

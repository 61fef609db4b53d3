//! Packed, typed indices for primal and dual mesh entities.
//!
//! Nodes and half-edges of both mesh types live in the same kind of flat
//! storage. An [`Index`] packs the storage position together with the mesh
//! type bit, `raw = (position << 1) | type`, so switching to the other mesh
//! type is a single bit flip and ordering follows storage order.
//!
//! The phantom `Tag` parameter keeps node indices and half-edge indices apart
//! at compile time; the embedded [`MeshType`] keeps primal and dual apart at
//! run time.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Not, Sub, SubAssign};

/// Which of the two linked meshes an entity belongs to.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum MeshType {
    /// The input mesh: vertices are nodes, polygons are cells.
    Primal = 0,
    /// The dual mesh: polygons (and boundary entities) are nodes.
    Dual = 1,
}

impl MeshType {
    /// Both mesh types, primal first.
    pub const ALL: [MeshType; 2] = [MeshType::Primal, MeshType::Dual];

    /// The low bit stored in packed indices.
    #[inline]
    pub const fn bit(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_bit(bit: usize) -> Self {
        if bit & 1 == 0 {
            MeshType::Primal
        } else {
            MeshType::Dual
        }
    }

    /// The other mesh type.
    #[inline]
    pub const fn dual(self) -> Self {
        Self::from_bit(self.bit() ^ 1)
    }
}

impl Not for MeshType {
    type Output = MeshType;

    #[inline]
    fn not(self) -> MeshType {
        self.dual()
    }
}

impl fmt::Display for MeshType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshType::Primal => f.write_str("primal"),
            MeshType::Dual => f.write_str("dual"),
        }
    }
}

/// Marker trait for index tags.
pub trait IndexTag: 'static {
    /// Short name used in `Debug` output.
    const NAME: &'static str;
}

/// Tag for node (vertex / cell-centre) indices.
#[derive(Debug)]
pub enum NodeTag {}

/// Tag for half-edge indices.
#[derive(Debug)]
pub enum HalfEdgeTag {}

impl IndexTag for NodeTag {
    const NAME: &'static str = "Node";
}

impl IndexTag for HalfEdgeTag {
    const NAME: &'static str = "HalfEdge";
}

/// A packed `(position, mesh type)` handle.
///
/// The default value is the invalid sentinel (`raw == usize::MAX`), used for
/// "no such entity" results.
#[derive(Serialize, Deserialize)]
#[serde(transparent, bound = "")]
#[repr(transparent)]
pub struct Index<Tag> {
    raw: usize,
    #[serde(skip)]
    _tag: PhantomData<fn() -> Tag>,
}

/// Index of a node in either mesh.
pub type NodeIndex = Index<NodeTag>;
/// Index of a half-edge in either mesh.
pub type HalfEdgeIndex = Index<HalfEdgeTag>;

impl<Tag> Index<Tag> {
    /// Raw value of the invalid sentinel.
    pub const INVALID_RAW: usize = usize::MAX;

    /// Largest position that still fits after packing.
    pub const MAX_POSITION: usize = (usize::MAX >> 1) - 1;

    /// Pack `position` and `mesh_type`.
    #[inline]
    pub fn new(position: usize, mesh_type: MeshType) -> Self {
        debug_assert!(position <= Self::MAX_POSITION, "index position {position} too large");
        Self::from_raw((position << 1) | mesh_type.bit())
    }

    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self {
            raw,
            _tag: PhantomData,
        }
    }

    /// The invalid sentinel.
    #[inline]
    pub const fn invalid() -> Self {
        Self::from_raw(Self::INVALID_RAW)
    }

    #[inline]
    pub const fn raw(self) -> usize {
        self.raw
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.raw != Self::INVALID_RAW
    }

    /// Storage position, i.e. the raw value divided by two.
    #[inline]
    pub const fn position(self) -> usize {
        self.raw >> 1
    }

    #[inline]
    pub const fn mesh_type(self) -> MeshType {
        MeshType::from_bit(self.raw)
    }

    /// Same position in the other mesh type. The sentinel stays invalid.
    #[inline]
    pub const fn dual(self) -> Self {
        if self.is_valid() {
            Self::from_raw(self.raw ^ 1)
        } else {
            self
        }
    }

    /// Iterate `[self, end)`; both ends must share a mesh type.
    #[inline]
    pub fn range_to(self, end: Self) -> IndexRange<Tag> {
        IndexRange::new(self, end)
    }
}

// Manual impls: derives would put bounds on the uninhabited tag types.

impl<Tag> Clone for Index<Tag> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<Tag> Copy for Index<Tag> {}

impl<Tag> Default for Index<Tag> {
    #[inline]
    fn default() -> Self {
        Self::invalid()
    }
}

impl<Tag> PartialEq for Index<Tag> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<Tag> Eq for Index<Tag> {}

impl<Tag> PartialOrd for Index<Tag> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Tag> Ord for Index<Tag> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<Tag> Hash for Index<Tag> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<Tag: IndexTag> fmt::Debug for Index<Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}({}, {})", Tag::NAME, self.position(), self.mesh_type())
        } else {
            write!(f, "{}(invalid)", Tag::NAME)
        }
    }
}

impl<Tag> fmt::Display for Index<Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{}", self.mesh_type(), self.position())
        } else {
            f.write_str("invalid")
        }
    }
}

impl<Tag> Add<usize> for Index<Tag> {
    type Output = Self;

    #[inline]
    fn add(self, n: usize) -> Self {
        Self::from_raw(self.raw + (n << 1))
    }
}

impl<Tag> AddAssign<usize> for Index<Tag> {
    #[inline]
    fn add_assign(&mut self, n: usize) {
        self.raw += n << 1;
    }
}

impl<Tag> Sub<usize> for Index<Tag> {
    type Output = Self;

    #[inline]
    fn sub(self, n: usize) -> Self {
        Self::from_raw(self.raw - (n << 1))
    }
}

impl<Tag> SubAssign<usize> for Index<Tag> {
    #[inline]
    fn sub_assign(&mut self, n: usize) {
        self.raw -= n << 1;
    }
}

/// Signed distance in positions.
impl<Tag> Sub for Index<Tag> {
    type Output = isize;

    #[inline]
    fn sub(self, other: Self) -> isize {
        debug_assert_eq!(self.mesh_type(), other.mesh_type());
        (self.raw as isize - other.raw as isize) >> 1
    }
}

/// Half-open range of consecutive indices of one mesh type.
pub struct IndexRange<Tag> {
    front: Index<Tag>,
    back: Index<Tag>,
}

impl<Tag> IndexRange<Tag> {
    #[inline]
    pub fn new(begin: Index<Tag>, end: Index<Tag>) -> Self {
        debug_assert_eq!(begin.mesh_type(), end.mesh_type());
        debug_assert!(begin <= end);
        Self {
            front: begin,
            back: end,
        }
    }

    #[inline]
    pub fn empty(mesh_type: MeshType) -> Self {
        let i = Index::new(0, mesh_type);
        Self { front: i, back: i }
    }
}

impl<Tag> Clone for IndexRange<Tag> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
        }
    }
}

impl<Tag: IndexTag> fmt::Debug for IndexRange<Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexRange")
            .field("begin", &self.front)
            .field("end", &self.back)
            .finish()
    }
}

impl<Tag> Iterator for IndexRange<Tag> {
    type Item = Index<Tag>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            let i = self.front;
            self.front += 1;
            Some(i)
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.back.raw() - self.front.raw()) >> 1;
        (n, Some(n))
    }
}

impl<Tag> DoubleEndedIterator for IndexRange<Tag> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            self.back -= 1;
            Some(self.back)
        } else {
            None
        }
    }
}

impl<Tag> ExactSizeIterator for IndexRange<Tag> {}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_roundtrip() {
        let n = NodeIndex::new(21, MeshType::Dual);
        assert_eq!(n.raw(), 43);
        assert_eq!(n.position(), 21);
        assert_eq!(n.mesh_type(), MeshType::Dual);
        let p = n.dual();
        assert_eq!(p.position(), 21);
        assert_eq!(p.mesh_type(), MeshType::Primal);
        assert_eq!(p.dual(), n);
    }

    #[test]
    fn default_is_invalid() {
        let h = HalfEdgeIndex::default();
        assert!(!h.is_valid());
        assert!(!h.dual().is_valid());
        assert_eq!(format!("{h:?}"), "HalfEdge(invalid)");
    }

    #[test]
    fn arithmetic_moves_by_positions() {
        let mut h = HalfEdgeIndex::new(3, MeshType::Primal);
        h += 2;
        assert_eq!(h.position(), 5);
        assert_eq!(h.mesh_type(), MeshType::Primal);
        let g = h - 4;
        assert_eq!(g.position(), 1);
        assert_eq!(h - g, 4);
        assert_eq!(g - h, -4);
        assert!(g < h);
    }

    #[test]
    fn range_iterates_both_ways() {
        let b = HalfEdgeIndex::new(2, MeshType::Dual);
        let e = HalfEdgeIndex::new(5, MeshType::Dual);
        let fwd: Vec<usize> = b.range_to(e).map(|h| h.position()).collect();
        assert_eq!(fwd, vec![2, 3, 4]);
        let back: Vec<usize> = b.range_to(e).rev().map(|h| h.position()).collect();
        assert_eq!(back, vec![4, 3, 2]);
        assert_eq!(b.range_to(e).len(), 3);
        assert_eq!(IndexRange::<HalfEdgeTag>::empty(MeshType::Dual).count(), 0);
    }

    #[test]
    fn mesh_type_not() {
        assert_eq!(!MeshType::Primal, MeshType::Dual);
        assert_eq!(!MeshType::Dual, MeshType::Primal);
        assert_eq!(MeshType::Dual.to_string(), "dual");
    }
}

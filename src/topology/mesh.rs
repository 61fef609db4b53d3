//! `Mesh`: linked primal/dual half-edge mesh built from a polygon soup.
//!
//! Construction runs boundary detection, the structure builder, the cycle
//! check (per [`MeshOptions`]), then derives node positions and edge ids.
//! The result is immutable; any change of the input requires a rebuild.
//!
//! A half-edge of either mesh type is a slot of its source node's row. For a
//! primal half-edge `v -> w` with polygon `f` on its left and `g` on its
//! right, [`Mesh::dual`] is the dual half-edge `f -> g`, and
//! [`Mesh::flip`] (two dual steps) is `w -> v`. Rows run counter-clockwise,
//! so `next(h) == dual(prev(dual(h)))` for every half-edge except the last
//! one of a synthetic node.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::index::{HalfEdgeIndex, HalfEdgeTag, IndexRange, MeshType, NodeIndex, NodeTag};
use crate::topology::multi_vector::MultiVector;
use crate::topology::structure::{Link, MeshStructure, boundaries, mesh_structure};
use crate::topology::validation::{StructureCheck, enforce_structure, find_broken_cycle};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Planar vertex coordinate.
pub type GlobalCoordinate = [f64; 2];

/// Construction options for [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeshOptions {
    /// Policy when a half-edge cycle does not close.
    pub structure_check: StructureCheck,
}

impl MeshOptions {
    /// Keep meshes with broken cycles, logging them as warnings.
    pub fn lenient() -> Self {
        Self {
            structure_check: StructureCheck::Warn,
        }
    }

    pub fn with_structure_check(mut self, structure_check: StructureCheck) -> Self {
        self.structure_check = structure_check;
        self
    }
}

/// Primal and dual half-edge mesh with positions and edge numbering.
#[derive(Debug, Clone)]
pub struct Mesh {
    nodes: MeshStructure,
    positions: [Vec<GlobalCoordinate>; 2],
    edge_indices: Vec<usize>,
    num_edge_indices: usize,
    boundaries: Vec<(usize, usize)>,
}

impl Mesh {
    /// Build with default options (broken cycles are an error).
    pub fn new(
        vertices: Vec<GlobalCoordinate>,
        polygons: &MultiVector<usize>,
    ) -> Result<Self, MeshError> {
        Self::with_options(vertices, polygons, MeshOptions::default())
    }

    pub fn with_options(
        vertices: Vec<GlobalCoordinate>,
        polygons: &MultiVector<usize>,
        options: MeshOptions,
    ) -> Result<Self, MeshError> {
        Self::build(vertices.len(), vertices, polygons, options)
    }

    /// Build from an explicit vertex count; `vertices` must match it.
    pub fn build(
        num_vertices: usize,
        vertices: Vec<GlobalCoordinate>,
        polygons: &MultiVector<usize>,
        options: MeshOptions,
    ) -> Result<Self, MeshError> {
        if vertices.len() != num_vertices {
            return Err(MeshError::PositionCountMismatch {
                expected: num_vertices,
                found: vertices.len(),
            });
        }
        let boundaries = boundaries(num_vertices, polygons)?;
        let nodes = mesh_structure(num_vertices, polygons, &boundaries)?;
        enforce_structure(&nodes, options.structure_check)?;

        let positions = compute_positions(vertices, polygons, &boundaries);
        let mut mesh = Self {
            nodes,
            positions,
            edge_indices: Vec::new(),
            num_edge_indices: 0,
            boundaries,
        };
        let (edge_indices, num_edge_indices) = mesh.number_edges();
        mesh.edge_indices = edge_indices;
        mesh.num_edge_indices = num_edge_indices;

        log::debug!(
            "mesh: {} cells, {} edges, {} vertices, {} boundary segments",
            mesh.num_cells(MeshType::Primal),
            mesh.num_edges(MeshType::Primal),
            mesh.num_vertices(MeshType::Primal),
            mesh.num_boundaries(MeshType::Primal)
        );
        Ok(mesh)
    }

    /// The linked adjacency tables.
    #[inline]
    pub fn nodes(&self) -> &MeshStructure {
        &self.nodes
    }

    /// Open boundary pairs `(a, b)` in construction order.
    #[inline]
    pub fn boundaries(&self) -> &[(usize, usize)] {
        &self.boundaries
    }

    #[inline]
    fn link(&self, half_edge: HalfEdgeIndex) -> Link {
        self.nodes[half_edge.mesh_type()].values()[half_edge.position()]
    }

    /// The dual half-edge, crossing the same edge in the other mesh type.
    ///
    /// # Panics
    /// Panics if `half_edge` is out of range or its slot was never resolved
    /// (only possible when the mesh was built with a lenient structure check).
    #[inline]
    pub fn dual(&self, half_edge: HalfEdgeIndex) -> HalfEdgeIndex {
        let link = self.link(half_edge);
        assert!(link.is_valid(), "half-edge {half_edge:?} has no dual");
        let mesh_type = !half_edge.mesh_type();
        HalfEdgeIndex::new(self.nodes[mesh_type].offset(link.node) + link.position, mesh_type)
    }

    /// Like [`dual`](Self::dual), but `None` instead of panicking.
    pub fn try_dual(&self, half_edge: HalfEdgeIndex) -> Option<HalfEdgeIndex> {
        if !half_edge.is_valid() {
            return None;
        }
        let link = *self.nodes[half_edge.mesh_type()]
            .values()
            .get(half_edge.position())?;
        let mesh_type = !half_edge.mesh_type();
        let table = &self.nodes[mesh_type];
        if !link.is_valid() || link.node >= table.len() || link.position >= table.row_len(link.node)
        {
            return None;
        }
        Some(HalfEdgeIndex::new(table.offset(link.node) + link.position, mesh_type))
    }

    /// The opposite half-edge of the same mesh type.
    #[inline]
    pub fn flip(&self, half_edge: HalfEdgeIndex) -> HalfEdgeIndex {
        self.dual(self.dual(half_edge))
    }

    pub fn try_flip(&self, half_edge: HalfEdgeIndex) -> Option<HalfEdgeIndex> {
        self.try_dual(half_edge).and_then(|d| self.try_dual(d))
    }

    /// Node the half-edge points at.
    #[inline]
    pub fn target(&self, half_edge: HalfEdgeIndex) -> NodeIndex {
        let link = self.link(self.dual(half_edge));
        NodeIndex::new(link.node, half_edge.mesh_type())
    }

    pub fn try_target(&self, half_edge: HalfEdgeIndex) -> Option<NodeIndex> {
        let dual = self.try_dual(half_edge)?;
        let link = self.link(dual);
        link.is_valid()
            .then(|| NodeIndex::new(link.node, half_edge.mesh_type()))
    }

    /// Node owning the half-edge's slot (binary search over row offsets);
    /// the invalid sentinel for out-of-range input.
    pub fn node(&self, half_edge: HalfEdgeIndex) -> NodeIndex {
        let mesh_type = half_edge.mesh_type();
        match self.nodes[mesh_type].row_of(half_edge.position()) {
            Some(node) if half_edge.is_valid() => NodeIndex::new(node, mesh_type),
            _ => NodeIndex::invalid(),
        }
    }

    /// Cyclic successor within the source node's row.
    pub fn next(&self, half_edge: HalfEdgeIndex) -> HalfEdgeIndex {
        let node = self.node(half_edge);
        let following = half_edge + 1;
        if following == self.end(node) {
            self.begin(node)
        } else {
            following
        }
    }

    /// Cyclic predecessor within the source node's row.
    pub fn prev(&self, half_edge: HalfEdgeIndex) -> HalfEdgeIndex {
        let node = self.node(half_edge);
        if half_edge == self.begin(node) {
            self.end(node) - 1
        } else {
            half_edge - 1
        }
    }

    #[inline]
    pub fn begin(&self, node: NodeIndex) -> HalfEdgeIndex {
        let mesh_type = node.mesh_type();
        HalfEdgeIndex::new(self.nodes[mesh_type].offset(node.position()), mesh_type)
    }

    #[inline]
    pub fn end(&self, node: NodeIndex) -> HalfEdgeIndex {
        let mesh_type = node.mesh_type();
        HalfEdgeIndex::new(self.nodes[mesh_type].offset(node.position() + 1), mesh_type)
    }

    /// Half-edges leaving `node`, counter-clockwise. At a boundary vertex
    /// each fan of polygons is followed by the boundary edge closing it and
    /// the two half segments meeting there.
    #[inline]
    pub fn half_edges(&self, node: NodeIndex) -> IndexRange<HalfEdgeTag> {
        self.begin(node).range_to(self.end(node))
    }

    /// All nodes of one mesh type, regular nodes first.
    pub fn node_indices(&self, mesh_type: MeshType) -> IndexRange<NodeTag> {
        NodeIndex::new(0, mesh_type).range_to(NodeIndex::new(self.num_nodes(mesh_type), mesh_type))
    }

    /// Whether the node is an input entity rather than a boundary closure.
    #[inline]
    pub fn regular(&self, node: NodeIndex) -> bool {
        self.nodes.is_regular(node.mesh_type(), node.position())
    }

    #[inline]
    pub fn position(&self, node: NodeIndex) -> GlobalCoordinate {
        self.positions[node.mesh_type().bit()][node.position()]
    }

    #[inline]
    pub fn positions(&self, mesh_type: MeshType) -> &[GlobalCoordinate] {
        &self.positions[mesh_type.bit()]
    }

    /// Id of the edge a half-edge lies on (primal) or crosses (dual).
    ///
    /// Ids run `0..num_edges(Primal)`. The half segments of a boundary edge
    /// share its id.
    pub fn edge_index(&self, half_edge: HalfEdgeIndex) -> usize {
        let primal = match half_edge.mesh_type() {
            MeshType::Primal => half_edge,
            MeshType::Dual => self.dual(half_edge),
        };
        self.edge_indices[primal.position()]
    }

    /// Per-primal-half-edge edge ids.
    #[inline]
    pub fn edge_indices(&self) -> &[usize] {
        &self.edge_indices
    }

    /// Number of distinct edge ids; `num_edges(Primal)` for a consistent mesh.
    #[inline]
    pub fn num_edge_indices(&self) -> usize {
        self.num_edge_indices
    }

    #[inline]
    pub fn num_regular_nodes(&self, mesh_type: MeshType) -> usize {
        self.nodes.num_regular_nodes(mesh_type)
    }

    #[inline]
    pub fn num_nodes(&self, mesh_type: MeshType) -> usize {
        self.nodes.num_nodes(mesh_type)
    }

    #[inline]
    pub fn num_half_edges(&self, mesh_type: MeshType) -> usize {
        self.nodes.num_half_edges(mesh_type)
    }

    /// Boundary segments of the input; both mesh types carry one synthetic
    /// pair of nodes per segment.
    #[inline]
    pub fn num_boundaries(&self, mesh_type: MeshType) -> usize {
        (self.num_nodes(mesh_type) - self.num_regular_nodes(mesh_type)) / 2
    }

    #[inline]
    pub fn num_cells(&self, mesh_type: MeshType) -> usize {
        self.num_regular_nodes(!mesh_type)
    }

    #[inline]
    pub fn num_vertices(&self, mesh_type: MeshType) -> usize {
        match mesh_type {
            MeshType::Primal => self.num_regular_nodes(MeshType::Primal),
            MeshType::Dual => self.num_nodes(MeshType::Dual),
        }
    }

    /// Each boundary segment adds five primal half-edges, one of which lies on
    /// the regular boundary edge; every dual edge crosses exactly one edge.
    #[inline]
    pub fn num_edges(&self, mesh_type: MeshType) -> usize {
        let half_edges = self.num_half_edges(MeshType::Primal);
        match mesh_type {
            MeshType::Primal => (half_edges - 4 * self.num_boundaries(MeshType::Primal)) / 2,
            MeshType::Dual => half_edges / 2,
        }
    }

    /// Boundary pair a synthetic primal half-edge belongs to: the one of
    /// its half-segment node, at either end.
    fn half_segment_pair(&self, half_edge: HalfEdgeIndex) -> Option<usize> {
        let first_synthetic = self.num_regular_nodes(MeshType::Primal);
        [Some(self.node(half_edge)), self.try_target(half_edge)]
            .into_iter()
            .flatten()
            .find(|&n| n.is_valid() && !self.regular(n))
            .map(|n| (n.position() - first_synthetic) / 2)
    }

    /// Primal half-edge `b -> a` of boundary pair `(a, b)`, found through
    /// its edge cell.
    fn boundary_edge(&self, pair: usize) -> Option<HalfEdgeIndex> {
        let position = self.num_regular_nodes(MeshType::Dual) + 2 * pair;
        if position >= self.num_nodes(MeshType::Dual) {
            return None;
        }
        let cell = NodeIndex::new(position, MeshType::Dual);
        self.try_dual(self.begin(cell) + 1)
    }

    /// Give both half-edges of each edge one id in a single scan. A half
    /// segment takes the id of its boundary edge, numbering that edge first
    /// when the scan has not reached it yet.
    fn number_edges(&self) -> (Vec<usize>, usize) {
        const UNSET: usize = usize::MAX;
        let mut ids = vec![UNSET; self.num_half_edges(MeshType::Primal)];
        let mut next = 0;
        let assign = |ids: &mut Vec<usize>, h: HalfEdgeIndex, id: usize| {
            for half in [Some(h), self.try_flip(h)].into_iter().flatten() {
                if ids[half.position()] == UNSET {
                    ids[half.position()] = id;
                }
            }
        };
        for node in self.node_indices(MeshType::Primal) {
            for h in self.half_edges(node) {
                if ids[h.position()] != UNSET {
                    continue;
                }
                let edge = self
                    .half_segment_pair(h)
                    .and_then(|pair| self.boundary_edge(pair))
                    .filter(|e| self.half_segment_pair(*e).is_none());
                let id = match edge {
                    Some(e) if ids[e.position()] != UNSET => ids[e.position()],
                    Some(e) => {
                        next += 1;
                        assign(&mut ids, e, next - 1);
                        next - 1
                    }
                    None => {
                        next += 1;
                        next - 1
                    }
                };
                assign(&mut ids, h, id);
            }
        }
        (ids, next)
    }
}

impl DebugInvariants for Mesh {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        for mesh_type in MeshType::ALL {
            if let Some(cycle) = find_broken_cycle(&self.nodes, mesh_type) {
                return Err((&cycle).into());
            }
        }
        Ok(())
    }
}

/// Area-weighted centroid; the vertex mean when the area vanishes.
pub fn polygon_centroid(vertices: &[GlobalCoordinate], polygon: &[usize]) -> GlobalCoordinate {
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (&i, &j) in polygon.iter().circular_tuple_windows() {
        let [x0, y0] = vertices[i];
        let [x1, y1] = vertices[j];
        let cross = x0 * y1 - x1 * y0;
        area2 += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    if area2.abs() > f64::EPSILON {
        [cx / (3.0 * area2), cy / (3.0 * area2)]
    } else {
        let n = polygon.len().max(1) as f64;
        let (sx, sy) = polygon
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &v| (sx + vertices[v][0], sy + vertices[v][1]));
        [sx / n, sy / n]
    }
}

#[inline]
fn lerp(a: GlobalCoordinate, b: GlobalCoordinate, t: f64) -> GlobalCoordinate {
    [a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])]
}

fn compute_positions(
    vertices: Vec<GlobalCoordinate>,
    polygons: &MultiVector<usize>,
    boundaries: &[(usize, usize)],
) -> [Vec<GlobalCoordinate>; 2] {
    #[cfg(feature = "rayon")]
    let mut dual: Vec<GlobalCoordinate> = {
        use rayon::prelude::*;
        (0..polygons.len())
            .into_par_iter()
            .map(|f| polygon_centroid(&vertices, polygons.row(f)))
            .collect()
    };
    #[cfg(not(feature = "rayon"))]
    let mut dual: Vec<GlobalCoordinate> = polygons
        .iter()
        .map(|polygon| polygon_centroid(&vertices, polygon))
        .collect();

    let mut primal = vertices;
    primal.reserve(2 * boundaries.len());
    dual.reserve(2 * boundaries.len());
    for &(a, b) in boundaries {
        let (pa, pb) = (primal[a], primal[b]);
        // half segments a..m and m..b
        primal.push(lerp(pa, pb, 0.25));
        primal.push(lerp(pa, pb, 0.75));
        // edge cell at the midpoint, vertex cell on a
        dual.push(lerp(pa, pb, 0.5));
        dual.push(pa);
    }
    [primal, dual]
}

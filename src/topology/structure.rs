//! Construction of the linked primal/dual adjacency tables.
//!
//! Every node of either mesh owns a row of [`Link`]s. A slot at
//! `(node, position)` of one mesh type is a half-edge; the link it stores is
//! that half-edge's *dual*, a slot in the other mesh type. Applying the dual
//! four times walks around one edge "diamond"
//!
//! ```text
//!   v --(left face f)--> w --(right face g)--> v
//!   (v, k) -> (f, p) -> (w, l) -> (g, q) -> (v, k)
//! ```
//!
//! so the dual of the dual of a half-edge is its opposite half-edge.
//!
//! Open boundaries are closed with synthetic entities. Boundary pair `i`,
//! `(a, b)`, adds the dual edge cell `E = F + 2i` (three slots), the dual
//! vertex cell `V = F + 2i + 1` for `a` (two slots), and the primal
//! half-segment nodes `P = V + 2i` and `Q = V + 2i + 1` (one slot each).
//! Vertex `a` gains the slots `a -> b` and `a -> P`, vertex `b` the slot
//! `b -> Q`. The three diamonds are
//!
//! ```text
//!   (a, E, b, f)    (a, V, P, E)    (b, E, Q, V')
//! ```
//!
//! where `f` is the polygon owning `b -> a` and `V'` is the vertex cell of
//! the pair that continues the boundary at `b`.
//!
//! Rows list their half-edges counter-clockwise, so the dual of the slot
//! before `dual(h)` is the slot after `h`. A boundary vertex row runs through
//! each of its fans, then `a -> b`, `a -> P` and the `b -> Q` slot of the pair
//! opening the next fan. Synthetic rows are open chains: the rule holds for
//! every slot but their last.

use crate::mesh_error::MeshError;
use crate::topology::index::MeshType;
use crate::topology::multi_vector::MultiVector;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Slots of a synthetic boundary edge cell.
pub const EDGE_CELL_SLOTS: usize = 3;
/// Slots of a synthetic boundary vertex cell.
pub const VERTEX_CELL_SLOTS: usize = 2;
/// Slots of a synthetic primal half-segment node.
pub const HALF_SEGMENT_SLOTS: usize = 1;

/// One adjacency slot: the dual half-edge as `(node, position)` in the other
/// mesh type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub node: usize,
    pub position: usize,
}

impl Link {
    /// Unresolved slot.
    pub const INVALID: Link = Link {
        node: usize::MAX,
        position: usize::MAX,
    };

    #[inline]
    pub const fn new(node: usize, position: usize) -> Self {
        Self { node, position }
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.node != usize::MAX
    }
}

/// Adjacency tables of both meshes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshStructure {
    tables: [MultiVector<Link>; 2],
    num_regular: [usize; 2],
}

impl MeshStructure {
    /// Tables without synthetic nodes.
    pub fn new(primal: MultiVector<Link>, dual: MultiVector<Link>) -> Self {
        let num_regular = [primal.len(), dual.len()];
        Self::with_regular(primal, dual, num_regular)
    }

    /// Tables whose first `num_regular[t]` rows are input entities and whose
    /// remaining rows close the boundary.
    pub fn with_regular(
        primal: MultiVector<Link>,
        dual: MultiVector<Link>,
        num_regular: [usize; 2],
    ) -> Self {
        let num_regular = [
            num_regular[0].min(primal.len()),
            num_regular[1].min(dual.len()),
        ];
        Self {
            tables: [primal, dual],
            num_regular,
        }
    }

    #[inline]
    pub fn num_regular_nodes(&self, mesh_type: MeshType) -> usize {
        self.num_regular[mesh_type.bit()]
    }

    #[inline]
    pub fn is_regular(&self, mesh_type: MeshType, node: usize) -> bool {
        node < self.num_regular_nodes(mesh_type)
    }

    #[inline]
    pub fn table(&self, mesh_type: MeshType) -> &MultiVector<Link> {
        &self.tables[mesh_type.bit()]
    }

    #[inline]
    pub fn num_nodes(&self, mesh_type: MeshType) -> usize {
        self.table(mesh_type).len()
    }

    #[inline]
    pub fn num_half_edges(&self, mesh_type: MeshType) -> usize {
        self.table(mesh_type).values().len()
    }

    /// Bounds-checked slot lookup.
    pub fn link(&self, mesh_type: MeshType, node: usize, position: usize) -> Option<Link> {
        self.table(mesh_type).get(node)?.get(position).copied()
    }

    pub fn into_tables(self) -> [MultiVector<Link>; 2] {
        self.tables
    }
}

impl Index<MeshType> for MeshStructure {
    type Output = MultiVector<Link>;

    #[inline]
    fn index(&self, mesh_type: MeshType) -> &MultiVector<Link> {
        self.table(mesh_type)
    }
}

/// Open boundary edges of a polygon soup.
///
/// For every polygon edge `j -> i` nobody traverses as `i -> j`, the pair
/// `(i, j)` is reported, in polygon order and then vertex order. The polygon
/// that owns the edge therefore runs `b -> a` for a reported pair `(a, b)`.
pub fn boundaries(
    num_vertices: usize,
    polygons: &MultiVector<usize>,
) -> Result<Vec<(usize, usize)>, MeshError> {
    check_vertex_range(num_vertices, polygons)?;
    let successors = successor_lists(num_vertices, polygons);

    let mut result = Vec::new();
    for polygon in polygons.iter() {
        let Some(&last) = polygon.last() else {
            continue;
        };
        let mut prev = last;
        for &v in polygon {
            if !successors.row(v).contains(&prev) {
                result.push((v, prev));
            }
            prev = v;
        }
    }
    Ok(result)
}

/// Build the linked primal and dual tables for a polygon soup.
///
/// `boundaries` must be the output of [`boundaries`] for the same input.
/// Inconsistent winding is not rejected here: slots that cannot be matched
/// stay [`Link::INVALID`] or pair up wrongly, and
/// [`check_structure`](crate::topology::validation::check_structure) reports
/// them.
pub fn mesh_structure(
    num_vertices: usize,
    polygons: &MultiVector<usize>,
    boundaries: &[(usize, usize)],
) -> Result<MeshStructure, MeshError> {
    validate_polygons(num_vertices, polygons)?;
    validate_boundaries(num_vertices, boundaries)?;

    let num_polygons = polygons.len();
    let num_boundaries = boundaries.len();

    let mut regular_degree = vec![0usize; num_vertices];
    for polygon in polygons.iter() {
        for &v in polygon {
            regular_degree[v] += 1;
        }
    }
    let mut row_sizes = regular_degree.clone();
    for &(a, b) in boundaries {
        row_sizes[a] += 2;
        row_sizes[b] += 1;
    }

    let primal_sizes = row_sizes
        .iter()
        .copied()
        .chain(std::iter::repeat_n(HALF_SEGMENT_SLOTS, 2 * num_boundaries));
    let mut primal = MultiVector::with_sizes(primal_sizes, Link::INVALID);

    let dual_sizes = polygons
        .iter()
        .map(<[usize]>::len)
        .chain((0..num_boundaries).flat_map(|_| [EDGE_CELL_SLOTS, VERTEX_CELL_SLOTS]));
    let mut dual = MultiVector::with_sizes(dual_sizes, Link::INVALID);

    // polygon incidences: v in f points at the slot of its successor in f
    let mut cursor = vec![0usize; num_vertices];
    for (f, polygon) in polygons.iter().enumerate() {
        let n = polygon.len();
        for (j, &v) in polygon.iter().enumerate() {
            primal.row_mut(v)[cursor[v]] = Link::new(f, (j + 1) % n);
            cursor[v] += 1;
        }
    }

    let mut starting_at: HashMap<usize, Vec<usize>> = HashMap::with_capacity(num_boundaries);
    let mut ending_at: HashMap<usize, Vec<usize>> = HashMap::with_capacity(num_boundaries);
    for (i, &(a, b)) in boundaries.iter().enumerate() {
        starting_at.entry(a).or_default().push(i);
        ending_at.entry(b).or_default().push(i);
    }

    let mut slots = vec![BoundarySlots::default(); num_boundaries];
    let mut row = Vec::new();
    for v in 0..num_vertices {
        let fans = sort_fans(&primal.row(v)[..regular_degree[v]], polygons);
        let starts = starting_at.remove(&v).unwrap_or_default();
        let ends = ending_at.remove(&v).unwrap_or_default();
        layout_vertex_row(v, &fans, starts, ends, boundaries, polygons, &mut slots, &mut row);
        debug_assert_eq!(row.len(), row_sizes[v]);
        for (slot, link) in primal.row_mut(v).iter_mut().zip(&row) {
            *slot = *link;
        }
    }

    // directed edge (from, to) -> slot in `from`'s row; the first claim wins
    let mut slot_of: HashMap<(usize, usize), usize> =
        HashMap::with_capacity(primal.values().len());
    for v in 0..num_vertices {
        for (k, link) in primal.row(v).iter().enumerate() {
            // boundary slots are still unresolved here
            if link.is_valid() {
                let w = polygons.row(link.node)[link.position];
                slot_of.entry((v, w)).or_insert(k);
            }
        }
    }
    for (&(a, b), s) in boundaries.iter().zip(&slots) {
        slot_of.entry((a, b)).or_insert(s.edge);
    }
    let lookup = |from: usize, to: usize| {
        slot_of
            .get(&(from, to))
            .map_or(Link::INVALID, |&k| Link::new(from, k))
    };

    for (f, polygon) in polygons.iter().enumerate() {
        let n = polygon.len();
        let row = dual.row_mut(f);
        for j in 0..n {
            row[j] = lookup(polygon[j], polygon[(j + n - 1) % n]);
        }
    }

    for (i, (&(a, b), s)) in boundaries.iter().zip(&slots).enumerate() {
        let edge_cell = num_polygons + 2 * i;
        let vertex_cell = edge_cell + 1;
        let first_half = num_vertices + 2 * i;
        let second_half = first_half + 1;

        // the boundary edge itself: (a, edge cell, b, f)
        primal.row_mut(a)[s.edge] = Link::new(edge_cell, 1);
        dual.row_mut(edge_cell)[1] = lookup(b, a);

        // half segment at a: (a, vertex cell, first half, edge cell)
        primal.row_mut(a)[s.first_half] = Link::new(vertex_cell, 1);
        dual.row_mut(vertex_cell)[1] = Link::new(first_half, 0);
        primal.row_mut(first_half)[0] = Link::new(edge_cell, 0);
        dual.row_mut(edge_cell)[0] = Link::new(a, s.first_half);

        // half segment at b: (b, edge cell, second half, vertex cell of the next pair)
        primal.row_mut(b)[s.second_half] = Link::new(edge_cell, 2);
        dual.row_mut(edge_cell)[2] = Link::new(second_half, 0);
        if let Some(next) = s.continues_into {
            let next_cell = num_polygons + 2 * next + 1;
            primal.row_mut(second_half)[0] = Link::new(next_cell, 0);
            dual.row_mut(next_cell)[0] = Link::new(b, s.second_half);
        }
    }

    log::debug!(
        "mesh structure: {num_vertices} vertices, {num_polygons} polygons, {num_boundaries} boundary segments, {} half-edges per mesh",
        primal.values().len()
    );
    debug_assert_eq!(primal.values().len(), dual.values().len());

    Ok(MeshStructure::with_regular(
        primal,
        dual,
        [num_vertices, num_polygons],
    ))
}

#[derive(Copy, Clone, Debug, Default)]
struct BoundarySlots {
    /// `a -> b`, facing the edge cell; `a -> first half` follows it.
    edge: usize,
    first_half: usize,
    /// `b -> second half`.
    second_half: usize,
    /// Pair starting at `b` whose vertex cell closes the second half.
    continues_into: Option<usize>,
}

#[inline]
fn successor(polygons: &MultiVector<usize>, link: &Link) -> usize {
    polygons.row(link.node)[link.position]
}

#[inline]
fn predecessor(polygons: &MultiVector<usize>, link: &Link) -> usize {
    let p = polygons.row(link.node);
    p[(link.position + p.len() - 2) % p.len()]
}

/// Split a vertex's polygon incidences into counter-clockwise fans.
///
/// The incidence after polygon `f` is the polygon whose successor of the
/// vertex is `f`'s predecessor of it. A fan starts where the outgoing edge
/// has no polygon to its right; an interior vertex has a single cyclic fan
/// starting at its first incidence. Every incidence lands in exactly one fan.
fn sort_fans(incidences: &[Link], polygons: &MultiVector<usize>) -> Vec<Vec<Link>> {
    let succ = |l: &Link| successor(polygons, l);
    let pred = |l: &Link| predecessor(polygons, l);

    let mut remaining = incidences.to_vec();
    let mut fans = Vec::new();
    while !remaining.is_empty() {
        let start = (0..remaining.len())
            .find(|&k| !remaining.iter().any(|o| pred(o) == succ(&remaining[k])))
            .unwrap_or(0);
        let mut fan = vec![remaining.remove(start)];
        loop {
            let Some(wanted) = fan.last().map(pred) else {
                break;
            };
            let Some(m) = remaining.iter().position(|o| succ(o) == wanted) else {
                break;
            };
            fan.push(remaining.remove(m));
        }
        fans.push(fan);
    }
    fans
}

/// Lay out the row of vertex `v` into `row`, recording where its boundary
/// slots went.
///
/// Each fan is followed by the pair `(v, p)` that closes it (`p` being the
/// predecessor of `v` in the fan's last polygon), as `v -> p` and the first
/// half segment, then by the second half segment of the pair that opens the
/// next fan. Pairs that fit no fan (inconsistent winding) go last; every
/// pair starting or ending at `v` gets its slots either way.
#[allow(clippy::too_many_arguments)]
fn layout_vertex_row(
    v: usize,
    fans: &[Vec<Link>],
    mut starts: Vec<usize>,
    mut ends: Vec<usize>,
    boundaries: &[(usize, usize)],
    polygons: &MultiVector<usize>,
    slots: &mut [BoundarySlots],
    row: &mut Vec<Link>,
) {
    let take = |pairs: &mut Vec<usize>, wanted: (usize, usize)| {
        let k = pairs.iter().position(|&i| boundaries[i] == wanted)?;
        Some(pairs.remove(k))
    };
    let closing: Vec<Option<usize>> = fans
        .iter()
        .map(|fan| {
            let last = fan.last()?;
            take(&mut starts, (v, predecessor(polygons, last)))
        })
        .collect();
    let opening: Vec<Option<usize>> = fans
        .iter()
        .map(|fan| {
            let first = fan.first()?;
            take(&mut ends, (successor(polygons, first), v))
        })
        .collect();

    let m = fans.len();
    row.clear();
    for (j, fan) in fans.iter().enumerate() {
        row.extend_from_slice(fan);
        let Some(k) = closing[j] else {
            continue;
        };
        slots[k].edge = row.len();
        slots[k].first_half = row.len() + 1;
        row.extend([Link::INVALID; 2]);
        if let Some(i) = opening[(j + 1) % m] {
            slots[i].second_half = row.len();
            slots[i].continues_into = Some(k);
            row.push(Link::INVALID);
        }
    }

    // opening pairs whose previous fan had no closing pair, then the rest
    let mut spare_ends = (0..m)
        .filter(|&j| closing[(j + m - 1) % m].is_none())
        .filter_map(|j| opening[j])
        .chain(ends);
    for k in starts {
        slots[k].edge = row.len();
        slots[k].first_half = row.len() + 1;
        row.extend([Link::INVALID; 2]);
        if let Some(i) = spare_ends.next() {
            slots[i].second_half = row.len();
            slots[i].continues_into = Some(k);
            row.push(Link::INVALID);
        }
    }
    for i in spare_ends {
        slots[i].second_half = row.len();
        row.push(Link::INVALID);
    }
}

/// Per-vertex successor lists in CSR form.
fn successor_lists(num_vertices: usize, polygons: &MultiVector<usize>) -> MultiVector<usize> {
    let mut degree = vec![0usize; num_vertices];
    for polygon in polygons.iter() {
        for &v in polygon {
            degree[v] += 1;
        }
    }
    let mut successors = MultiVector::with_sizes(degree, usize::MAX);
    let mut cursor = vec![0usize; num_vertices];
    for polygon in polygons.iter() {
        let Some(&last) = polygon.last() else {
            continue;
        };
        let mut prev = last;
        for &v in polygon {
            successors.row_mut(prev)[cursor[prev]] = v;
            cursor[prev] += 1;
            prev = v;
        }
    }
    successors
}

fn check_vertex_range(num_vertices: usize, polygons: &MultiVector<usize>) -> Result<(), MeshError> {
    for (f, polygon) in polygons.iter().enumerate() {
        if let Some(&vertex) = polygon.iter().find(|&&v| v >= num_vertices) {
            return Err(MeshError::VertexOutOfRange {
                polygon: Some(f),
                vertex,
                num_vertices,
            });
        }
    }
    Ok(())
}

fn validate_polygons(num_vertices: usize, polygons: &MultiVector<usize>) -> Result<(), MeshError> {
    check_vertex_range(num_vertices, polygons)?;
    for (f, polygon) in polygons.iter().enumerate() {
        let n = polygon.len();
        if n < 3 {
            return Err(MeshError::DegeneratePolygon { polygon: f, len: n });
        }
        for j in 0..n {
            let prev = polygon[(j + n - 1) % n];
            let next = polygon[(j + 1) % n];
            if polygon[j] == next {
                return Err(MeshError::DegeneratePolygon { polygon: f, len: n });
            }
            if prev == next {
                return Err(MeshError::DanglingVertex {
                    vertex: polygon[j],
                    polygon: Some(f),
                });
            }
        }
    }
    Ok(())
}

/// Every boundary vertex must both start and end a boundary pair.
fn validate_boundaries(num_vertices: usize, boundaries: &[(usize, usize)]) -> Result<(), MeshError> {
    let mut starts = vec![0usize; num_vertices];
    let mut ends = vec![0usize; num_vertices];
    for &(a, b) in boundaries {
        for v in [a, b] {
            if v >= num_vertices {
                return Err(MeshError::VertexOutOfRange {
                    polygon: None,
                    vertex: v,
                    num_vertices,
                });
            }
        }
        starts[a] += 1;
        ends[b] += 1;
    }
    match (0..num_vertices).find(|&v| (starts[v] == 0) != (ends[v] == 0)) {
        Some(vertex) => Err(MeshError::DanglingVertex {
            vertex,
            polygon: None,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MultiVector<usize> {
        MultiVector::from(vec![vec![0, 1, 2, 3]])
    }

    #[test]
    fn single_quad_has_four_boundaries() {
        let b = boundaries(4, &quad()).unwrap();
        assert_eq!(b, vec![(0, 3), (1, 0), (2, 1), (3, 2)]);
    }

    #[test]
    fn shared_edge_is_interior() {
        let polys = MultiVector::from(vec![vec![0, 1, 2], vec![0, 2, 3]]);
        let b = boundaries(4, &polys).unwrap();
        assert_eq!(b.len(), 4);
        assert!(!b.contains(&(0, 2)) && !b.contains(&(2, 0)));
    }

    #[test]
    fn out_of_range_vertex_is_rejected() {
        let polys = MultiVector::from(vec![vec![0, 1, 7]]);
        let err = boundaries(3, &polys).unwrap_err();
        assert!(matches!(err, MeshError::VertexOutOfRange { vertex: 7, .. }));
    }

    #[test]
    fn quad_row_sizes() {
        let polys = quad();
        let b = boundaries(4, &polys).unwrap();
        let s = mesh_structure(4, &polys, &b).unwrap();
        // every vertex: 1 polygon + 3 boundary slots; then 8 half-segment nodes
        assert_eq!(s.num_nodes(MeshType::Primal), 4 + 8);
        for v in 0..4 {
            assert_eq!(s[MeshType::Primal].row_len(v), 4);
        }
        // 1 polygon + (edge cell, vertex cell) per boundary pair
        assert_eq!(s.num_nodes(MeshType::Dual), 1 + 8);
        assert_eq!(s[MeshType::Dual].row_len(1), EDGE_CELL_SLOTS);
        assert_eq!(s[MeshType::Dual].row_len(2), VERTEX_CELL_SLOTS);
        assert_eq!(
            s.num_half_edges(MeshType::Primal),
            s.num_half_edges(MeshType::Dual)
        );
        assert!(s[MeshType::Primal].values().iter().all(|l| l.is_valid()));
        assert!(s[MeshType::Dual].values().iter().all(|l| l.is_valid()));
    }

    #[test]
    fn interior_fan_is_cyclic() {
        // four triangles around vertex 4
        let polys = MultiVector::from(vec![
            vec![0, 1, 4],
            vec![2, 3, 4],
            vec![1, 2, 4],
            vec![3, 0, 4],
        ]);
        let b = boundaries(5, &polys).unwrap();
        let s = mesh_structure(5, &polys, &b).unwrap();
        let fan: Vec<usize> = s[MeshType::Primal].row(4).iter().map(|l| l.node).collect();
        assert_eq!(fan.len(), 4);
        // consecutive polygons around the centre share an edge
        for k in 0..4 {
            let f = polys.row(fan[k]);
            let g = polys.row(fan[(k + 1) % 4]);
            let shared = f.iter().filter(|v| g.contains(v)).count();
            assert_eq!(shared, 2, "fan {fan:?} breaks at {k}");
        }
    }

    #[test]
    fn boundary_vertex_row_follows_its_fan() {
        let polys = quad();
        let b = boundaries(4, &polys).unwrap();
        let s = mesh_structure(4, &polys, &b).unwrap();
        // 0 -> 1 inside the quad, 0 -> 3 and its first half (pair 0), then
        // the second half of pair 1 = (1, 0)
        assert_eq!(
            s[MeshType::Primal].row(0),
            &[Link::new(0, 1), Link::new(1, 1), Link::new(2, 1), Link::new(3, 2)]
        );
        // edge cell of pair 0: 0 -> first half, 3 -> 0, second half
        assert_eq!(
            s[MeshType::Dual].row(1),
            &[Link::new(0, 2), Link::new(3, 0), Link::new(5, 0)]
        );
        // the second half of pair 1 ends in the vertex cell of pair 0
        assert_eq!(s[MeshType::Primal].row(7), &[Link::new(2, 0)]);
        assert_eq!(s[MeshType::Dual].row(2), &[Link::new(0, 3), Link::new(4, 0)]);
        assert_eq!(s.num_regular_nodes(MeshType::Primal), 4);
        assert_eq!(s.num_regular_nodes(MeshType::Dual), 1);
    }

    #[test]
    fn bowtie_vertex_closes_each_fan() {
        let polys = MultiVector::from(vec![vec![0, 1, 2], vec![0, 3, 4]]);
        let b = boundaries(5, &polys).unwrap();
        assert_eq!(b, vec![(0, 2), (1, 0), (2, 1), (0, 4), (3, 0), (4, 3)]);
        let s = mesh_structure(5, &polys, &b).unwrap();
        // fan of triangle 0, pair (0, 2), second half of (3, 0); then the
        // same for triangle 1 with (0, 4) and (1, 0)
        let cells: Vec<usize> = s[MeshType::Primal].row(0).iter().map(|l| l.node).collect();
        assert_eq!(cells, vec![0, 2, 3, 10, 1, 8, 9, 4]);
    }

    #[test]
    fn fans_split_at_boundary_edges() {
        // two triangles sharing 0 -> 2, listed out of order
        let polys = MultiVector::from(vec![vec![0, 2, 3], vec![0, 1, 2]]);
        let incidences = [Link::new(0, 1), Link::new(1, 1)];
        let fans = sort_fans(&incidences, &polys);
        assert_eq!(fans, vec![vec![Link::new(1, 1), Link::new(0, 1)]]);

        let polys = MultiVector::from(vec![vec![0, 1, 2], vec![0, 3, 4]]);
        let fans = sort_fans(&[Link::new(0, 1), Link::new(1, 1)], &polys);
        assert_eq!(fans.len(), 2);
    }

    #[test]
    fn degenerate_polygons_are_rejected() {
        let polys = MultiVector::from(vec![vec![0, 1]]);
        assert!(matches!(
            mesh_structure(2, &polys, &[]),
            Err(MeshError::DegeneratePolygon { polygon: 0, len: 2 })
        ));
        let polys = MultiVector::from(vec![vec![0, 1, 1, 2]]);
        assert!(matches!(
            mesh_structure(3, &polys, &[]),
            Err(MeshError::DegeneratePolygon { .. })
        ));
    }

    #[test]
    fn spike_vertex_is_dangling() {
        let polys = MultiVector::from(vec![vec![0, 1, 2, 1]]);
        assert_eq!(
            mesh_structure(3, &polys, &[]),
            Err(MeshError::DanglingVertex {
                vertex: 0,
                polygon: Some(0)
            })
        );
    }

    #[test]
    fn open_boundary_chain_is_dangling() {
        let polys = quad();
        let err = mesh_structure(4, &polys, &[(0, 3)]).unwrap_err();
        assert!(matches!(err, MeshError::DanglingVertex { polygon: None, .. }));
    }
}

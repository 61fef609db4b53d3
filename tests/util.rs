#![allow(dead_code)]
use mesh_ghost::{
    algs::communicator::RayonComm,
    ghost::{GhostVertex, Hexa, SimplexTypeFlag, Tetra},
    topology::{GlobalCoordinate, MultiVector},
};

/// Unit square as one counter-clockwise quad.
pub fn quad() -> (Vec<GlobalCoordinate>, MultiVector<usize>) {
    (
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        MultiVector::from(vec![vec![0, 1, 2, 3]]),
    )
}

/// `n x n` unit quads on `[0, n]^2`; vertex `(i, j)` is `j * (n + 1) + i`.
pub fn grid(n: usize) -> (Vec<GlobalCoordinate>, MultiVector<usize>) {
    let idx = |i: usize, j: usize| j * (n + 1) + i;
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            vertices.push([i as f64, j as f64]);
        }
    }
    let mut polygons = MultiVector::new();
    for j in 0..n {
        for i in 0..n {
            polygons.push_back([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1)]);
        }
    }
    (vertices, polygons)
}

/// 2x2 grid whose first cell is wound clockwise.
pub fn grid_with_flipped_cell() -> (Vec<GlobalCoordinate>, MultiVector<usize>) {
    let (vertices, polygons) = grid(2);
    let mut rows: Vec<Vec<usize>> = polygons.iter().map(<[usize]>::to_vec).collect();
    rows[0].reverse();
    (vertices, MultiVector::from(rows))
}

/// Two-rank Rayon comms (ranks 0 and 1).
pub fn rayons() -> (RayonComm, RayonComm) {
    (RayonComm::new(0, 2), RayonComm::new(1, 2))
}

/// Unit cube with ids `first..first + 8`.
pub fn cube(first: i32) -> Hexa {
    Hexa::axis_aligned(std::array::from_fn(|i| first + i as i32), [0.0; 3], 1.0)
}

/// Reference tetrahedron with ids `first..first + 4`.
pub fn tetra(first: i32, orientation: bool) -> Tetra {
    Tetra::new(
        [
            GhostVertex::new(first, [0.0, 0.0, 0.0]),
            GhostVertex::new(first + 1, [1.0, 0.0, 0.0]),
            GhostVertex::new(first + 2, [0.0, 1.0, 0.0]),
            GhostVertex::new(first + 3, [0.0, 0.0, 1.0]),
        ],
        orientation,
        SimplexTypeFlag::new(u8::from(orientation), 1),
    )
}

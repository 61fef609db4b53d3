mod util;
use util::*;

use mesh_ghost::DebugInvariants;
use mesh_ghost::topology::{HalfEdgeIndex, Mesh, MeshType, NodeIndex};
use std::collections::HashMap;
use std::f64::consts::PI;

fn grid_mesh(n: usize) -> Mesh {
    let (vertices, polygons) = grid(n);
    Mesh::new(vertices, &polygons).unwrap()
}

fn all_half_edges(mesh: &Mesh, t: MeshType) -> Vec<HalfEdgeIndex> {
    mesh.node_indices(t).flat_map(|n| mesh.half_edges(n)).collect()
}

#[test]
fn single_quad_counts() {
    let (vertices, polygons) = quad();
    let mesh = Mesh::new(vertices, &polygons).unwrap();
    assert_eq!(mesh.num_cells(MeshType::Primal), 1);
    assert_eq!(mesh.num_boundaries(MeshType::Dual), 4);
    assert_eq!(mesh.num_boundaries(MeshType::Primal), 4);
    assert_eq!(mesh.num_vertices(MeshType::Primal), 4);
    assert_eq!(mesh.num_edges(MeshType::Primal), 4);
    assert_eq!(mesh.num_nodes(MeshType::Primal), 4 + 8);
    assert_eq!(mesh.num_vertices(MeshType::Dual), 1 + 8);
    assert_eq!(mesh.num_cells(MeshType::Dual), 4);
}

#[test]
fn grid_counts() {
    let mesh = grid_mesh(2);
    assert_eq!(mesh.num_cells(MeshType::Primal), 4);
    assert_eq!(mesh.num_vertices(MeshType::Primal), 9);
    assert_eq!(mesh.num_edges(MeshType::Primal), 12);
    assert_eq!(mesh.num_boundaries(MeshType::Primal), 8);
    assert_eq!(mesh.num_regular_nodes(MeshType::Dual), 4);
    assert_eq!(mesh.num_edges(MeshType::Dual), mesh.num_half_edges(MeshType::Primal) / 2);
    mesh.validate_invariants().unwrap();
}

#[test]
fn dual_four_times_is_identity_and_flip_is_an_involution() {
    let mesh = grid_mesh(3);
    for t in MeshType::ALL {
        for h in all_half_edges(&mesh, t) {
            let d = mesh.dual(h);
            assert_eq!(d.mesh_type(), !t);
            assert_eq!(mesh.dual(mesh.dual(d)), mesh.flip(d));
            assert_eq!(mesh.flip(mesh.flip(h)), h);
            assert_ne!(mesh.flip(h), h);
            // the opposite half-edge points back at the source
            assert_eq!(mesh.target(mesh.flip(h)), mesh.node(h));
            assert_eq!(mesh.node(mesh.flip(h)), mesh.target(h));
        }
    }
}

#[test]
fn interior_fan_is_counter_clockwise() {
    let mesh = grid_mesh(2);
    let centre = NodeIndex::new(4, MeshType::Primal);
    let origin = mesh.position(centre);
    let angles: Vec<f64> = mesh
        .half_edges(centre)
        .map(|h| {
            let p = mesh.position(mesh.target(h));
            (p[1] - origin[1]).atan2(p[0] - origin[0])
        })
        .collect();
    assert_eq!(angles.len(), 4);
    let mut total = 0.0;
    for k in 0..4 {
        let mut step = angles[(k + 1) % 4] - angles[k];
        if step <= 0.0 {
            step += 2.0 * PI;
        }
        assert!(step > 0.0 && step < PI, "fan turns clockwise at {k}: {angles:?}");
        total += step;
    }
    assert!((total - 2.0 * PI).abs() < 1e-12);
}

#[test]
fn next_cycles_through_the_node() {
    let mesh = grid_mesh(1);
    for node in mesh.node_indices(MeshType::Dual) {
        let first = mesh.begin(node);
        let mut h = first;
        let mut steps = 0;
        loop {
            h = mesh.next(h);
            steps += 1;
            if h == first {
                break;
            }
        }
        assert_eq!(steps, mesh.half_edges(node).len());
    }
}

#[test]
fn every_edge_gets_one_id() {
    let mesh = grid_mesh(2);
    assert_eq!(mesh.num_edges(MeshType::Primal), 12);
    assert_eq!(mesh.num_edge_indices(), 12);

    let mut halves: HashMap<usize, Vec<HalfEdgeIndex>> = HashMap::new();
    for h in all_half_edges(&mesh, MeshType::Primal) {
        halves.entry(mesh.edge_index(h)).or_default().push(h);
    }
    assert_eq!(halves.len(), 12);
    assert!(halves.keys().all(|&id| id < 12));
    for (id, hs) in &halves {
        let on_boundary = hs.iter().any(|&h| {
            !mesh.regular(mesh.node(h)) || !mesh.regular(mesh.target(h))
        });
        // a boundary edge also carries its two half segments
        let expected = if on_boundary { 6 } else { 2 };
        assert_eq!(hs.len(), expected, "edge {id} has {} half-edges", hs.len());
        for &h in hs {
            assert_eq!(mesh.edge_index(mesh.flip(h)), *id);
        }
    }
    let boundary_ids = halves.values().filter(|hs| hs.len() == 6).count();
    assert_eq!(boundary_ids, mesh.num_boundaries(MeshType::Primal));

    // a dual half-edge reports the edge it crosses
    for h in all_half_edges(&mesh, MeshType::Primal) {
        assert_eq!(mesh.edge_index(mesh.dual(h)), mesh.edge_index(h));
    }
}

#[test]
fn rows_turn_counter_clockwise_everywhere() {
    for n in [1, 2, 3] {
        let mesh = grid_mesh(n);
        for t in MeshType::ALL {
            for h in all_half_edges(&mesh, t) {
                let node = mesh.node(h);
                if !mesh.regular(node) && mesh.next(h) == mesh.begin(node) {
                    continue;
                }
                let d = mesh.dual(h);
                assert_eq!(
                    mesh.dual(mesh.prev(d)),
                    mesh.next(h),
                    "{t} half-edge {h:?} of grid {n}"
                );
            }
        }
    }
}

#[test]
fn vertex_rows_sweep_counter_clockwise() {
    let mesh = grid_mesh(3);
    for v in mesh.node_indices(MeshType::Primal).filter(|&v| mesh.regular(v)) {
        let origin = mesh.position(v);
        let angles: Vec<f64> = mesh
            .half_edges(v)
            .map(|h| mesh.target(h))
            .filter(|&w| mesh.regular(w))
            .map(|w| {
                let p = mesh.position(w);
                (p[1] - origin[1]).atan2(p[0] - origin[0])
            })
            .collect();
        for pair in angles.windows(2) {
            let step = (pair[1] - pair[0]).rem_euclid(2.0 * PI);
            assert!(step > 0.0 && step < PI, "vertex {v:?} turns clockwise: {angles:?}");
        }
    }
}

#[test]
fn dual_positions() {
    let mesh = grid_mesh(2);
    let cells = mesh.positions(MeshType::Dual);
    assert_eq!(cells[0], [0.5, 0.5]);
    assert_eq!(cells[3], [1.5, 1.5]);
    assert_eq!(mesh.positions(MeshType::Primal).len(), mesh.num_nodes(MeshType::Primal));
    assert_eq!(mesh.positions(MeshType::Dual).len(), mesh.num_nodes(MeshType::Dual));

    // synthetic primal nodes sit on their boundary edge
    for (i, &(a, b)) in mesh.boundaries().iter().enumerate() {
        let pa = mesh.position(NodeIndex::new(a, MeshType::Primal));
        let pb = mesh.position(NodeIndex::new(b, MeshType::Primal));
        let mid = mesh.position(NodeIndex::new(4 + 2 * i, MeshType::Dual));
        assert_eq!(mid, [(pa[0] + pb[0]) / 2.0, (pa[1] + pb[1]) / 2.0]);
        let first = mesh.position(NodeIndex::new(9 + 2 * i, MeshType::Primal));
        assert!(!mesh.regular(NodeIndex::new(9 + 2 * i, MeshType::Primal)));
        let cross = (pb[0] - pa[0]) * (first[1] - pa[1]) - (pb[1] - pa[1]) * (first[0] - pa[0]);
        assert_eq!(cross, 0.0);
    }
}

#[test]
fn boundary_edge_faces_an_edge_cell() {
    let (vertices, polygons) = quad();
    let mesh = Mesh::new(vertices, &polygons).unwrap();
    let v0 = NodeIndex::new(0, MeshType::Primal);
    let to_v1 = mesh
        .half_edges(v0)
        .find(|&h| mesh.target(h) == NodeIndex::new(1, MeshType::Primal))
        .unwrap();
    // left of 0 -> 1 is the polygon, right of it is synthetic
    let d = mesh.dual(to_v1);
    assert_eq!(mesh.node(d), NodeIndex::new(0, MeshType::Dual));
    assert!(!mesh.regular(mesh.target(d)));
}

//! Half-edge cycle validation.
//!
//! Every slot of a [`MeshStructure`] must return to itself after four dual
//! steps (source node, left cell, target node, right cell), and its row must
//! be ordered counter-clockwise: the dual of the slot before `dual(h)` is
//! the slot after `h`. Synthetic rows are open chains, so their last slot is
//! exempt from the ordering rule. The checks here only report; they never
//! repair.

use crate::mesh_error::MeshError;
use crate::topology::index::MeshType;
use crate::topology::structure::{Link, MeshStructure};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What mesh construction does when the structure check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StructureCheck {
    /// Skip the check.
    Ignore,
    /// Log the broken cycles and keep the mesh.
    Warn,
    /// Return [`MeshError::InconsistentStructure`].
    #[default]
    Error,
}

/// Which rule a half-edge breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// Four dual steps do not lead back to the start.
    Diamond,
    /// The slot after the start is not the dual of the slot before its dual.
    Rotation,
}

/// A half-edge whose dual walk does not close or whose row is out of order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenCycle {
    pub mesh_type: MeshType,
    pub start: Link,
    pub kind: BreakKind,
    /// Visited slots including the start; an invalid link ends the walk early.
    /// For a rotation break: start, its dual, the slot before that, and where
    /// that slot leads.
    pub chain: Vec<(MeshType, Link)>,
}

impl fmt::Display for BrokenCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} half-edge ({}, {}):",
            self.mesh_type, self.start.node, self.start.position
        )?;
        if self.kind == BreakKind::Rotation {
            write!(f, " out of order,")?;
        }
        for (i, (mesh_type, link)) in self.chain.iter().enumerate() {
            let sep = if i == 0 { " " } else { " -> " };
            if link.is_valid() {
                write!(f, "{sep}{mesh_type}({}, {})", link.node, link.position)?;
            } else {
                write!(f, "{sep}{mesh_type}(invalid)")?;
            }
        }
        Ok(())
    }
}

impl From<&BrokenCycle> for MeshError {
    fn from(cycle: &BrokenCycle) -> Self {
        MeshError::InconsistentStructure {
            mesh_type: cycle.mesh_type,
            node: cycle.start.node,
            position: cycle.start.position,
        }
    }
}

/// Walk four dual steps from `start`.
pub fn walk_cycle(
    structure: &MeshStructure,
    mesh_type: MeshType,
    start: Link,
) -> Result<(), BrokenCycle> {
    let mut chain = Vec::with_capacity(5);
    chain.push((mesh_type, start));
    let mut current = (mesh_type, start);
    for _ in 0..4 {
        let (t, link) = current;
        let next = structure
            .link(t, link.node, link.position)
            .unwrap_or(Link::INVALID);
        current = (!t, next);
        chain.push(current);
        if !next.is_valid() {
            break;
        }
    }
    if current == (mesh_type, start) {
        Ok(())
    } else {
        Err(BrokenCycle {
            mesh_type,
            start,
            kind: BreakKind::Diamond,
            chain,
        })
    }
}

/// Check that the slot after `start` in its row is the dual of the slot
/// before `dual(start)`. The last slot of a synthetic row always passes.
pub fn check_rotation(
    structure: &MeshStructure,
    mesh_type: MeshType,
    start: Link,
) -> Result<(), BrokenCycle> {
    let table = structure.table(mesh_type);
    // a slot outside its row is the dual walk's to report
    let Some(len) = table
        .get(start.node)
        .map(<[Link]>::len)
        .filter(|&len| start.position < len)
    else {
        return Ok(());
    };
    if !structure.is_regular(mesh_type, start.node) && start.position + 1 == len {
        return Ok(());
    }
    let expected = Link::new(start.node, (start.position + 1) % len);

    let mut chain = Vec::with_capacity(4);
    chain.push((mesh_type, start));
    let dual = structure
        .link(mesh_type, start.node, start.position)
        .unwrap_or(Link::INVALID);
    let before = structure
        .table(!mesh_type)
        .get(dual.node)
        .filter(|row| !row.is_empty() && dual.position < row.len())
        .map_or(Link::INVALID, |row| {
            Link::new(dual.node, (dual.position + row.len() - 1) % row.len())
        });
    let found = structure
        .link(!mesh_type, before.node, before.position)
        .unwrap_or(Link::INVALID);
    chain.extend([(!mesh_type, dual), (!mesh_type, before), (mesh_type, found)]);

    if found == expected {
        Ok(())
    } else {
        Err(BrokenCycle {
            mesh_type,
            start,
            kind: BreakKind::Rotation,
            chain,
        })
    }
}

/// Both rules for one half-edge, the dual walk first.
fn check_half_edge(
    structure: &MeshStructure,
    mesh_type: MeshType,
    start: Link,
) -> Result<(), BrokenCycle> {
    walk_cycle(structure, mesh_type, start)?;
    check_rotation(structure, mesh_type, start)
}

/// Every half-edge of one mesh type that breaks either rule, in storage order.
pub fn broken_cycles(structure: &MeshStructure, mesh_type: MeshType) -> Vec<BrokenCycle> {
    let table = structure.table(mesh_type);
    let mut broken = Vec::new();
    for node in 0..table.len() {
        for position in 0..table.row_len(node) {
            if let Err(cycle) = check_half_edge(structure, mesh_type, Link::new(node, position)) {
                broken.push(cycle);
            }
        }
    }
    broken
}

/// First broken half-edge of one mesh type.
pub fn find_broken_cycle(structure: &MeshStructure, mesh_type: MeshType) -> Option<BrokenCycle> {
    let table = structure.table(mesh_type);
    (0..table.len())
        .flat_map(|node| (0..table.row_len(node)).map(move |position| Link::new(node, position)))
        .find_map(|start| check_half_edge(structure, mesh_type, start).err())
}

/// Check one mesh type, logging every broken chain.
pub fn check_structure(structure: &MeshStructure, mesh_type: MeshType) -> bool {
    let broken = broken_cycles(structure, mesh_type);
    for cycle in &broken {
        log::error!("broken half-edge cycle: {cycle}");
    }
    broken.is_empty()
}

/// Apply a [`StructureCheck`] policy to both mesh types.
pub fn enforce_structure(
    structure: &MeshStructure,
    policy: StructureCheck,
) -> Result<(), MeshError> {
    if policy == StructureCheck::Ignore {
        return Ok(());
    }
    for mesh_type in MeshType::ALL {
        let broken = broken_cycles(structure, mesh_type);
        let Some(first) = broken.first() else {
            continue;
        };
        match policy {
            StructureCheck::Warn => {
                log::warn!(
                    "{} broken {mesh_type} half-edge cycles, first: {first}",
                    broken.len()
                );
            }
            StructureCheck::Error => {
                for cycle in &broken {
                    log::error!("broken half-edge cycle: {cycle}");
                }
                return Err(first.into());
            }
            StructureCheck::Ignore => {}
        }
    }
    Ok(())
}

//! Force recovery - full displacements, member forces and support reactions

use crate::assembly::GlobalSystem;
use crate::boundary::DofPartition;
use crate::elements::Axis;
use crate::math::Vec as FEVec;
use crate::model::TrussModel;
use crate::results::{MemberForce, NodeDisplacement, SupportReaction};

/// Quantities derived from a solved system
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    /// Displacements at every DOF, zero at fixed ones
    pub full_displacements: FEVec,
    pub displacements: Vec<NodeDisplacement>,
    pub member_forces: Vec<MemberForce>,
    pub reactions: Vec<SupportReaction>,
}

/// Scatter free-DOF displacements into a full-length vector
pub fn expand_displacements(partition: &DofPartition, free: &FEVec, n_dofs: usize) -> FEVec {
    let mut full = FEVec::zeros(n_dofs);
    for (value, &dof) in free.iter().zip(&partition.free) {
        full[dof] = *value;
    }
    full
}

/// Axial force of every member in declared order
pub fn member_forces(model: &TrussModel, displacements: &FEVec) -> Vec<MemberForce> {
    model
        .members
        .iter()
        .map(|member| MemberForce {
            node_i: model.nodes[member.node_i].id.clone(),
            node_j: model.nodes[member.node_j].id.clone(),
            force: member.axial_force(displacements),
        })
        .collect()
}

/// Per-node displacements in node order
pub fn node_displacements(model: &TrussModel, displacements: &FEVec) -> Vec<NodeDisplacement> {
    model
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| NodeDisplacement {
            node: node.id.clone(),
            dx: displacements[Axis::X.dof(index)],
            dy: displacements[Axis::Y.dof(index)],
        })
        .collect()
}

/// Support reactions `K u - F` at the restrained DOFs, grouped per support
pub fn reactions(
    model: &TrussModel,
    system: &GlobalSystem,
    displacements: &FEVec,
) -> Vec<SupportReaction> {
    let internal = &system.stiffness * displacements;

    model
        .supports
        .iter()
        .map(|support| {
            let reaction = |axis: Axis| {
                if support.is_fixed(axis) {
                    let dof = axis.dof(support.node);
                    internal[dof] - system.loads[dof]
                } else {
                    0.0
                }
            };
            SupportReaction {
                node: model.nodes[support.node].id.clone(),
                rx: reaction(Axis::X),
                ry: reaction(Axis::Y),
            }
        })
        .collect()
}

/// Run the full recovery stage
pub fn recover(
    model: &TrussModel,
    system: &GlobalSystem,
    partition: &DofPartition,
    free_displacements: &FEVec,
) -> Recovered {
    let full = expand_displacements(partition, free_displacements, system.dof_count());
    Recovered {
        displacements: node_displacements(model, &full),
        member_forces: member_forces(model, &full),
        reactions: reactions(model, system, &full),
        full_displacements: full,
    }
}

//! Global stiffness matrix and load vector assembly

use crate::elements::Node;
use crate::math::{Mat, Vec as FEVec};
use crate::model::TrussModel;

/// Assembled, unrestrained system `K u = F`
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSystem {
    /// Global stiffness matrix (2N x 2N)
    pub stiffness: Mat,
    /// Global load vector (2N)
    pub loads: FEVec,
}

impl GlobalSystem {
    /// Assemble the global stiffness matrix and load vector of a model
    pub fn assemble(model: &TrussModel) -> Self {
        let n_dofs = model.dof_count();
        let mut stiffness = Mat::zeros(n_dofs, n_dofs);
        let mut loads = FEVec::zeros(n_dofs);

        for member in &model.members {
            let k = member.global_stiffness();
            let dofs = member.dofs();
            for (a, &row) in dofs.iter().enumerate() {
                for (b, &col) in dofs.iter().enumerate() {
                    stiffness[(row, col)] += k[(a, b)];
                }
            }
        }

        for load in &model.loads {
            let [x, y] = Node::dofs(load.node);
            loads[x] += load.fx;
            loads[y] += load.fy;
        }

        Self { stiffness, loads }
    }

    pub fn dof_count(&self) -> usize {
        self.loads.len()
    }

    /// Whether the stiffness matrix is symmetric within `tolerance`
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.stiffness.nrows();
        (0..n).all(|i| {
            (i + 1..n).all(|j| (self.stiffness[(i, j)] - self.stiffness[(j, i)]).abs() <= tolerance)
        })
    }
}

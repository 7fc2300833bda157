//! Boundary conditions - partition into free and fixed DOFs

use crate::assembly::GlobalSystem;
use crate::error::ValidationError;
use crate::math::{Mat, Vec as FEVec};
use crate::model::TrussModel;

/// Global DOF indices split by restraint, each list in ascending order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DofPartition {
    pub free: Vec<usize>,
    pub fixed: Vec<usize>,
}

impl DofPartition {
    pub fn from_model(model: &TrussModel) -> Self {
        let mut restrained = vec![false; model.dof_count()];
        for support in &model.supports {
            for dof in support.restrained_dofs() {
                restrained[dof] = true;
            }
        }

        let (fixed, free): (Vec<usize>, Vec<usize>) =
            (0..restrained.len()).partition(|&dof| restrained[dof]);
        Self { free, fixed }
    }
}

/// Stiffness and loads restricted to the free DOFs
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedSystem {
    /// K_ff
    pub stiffness: Mat,
    /// F_f
    pub loads: FEVec,
    pub partition: DofPartition,
}

impl ReducedSystem {
    /// Apply the model's supports to an assembled system
    pub fn reduce(model: &TrussModel, system: &GlobalSystem) -> Result<Self, ValidationError> {
        let partition = DofPartition::from_model(model);
        if partition.fixed.is_empty() {
            return Err(ValidationError::NoSupports);
        }
        if partition.free.is_empty() {
            return Err(ValidationError::FullyRestrained);
        }

        let free = &partition.free;
        let stiffness = Mat::from_fn(free.len(), free.len(), |r, c| {
            system.stiffness[(free[r], free[c])]
        });
        let loads = FEVec::from_fn(free.len(), |r, _| system.loads[free[r]]);

        Ok(Self {
            stiffness,
            loads,
            partition,
        })
    }

    pub fn size(&self) -> usize {
        self.partition.free.len()
    }
}

//! Support conditions

use serde::{Deserialize, Serialize};

use crate::elements::Axis;

/// Support conditions at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// Index of the supported node
    pub node: usize,
    /// Restrained in X translation
    pub fixed_x: bool,
    /// Restrained in Y translation
    pub fixed_y: bool,
}

impl Support {
    /// Create a support with specific restraints
    pub fn with_restraints(node: usize, fixed_x: bool, fixed_y: bool) -> Self {
        Self {
            node,
            fixed_x,
            fixed_y,
        }
    }

    /// Whether the given direction is restrained
    pub fn is_fixed(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.fixed_x,
            Axis::Y => self.fixed_y,
        }
    }

    /// Global indices of the restrained DOFs
    pub fn restrained_dofs(&self) -> impl Iterator<Item = usize> {
        let support = *self;
        [Axis::X, Axis::Y]
            .into_iter()
            .filter(move |&axis| support.is_fixed(axis))
            .map(move |axis| axis.dof(support.node))
    }

    /// Check if any DOF is restrained
    pub fn is_supported(&self) -> bool {
        self.fixed_x || self.fixed_y
    }
}

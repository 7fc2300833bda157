//! Node element - a pin joint in the plane

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of degrees of freedom owned by each node
pub const DOFS_PER_NODE: usize = 2;

/// Direction of a nodal degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal translation
    X,
    /// Vertical translation
    Y,
}

impl Axis {
    /// Offset of this axis within a node's DOF block
    pub fn offset(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }

    /// Global DOF index of this axis at the node with the given index
    pub fn dof(self, node_index: usize) -> usize {
        node_index * DOFS_PER_NODE + self.offset()
    }

    /// Split a global DOF index into its node index and axis
    pub fn from_dof(dof: usize) -> (usize, Axis) {
        let axis = if dof % DOFS_PER_NODE == 0 { Self::X } else { Self::Y };
        (dof / DOFS_PER_NODE, axis)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("horizontal"),
            Self::Y => f.write_str("vertical"),
        }
    }
}

/// A 2D node in the truss model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Identifier as supplied by the caller
    pub id: String,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(id: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
        }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Global DOF indices `[x, y]` for a node stored at `index`
    pub fn dofs(index: usize) -> [usize; 2] {
        [Axis::X.dof(index), Axis::Y.dof(index)]
    }
}

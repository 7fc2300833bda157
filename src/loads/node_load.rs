//! Node loads - forces applied directly to nodes

use serde::{Deserialize, Serialize};

/// A point force applied to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Index of the loaded node
    pub node: usize,
    /// Force in X direction
    pub fx: f64,
    /// Force in Y direction
    pub fy: f64,
}

impl NodeLoad {
    /// Create a new node load
    pub fn new(node: usize, fx: f64, fy: f64) -> Self {
        Self { node, fx, fy }
    }

    /// Whether both components are exactly zero
    pub fn is_zero(&self) -> bool {
        self.fx == 0.0 && self.fy == 0.0
    }

    /// Whether both components are finite
    pub fn is_finite(&self) -> bool {
        self.fx.is_finite() && self.fy.is_finite()
    }
}

//! Member element - 2D axial bar between two nodes

use serde::{Deserialize, Serialize};

use crate::elements::Node;
use crate::math::{self, Mat4, Vec as FEVec};

/// How a member's axial stiffness coefficient is obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum MemberStiffness {
    /// Unit axial rigidity: k = 1 / L
    #[default]
    Unit,
    /// Axial rigidity EA: k = EA / L
    AxialRigidity(f64),
    /// Stiffness coefficient k supplied directly
    Coefficient(f64),
}

impl MemberStiffness {
    /// Resolve the stiffness coefficient for a member of the given length
    pub fn coefficient(self, length: f64) -> f64 {
        match self {
            Self::Unit => 1.0 / length,
            Self::AxialRigidity(ea) => ea / length,
            Self::Coefficient(k) => k,
        }
    }
}

/// A truss member with its derived geometry
///
/// Members refer to their end nodes by index into the model's node list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Index of the i-node (start)
    pub node_i: usize,
    /// Index of the j-node (end)
    pub node_j: usize,
    /// Member length
    pub length: f64,
    /// Direction cosine along X
    pub cos: f64,
    /// Direction cosine along Y
    pub sin: f64,
    /// Axial stiffness coefficient k
    pub stiffness: f64,
}

impl Member {
    /// Create a member between two nodes.
    ///
    /// Returns `None` when the nodes coincide.
    pub fn new(
        node_i: usize,
        i: &Node,
        node_j: usize,
        j: &Node,
        stiffness: MemberStiffness,
    ) -> Option<Self> {
        let (length, cos, sin) = math::direction_cosines(&i.coords(), &j.coords())?;
        Some(Self {
            node_i,
            node_j,
            length,
            cos,
            sin,
            stiffness: stiffness.coefficient(length),
        })
    }

    /// Global DOF indices in the order (i x, i y, j x, j y)
    pub fn dofs(&self) -> [usize; 4] {
        let [ix, iy] = Node::dofs(self.node_i);
        let [jx, jy] = Node::dofs(self.node_j);
        [ix, iy, jx, jy]
    }

    /// Stiffness contribution in global coordinates
    pub fn global_stiffness(&self) -> Mat4 {
        math::member_global_stiffness(self.stiffness, self.cos, self.sin)
    }

    /// Axial elongation from a full displacement vector
    pub fn elongation(&self, displacements: &FEVec) -> f64 {
        let [ix, iy, jx, jy] = self.dofs();
        self.cos * (displacements[jx] - displacements[ix])
            + self.sin * (displacements[jy] - displacements[iy])
    }

    /// Axial force from a full displacement vector (positive = tension)
    pub fn axial_force(&self, displacements: &FEVec) -> f64 {
        self.stiffness * self.elongation(displacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_member_geometry() {
        let a = Node::new("a", 0.0, 0.0);
        let b = Node::new("b", 3.0, 4.0);
        let member = Member::new(0, &a, 1, &b, MemberStiffness::Unit).unwrap();
        assert_relative_eq!(member.length, 5.0, epsilon = 1e-12);
        assert_relative_eq!(member.cos, 0.6, epsilon = 1e-12);
        assert_relative_eq!(member.sin, 0.8, epsilon = 1e-12);
        assert_relative_eq!(member.stiffness, 0.2, epsilon = 1e-12);
        assert_eq!(member.dofs(), [0, 1, 2, 3]);
    }

    #[test]
    fn test_stiffness_sources() {
        assert_relative_eq!(MemberStiffness::AxialRigidity(10.0).coefficient(4.0), 2.5);
        assert_relative_eq!(MemberStiffness::Coefficient(7.0).coefficient(4.0), 7.0);
    }

    #[test]
    fn test_coincident_nodes_rejected() {
        let a = Node::new("a", 1.0, 1.0);
        let b = Node::new("b", 1.0, 1.0);
        assert!(Member::new(0, &a, 1, &b, MemberStiffness::Unit).is_none());
    }

    #[test]
    fn test_axial_force_sign() {
        let a = Node::new("a", 0.0, 0.0);
        let b = Node::new("b", 2.0, 0.0);
        let member = Member::new(0, &a, 1, &b, MemberStiffness::Unit).unwrap();

        // j-node moves away from i-node: tension
        let stretched = FEVec::from_vec(vec![0.0, 0.0, 0.1, 0.0]);
        assert_relative_eq!(member.axial_force(&stretched), 0.05, epsilon = 1e-12);

        // transverse motion does not change the axial force
        let swung = FEVec::from_vec(vec![0.0, 0.0, 0.0, 0.3]);
        assert_relative_eq!(member.axial_force(&swung), 0.0, epsilon = 1e-12);
    }
}

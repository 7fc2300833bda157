//! Result types for truss analysis

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wire::{member_key, Entries, TrussResponse};

/// Displacement of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    pub node: String,
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
}

impl NodeDisplacement {
    /// Get translation magnitude
    pub fn magnitude(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Reaction forces at a supported node
///
/// A direction that is not fixed reports zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportReaction {
    pub node: String,
    /// Reaction force in X direction
    pub rx: f64,
    /// Reaction force in Y direction
    pub ry: f64,
}

impl SupportReaction {
    /// Get total force magnitude
    pub fn magnitude(&self) -> f64 {
        self.rx.hypot(self.ry)
    }
}

/// Whether a member is stretched or squeezed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceState {
    Tension,
    Compression,
    Zero,
}

impl fmt::Display for ForceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tension => f.write_str("tension"),
            Self::Compression => f.write_str("compression"),
            Self::Zero => f.write_str("zero-force"),
        }
    }
}

/// Axial force in a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberForce {
    pub node_i: String,
    pub node_j: String,
    /// Axial force (positive = tension)
    pub force: f64,
}

impl MemberForce {
    /// Relative magnitude below which a member counts as zero-force
    pub const ZERO_TOLERANCE: f64 = 1e-9;

    /// Response key `"node_i,node_j"`
    pub fn key(&self) -> String {
        member_key(&self.node_i, &self.node_j)
    }

    /// Classify the force relative to `scale`, typically the largest |force| in the truss
    pub fn state(&self, scale: f64) -> ForceState {
        if self.force.abs() <= Self::ZERO_TOLERANCE * scale.abs().max(1.0) {
            ForceState::Zero
        } else if self.force > 0.0 {
            ForceState::Tension
        } else {
            ForceState::Compression
        }
    }
}

/// Non-fatal diagnostics attached to a successful analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NumericalWarning {
    /// Pivot ratio above the conditioning limit
    IllConditioned { pivot_ratio: f64, limit: f64 },
    /// Loads and reactions do not balance
    EquilibriumResidual { residual: f64, tolerance: f64 },
}

impl fmt::Display for NumericalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllConditioned { pivot_ratio, limit } => write!(
                f,
                "Stiffness matrix is ill-conditioned: pivot ratio {pivot_ratio:.3e} exceeds {limit:.3e}"
            ),
            Self::EquilibriumResidual {
                residual,
                tolerance,
            } => write!(
                f,
                "Equilibrium residual {residual:.3e} exceeds tolerance {tolerance:.3e}"
            ),
        }
    }
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum displacement magnitude
    pub max_displacement: f64,
    /// Node with maximum displacement
    pub max_disp_node: String,
    /// Largest |axial force|
    pub max_axial: f64,
    /// Member with maximum |axial force|
    pub max_axial_member: String,
    /// Maximum reaction magnitude
    pub max_reaction: f64,
    /// Node with maximum reaction
    pub max_reaction_node: String,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of members
    pub num_members: usize,
    /// Total number of supports
    pub num_supports: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
    /// Largest / smallest pivot of the factorization
    pub pivot_ratio: f64,
}

impl AnalysisSummary {
    /// Collect counts and extremes from recovered results
    ///
    /// DOF counts and the pivot ratio are left at zero for the caller to fill in.
    pub fn collect(
        displacements: &[NodeDisplacement],
        member_forces: &[MemberForce],
        reactions: &[SupportReaction],
    ) -> Self {
        let mut summary = Self {
            num_nodes: displacements.len(),
            num_members: member_forces.len(),
            num_supports: reactions.len(),
            ..Self::default()
        };

        for disp in displacements {
            let magnitude = disp.magnitude();
            if magnitude > summary.max_displacement || summary.max_disp_node.is_empty() {
                summary.max_displacement = magnitude;
                summary.max_disp_node = disp.node.clone();
            }
        }

        for member in member_forces {
            let axial = member.force.abs();
            if axial > summary.max_axial || summary.max_axial_member.is_empty() {
                summary.max_axial = axial;
                summary.max_axial_member = member.key();
            }
        }

        for reaction in reactions {
            let magnitude = reaction.magnitude();
            if magnitude > summary.max_reaction || summary.max_reaction_node.is_empty() {
                summary.max_reaction = magnitude;
                summary.max_reaction_node = reaction.node.clone();
            }
        }

        summary
    }
}

/// Complete results of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Member forces in declared member order
    pub member_forces: Vec<MemberForce>,
    /// Displacements in node order
    pub displacements: Vec<NodeDisplacement>,
    /// Reactions in support order
    pub reactions: Vec<SupportReaction>,
    pub warnings: Vec<NumericalWarning>,
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    /// Axial force of the member keyed `"node_i,node_j"`
    pub fn member_force(&self, key: &str) -> Option<f64> {
        self.member_forces
            .iter()
            .find(|m| m.key() == key)
            .map(|m| m.force)
    }

    /// Displacement `[dx, dy]` of a node
    pub fn displacement(&self, node: &str) -> Option<[f64; 2]> {
        self.displacements
            .iter()
            .find(|d| d.node == node)
            .map(|d| [d.dx, d.dy])
    }

    /// Reaction `[rx, ry]` at a supported node
    pub fn reaction(&self, node: &str) -> Option<[f64; 2]> {
        self.reactions
            .iter()
            .find(|r| r.node == node)
            .map(|r| [r.rx, r.ry])
    }

    /// Tension/compression state of a member, relative to the largest force
    pub fn member_state(&self, key: &str) -> Option<ForceState> {
        self.member_forces
            .iter()
            .find(|m| m.key() == key)
            .map(|m| m.state(self.summary.max_axial))
    }

    /// Convert to the JSON response shape, preserving member and node order
    pub fn to_response(&self) -> TrussResponse {
        TrussResponse {
            member_forces: self
                .member_forces
                .iter()
                .map(|m| (m.key(), m.force))
                .collect(),
            displacements: self
                .displacements
                .iter()
                .map(|d| (d.node.clone(), [d.dx, d.dy]))
                .collect(),
            reactions: self
                .reactions
                .iter()
                .map(|r| (r.node.clone(), [r.rx, r.ry]))
                .collect::<Entries<_>>(),
            summary: self.summary.clone(),
            warnings: self.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

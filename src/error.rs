//! Error types for the truss solver
//!
//! Failures fall into three families that callers are expected to treat
//! differently:
//! - [`ValidationError`]: the request itself is malformed or incomplete.
//! - [`InstabilityError`]: the request is well formed but the structure, as
//!   supported, is a mechanism and has no unique equilibrium solution.
//! - [`NumericalError`]: the solve produced something that cannot be trusted.
//!
//! All three are folded into [`TrussError`], which is what the analysis
//! entry points return.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elements::Axis;

/// Which kind of input entity an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Member,
    Support,
    Load,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => f.write_str("Member"),
            Self::Support => f.write_str("Support"),
            Self::Load => f.write_str("Load"),
        }
    }
}

/// Malformed or insufficient input, detected before any matrix work
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("At least 2 nodes are required, found {0}")]
    TooFewNodes(usize),

    #[error("At least 1 member is required")]
    NoMembers,

    #[error("At least 1 support is required")]
    NoSupports,

    #[error("At least 1 load is required")]
    NoLoads,

    #[error("Duplicate node '{0}' already exists")]
    DuplicateNode(String),

    #[error("Node '{0}' has a non-finite coordinate")]
    NonFiniteCoordinate(String),

    #[error("Node id '{0}' must not contain ','")]
    InvalidNodeId(String),

    #[error("{entity} references unknown node '{node}'")]
    UnknownNode { entity: EntityKind, node: String },

    #[error("Member '{node},{node}' connects node '{node}' to itself")]
    SelfReferentialMember { node: String },

    #[error("Member '{node_i},{node_j}' duplicates an existing member between the same nodes")]
    DuplicateMember { node_i: String, node_j: String },

    #[error("Member '{node_i},{node_j}' has zero length")]
    ZeroLengthMember { node_i: String, node_j: String },

    #[error("Member '{node_i},{node_j}' specifies both a stiffness and an axial rigidity")]
    ConflictingStiffness { node_i: String, node_j: String },

    #[error("Member '{node_i},{node_j}' has invalid {property} {value}; it must be finite and positive")]
    InvalidStiffness {
        node_i: String,
        node_j: String,
        property: &'static str,
        value: f64,
    },

    #[error("Node '{0}' has more than one support")]
    DuplicateSupport(String),

    #[error("Support at node '{0}' does not fix any direction")]
    EmptySupport(String),

    #[error("Node '{0}' has more than one load")]
    DuplicateLoad(String),

    #[error("Load at node '{0}' has a non-finite component")]
    NonFiniteLoad(String),

    #[error("Load at node '{0}' is zero in both directions")]
    ZeroLoad(String),

    #[error("Every degree of freedom is fixed; there is nothing to analyze")]
    FullyRestrained,
}

/// The supported structure admits a displacement mode under zero load
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "Truss is unstable: no stiffness against {axis} displacement at node '{node}' \
     (pivot {pivot:.3e} <= threshold {threshold:.3e}); check supports and bracing"
)]
pub struct InstabilityError {
    /// Node owning the degree of freedom where elimination broke down
    pub node: String,
    /// Direction of that degree of freedom
    pub axis: Axis,
    /// Pivot value that failed the test
    pub pivot: f64,
    /// Threshold the pivot was compared against
    pub threshold: f64,
}

/// The solve completed but its output cannot be trusted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericalError {
    #[error("Stiffness matrix is ill-conditioned: pivot ratio {pivot_ratio:.3e} exceeds {limit:.3e}")]
    IllConditioned { pivot_ratio: f64, limit: f64 },

    #[error("Solution contains non-finite displacements")]
    NonFiniteSolution,
}

/// Raw solver failure, expressed in reduced (free DOF) coordinates
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Singular system: pivot {pivot:.3e} at row {row} is below threshold {threshold:.3e}")]
pub struct SingularSystem {
    /// Row of the reduced system whose pivot failed
    pub row: usize,
    pub pivot: f64,
    pub threshold: f64,
}

/// Stable category of a [`TrussError`], used at the service boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Instability,
    Numerical,
}

/// Main error type for truss analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrussError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Instability(#[from] InstabilityError),

    #[error(transparent)]
    Numerical(#[from] NumericalError),
}

impl TrussError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Instability(_) => ErrorKind::Instability,
            Self::Numerical(_) => ErrorKind::Numerical,
        }
    }
}

/// Result type for truss operations
pub type TrussResult<T> = Result<T, TrussError>;

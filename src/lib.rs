//! Truss Solver - 2D direct stiffness analysis of pin-jointed trusses
//!
//! Given node positions, members, supports and nodal loads, this library
//! computes nodal displacements, member axial forces and support reactions.
//! The analysis runs as a fixed pipeline:
//! - [`model`]: validate the request into an index-based model
//! - [`assembly`]: assemble the global stiffness matrix and load vector
//! - [`boundary`]: partition DOFs and reduce to the free ones
//! - [`solver`]: factorize, detecting mechanisms via pivot checks
//! - [`recovery`]: member forces and support reactions
//!
//! ## Example
//! ```rust
//! use truss_solver::prelude::*;
//!
//! let input = TrussInput::new()
//!     .with_node("1", 0.0, 0.0)
//!     .with_node("2", 4.0, 0.0)
//!     .with_node("3", 2.0, 3.0)
//!     .with_member("1", "2")
//!     .with_member("2", "3")
//!     .with_member("3", "1")
//!     .with_support("1", true, true)
//!     .with_support("2", false, true)
//!     .with_load("3", 0.0, -10.0);
//!
//! let result = analyze(&input, &AnalysisOptions::default()).unwrap();
//!
//! // Both supports carry half the load
//! let [_, ry] = result.reaction("2").unwrap();
//! assert!((ry - 5.0).abs() < 1e-9);
//! ```

pub mod analysis;
pub mod assembly;
pub mod boundary;
pub mod config;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod recovery;
pub mod results;
pub mod solver;
pub mod wire;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{analyze, analyze_model, AnalysisOptions};
    pub use crate::config::ServerConfig;
    pub use crate::elements::{Axis, Member, MemberStiffness, Node, Support};
    pub use crate::error::{
        ErrorKind, InstabilityError, NumericalError, TrussError, TrussResult, ValidationError,
    };
    pub use crate::loads::NodeLoad;
    pub use crate::model::{TrussModel, ValidationPolicy};
    pub use crate::results::{
        AnalysisResult, AnalysisSummary, ForceState, MemberForce, NodeDisplacement,
        NumericalWarning, SupportReaction,
    };
    pub use crate::solver::SolverMethod;
    pub use crate::wire::{ErrorResponse, MemberInput, TrussInput, TrussResponse};
}

#[cfg(feature = "wasm")]
pub mod wasm;

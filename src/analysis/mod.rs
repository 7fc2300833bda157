//! Analysis options and the analysis pipeline

mod pipeline;

pub use pipeline::{analyze, analyze_model};

use serde::{Deserialize, Serialize};

use crate::model::ValidationPolicy;
use crate::solver::SolverMethod;

/// Options for truss analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Factorization used for the reduced system
    pub method: SolverMethod,
    /// Relative pivot tolerance; pivots at or below `pivot_tolerance * ‖K‖∞` are singular
    pub pivot_tolerance: f64,
    /// Largest acceptable max/min pivot ratio
    pub conditioning_limit: f64,
    /// Fail instead of warning when the conditioning limit is exceeded
    pub escalate_ill_conditioning: bool,
    /// Check static equilibrium after analysis
    pub check_statics: bool,
    /// Relative tolerance for the equilibrium check
    pub statics_tolerance: f64,
    /// Input validation rules
    pub validation: ValidationPolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            method: SolverMethod::Cholesky,
            pivot_tolerance: 1e-10,
            conditioning_limit: 1e8,
            escalate_ill_conditioning: false,
            check_statics: true,
            statics_tolerance: 1e-8,
            validation: ValidationPolicy::default(),
        }
    }
}

impl AnalysisOptions {
    /// Set the factorization method
    pub fn with_method(mut self, method: SolverMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the conditioning limit
    pub fn with_conditioning_limit(mut self, limit: f64) -> Self {
        self.conditioning_limit = limit;
        self
    }

    /// Treat ill-conditioning as an error
    pub fn escalating(mut self) -> Self {
        self.escalate_ill_conditioning = true;
        self
    }

    /// Set validation rules
    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AnalysisOptions::default();
        assert_eq!(options.method, SolverMethod::Cholesky);
        assert_eq!(options.pivot_tolerance, 1e-10);
        assert_eq!(options.conditioning_limit, 1e8);
        assert!(options.check_statics);
        assert!(options.validation.require_loads);
    }

    #[test]
    fn test_partial_options_from_json() {
        let options: AnalysisOptions =
            serde_json::from_str(r#"{"method": "lu", "escalate_ill_conditioning": true}"#).unwrap();
        assert_eq!(options.method, SolverMethod::Lu);
        assert!(options.escalate_ill_conditioning);
        assert_eq!(options.pivot_tolerance, 1e-10);
    }
}

//! Linear static analysis: build, assemble, reduce, solve, recover

use log::{debug, info, warn};

use super::AnalysisOptions;
use crate::assembly::GlobalSystem;
use crate::boundary::{DofPartition, ReducedSystem};
use crate::error::{InstabilityError, NumericalError, SingularSystem, TrussResult};
use crate::model::TrussModel;
use crate::recovery::{self, Recovered};
use crate::results::{AnalysisResult, AnalysisSummary, NumericalWarning};
use crate::solver;
use crate::wire::TrussInput;

/// Validate a request and run the analysis
pub fn analyze(input: &TrussInput, options: &AnalysisOptions) -> TrussResult<AnalysisResult> {
    let model = TrussModel::build(input, &options.validation)?;
    analyze_model(&model, options)
}

/// Run the analysis on an already validated model
pub fn analyze_model(model: &TrussModel, options: &AnalysisOptions) -> TrussResult<AnalysisResult> {
    debug!(
        "Analyzing truss: {} nodes, {} members, {} supports, {} loads",
        model.nodes.len(),
        model.members.len(),
        model.supports.len(),
        model.loads.len()
    );

    let system = GlobalSystem::assemble(model);
    let reduced = ReducedSystem::reduce(model, &system)?;
    debug!(
        "Reduced system: {} free / {} fixed DOFs",
        reduced.size(),
        reduced.partition.fixed.len()
    );

    let solution = solver::solve(
        &reduced.stiffness,
        &reduced.loads,
        options.method,
        options.pivot_tolerance,
    )
    .map_err(|singular| instability(model, &reduced.partition, singular))?;
    debug!(
        "Solved with {:?}: pivots in [{:.3e}, {:.3e}], ratio {:.3e}",
        options.method, solution.min_pivot, solution.max_pivot, solution.pivot_ratio
    );

    if solution.displacements.iter().any(|u| !u.is_finite()) {
        return Err(NumericalError::NonFiniteSolution.into());
    }

    let mut warnings = Vec::new();
    if solution.pivot_ratio > options.conditioning_limit {
        if options.escalate_ill_conditioning {
            return Err(NumericalError::IllConditioned {
                pivot_ratio: solution.pivot_ratio,
                limit: options.conditioning_limit,
            }
            .into());
        }
        let warning = NumericalWarning::IllConditioned {
            pivot_ratio: solution.pivot_ratio,
            limit: options.conditioning_limit,
        };
        warn!("{warning}");
        warnings.push(warning);
    }

    let recovered = recovery::recover(model, &system, &reduced.partition, &solution.displacements);
    if !is_finite(&recovered) {
        return Err(NumericalError::NonFiniteSolution.into());
    }

    if options.check_statics {
        if let Some(warning) = check_equilibrium(model, &recovered, options.statics_tolerance) {
            warn!("{warning}");
            warnings.push(warning);
        }
    }

    let summary = AnalysisSummary {
        total_dofs: system.dof_count(),
        free_dofs: reduced.size(),
        pivot_ratio: solution.pivot_ratio,
        ..AnalysisSummary::collect(
            &recovered.displacements,
            &recovered.member_forces,
            &recovered.reactions,
        )
    };

    info!(
        "Analysis complete: max |axial| {:.4} in member {}, max displacement {:.4e} at node {}",
        summary.max_axial, summary.max_axial_member, summary.max_displacement, summary.max_disp_node
    );

    Ok(AnalysisResult {
        member_forces: recovered.member_forces,
        displacements: recovered.displacements,
        reactions: recovered.reactions,
        warnings,
        summary,
    })
}

/// Translate a reduced-system pivot failure into the node and direction it belongs to
fn instability(
    model: &TrussModel,
    partition: &DofPartition,
    singular: SingularSystem,
) -> InstabilityError {
    let dof = partition.free[singular.row];
    let (node, axis) = model.describe_dof(dof);
    warn!("Unstable truss: {singular} (node '{node}', {axis})");

    InstabilityError {
        node: node.to_string(),
        axis,
        pivot: singular.pivot,
        threshold: singular.threshold,
    }
}

fn is_finite(recovered: &Recovered) -> bool {
    recovered.member_forces.iter().all(|m| m.force.is_finite())
        && recovered
            .reactions
            .iter()
            .all(|r| r.rx.is_finite() && r.ry.is_finite())
}

/// Compare applied loads against support reactions
///
/// Returns a warning when `|ΣF + ΣR|` exceeds `tolerance * max(1, Σ|F|)`.
fn check_equilibrium(
    model: &TrussModel,
    recovered: &Recovered,
    tolerance: f64,
) -> Option<NumericalWarning> {
    let (mut sum_x, mut sum_y, mut scale) = (0.0, 0.0, 0.0);
    for load in &model.loads {
        sum_x += load.fx;
        sum_y += load.fy;
        scale += load.fx.abs() + load.fy.abs();
    }
    for reaction in &recovered.reactions {
        sum_x += reaction.rx;
        sum_y += reaction.ry;
    }

    let residual = f64::hypot(sum_x, sum_y);
    let limit = tolerance * f64::max(1.0, scale);
    debug!("Equilibrium residual {residual:.3e} (limit {limit:.3e})");

    (residual > limit).then_some(NumericalWarning::EquilibriumResidual {
        residual,
        tolerance: limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Axis;
    use crate::error::TrussError;
    use approx::assert_relative_eq;

    fn triangle() -> TrussInput {
        TrussInput::new()
            .with_node("A", 0.0, 0.0)
            .with_node("B", 4.0, 0.0)
            .with_node("C", 2.0, 3.0)
            .with_member("A", "B")
            .with_member("B", "C")
            .with_member("C", "A")
            .with_support("A", true, true)
            .with_support("B", false, true)
            .with_load("C", 0.0, -10.0)
    }

    #[test]
    fn test_symmetric_triangle() {
        let result = analyze(&triangle(), &AnalysisOptions::default()).unwrap();

        // Symmetric load on a symmetric triangle: equal vertical reactions
        assert_relative_eq!(result.reaction("A").unwrap()[1], 5.0, epsilon = 1e-9);
        assert_relative_eq!(result.reaction("B").unwrap()[1], 5.0, epsilon = 1e-9);
        assert_relative_eq!(result.reaction("A").unwrap()[0], 0.0, epsilon = 1e-9);

        // Inclined members carry 5 * L / 3 in compression, L = sqrt(13)
        let inclined = -5.0 * 13f64.sqrt() / 3.0;
        assert_relative_eq!(result.member_force("B,C").unwrap(), inclined, epsilon = 1e-9);
        assert_relative_eq!(result.member_force("C,A").unwrap(), inclined, epsilon = 1e-9);
        assert_relative_eq!(result.member_force("A,B").unwrap(), 10.0 / 3.0, epsilon = 1e-9);

        assert!(result.warnings.is_empty());
        assert_eq!(result.summary.total_dofs, 6);
        assert_eq!(result.summary.free_dofs, 3);
        assert!(result.summary.pivot_ratio >= 1.0);
    }

    #[test]
    fn test_unbraced_node_is_unstable() {
        // D hangs off a single member: nothing resists its sideways motion
        let input = triangle()
            .with_node("D", 2.0, 6.0)
            .with_member("C", "D");
        let err = analyze(&input, &AnalysisOptions::default()).unwrap_err();
        match err {
            TrussError::Instability(e) => {
                assert_eq!(e.node, "D");
                assert_eq!(e.axis, Axis::X);
            }
            other => panic!("expected instability, got {other:?}"),
        }
    }

    #[test]
    fn test_ill_conditioning_warns_or_fails() {
        let input = TrussInput::new()
            .with_node("A", 0.0, 0.0)
            .with_node("B", 1.0, 0.0)
            .with_node("C", 2.0, 0.0)
            .with_member_stiffness("A", "B", 1e4)
            .with_member_stiffness("B", "C", 1e-2)
            .with_support("A", true, true)
            .with_support("B", false, true)
            .with_support("C", false, true)
            .with_load("C", 1.0, 0.0);

        let options = AnalysisOptions::default().with_conditioning_limit(1e3);
        let result = analyze(&input, &options).unwrap();
        assert!(matches!(
            result.warnings[0],
            NumericalWarning::IllConditioned { .. }
        ));

        let err = analyze(&input, &options.escalating()).unwrap_err();
        assert!(matches!(
            err,
            TrussError::Numerical(NumericalError::IllConditioned { .. })
        ));
    }

    #[test]
    fn test_equilibrium_check() {
        let model = TrussModel::build(&triangle(), &Default::default()).unwrap();
        let system = GlobalSystem::assemble(&model);
        let reduced = ReducedSystem::reduce(&model, &system).unwrap();
        let solution = solver::solve(
            &reduced.stiffness,
            &reduced.loads,
            Default::default(),
            1e-10,
        )
        .unwrap();
        let mut recovered =
            recovery::recover(&model, &system, &reduced.partition, &solution.displacements);
        assert!(check_equilibrium(&model, &recovered, 1e-8).is_none());

        recovered.reactions[0].ry += 1.0;
        assert!(matches!(
            check_equilibrium(&model, &recovered, 1e-8),
            Some(NumericalWarning::EquilibriumResidual { .. })
        ));
    }
}

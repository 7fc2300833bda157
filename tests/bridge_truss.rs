use approx::assert_relative_eq;
use truss_solver::prelude::*;

/// Five node bridge truss, pinned at 1, roller at 3, 10 units down at 4 and 5
fn bridge_input() -> TrussInput {
    TrussInput::new()
        .with_node("1", 0.0, 0.0)
        .with_node("2", 4.0, 0.0)
        .with_node("3", 8.0, 0.0)
        .with_node("4", 2.0, 3.0)
        .with_node("5", 6.0, 3.0)
        .with_member("1", "2")
        .with_member("2", "3")
        .with_member("1", "4")
        .with_member("2", "4")
        .with_member("2", "5")
        .with_member("3", "5")
        .with_member("4", "5")
        .with_support("1", true, true)
        .with_support("3", false, true)
        .with_load("4", 0.0, -10.0)
        .with_load("5", 0.0, -10.0)
}

fn scaled_bridge(axial_rigidity: f64) -> TrussInput {
    let base = bridge_input();
    let mut input = TrussInput {
        members: Vec::new(),
        ..base.clone()
    };
    for member in &base.members {
        let (i, j) = member.endpoints();
        input = input.with_member_rigidity(i, j, axial_rigidity);
    }
    input
}

const BRIDGE_JSON: &str = r#"{
    "nodes": {"1": [0, 0], "2": [4, 0], "3": [8, 0], "4": [2, 3], "5": [6, 3]},
    "members": [[1, 2], [2, 3], [1, 4], [2, 4], [2, 5], [3, 5], [4, 5]],
    "supports": {"1": [true, true], "3": [false, true]},
    "loads": {"4": [0, -10], "5": [0, -10]}
}"#;

#[test]
fn bridge_member_forces_match_method_of_joints() {
    let result = analyze(&bridge_input(), &AnalysisOptions::default()).unwrap();

    let chord = 20.0 / 3.0;
    let end_post = -10.0 * 13f64.sqrt() / 3.0;

    assert_relative_eq!(result.member_force("1,2").unwrap(), chord, epsilon = 1e-9);
    assert_relative_eq!(result.member_force("2,3").unwrap(), chord, epsilon = 1e-9);
    assert_relative_eq!(result.member_force("1,4").unwrap(), end_post, epsilon = 1e-9);
    assert_relative_eq!(result.member_force("3,5").unwrap(), end_post, epsilon = 1e-9);
    assert_relative_eq!(result.member_force("2,4").unwrap(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(result.member_force("2,5").unwrap(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(result.member_force("4,5").unwrap(), -chord, epsilon = 1e-9);

    assert_eq!(result.member_state("1,2"), Some(ForceState::Tension));
    assert_eq!(result.member_state("4,5"), Some(ForceState::Compression));
    assert_eq!(result.member_state("2,4"), Some(ForceState::Zero));
}

#[test]
fn bridge_displacements_respect_supports() {
    let result = analyze(&bridge_input(), &AnalysisOptions::default()).unwrap();

    assert_eq!(result.displacement("1"), Some([0.0, 0.0]));
    assert_eq!(result.displacement("3").unwrap()[1], 0.0);

    for node in ["2", "3", "4", "5"] {
        let [dx, dy] = result.displacement(node).unwrap();
        assert!(dx.hypot(dy) > 1e-6, "node {node} should move");
    }

    // Bottom chord stretches: node 2 moves right by F L / EA = (20/3) * 4
    assert_relative_eq!(result.displacement("2").unwrap()[0], 80.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn bridge_reactions_balance_loads() {
    let result = analyze(&bridge_input(), &AnalysisOptions::default()).unwrap();

    let [r1x, r1y] = result.reaction("1").unwrap();
    let [r3x, r3y] = result.reaction("3").unwrap();
    assert_relative_eq!(r1x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(r1y, 10.0, epsilon = 1e-9);
    assert_relative_eq!(r3y, 10.0, epsilon = 1e-9);
    assert_eq!(r3x, 0.0);

    let sum_x: f64 = result.reactions.iter().map(|r| r.rx).sum();
    let sum_y: f64 = result.reactions.iter().map(|r| r.ry).sum::<f64>() - 20.0;
    assert_relative_eq!(sum_x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(sum_y, 0.0, epsilon = 1e-9);
    assert!(result.warnings.is_empty());
}

#[test]
fn load_at_support_is_absorbed_by_reaction() {
    let options = AnalysisOptions::default();
    let base = analyze(&bridge_input(), &options).unwrap();
    let result = analyze(&bridge_input().with_load("1", 7.0, 3.0), &options).unwrap();

    for (a, b) in base.member_forces.iter().zip(&result.member_forces) {
        assert_relative_eq!(a.force, b.force, epsilon = 1e-9);
    }
    for (a, b) in base.displacements.iter().zip(&result.displacements) {
        assert_relative_eq!(a.dx, b.dx, epsilon = 1e-9);
        assert_relative_eq!(a.dy, b.dy, epsilon = 1e-9);
    }

    let [r1x, r1y] = result.reaction("1").unwrap();
    assert_relative_eq!(r1x, -7.0, epsilon = 1e-9);
    assert_relative_eq!(r1y, 7.0, epsilon = 1e-9);
    assert_relative_eq!(result.reaction("3").unwrap()[1], 10.0, epsilon = 1e-9);

    let sum_x: f64 = result.reactions.iter().map(|r| r.rx).sum::<f64>() + 7.0;
    let sum_y: f64 = result.reactions.iter().map(|r| r.ry).sum::<f64>() + 3.0 - 20.0;
    assert_relative_eq!(sum_x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(sum_y, 0.0, epsilon = 1e-9);
    assert!(result.warnings.is_empty());
}

#[test]
fn bridge_summary() {
    let result = analyze(&bridge_input(), &AnalysisOptions::default()).unwrap();
    let summary = &result.summary;

    assert_eq!(summary.num_nodes, 5);
    assert_eq!(summary.num_members, 7);
    assert_eq!(summary.num_supports, 2);
    assert_eq!(summary.total_dofs, 10);
    assert_eq!(summary.free_dofs, 7);
    assert_relative_eq!(summary.max_axial, 10.0 * 13f64.sqrt() / 3.0, epsilon = 1e-9);
    // The two end posts carry the same force
    assert!(["1,4", "3,5"].contains(&summary.max_axial_member.as_str()));
    assert!(summary.pivot_ratio >= 1.0);
}

#[test]
fn determinate_forces_are_independent_of_stiffness() {
    let options = AnalysisOptions::default();
    let unit = analyze(&bridge_input(), &options).unwrap();

    for lambda in [0.01, 7.5, 2e5] {
        let scaled = analyze(&scaled_bridge(lambda), &options).unwrap();

        for (a, b) in unit.member_forces.iter().zip(&scaled.member_forces) {
            assert_eq!(a.key(), b.key());
            assert_relative_eq!(a.force, b.force, epsilon = 1e-8, max_relative = 1e-8);
        }
        for (a, b) in unit.displacements.iter().zip(&scaled.displacements) {
            assert_relative_eq!(a.dx / lambda, b.dx, epsilon = 1e-12, max_relative = 1e-8);
            assert_relative_eq!(a.dy / lambda, b.dy, epsilon = 1e-12, max_relative = 1e-8);
        }
    }
}

#[test]
fn lu_and_cholesky_agree() {
    let chol = analyze(&bridge_input(), &AnalysisOptions::default()).unwrap();
    let lu = analyze(
        &bridge_input(),
        &AnalysisOptions::default().with_method(SolverMethod::Lu),
    )
    .unwrap();

    for (a, b) in chol.member_forces.iter().zip(&lu.member_forces) {
        assert_relative_eq!(a.force, b.force, epsilon = 1e-9);
    }
    for (a, b) in chol.displacements.iter().zip(&lu.displacements) {
        assert_relative_eq!(a.dx, b.dx, epsilon = 1e-9);
        assert_relative_eq!(a.dy, b.dy, epsilon = 1e-9);
    }
}

#[test]
fn json_round_trip_preserves_order() {
    let input = TrussInput::from_json(BRIDGE_JSON).unwrap();
    assert_eq!(input, bridge_input());

    let result = analyze(&input, &AnalysisOptions::default()).unwrap();
    let json = serde_json::to_string(&result.to_response()).unwrap();
    let response: TrussResponse = serde_json::from_str(&json).unwrap();

    assert_eq!(
        response.member_forces.keys().collect::<Vec<_>>(),
        vec!["1,2", "2,3", "1,4", "2,4", "2,5", "3,5", "4,5"]
    );
    assert_eq!(
        response.displacements.keys().collect::<Vec<_>>(),
        vec!["1", "2", "3", "4", "5"]
    );
    assert_eq!(response.reactions.keys().collect::<Vec<_>>(), vec!["1", "3"]);
    assert!(!json.contains("warnings"));

    // Member keys follow declared orientation
    let flipped = TrussInput::from_json(&BRIDGE_JSON.replace("[4, 5]]", "[5, 4]]")).unwrap();
    let result = analyze(&flipped, &AnalysisOptions::default()).unwrap();
    assert!(result.member_force("5,4").is_some());
    assert!(result.member_force("4,5").is_none());
}

//! Truss Solver Example - Five Node Bridge Truss

use anyhow::Context;
use truss_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Truss Solver Example: Bridge Truss ===\n");

    //        4 -------- 5
    //       / \        / \
    //      /   \      /   \
    //     1 ---- 2 ------ 3
    //     ^               o
    //   Pinned         Roller
    //
    // 10 units downward at 4 and 5
    let input = TrussInput::new()
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
        .with_load("5", 0.0, -10.0);

    let result = analyze(&input, &AnalysisOptions::default()).context("Bridge analysis failed")?;

    println!("Node Displacements:");
    for disp in &result.displacements {
        println!("  {}: DX={:+.4}, DY={:+.4}", disp.node, disp.dx, disp.dy);
    }

    println!("\nReactions:");
    for rxn in &result.reactions {
        println!("  {}: RX={:+.3}, RY={:+.3}", rxn.node, rxn.rx, rxn.ry);
    }

    println!("\nMember Forces:");
    let scale = result.summary.max_axial;
    for member in &result.member_forces {
        println!(
            "  {:>4}: {:+9.4} ({})",
            member.key(),
            member.force,
            member.state(scale)
        );
    }

    let summary = &result.summary;
    println!("\nSummary:");
    println!("  Max displacement: {:.4} at {}", summary.max_displacement, summary.max_disp_node);
    println!("  Max reaction: {:.3} at {}", summary.max_reaction, summary.max_reaction_node);
    println!("  Max axial: {:.4} in {}", summary.max_axial, summary.max_axial_member);
    println!("  DOFs: {} total, {} free", summary.total_dofs, summary.free_dofs);
    println!("  Pivot ratio: {:.3e}", summary.pivot_ratio);

    for warning in &result.warnings {
        println!("  Warning: {warning}");
    }

    println!("\n=== Analysis Complete ===");
    Ok(())
}

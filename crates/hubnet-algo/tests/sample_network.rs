//! End-to-end design of the bundled Lima instance

use hubnet_algo::design::{
    audit_solution, build_model, create_solver, generate_report, solve_design, DesignConfig,
    MipSolver, MipSolverKind, ReportOptions, SolveStatus,
};
use hubnet_core::{ClientId, HubId, Instance, InstanceBuilder, SatelliteId};
use std::path::PathBuf;

fn lima() -> Instance {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/lima_instance.json");
    hubnet_io::load_instance(path).unwrap()
}

#[test]
fn sample_opens_only_the_cheaper_hub() {
    let outcome = solve_design(&lima(), &DesignConfig::default()).unwrap();
    let plan = outcome.report.plan().expect("optimal plan");

    assert_eq!(plan.active_hub_ids(), vec![&HubId::new("H1")]);
    assert!((plan.total_cost - 118.3).abs() < 1e-6);
    assert!(!plan.objective_mismatch);
    assert!(plan.audit_issues.is_empty());

    let b = &plan.cost_breakdown;
    assert!((b.hub_fixed - 50.0).abs() < 1e-9);
    assert!((b.satellite_fixed - 54.0).abs() < 1e-9);
    assert!((b.client_satellite - 8.8).abs() < 1e-9);
    assert!((b.satellite_hub - 5.5).abs() < 1e-9);
    assert_eq!(b.hub_hub, 0.0);
}

#[test]
fn sample_routes_and_capacity_warning() {
    let outcome = solve_design(&lima(), &DesignConfig::default()).unwrap();
    let plan = outcome.report.plan().unwrap();

    let s1 = plan.route(&SatelliteId::new("S1")).unwrap();
    let s1_clients: Vec<&str> = s1.clients().map(|c| c.as_str()).collect();
    assert_eq!(s1_clients, vec!["C1", "C2", "C5"]);
    assert_eq!(s1.total_demand, 32.0);
    let warning = s1.capacity_warning.expect("S1 is overloaded");
    assert_eq!(warning.overload, 2.0);
    assert_eq!(warning.trips_needed, 2);
    assert!((s1.route_cost - 5.3).abs() < 1e-9);
    assert_eq!(s1.hubs, vec![HubId::new("H1")]);

    let s2 = plan.route(&SatelliteId::new("S2")).unwrap();
    let s2_clients: Vec<&str> = s2.clients().map(|c| c.as_str()).collect();
    assert_eq!(s2_clients, vec!["C3", "C4"]);
    assert_eq!(s2.total_demand, 20.0);
    assert!(s2.capacity_warning.is_none());

    assert_eq!(plan.capacity_warnings(), 1);
    assert!(plan.hub_links.is_empty());

    let c1 = &s1.stops[0];
    assert_eq!(c1.name.as_deref(), Some("Cliente A"));
    assert_eq!(c1.address.as_deref(), Some("Av. Arequipa 1000, Lince"));
}

#[test]
fn sample_link_variables_stay_zero() {
    let outcome = solve_design(&lima(), &DesignConfig::default()).unwrap();
    assert_eq!(outcome.model.vars.hub_hub_vars().len(), 2);
    for link in outcome.model.vars.hub_hub_vars() {
        assert!(outcome.solution.value(link.var).unwrap() < 0.5);
    }
}

#[test]
fn resolving_the_same_model_is_stable() {
    let instance = lima();
    let design = build_model(&instance);
    let solver = create_solver("microlp").unwrap();

    let first = solver.solve(&design.model);
    let second = solver.solve(&design.model);

    assert_eq!(first.status(), second.status());
    let (a, b) = (first.objective_value().unwrap(), second.objective_value().unwrap());
    assert!((a - b).abs() < 1e-9);
}

#[test]
fn audit_recomputes_objective() {
    let instance = lima();
    let design = build_model(&instance);
    let solution = MipSolver::new(MipSolverKind::Microlp).solve(&design.model);

    let audit = audit_solution(&instance, &design, &solution, 0.5).unwrap();
    assert!(audit.is_structurally_valid());
    assert!(audit.objective_matches(1e-6));
    assert!(audit.active_hub_links.is_empty());
}

#[test]
fn client_without_satellite_is_infeasible() {
    let instance = InstanceBuilder::new(10.0)
        .hub("H1", 1.0)
        .satellite("S1", 1.0)
        .client("C1", 1.0)
        .client("C2", 1.0)
        .client_satellite("C1", "S1", 1.0)
        .satellite_hub("S1", "H1", 1.0)
        .build()
        .unwrap();

    let outcome = solve_design(&instance, &DesignConfig::default()).unwrap();
    assert_eq!(outcome.report.status(), SolveStatus::Infeasible);
    assert!(outcome.report.plan().is_none());
    assert!(outcome.solution.values().is_empty());
    assert!(outcome.report.render().contains("No optimal solution found"));
}

#[test]
fn satellite_without_hub_is_infeasible() {
    let instance = InstanceBuilder::new(10.0)
        .hub("H1", 1.0)
        .satellite("S1", 1.0)
        .satellite("S2", 1.0)
        .client("C1", 1.0)
        .client_satellite("C1", "S1", 1.0)
        .satellite_hub("S1", "H1", 1.0)
        .build()
        .unwrap();

    let outcome = solve_design(&instance, &DesignConfig::default()).unwrap();
    assert_eq!(outcome.report.status(), SolveStatus::Infeasible);
}

#[test]
fn no_hubs_is_infeasible_not_an_error() {
    let instance = InstanceBuilder::new(10.0)
        .satellite("S1", 1.0)
        .client("C1", 1.0)
        .client_satellite("C1", "S1", 1.0)
        .build()
        .unwrap();

    let outcome = solve_design(&instance, &DesignConfig::default()).unwrap();
    assert_eq!(outcome.report.status(), SolveStatus::Infeasible);
}

#[test]
fn satellite_fixed_cost_scales_with_clients() {
    // Two clients on one satellite pay its fixed cost twice
    let instance = InstanceBuilder::new(100.0)
        .hub("H1", 0.0)
        .satellite("S1", 7.0)
        .client("C1", 1.0)
        .client("C2", 1.0)
        .client_satellite("C1", "S1", 0.0)
        .client_satellite("C2", "S1", 0.0)
        .satellite_hub("S1", "H1", 0.0)
        .build()
        .unwrap();

    let outcome = solve_design(&instance, &DesignConfig::default()).unwrap();
    let plan = outcome.report.plan().unwrap();
    assert!((plan.total_cost - 14.0).abs() < 1e-6);
}

#[test]
fn report_for_fresh_solution_matches_pipeline() {
    let instance = lima();
    let outcome = solve_design(&instance, &DesignConfig::default()).unwrap();

    let again = generate_report(
        &instance,
        &outcome.model,
        &outcome.solution,
        &ReportOptions::default(),
    );
    assert_eq!(again, outcome.report);
    assert_eq!(
        outcome
            .model
            .vars
            .client_satellite(&ClientId::new("C3"), &SatelliteId::new("S2"))
            .map(|v| outcome.solution.is_active(v, 0.5)),
        Some(true)
    );
}

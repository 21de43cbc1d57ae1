//! Two-echelon distribution network design
//!
//! MILP formulation for choosing which hubs to open, which hub(s) each
//! satellite is routed through and which satellite serves each client.
//!
//! ## Problem Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  HUBS ──▶ SATELLITES ──▶ CLIENTS                                  │
//! │                                                                  │
//! │  Given:                                                          │
//! │    • Candidate hubs with fixed opening costs                     │
//! │    • Satellites with fixed costs                                 │
//! │    • Clients with demand                                         │
//! │    • Sparse pair costs (only listed pairs may be used)           │
//! │                                                                  │
//! │  Decide:                                                         │
//! │    • OpenHub[h]                  hub opened                      │
//! │    • AssignClientSatellite[c,s]  client served by satellite      │
//! │    • AssignSatelliteHub[s,h]     satellite routed through hub    │
//! │    • LinkHubHub[h1,h2]           inter-hub link                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## MILP Formulation
//!
//! ```text
//! minimize    Σ_h f_h·y_h + Σ_(c,s) (f_s + c_cs)·x_cs + Σ_(s,h) c_sh·z_sh + Σ_(h,h') c_hh'·w_hh'
//!
//! subject to:
//!   Σ_s x_cs = 1          for every client c       (single assignment)
//!   Σ_h z_sh ≥ 1          for every satellite s    (satellite coverage)
//!   z_sh ≤ y_h            for every allowed (s,h)  (hub activation)
//!   x, y, z, w ∈ {0,1}
//! ```
//!
//! The satellite fixed cost `f_s` is charged once per assigned client, and
//! `w` appears in no constraint, so with non-negative costs it is always 0.
//! Vehicle capacity is not a constraint; overloaded routes are reported.

mod audit;
mod builder;
mod linear;
mod pipeline;
mod report;
mod solver;

pub use audit::{audit_solution, CostBreakdown, SolutionAudit};
pub use builder::{build_model, DesignModel, DesignVariables, PairVar};
pub use linear::{
    Column, Comparison, LinearExpr, LinearModel, ModelStats, ObjectiveSense, Row, VarHandle,
};
pub use pipeline::{solve_design, DesignConfig, DesignOutcome};
pub use report::{
    generate_report, ActiveHub, CapacityWarning, DesignReport, HubLink, NetworkPlan,
    ReportOptions, RouteStop, SatelliteLink, SatelliteRoute,
};
pub use solver::{create_solver, MipSolver, MipSolverKind, Solution, SolveStatus};

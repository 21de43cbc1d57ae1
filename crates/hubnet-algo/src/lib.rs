//! # hubnet-algo: network design optimization
//!
//! The [`design`] module builds the two-echelon hub/satellite/client MILP
//! from a validated [`hubnet_core::Instance`], solves it through `good_lp`,
//! audits the assignment and produces a typed report.
//!
//! | Step | Entry point |
//! |------|-------------|
//! | Build | [`design::build_model`] |
//! | Solve | [`design::create_solver`], [`design::MipSolver::solve`] |
//! | Report | [`design::generate_report`] |
//! | All three | [`design::solve_design`] |
//!
//! Backends: `microlp` (pure Rust, always available), `highs` with the
//! `solver-highs` feature and `coin_cbc` with `solver-cbc`.

pub mod design;

pub use design::{solve_design, DesignConfig, DesignOutcome, DesignReport, SolveStatus};

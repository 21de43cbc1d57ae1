use super::builder::{build_model, DesignModel};
use super::report::{generate_report, DesignReport, ReportOptions};
use super::solver::{create_solver, MipSolver, Solution};
use hubnet_core::{HubnetError, HubnetResult, Instance};
use tracing::info;

/// Library-side settings for one design run
#[derive(Debug, Clone, PartialEq)]
pub struct DesignConfig {
    /// Solver backend name (`microlp`, `highs`, `coin_cbc`)
    pub backend: String,
    /// A binary column counts as 1 above this value
    pub assignment_threshold: f64,
    /// Relative tolerance of the objective audit
    pub objective_tolerance: f64,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            backend: "microlp".to_string(),
            assignment_threshold: 0.5,
            objective_tolerance: 1e-6,
        }
    }
}

impl DesignConfig {
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            assignment_threshold: self.assignment_threshold,
            objective_tolerance: self.objective_tolerance,
        }
    }

    /// Check the run settings and the backend name without solving anything.
    pub fn validate(&self) -> HubnetResult<()> {
        self.solver().map(|_| ())
    }

    fn solver(&self) -> HubnetResult<MipSolver> {
        if !(self.assignment_threshold > 0.0 && self.assignment_threshold < 1.0) {
            return Err(HubnetError::Config(format!(
                "assignment_threshold must lie strictly between 0 and 1, got {}",
                self.assignment_threshold
            )));
        }
        if !(self.objective_tolerance.is_finite() && self.objective_tolerance >= 0.0) {
            return Err(HubnetError::Config(format!(
                "objective_tolerance must be a non-negative number, got {}",
                self.objective_tolerance
            )));
        }
        create_solver(&self.backend)
    }
}

/// Everything one design run produces.
#[derive(Debug, Clone)]
pub struct DesignOutcome {
    pub model: DesignModel,
    pub solution: Solution,
    pub report: DesignReport,
}

/// Build, solve and report a network design.
///
/// The backend is created before any modelling, so configuration errors
/// surface first. Non-optimal outcomes are returned in the report, not as
/// errors.
///
/// # Example
///
/// ```
/// use hubnet_algo::design::{solve_design, DesignConfig};
/// use hubnet_core::InstanceBuilder;
///
/// let instance = InstanceBuilder::new(20.0)
///     .hub("H1", 5.0)
///     .satellite("S1", 1.0)
///     .client("C1", 4.0)
///     .client_satellite("C1", "S1", 2.0)
///     .satellite_hub("S1", "H1", 1.0)
///     .build()?;
///
/// let outcome = solve_design(&instance, &DesignConfig::default())?;
/// assert!(outcome.report.is_optimal());
/// println!("{}", outcome.report);
/// # Ok::<(), hubnet_core::HubnetError>(())
/// ```
pub fn solve_design(instance: &Instance, config: &DesignConfig) -> HubnetResult<DesignOutcome> {
    let solver = config.solver()?;

    let model = build_model(instance);
    let solution = solver.solve(&model.model);
    let report = generate_report(instance, &model, &solution, &config.report_options());

    if let Some(plan) = report.plan() {
        info!(
            total_cost = plan.total_cost,
            hubs = plan.active_hubs.len(),
            routes = plan.routes.len(),
            "network design solved"
        );
    }

    Ok(DesignOutcome {
        model,
        solution,
        report,
    })
}

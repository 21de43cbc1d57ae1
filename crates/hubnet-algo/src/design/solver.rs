//! MILP solver invocation
//!
//! Narrow adapter between a [`LinearModel`] and the `good_lp` backends. It
//! performs no business logic: it translates the model, runs the backend, and
//! maps the backend outcome onto [`SolveStatus`].

use super::linear::{Comparison, LinearExpr, LinearModel, ObjectiveSense, VarHandle};
#[cfg(feature = "solver-cbc")]
use good_lp::solvers::coin_cbc::coin_cbc as coin_cbc_solver;
#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as highs_solver;
use good_lp::solvers::microlp::microlp as microlp_solver;
use good_lp::variable::UnsolvedProblem;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution as _,
    SolverModel, Variable,
};
use hubnet_core::{HubnetError, HubnetResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Feasibility tolerance used to decide rows that have no terms.
const CONSTANT_ROW_TOLERANCE: f64 = 1e-9;

/// MILP engines reachable through `good_lp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MipSolverKind {
    /// Pure-Rust branch and bound, always compiled
    #[default]
    Microlp,
    #[cfg(feature = "solver-highs")]
    Highs,
    #[cfg(feature = "solver-cbc")]
    CoinCbc,
}

const AVAILABLE_MIP_SOLVERS: &[&str] = &[
    "microlp",
    #[cfg(feature = "solver-highs")]
    "highs",
    #[cfg(feature = "solver-cbc")]
    "coin_cbc",
];

impl MipSolverKind {
    pub fn available() -> &'static [&'static str] {
        AVAILABLE_MIP_SOLVERS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MipSolverKind::Microlp => "microlp",
            #[cfg(feature = "solver-highs")]
            MipSolverKind::Highs => "highs",
            #[cfg(feature = "solver-cbc")]
            MipSolverKind::CoinCbc => "coin_cbc",
        }
    }
}

impl fmt::Display for MipSolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn unavailable_solver_error(label: &str, known: bool) -> HubnetError {
    let reason = if known {
        "is not compiled into this build"
    } else {
        "is unknown"
    };
    HubnetError::Config(format!(
        "solver backend '{}' {}; available: {}",
        label,
        reason,
        MipSolverKind::available().join(", ")
    ))
}

impl FromStr for MipSolverKind {
    type Err = HubnetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "microlp" | "default" => Ok(MipSolverKind::Microlp),
            "highs" => {
                #[cfg(feature = "solver-highs")]
                {
                    Ok(MipSolverKind::Highs)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    Err(unavailable_solver_error(&normalized, true))
                }
            }
            "coin_cbc" | "cbc" => {
                #[cfg(feature = "solver-cbc")]
                {
                    Ok(MipSolverKind::CoinCbc)
                }
                #[cfg(not(feature = "solver-cbc"))]
                {
                    Err(unavailable_solver_error(&normalized, true))
                }
            }
            other => Err(unavailable_solver_error(other, false)),
        }
    }
}

/// Outcome of a solve, independent of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The backend stopped without an optimal answer or a proof
    NotSolved,
}

impl SolveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::NotSolved => "not solved",
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status plus, when optimal, the value of every column.
#[derive(Debug, Clone)]
pub struct Solution {
    status: SolveStatus,
    values: Vec<f64>,
    objective: Option<f64>,
    /// Backend that produced the outcome
    pub backend: MipSolverKind,
    /// Backend message for non-optimal outcomes
    pub message: Option<String>,
    pub solve_time: Duration,
}

impl Solution {
    fn optimal(backend: MipSolverKind, values: Vec<f64>, objective: f64, solve_time: Duration) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            objective: Some(objective),
            backend,
            message: None,
            solve_time,
        }
    }

    fn not_optimal(
        backend: MipSolverKind,
        status: SolveStatus,
        message: Option<String>,
        solve_time: Duration,
    ) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: None,
            backend,
            message,
            solve_time,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    /// Value of a column; `None` unless the solve was optimal.
    pub fn value(&self, var: VarHandle) -> Option<f64> {
        self.values.get(var.index()).copied()
    }

    /// Whether a binary column is set, using `threshold` to absorb solver noise.
    pub fn is_active(&self, var: VarHandle, threshold: f64) -> bool {
        self.value(var).is_some_and(|v| v > threshold)
    }

    /// Objective value reported for the optimal assignment.
    pub fn objective_value(&self) -> Option<f64> {
        self.objective
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Handle on a MILP engine.
#[derive(Debug, Clone, Copy)]
pub struct MipSolver {
    kind: MipSolverKind,
}

/// Create a solver from a backend name.
///
/// Fails with [`HubnetError::Config`] when the backend is unknown or not
/// compiled into this build; this is never confused with infeasibility.
pub fn create_solver(name: &str) -> HubnetResult<MipSolver> {
    let kind: MipSolverKind = name.parse()?;
    Ok(MipSolver::new(kind))
}

impl MipSolver {
    pub fn new(kind: MipSolverKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> MipSolverKind {
        self.kind
    }

    /// Solve a model. The model is not modified and may be solved again.
    pub fn solve(&self, model: &LinearModel) -> Solution {
        let start = Instant::now();

        if let Some(row) = model.rows().iter().find(|row| {
            row.expr.is_constant()
                && !row
                    .op
                    .holds(row.expr.constant_part(), row.bound, CONSTANT_ROW_TOLERANCE)
        }) {
            debug!(row = %row.name, "row without terms cannot hold");
            let message = format!("constraint '{}' has no allowed variables", row.name);
            info!(backend = %self.kind, status = "infeasible", "solve finished");
            return Solution::not_optimal(
                self.kind,
                SolveStatus::Infeasible,
                Some(message),
                start.elapsed(),
            );
        }

        if model.num_columns() == 0 {
            let objective = model.objective().constant_part();
            return Solution::optimal(self.kind, Vec::new(), objective, start.elapsed());
        }

        let (problem, columns) = translate(model);
        let outcome = match self.kind {
            MipSolverKind::Microlp => solve_translated(problem.using(microlp_solver), model, &columns),
            #[cfg(feature = "solver-highs")]
            MipSolverKind::Highs => solve_translated(problem.using(highs_solver), model, &columns),
            #[cfg(feature = "solver-cbc")]
            MipSolverKind::CoinCbc => {
                solve_translated(problem.using(coin_cbc_solver), model, &columns)
            }
        };
        let solve_time = start.elapsed();

        let solution = match outcome {
            Ok(values) => {
                let objective = model.objective().evaluate(&values);
                Solution::optimal(self.kind, values, objective, solve_time)
            }
            Err(ResolutionError::Infeasible) => {
                Solution::not_optimal(self.kind, SolveStatus::Infeasible, None, solve_time)
            }
            Err(ResolutionError::Unbounded) => {
                Solution::not_optimal(self.kind, SolveStatus::Unbounded, None, solve_time)
            }
            Err(other) => Solution::not_optimal(
                self.kind,
                SolveStatus::NotSolved,
                Some(other.to_string()),
                solve_time,
            ),
        };

        info!(
            backend = %self.kind,
            status = %solution.status(),
            elapsed_ms = solve_time.as_millis() as u64,
            "solve finished"
        );
        solution
    }
}

/// Declare one binary `good_lp` variable per column and attach the objective.
fn translate(model: &LinearModel) -> (UnsolvedProblem, Vec<Variable>) {
    let mut vars = ProblemVariables::new();
    let columns: Vec<Variable> = model
        .columns()
        .iter()
        .map(|column| vars.add(variable().binary().name(column.name.clone())))
        .collect();

    let objective = to_expression(model.objective(), &columns);
    let problem = match model.sense() {
        ObjectiveSense::Minimize => vars.minimise(objective),
        ObjectiveSense::Maximize => vars.maximise(objective),
    };
    (problem, columns)
}

fn solve_translated<M>(
    mut problem: M,
    model: &LinearModel,
    columns: &[Variable],
) -> Result<Vec<f64>, ResolutionError>
where
    M: SolverModel<Error = ResolutionError>,
{
    // Constant rows were already checked by the caller
    for row in model.rows().iter().filter(|row| !row.expr.is_constant()) {
        let lhs = to_expression(&row.expr, columns);
        let bound = row.bound;
        problem = match row.op {
            Comparison::LessEq => problem.with(constraint!(lhs <= bound)),
            Comparison::Eq => problem.with(constraint!(lhs == bound)),
            Comparison::GreaterEq => problem.with(constraint!(lhs >= bound)),
        };
    }

    let solution = problem.solve()?;
    Ok(columns.iter().map(|&column| solution.value(column)).collect())
}

fn to_expression(expr: &LinearExpr, columns: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant_part());
    for (var, coef) in expr.terms() {
        out += *coef * columns[var.index()];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_solver_names() {
        assert_eq!("microlp".parse::<MipSolverKind>().unwrap(), MipSolverKind::Microlp);
        assert_eq!("DEFAULT".parse::<MipSolverKind>().unwrap(), MipSolverKind::Microlp);
        assert!(MipSolverKind::available().contains(&"microlp"));
    }

    #[test]
    fn test_unknown_solver_is_configuration_error() {
        let err = create_solver("scip").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'scip' is unknown"));
    }

    #[cfg(not(feature = "solver-highs"))]
    #[test]
    fn test_missing_backend_is_configuration_error() {
        let err = create_solver("highs").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("not compiled"));
    }

    #[test]
    fn test_small_binary_problem() {
        // minimise 3a + 2b subject to a + b >= 1
        let mut model = LinearModel::new();
        let a = model.add_boolean_variable("a");
        let b = model.add_boolean_variable("b");
        model.add_linear_constraint(
            "cover",
            [(a, 1.0), (b, 1.0)].into_iter().collect(),
            Comparison::GreaterEq,
            1.0,
        );
        model.set_objective(
            LinearExpr::new().with_term(a, 3.0).with_term(b, 2.0),
            true,
        );

        let solution = MipSolver::new(MipSolverKind::Microlp).solve(&model);
        assert_eq!(solution.status(), SolveStatus::Optimal);
        assert!(!solution.is_active(a, 0.5));
        assert!(solution.is_active(b, 0.5));
        assert!((solution.objective_value().unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_violated_empty_row_is_infeasible() {
        let mut model = LinearModel::new();
        let a = model.add_boolean_variable("a");
        model.add_linear_constraint("impossible", LinearExpr::new(), Comparison::Eq, 1.0);
        model.set_objective(LinearExpr::from(a), true);

        let solution = MipSolver::new(MipSolverKind::default()).solve(&model);
        assert_eq!(solution.status(), SolveStatus::Infeasible);
        assert!(solution.value(a).is_none());
        assert!(solution.objective_value().is_none());
        assert!(solution.message.as_deref().unwrap().contains("impossible"));
    }

    #[test]
    fn test_model_without_columns() {
        let mut model = LinearModel::new();
        model.add_linear_constraint("trivial", LinearExpr::new(), Comparison::LessEq, 0.0);
        model.set_objective(LinearExpr::constant(4.0), true);

        let solution = MipSolver::new(MipSolverKind::Microlp).solve(&model);
        assert!(solution.is_optimal());
        assert_eq!(solution.objective_value(), Some(4.0));
    }

    #[test]
    fn test_infeasible_backend_outcome() {
        // a + b = 1 and a + b >= 2 cannot both hold
        let mut model = LinearModel::new();
        let a = model.add_boolean_variable("a");
        let b = model.add_boolean_variable("b");
        model.add_linear_constraint(
            "exactly_one",
            [(a, 1.0), (b, 1.0)].into_iter().collect(),
            Comparison::Eq,
            1.0,
        );
        model.add_linear_constraint(
            "at_least_two",
            [(a, 1.0), (b, 1.0)].into_iter().collect(),
            Comparison::GreaterEq,
            2.0,
        );
        model.set_objective(LinearExpr::from(a), true);

        let solution = MipSolver::new(MipSolverKind::Microlp).solve(&model);
        assert_eq!(solution.status(), SolveStatus::Infeasible);
        assert!(solution.values().is_empty());
    }
}

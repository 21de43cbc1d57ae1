//! Backend-neutral linear model.
//!
//! The builder writes into a [`LinearModel`]; the solver adapter translates it
//! into whatever the chosen backend needs at solve time. Keeping this layer
//! solver-agnostic lets the same compiled model be solved several times and
//! inspected in tests.

use serde::Serialize;
use std::fmt;

/// Handle to a column of a [`LinearModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VarHandle(usize);

impl VarHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Affine expression `Σ coef·var + constant`.
///
/// Terms are kept as written; repeated handles are summed on evaluation and by
/// the backends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarHandle, f64)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    pub fn with_term(mut self, var: VarHandle, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    pub fn add_term(&mut self, var: VarHandle, coef: f64) {
        self.terms.push((var, coef));
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    pub fn terms(&self) -> &[(VarHandle, f64)] {
        &self.terms
    }

    pub fn constant_part(&self) -> f64 {
        self.constant
    }

    /// True when the expression has no variable terms at all.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value of the expression for a full column assignment.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values.get(var.index()).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }
}

impl From<VarHandle> for LinearExpr {
    fn from(var: VarHandle) -> Self {
        LinearExpr::new().with_term(var, 1.0)
    }
}

impl FromIterator<(VarHandle, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarHandle, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
            constant: 0.0,
        }
    }
}

/// Row operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    LessEq,
    Eq,
    GreaterEq,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::LessEq => "<=",
            Comparison::Eq => "=",
            Comparison::GreaterEq => ">=",
        }
    }

    /// Whether `lhs op rhs` holds up to `tolerance`.
    pub fn holds(&self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Comparison::LessEq => lhs <= rhs + tolerance,
            Comparison::Eq => (lhs - rhs).abs() <= tolerance,
            Comparison::GreaterEq => lhs >= rhs - tolerance,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ObjectiveSense {
    #[default]
    Minimize,
    Maximize,
}

/// A named binary column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
}

/// A named row `expr op bound`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub name: String,
    pub expr: LinearExpr,
    pub op: Comparison,
    pub bound: f64,
}

impl Row {
    /// Whether the row holds for a full column assignment.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.op
            .holds(self.expr.evaluate(values), self.bound, tolerance)
    }
}

/// Size figures for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub columns: usize,
    pub rows: usize,
    pub nonzeros: usize,
}

/// A compiled mixed-integer linear model over binary columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearModel {
    columns: Vec<Column>,
    rows: Vec<Row>,
    objective: LinearExpr,
    sense: ObjectiveSense,
}

impl LinearModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a {0,1} column.
    pub fn add_boolean_variable(&mut self, name: impl Into<String>) -> VarHandle {
        let handle = VarHandle(self.columns.len());
        self.columns.push(Column { name: name.into() });
        handle
    }

    /// Add the row `expr op bound`.
    ///
    /// Rows without any term are accepted; the solver adapter decides them
    /// without calling the backend.
    pub fn add_linear_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        op: Comparison,
        bound: f64,
    ) {
        self.rows.push(Row {
            name: name.into(),
            expr,
            op,
            bound,
        });
    }

    pub fn set_objective(&mut self, expr: LinearExpr, minimize: bool) {
        self.objective = expr;
        self.sense = if minimize {
            ObjectiveSense::Minimize
        } else {
            ObjectiveSense::Maximize
        };
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_name(&self, var: VarHandle) -> Option<&str> {
        self.columns.get(var.index()).map(|c| c.name.as_str())
    }

    pub fn row(&self, name: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            columns: self.columns.len(),
            rows: self.rows.len(),
            nonzeros: self.rows.iter().map(|r| r.expr.terms().len()).sum(),
        }
    }
}

//! Unified error types for the hubnet workspace
//!
//! [`HubnetError`] covers the fatal outcomes of the pipeline. Infeasible or
//! unbounded models are *not* errors: they travel as a solve status.
//!
//! # Example
//!
//! ```
//! use hubnet_core::{HubnetResult, Instance, InstanceDocument};
//!
//! fn prepare(doc: InstanceDocument) -> HubnetResult<Instance> {
//!     let instance = Instance::from_document(doc)?;
//!     Ok(instance)
//! }
//!
//! let err = prepare(InstanceDocument::default()).unwrap_err();
//! assert!(err.is_validation());
//! ```

use crate::diagnostics::{DiagnosticIssue, Severity};
use std::fmt;
use thiserror::Error;

/// Unified error type for all hubnet operations.
#[derive(Error, Debug)]
pub enum HubnetError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Instance data is inconsistent; raised before any model is built
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Solver backend or run settings are unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using HubnetError.
pub type HubnetResult<T> = Result<T, HubnetError>;

impl HubnetError {
    /// True for errors raised because the solver backend is unavailable.
    pub fn is_configuration(&self) -> bool {
        matches!(self, HubnetError::Config(_))
    }

    /// True for errors raised by instance validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, HubnetError::Validation(_))
    }
}

impl From<serde_json::Error> for HubnetError {
    fn from(err: serde_json::Error) -> Self {
        HubnetError::Parse(err.to_string())
    }
}

/// Every error-severity issue found while validating an instance.
#[derive(Debug, Clone)]
pub struct ValidationError {
    issues: Vec<DiagnosticIssue>,
}

impl ValidationError {
    /// Keep only the error-severity issues out of `issues`.
    pub fn new(issues: impl IntoIterator<Item = DiagnosticIssue>) -> Self {
        Self {
            issues: issues
                .into_iter()
                .filter(|issue| issue.severity == Severity::Error)
                .collect(),
        }
    }

    pub fn issues(&self) -> &[DiagnosticIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issues.as_slice() {
            [] => write!(f, "instance rejected"),
            [only] => write!(f, "{}", only.message),
            [first, rest @ ..] => write!(f, "{} (and {} more)", first.message, rest.len()),
        }
    }
}

impl std::error::Error for ValidationError {}

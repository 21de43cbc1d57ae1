//! Instance document loading.

use anyhow::{anyhow, Context, Result};
use hubnet_core::{Diagnostics, HubnetError, Instance, InstanceDocument};
use std::fs;
use std::path::Path;
use tracing::debug;

/// On-disk encoding of an instance document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Format implied by the file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(DocumentFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Some(DocumentFormat::Yaml)
            }
            _ => None,
        }
    }
}

/// Parse a document from text. Without a format, YAML is tried first and
/// JSON second.
///
/// Syntax and schema failures carry a [`HubnetError::Parse`] at the root of
/// the error chain.
pub fn parse_document(data: &str, format: Option<DocumentFormat>) -> Result<InstanceDocument> {
    match format {
        Some(DocumentFormat::Json) => from_json(data).context("parsing instance document json"),
        Some(DocumentFormat::Yaml) => from_yaml(data).context("parsing instance document yaml"),
        None => from_yaml(data)
            .or_else(|_| from_json(data))
            .context("parsing instance document"),
    }
}

fn from_json(data: &str) -> Result<InstanceDocument, HubnetError> {
    Ok(serde_json::from_str(data)?)
}

fn from_yaml(data: &str) -> Result<InstanceDocument, HubnetError> {
    serde_yaml::from_str(data).map_err(|err| HubnetError::Parse(err.to_string()))
}

/// Read and parse a document without validating it.
pub fn load_document(path: impl AsRef<Path>) -> Result<InstanceDocument> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading instance document '{}'", path.display()))?;
    let doc = parse_document(&data, DocumentFormat::from_path(path))
        .with_context(|| format!("loading '{}'", path.display()))?;
    debug!(
        path = %path.display(),
        hubs = doc.hubs.len(),
        satellites = doc.satellites.len(),
        clients = doc.clients.len(),
        "instance document loaded"
    );
    Ok(doc)
}

/// Read, parse and validate an instance.
///
/// A validation failure keeps its [`hubnet_core::HubnetError`] at the root of
/// the error chain, so callers can downcast to it.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Instance> {
    let path = path.as_ref();
    let doc = load_document(path)?;
    Instance::from_document(doc)
        .map_err(anyhow::Error::from)
        .with_context(|| format!("validating '{}'", path.display()))
}

/// A parsed document with its full diagnostics list.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: InstanceDocument,
    pub diagnostics: Diagnostics,
}

impl LoadedDocument {
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    /// Build the instance, failing on any validation error.
    pub fn into_instance(self) -> Result<Instance> {
        if !self.is_valid() {
            return Err(anyhow!(
                "instance has {}",
                self.diagnostics.summary()
            ));
        }
        Ok(Instance::from_document(self.document)?)
    }
}

/// Read and parse a document and collect every warning and error, without
/// stopping at the first error.
pub fn diagnose_instance(path: impl AsRef<Path>) -> Result<LoadedDocument> {
    let document = load_document(path)?;
    let diagnostics = Instance::diagnose(&document);
    Ok(LoadedDocument {
        document,
        diagnostics,
    })
}

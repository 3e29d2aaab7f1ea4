use anyhow::{bail, Context};
use std::path::Path;
use tracing::info;

use super::scanner::scan_service;
use crate::model::ServiceModel;
use crate::spec::DocumentFormat;

/// Read a pre-built implementation model from a JSON or YAML manifest.
///
/// The manifest has the same shape `inspect` prints: `endpoints` and
/// `schemas`, both optional.
pub fn load_manifest(path: &Path) -> anyhow::Result<ServiceModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read service manifest: {}", path.display()))?;
    let model: ServiceModel = DocumentFormat::from_path(path)
        .parse(&content)
        .with_context(|| format!("Failed to parse service manifest: {}", path.display()))?;

    for (key, schema) in &model.schemas {
        if *key != schema.name {
            bail!(
                "Service manifest {}: schema key '{}' does not match its name '{}'",
                path.display(),
                key,
                schema.name
            );
        }
    }

    info!(
        manifest = %path.display(),
        endpoints = model.endpoints.len(),
        schemas = model.schemas.len(),
        "Loaded service manifest"
    );
    Ok(model)
}

/// Build the implementation model from a source directory (static scan) or
/// a manifest file
pub fn load_service(path: &Path) -> anyhow::Result<ServiceModel> {
    if path.is_dir() {
        scan_service(path)
    } else if path.is_file() {
        load_manifest(path)
    } else {
        bail!("Service path does not exist: {}", path.display())
    }
}

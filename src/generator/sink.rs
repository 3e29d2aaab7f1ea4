use anyhow::Context;
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::plan::FixPlan;
use crate::model::{ArtifactKind, GeneratedArtifact};

/// What happened to an artifact handed to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Rendered for review only
    Previewed,
    /// Appended to its target file
    Appended,
    /// The target already defines the symbol; nothing written
    AlreadyPresent,
}

/// Destination for generated artifacts.
///
/// The only operation is `append`: a sink can add new text to a target but
/// has no way to modify or remove what is already there.
pub trait ArtifactSink {
    fn append(&mut self, artifact: &GeneratedArtifact) -> anyhow::Result<AppendOutcome>;
}

/// Counts of what [`apply_plan`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub previewed: usize,
    pub appended: usize,
    pub already_present: usize,
}

/// Feed every artifact of a plan to a sink, in plan order
pub fn apply_plan(plan: &FixPlan, sink: &mut dyn ArtifactSink) -> anyhow::Result<ApplySummary> {
    let mut summary = ApplySummary::default();
    for artifact in plan.artifacts() {
        match sink.append(artifact)? {
            AppendOutcome::Previewed => summary.previewed += 1,
            AppendOutcome::Appended => summary.appended += 1,
            AppendOutcome::AlreadyPresent => summary.already_present += 1,
        }
    }
    Ok(summary)
}

/// Dry-run sink: collects artifacts into a text buffer
#[derive(Debug, Default)]
pub struct PreviewSink {
    buffer: String,
}

impl PreviewSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl ArtifactSink for PreviewSink {
    fn append(&mut self, artifact: &GeneratedArtifact) -> anyhow::Result<AppendOutcome> {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(&format!(
            "// ---- {} :: {} ({}) ----\n",
            artifact.target_file().display(),
            artifact.symbol_name(),
            artifact.kind()
        ));
        self.buffer.push_str(artifact.source_text());
        Ok(AppendOutcome::Previewed)
    }
}

/// Sink that appends artifacts to files under a service root.
///
/// Files are opened in append mode only. An artifact whose symbol the target
/// already defines is skipped, so applying the same plan twice leaves the
/// files as they were after the first run.
#[derive(Debug, Clone)]
pub struct AppendFileSink {
    root: PathBuf,
}

impl AppendFileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AppendFileSink { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for AppendFileSink {
    fn append(&mut self, artifact: &GeneratedArtifact) -> anyhow::Result<AppendOutcome> {
        let path = self.root.join(artifact.target_file());
        let existing = if path.exists() {
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        } else {
            String::new()
        };

        if defines_symbol(&existing, artifact.symbol_name())? {
            info!(
                file = %path.display(),
                symbol = artifact.symbol_name(),
                "Symbol already defined; leaving file untouched"
            );
            return Ok(AppendOutcome::AlreadyPresent);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut text = String::new();
        if existing.trim().is_empty() {
            text.push_str(file_header(artifact.kind()));
        } else if !existing.ends_with('\n') {
            text.push('\n');
        }
        text.push('\n');
        text.push_str(artifact.source_text());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {} for appending", path.display()))?;
        file.write_all(text.as_bytes())
            .with_context(|| format!("Failed to append to {}", path.display()))?;

        debug!(file = %path.display(), symbol = artifact.symbol_name(), "Appended artifact");
        Ok(AppendOutcome::Appended)
    }
}

/// Whether `source` already declares a fn, struct or enum named `symbol`
fn defines_symbol(source: &str, symbol: &str) -> anyhow::Result<bool> {
    if source.is_empty() {
        return Ok(false);
    }
    let pattern = format!(r"\b(?:fn|struct|enum)\s+{}\b", regex::escape(symbol));
    let re = Regex::new(&pattern).with_context(|| format!("Invalid symbol '{symbol}'"))?;
    Ok(re.is_match(source))
}

/// Preamble written once, when a sink creates a target file
fn file_header(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Stub => {
            "// Handler stubs generated from the API contract.\n\
             use axum::extract::{Json, Path};\n\
             use axum::http::StatusCode;\n\
             use axum::response::IntoResponse;\n"
        }
        ArtifactKind::Test => {
            "// Contract tests generated from the API contract.\n\
             // `common::send` issues a request against the service under test.\n\
             mod common;\n"
        }
        ArtifactKind::Model => {
            "// Data models generated from the API contract.\n\
             use serde::{Deserialize, Serialize};\n"
        }
    }
}

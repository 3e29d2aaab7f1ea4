use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// What a generated artifact contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Handler stub for a missing endpoint
    Stub,
    /// Regression test for an endpoint
    Test,
    /// Data-model struct for a schema the implementation lacks
    Model,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Stub => write!(f, "stub"),
            ArtifactKind::Test => write!(f, "test"),
            ArtifactKind::Model => write!(f, "model"),
        }
    }
}

/// Generated source text destined for a file.
///
/// The generator only ever produces these; where and whether they are
/// written is decided by an [`crate::generator::ArtifactSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    target_file: PathBuf,
    symbol_name: String,
    kind: ArtifactKind,
    source_text: String,
}

impl GeneratedArtifact {
    pub(crate) fn new(
        target_file: impl Into<PathBuf>,
        symbol_name: impl Into<String>,
        kind: ArtifactKind,
        source_text: impl Into<String>,
    ) -> Self {
        GeneratedArtifact {
            target_file: target_file.into(),
            symbol_name: symbol_name.into(),
            kind,
            source_text: source_text.into(),
        }
    }

    pub fn target_file(&self) -> &Path {
        &self.target_file
    }

    pub fn symbol_name(&self) -> &str {
        &self.symbol_name
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Same artifact aimed at a different file
    pub fn retarget(mut self, target_file: impl Into<PathBuf>) -> Self {
        self.target_file = target_file.into();
        self
    }
}

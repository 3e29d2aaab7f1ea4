use super::key::EndpointKey;
use serde::Serialize;
use std::fmt;

/// The five kinds of discrepancy the comparator can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// In the contract, absent from the implementation
    MissingEndpoint,
    /// In the implementation, absent from the contract
    ExtraEndpoint,
    /// Shape or type divergence, or a schema that could not be verified
    SchemaMismatch,
    /// A required field of the contract schema is absent
    MissingField,
    /// Declared success status differs
    StatusMismatch,
}

impl IssueKind {
    /// Severity every issue of this kind is reported with
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::MissingEndpoint | IssueKind::MissingField => Severity::Error,
            IssueKind::ExtraEndpoint | IssueKind::SchemaMismatch | IssueKind::StatusMismatch => {
                Severity::Warning
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingEndpoint => "MISSING_ENDPOINT",
            IssueKind::ExtraEndpoint => "EXTRA_ENDPOINT",
            IssueKind::SchemaMismatch => "SCHEMA_MISMATCH",
            IssueKind::MissingField => "MISSING_FIELD",
            IssueKind::StatusMismatch => "STATUS_MISMATCH",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a compliance issue. `Error` sorts before `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// One discrepancy between contract and implementation.
///
/// Issues are produced by the comparator and the schema diff engine only;
/// everything else reads them through the accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceIssue {
    kind: IssueKind,
    severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint_key: Option<EndpointKey>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl ComplianceIssue {
    pub(crate) fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        ComplianceIssue {
            kind,
            severity: kind.severity(),
            endpoint_key: None,
            message: message.into(),
            suggestion: None,
        }
    }

    pub(crate) fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub(crate) fn at(mut self, key: EndpointKey) -> Self {
        self.endpoint_key = Some(key);
        self
    }

    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn endpoint_key(&self) -> Option<&EndpointKey> {
        self.endpoint_key.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

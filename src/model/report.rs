use super::issue::{ComplianceIssue, IssueKind, Severity};
use serde::Serialize;

/// Outcome of one comparison run.
///
/// Built fresh by [`crate::compliance::compare`] on every call; nothing here
/// is cached or persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    api_title: String,
    api_version: String,
    spec_endpoint_count: usize,
    impl_endpoint_count: usize,
    compliant_count: usize,
    issues: Vec<ComplianceIssue>,
}

impl ComplianceReport {
    pub(crate) fn new(
        api_title: impl Into<String>,
        api_version: impl Into<String>,
        spec_endpoint_count: usize,
        impl_endpoint_count: usize,
        compliant_count: usize,
        issues: Vec<ComplianceIssue>,
    ) -> Self {
        ComplianceReport {
            api_title: api_title.into(),
            api_version: api_version.into(),
            spec_endpoint_count,
            impl_endpoint_count,
            compliant_count,
            issues,
        }
    }

    pub fn api_title(&self) -> &str {
        &self.api_title
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn spec_endpoint_count(&self) -> usize {
        self.spec_endpoint_count
    }

    pub fn impl_endpoint_count(&self) -> usize {
        self.impl_endpoint_count
    }

    pub fn compliant_count(&self) -> usize {
        self.compliant_count
    }

    pub fn issues(&self) -> &[ComplianceIssue] {
        &self.issues
    }

    /// Share of contract endpoints that are implemented without errors.
    /// An empty contract is fully compliant.
    pub fn compliance_percentage(&self) -> f64 {
        if self.spec_endpoint_count == 0 {
            return 100.0;
        }
        self.compliant_count as f64 * 100.0 / self.spec_endpoint_count as f64
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(Severity::Warning)
    }

    pub fn is_compliant(&self) -> bool {
        self.error_count() == 0
    }

    /// Issues of the given kind, in report order
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ComplianceIssue> {
        self.issues.iter().filter(move |i| i.kind() == kind)
    }

    pub fn missing_endpoints(&self) -> impl Iterator<Item = &ComplianceIssue> {
        self.issues_of(IssueKind::MissingEndpoint)
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == severity)
            .count()
    }
}

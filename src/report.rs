//! Renderings of a [`ComplianceReport`] for terminals, pull requests and
//! machines.

use crate::model::{ComplianceIssue, ComplianceReport, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

const RULE_WIDTH: usize = 60;

/// Output format for `check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Render in the requested format
pub fn render(report: &ComplianceReport, format: ReportFormat) -> anyhow::Result<String> {
    Ok(match format {
        ReportFormat::Text => render_text(report),
        ReportFormat::Markdown => render_markdown(report),
        ReportFormat::Json => render_json(report)?,
    })
}

/// Plain-text report with a banner, counts and one block per issue
pub fn render_text(report: &ComplianceReport) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut lines = vec![
        heavy.clone(),
        "API COMPLIANCE REPORT".to_string(),
        heavy.clone(),
        format!("Contract: {} v{}", report.api_title(), report.api_version()),
        light.clone(),
        format!("Endpoints in contract:    {}", report.spec_endpoint_count()),
        format!("Endpoints implemented:    {}", report.impl_endpoint_count()),
        format!("Compliant endpoints:      {}", report.compliant_count()),
        format!("Compliance:               {:.1}%", report.compliance_percentage()),
        light.clone(),
        format!("Errors:   {}", report.error_count()),
        format!("Warnings: {}", report.warning_count()),
        light,
    ];

    if report.issues().is_empty() {
        lines.push("No issues found. Implementation is fully compliant!".to_string());
    } else {
        lines.push("ISSUES:".to_string());
        for issue in report.issues() {
            let tag = match issue.severity() {
                Severity::Error => "[ERROR]",
                Severity::Warning => "[WARN] ",
            };
            lines.push(format!("  {} {}", tag, issue.message()));
            if let Some(key) = issue.endpoint_key() {
                lines.push(format!("           Endpoint: {}", key));
            }
            if let Some(suggestion) = issue.suggestion() {
                lines.push(format!("           Suggestion: {}", suggestion));
            }
        }
    }
    lines.push(heavy);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Markdown summary table followed by an issue table
pub fn render_markdown(report: &ComplianceReport) -> String {
    let mut out = String::new();
    let status = if report.is_compliant() {
        "✅ Compliant"
    } else {
        "❌ Not compliant"
    };

    out.push_str(&format!(
        "# API Compliance: {} v{}\n\n",
        report.api_title(),
        report.api_version()
    ));
    out.push_str(&format!("**Status:** {}\n\n", status));
    out.push_str("| Metric | Value |\n|---|---|\n");
    out.push_str(&format!("| Endpoints in contract | {} |\n", report.spec_endpoint_count()));
    out.push_str(&format!("| Endpoints implemented | {} |\n", report.impl_endpoint_count()));
    out.push_str(&format!("| Compliant endpoints | {} |\n", report.compliant_count()));
    out.push_str(&format!("| Compliance | {:.1}% |\n", report.compliance_percentage()));
    out.push_str(&format!("| Errors | {} |\n", report.error_count()));
    out.push_str(&format!("| Warnings | {} |\n", report.warning_count()));

    out.push_str("\n## Issues\n\n");
    if report.issues().is_empty() {
        out.push_str("No issues found.\n");
        return out;
    }
    out.push_str("| Severity | Kind | Endpoint | Message | Suggestion |\n|---|---|---|---|---|\n");
    for issue in report.issues() {
        out.push_str(&markdown_row(issue));
    }
    out
}

fn markdown_row(issue: &ComplianceIssue) -> String {
    let endpoint = issue
        .endpoint_key()
        .map(|k| format!("`{}`", k))
        .unwrap_or_default();
    format!(
        "| {} | {} | {} | {} | {} |\n",
        issue.severity(),
        issue.kind(),
        endpoint,
        escape_cell(issue.message()),
        escape_cell(issue.suggestion().unwrap_or(""))
    )
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    api_title: &'a str,
    api_version: &'a str,
    spec_endpoint_count: usize,
    impl_endpoint_count: usize,
    compliant_count: usize,
    compliance_percentage: f64,
    error_count: usize,
    warning_count: usize,
    is_compliant: bool,
    issues: &'a [ComplianceIssue],
}

/// Pretty JSON including the derived counts
pub fn render_json(report: &ComplianceReport) -> anyhow::Result<String> {
    let view = JsonReport {
        api_title: report.api_title(),
        api_version: report.api_version(),
        spec_endpoint_count: report.spec_endpoint_count(),
        impl_endpoint_count: report.impl_endpoint_count(),
        compliant_count: report.compliant_count(),
        compliance_percentage: report.compliance_percentage(),
        error_count: report.error_count(),
        warning_count: report.warning_count(),
        is_compliant: report.is_compliant(),
        issues: report.issues(),
    };
    let mut out = serde_json::to_string_pretty(&view)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::compliance::{compare, compare_titled};
    use crate::model::{EndpointInfo, HttpMethod, SchemaMap};

    fn report() -> ComplianceReport {
        let spec = vec![
            EndpointInfo::new(HttpMethod::Get, "/users"),
            EndpointInfo::new(HttpMethod::Post, "/users"),
        ];
        let imp = vec![
            EndpointInfo::new(HttpMethod::Get, "/users"),
            EndpointInfo::new(HttpMethod::Get, "/health"),
        ];
        compare_titled("Users", "2.0.0", &spec, &imp, &SchemaMap::new(), &SchemaMap::new())
    }

    #[test]
    fn test_text_layout() {
        let text = render_text(&report());
        assert!(text.starts_with(&"=".repeat(60)));
        assert!(text.contains("API COMPLIANCE REPORT"));
        assert!(text.contains("Contract: Users v2.0.0"));
        assert!(text.contains("Compliance:               50.0%"));
        assert!(text.contains("  [ERROR] Missing endpoint: POST /users\n           Endpoint: POST /users\n           Suggestion: Implement `POST` handler for `/users`"));
        assert!(text.contains("  [WARN]  Extra endpoint not in contract: GET /health"));
        assert!(text.ends_with(&format!("{}\n", "=".repeat(60))));
    }

    #[test]
    fn test_text_without_issues() {
        let spec = vec![EndpointInfo::new(HttpMethod::Get, "/users")];
        let report = compare(&spec, &spec, &SchemaMap::new(), &SchemaMap::new());
        let text = render_text(&report);
        assert!(text.contains("No issues found. Implementation is fully compliant!"));
        assert!(text.contains("Compliance:               100.0%"));
    }

    #[test]
    fn test_markdown_tables() {
        let md = render_markdown(&report());
        assert!(md.starts_with("# API Compliance: Users v2.0.0\n"));
        assert!(md.contains("**Status:** ❌ Not compliant"));
        assert!(md.contains("| Compliance | 50.0% |"));
        assert!(md.contains("| ERROR | MISSING_ENDPOINT | `POST /users` | Missing endpoint: POST /users |"));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_json_includes_derived_fields() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&report()).unwrap()).unwrap();
        assert_eq!(json["api_title"], "Users");
        assert_eq!(json["error_count"], 1);
        assert_eq!(json["warning_count"], 1);
        assert_eq!(json["is_compliant"], false);
        assert_eq!(json["compliance_percentage"], 50.0);
        assert_eq!(json["issues"][0]["kind"], "MISSING_ENDPOINT");
        assert_eq!(json["issues"][0]["severity"], "ERROR");
    }

    #[test]
    fn test_report_format_parses_from_toml_names() {
        let format: ReportFormat = serde_json::from_str("\"markdown\"").unwrap();
        assert_eq!(format, ReportFormat::Markdown);
        assert_eq!(ReportFormat::default(), ReportFormat::Text);
    }
}

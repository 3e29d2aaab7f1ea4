use crate::diff::{diff_in_scope, lookup, SchemaScope};
use crate::model::{
    ComplianceIssue, ComplianceReport, ContractModel, EndpointInfo, EndpointKey, IssueKind,
    KeyError, SchemaInfo, SchemaMap, ServiceModel,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Compare a contract model against an implementation model
pub fn check(contract: &ContractModel, service: &ServiceModel) -> ComplianceReport {
    compare_titled(
        &contract.title,
        &contract.version,
        &contract.endpoints,
        &service.endpoints,
        &contract.schemas,
        &service.schemas,
    )
}

/// Compare endpoint and schema sets without API metadata.
///
/// The resulting report carries an empty title and version.
pub fn compare(
    spec_endpoints: &[EndpointInfo],
    impl_endpoints: &[EndpointInfo],
    spec_schemas: &SchemaMap,
    impl_schemas: &SchemaMap,
) -> ComplianceReport {
    compare_titled(
        "",
        "",
        spec_endpoints,
        impl_endpoints,
        spec_schemas,
        impl_schemas,
    )
}

/// Compare endpoint and schema sets, labelling the report with the API
/// title and version.
///
/// Never fails: unresolvable schemas and malformed paths become
/// `SCHEMA_MISMATCH` warnings scoped to the endpoint they affect.
pub fn compare_titled(
    api_title: &str,
    api_version: &str,
    spec_endpoints: &[EndpointInfo],
    impl_endpoints: &[EndpointInfo],
    spec_schemas: &SchemaMap,
    impl_schemas: &SchemaMap,
) -> ComplianceReport {
    let impl_keyed: Vec<(&EndpointInfo, Result<EndpointKey, KeyError>)> = impl_endpoints
        .iter()
        .map(|ep| (ep, EndpointKey::for_endpoint(ep)))
        .collect();

    // First declaration wins when the implementation repeats a key
    let mut impl_lookup: HashMap<&EndpointKey, &EndpointInfo> = HashMap::new();
    for (ep, key) in &impl_keyed {
        if let Ok(key) = key {
            impl_lookup.entry(key).or_insert(*ep);
        }
    }

    let mut presence = Vec::new();
    let mut spec_keys = HashSet::new();
    let mut matched = Vec::new();

    for ep in spec_endpoints {
        match EndpointKey::for_endpoint(ep) {
            Err(err) => presence.push(malformed_endpoint(ep, &err, "contract")),
            Ok(key) => {
                match impl_lookup.get(&key) {
                    Some(found) => matched.push((key.clone(), ep, *found)),
                    None => presence.push(missing_endpoint(key.clone(), ep)),
                }
                spec_keys.insert(key);
            }
        }
    }

    for (ep, key) in &impl_keyed {
        match key {
            Err(err) => presence.push(malformed_endpoint(ep, err, "implementation")),
            Ok(key) if !spec_keys.contains(key) => presence.push(extra_endpoint(key.clone())),
            Ok(_) => {}
        }
    }

    let scope = SchemaScope::new(spec_schemas, impl_schemas);
    let mut compliant_count = 0;
    let mut issues = presence;

    for (key, spec_ep, impl_ep) in matched {
        let mut group = check_matched(&key, spec_ep, impl_ep, &scope);
        group.sort_by_key(|issue| issue.severity());
        if !group.iter().any(ComplianceIssue::is_error) {
            compliant_count += 1;
        }
        issues.extend(group);
    }

    let report = ComplianceReport::new(
        api_title,
        api_version,
        spec_endpoints.len(),
        impl_endpoints.len(),
        compliant_count,
        issues,
    );
    debug!(
        spec_endpoints = report.spec_endpoint_count(),
        impl_endpoints = report.impl_endpoint_count(),
        compliant = report.compliant_count(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "Compared contract against implementation"
    );
    report
}

fn missing_endpoint(key: EndpointKey, ep: &EndpointInfo) -> ComplianceIssue {
    ComplianceIssue::new(
        IssueKind::MissingEndpoint,
        format!("Missing endpoint: {} {}", ep.method, ep.path),
    )
    .with_suggestion(format!("Implement `{}` handler for `{}`", ep.method, ep.path))
    .at(key)
}

fn extra_endpoint(key: EndpointKey) -> ComplianceIssue {
    ComplianceIssue::new(
        IssueKind::ExtraEndpoint,
        format!("Extra endpoint not in contract: {}", key),
    )
    .with_suggestion("Document the endpoint in the contract or remove it from the implementation")
    .at(key)
}

fn malformed_endpoint(ep: &EndpointInfo, err: &KeyError, side: &str) -> ComplianceIssue {
    ComplianceIssue::new(
        IssueKind::SchemaMismatch,
        format!(
            "Could not normalize {} endpoint {} {}: {}; not verified",
            side, ep.method, ep.path, err
        ),
    )
    .with_suggestion("Use an absolute path with whole-segment {param} placeholders")
}

fn check_matched(
    key: &EndpointKey,
    spec_ep: &EndpointInfo,
    impl_ep: &EndpointInfo,
    scope: &SchemaScope<'_>,
) -> Vec<ComplianceIssue> {
    let mut issues = Vec::new();

    if let (Some(want), Some(got)) = (spec_ep.response_status, impl_ep.response_status) {
        if want != got {
            issues.push(
                ComplianceIssue::new(
                    IssueKind::StatusMismatch,
                    format!(
                        "Status code mismatch for {} {}: contract declares {}, implementation returns {}",
                        spec_ep.method, spec_ep.path, want, got
                    ),
                )
                .with_suggestion(format!(
                    "Return {} from the `{}` handler for `{}`",
                    want, spec_ep.method, spec_ep.path
                )),
            );
        }
    }

    if let Some(issue) = response_shape_mismatch(spec_ep, impl_ep) {
        issues.push(issue);
    }

    if let Some(name) = spec_ep.response_schema_ref.as_deref() {
        let actual_name = impl_ep.response_schema_ref.as_deref().unwrap_or(name);
        match resolve_pair(scope, name, actual_name, "Response") {
            Ok((expected, actual)) => issues.extend(diff_in_scope(expected, actual, scope)),
            Err(issue) => issues.push(issue),
        }
    }

    if let Some(name) = spec_ep.request_schema_ref.as_deref() {
        let actual_name = impl_ep.request_schema_ref.as_deref().unwrap_or(name);
        if let Err(issue) = resolve_pair(scope, name, actual_name, "Request") {
            issues.push(issue);
        }
    }

    issues.into_iter().map(|i| i.at(key.clone())).collect()
}

/// Array body on one side and a single object on the other.
///
/// Only checked when both sides name a response schema; an implementation
/// without one has an unknown shape.
fn response_shape_mismatch(spec_ep: &EndpointInfo, impl_ep: &EndpointInfo) -> Option<ComplianceIssue> {
    let (Some(want), Some(got)) = (
        spec_ep.response_schema_ref.as_deref(),
        impl_ep.response_schema_ref.as_deref(),
    ) else {
        return None;
    };
    if spec_ep.response_is_array == impl_ep.response_is_array {
        return None;
    }
    let describe = |name: &str, is_array: bool| {
        if is_array {
            format!("an array of '{}'", name)
        } else {
            format!("a single '{}'", name)
        }
    };
    Some(
        ComplianceIssue::new(
            IssueKind::SchemaMismatch,
            format!(
                "Response shape mismatch for {} {}: contract declares {}, implementation returns {}",
                spec_ep.method,
                spec_ep.path,
                describe(want, spec_ep.response_is_array),
                describe(got, impl_ep.response_is_array)
            ),
        )
        .with_suggestion(if spec_ep.response_is_array {
            format!("Return `Json<Vec<{}>>`", want)
        } else {
            format!("Return `Json<{}>`", want)
        }),
    )
}

/// Resolve the contract schema and its implementation counterpart, or
/// describe which side could not be found
fn resolve_pair<'a>(
    scope: &SchemaScope<'a>,
    expected_name: &str,
    actual_name: &str,
    role: &str,
) -> Result<(&'a SchemaInfo, &'a SchemaInfo), ComplianceIssue> {
    let Some(expected) = scope.expected.get(expected_name) else {
        return Err(ComplianceIssue::new(
            IssueKind::SchemaMismatch,
            format!(
                "{} schema '{}' is not defined in the contract; not verified",
                role, expected_name
            ),
        )
        .with_suggestion(format!("Add '{}' to components.schemas", expected_name)));
    };
    let Some(actual) = lookup(scope.actual, actual_name) else {
        return Err(ComplianceIssue::new(
            IssueKind::SchemaMismatch,
            format!(
                "{} schema '{}' not found in implementation; not verified",
                role, actual_name
            ),
        )
        .with_suggestion(format!(
            "Define data model '{}' matching the contract",
            expected_name
        )));
    };
    Ok((expected, actual))
}

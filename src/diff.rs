//! # Schema Diff Engine
//!
//! Structural comparison of an expected (contract) schema against an actual
//! (implementation) schema.
//!
//! ## Rules
//!
//! 1. A `required` field of the expected schema that the actual schema lacks
//!    is a `MISSING_FIELD` error.
//! 2. A field present on both sides with different type tags is a
//!    `SCHEMA_MISMATCH` warning naming both types.
//! 3. Fields only the actual schema has are never reported. Adding fields is
//!    non-breaking.
//! 4. Nested references: when both sides point at the same schema name the
//!    diff recurses exactly one level (only when a [`SchemaScope`] is given to
//!    resolve the names). Differing reference names are a `SCHEMA_MISMATCH`
//!    and are not recursed into.
//!
//! All functions here are pure; an empty result means the schemas are
//! compatible.

use crate::model::{ComplianceIssue, FieldInfo, IssueKind, SchemaInfo, SchemaMap};


/// Deepest level the engine descends into nested references
const MAX_NESTING: usize = 1;

/// Schema catalogs used to resolve nested references on each side
#[derive(Debug, Clone, Copy)]
pub struct SchemaScope<'a> {
    pub expected: &'a SchemaMap,
    pub actual: &'a SchemaMap,
}

impl<'a> SchemaScope<'a> {
    pub fn new(expected: &'a SchemaMap, actual: &'a SchemaMap) -> Self {
        SchemaScope { expected, actual }
    }
}

/// Diff two schemas without resolving nested references.
///
/// Nested fields are compared by reference name only.
pub fn diff(expected: &SchemaInfo, actual: &SchemaInfo) -> Vec<ComplianceIssue> {
    let mut issues = Vec::new();
    diff_level(expected, actual, None, "", 0, &mut issues);
    issues
}

/// Diff two schemas, recursing one level into matching nested references
/// resolved through `scope`.
pub fn diff_in_scope(
    expected: &SchemaInfo,
    actual: &SchemaInfo,
    scope: &SchemaScope<'_>,
) -> Vec<ComplianceIssue> {
    let mut issues = Vec::new();
    diff_level(expected, actual, Some(scope), "", 0, &mut issues);
    issues
}

fn diff_level(
    expected: &SchemaInfo,
    actual: &SchemaInfo,
    scope: Option<&SchemaScope<'_>>,
    prefix: &str,
    depth: usize,
    issues: &mut Vec<ComplianceIssue>,
) {
    for field in expected.fields() {
        let label = format!("{prefix}{}", field.name);
        match actual.field(&field.name) {
            None if field.required => issues.push(
                ComplianceIssue::new(
                    IssueKind::MissingField,
                    format!(
                        "Required field '{}' missing from schema '{}'",
                        label, actual.name
                    ),
                )
                .with_suggestion(format!(
                    "Add field '{}: {}' to {}",
                    field.name, field.type_tag, actual.name
                )),
            ),
            None => {}
            Some(found) => {
                compare_field(field, found, actual, scope, &label, depth, issues);
            }
        }
    }
}

fn compare_field(
    expected: &FieldInfo,
    actual: &FieldInfo,
    owner: &SchemaInfo,
    scope: Option<&SchemaScope<'_>>,
    label: &str,
    depth: usize,
    issues: &mut Vec<ComplianceIssue>,
) {
    if !type_tags_match(&expected.type_tag, &actual.type_tag) {
        issues.push(
            ComplianceIssue::new(
                IssueKind::SchemaMismatch,
                format!(
                    "Field '{}' in schema '{}' has type '{}', expected '{}'",
                    label, owner.name, actual.type_tag, expected.type_tag
                ),
            )
            .with_suggestion(format!(
                "Change '{}' to type '{}'",
                expected.name, expected.type_tag
            )),
        );
        return;
    }

    match (&expected.nested_schema, &actual.nested_schema) {
        (None, None) => {}
        (Some(want), Some(got)) if want == got => {
            if depth < MAX_NESTING {
                if let Some(scope) = scope {
                    recurse_nested(want, scope, label, depth, issues);
                }
            }
        }
        (want, got) => issues.push(
            ComplianceIssue::new(
                IssueKind::SchemaMismatch,
                format!(
                    "Field '{}' in schema '{}' references {}, expected {}",
                    label,
                    owner.name,
                    describe_ref(got.as_deref()),
                    describe_ref(want.as_deref())
                ),
            )
            .with_suggestion(format!(
                "Point '{}' at {}",
                expected.name,
                describe_ref(want.as_deref())
            )),
        ),
    }
}

fn recurse_nested(
    name: &str,
    scope: &SchemaScope<'_>,
    label: &str,
    depth: usize,
    issues: &mut Vec<ComplianceIssue>,
) {
    match (scope.expected.get(name), lookup(scope.actual, name)) {
        (Some(want), Some(got)) => {
            diff_level(want, got, Some(scope), &format!("{label}."), depth + 1, issues);
        }
        _ => issues.push(ComplianceIssue::new(
            IssueKind::SchemaMismatch,
            format!(
                "Nested schema '{}' for field '{}' could not be resolved; not verified",
                name, label
            ),
        )),
    }
}

/// Look a schema up by exact name, falling back to a case-insensitive match
pub fn lookup<'a>(schemas: &'a SchemaMap, name: &str) -> Option<&'a SchemaInfo> {
    schemas.get(name).or_else(|| {
        schemas
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

fn type_tags_match(expected: &str, actual: &str) -> bool {
    expected.eq_ignore_ascii_case(actual)
}

fn describe_ref(name: Option<&str>) -> String {
    match name {
        Some(n) => format!("'{}'", n),
        None => "no schema".to_string(),
    }
}

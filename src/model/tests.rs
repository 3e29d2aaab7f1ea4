#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for endpoint keys and the shared model types

use super::*;
use std::collections::HashSet;

#[test]
fn test_placeholder_names_do_not_affect_key() {
    let a = EndpointKey::new(HttpMethod::Get, "/users/{user_id}").unwrap();
    let b = EndpointKey::new(HttpMethod::Get, "/users/{id}").unwrap();
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_eq!(a.normalized(), "/users/{}");
    // display keeps the spelling of whichever side produced it
    assert_eq!(a.to_string(), "GET /users/{user_id}");
}

#[test]
fn test_key_equality_is_symmetric_over_samples() {
    let paths = [
        "/",
        "/users",
        "/users/",
        "/users/{id}",
        "/users/{slug}",
        "/users/{id}/posts",
        "/users/{a}/posts/{b}",
        "/users/me",
    ];
    for p in paths {
        for q in paths {
            let a = EndpointKey::new(HttpMethod::Get, p).unwrap();
            let b = EndpointKey::new(HttpMethod::Get, q).unwrap();
            assert_eq!(a == b, b == a, "asymmetric for {p} vs {q}");
        }
    }
}

#[test]
fn test_method_is_part_of_key() {
    let get = EndpointKey::new(HttpMethod::Get, "/users").unwrap();
    let post = EndpointKey::new(HttpMethod::Post, "/users").unwrap();
    assert_ne!(get, post);
}

#[test]
fn test_literal_segment_never_matches_placeholder() {
    let literal = EndpointKey::new(HttpMethod::Get, "/users/me").unwrap();
    let param = EndpointKey::new(HttpMethod::Get, "/users/{id}").unwrap();
    assert_ne!(literal, param);
}

#[test]
fn test_trailing_slash_ignored() {
    assert_eq!(normalize_path("/users/").unwrap(), "/users");
    assert_eq!(normalize_path("/").unwrap(), "/");
}

#[test]
fn test_keys_hash_consistently() {
    let mut set = HashSet::new();
    set.insert(EndpointKey::new(HttpMethod::Delete, "/users/{user_id}").unwrap());
    assert!(set.contains(&EndpointKey::new(HttpMethod::Delete, "/users/{id}").unwrap()));
}

#[test]
fn test_malformed_paths_rejected() {
    assert!(matches!(
        normalize_path("users"),
        Err(KeyError::NotAbsolute { .. })
    ));
    assert!(matches!(
        normalize_path("/users//posts"),
        Err(KeyError::EmptySegment { .. })
    ));
    assert!(matches!(
        normalize_path("/users/{id"),
        Err(KeyError::MalformedPlaceholder { .. })
    ));
    assert!(matches!(
        normalize_path("/users/x{id}"),
        Err(KeyError::MalformedPlaceholder { .. })
    ));
    assert!(matches!(
        normalize_path("/users/{}"),
        Err(KeyError::MalformedPlaceholder { .. })
    ));
}

#[test]
fn test_method_parsing_is_case_insensitive() {
    assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
    assert_eq!("Delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
    assert!("FETCH".parse::<HttpMethod>().is_err());
}

#[test]
fn test_default_status_by_method() {
    assert_eq!(HttpMethod::Get.default_status(), 200);
    assert_eq!(HttpMethod::Put.default_status(), 200);
    assert_eq!(HttpMethod::Post.default_status(), 201);
    assert_eq!(HttpMethod::Delete.default_status(), 204);
}

#[test]
fn test_path_params_in_order() {
    let ep = EndpointInfo::new(HttpMethod::Get, "/users/{user_id}/posts/{post_id}");
    assert_eq!(ep.path_params(), vec!["user_id", "post_id"]);
}

#[test]
fn test_schema_field_names_stay_unique() {
    let schema = SchemaInfo::new("User")
        .with_field(FieldInfo::new("id", "integer", true))
        .with_field(FieldInfo::new("id", "string", false));
    assert_eq!(schema.fields().len(), 1);
    assert_eq!(schema.field("id").unwrap().type_tag, "string");
}

#[test]
fn test_manifest_fields_deduplicated_on_load() {
    let json = r#"{
        "name": "User",
        "fields": [
            {"name": "id", "type": "integer", "required": true},
            {"name": "id", "type": "integer", "required": false}
        ]
    }"#;
    let schema: SchemaInfo = serde_json::from_str(json).unwrap();
    assert_eq!(schema.fields().len(), 1);
    assert!(!schema.field("id").unwrap().required);
}

#[test]
fn test_empty_contract_is_fully_compliant() {
    let report = ComplianceReport::new("Empty", "0.0.0", 0, 3, 0, Vec::new());
    assert_eq!(report.compliance_percentage(), 100.0);
    assert!(report.is_compliant());
}

#[test]
fn test_issue_severity_follows_kind() {
    let issue = ComplianceIssue::new(IssueKind::MissingField, "x");
    assert_eq!(issue.severity(), Severity::Error);
    let issue = ComplianceIssue::new(IssueKind::StatusMismatch, "x");
    assert_eq!(issue.severity(), Severity::Warning);
    assert!(Severity::Error < Severity::Warning);
}

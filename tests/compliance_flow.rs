use contract_enforcer::compliance::check;
use contract_enforcer::generator::{apply_plan, plan_fixes, AppendFileSink, ArtifactTargets};
use contract_enforcer::inspect::{load_service, scan_service, scan_sources};
use contract_enforcer::model::{ArtifactKind, IssueKind, Severity};
use contract_enforcer::report::{render_markdown, render_text};
use contract_enforcer::spec::load_contract;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Copy the fixture service so artifacts can be appended to it
fn scratch_service() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("user_service");
    let src = root.join("src");
    fs::create_dir_all(&src).unwrap();
    for entry in fs::read_dir(fixture("user_service/src")).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), src.join(entry.file_name())).unwrap();
    }
    (dir, root)
}

#[test]
fn test_fixture_contract_loads() {
    let contract = load_contract(fixture("users_openapi.yaml")).unwrap();
    assert_eq!(contract.title, "User Service");
    assert_eq!(contract.version, "2.1.0");
    assert_eq!(contract.endpoints.len(), 5);
    assert_eq!(contract.schemas.len(), 4);
}

#[test]
fn test_fixture_service_scans() {
    let service = scan_service(&fixture("user_service")).unwrap();
    let found: Vec<String> = service.endpoints.iter().map(|e| e.to_string()).collect();
    assert_eq!(
        found,
        vec![
            "GET /users",
            "POST /users",
            "GET /users/{user_id}",
            "DELETE /users/{user_id}",
            "GET /health",
        ]
    );
    assert!(service.schemas.contains_key("UserProfile"));
    assert!(service.schemas.contains_key("NewUser"));
}

#[test]
fn test_report_for_fixture_service() {
    let contract = load_contract(fixture("users_openapi.yaml")).unwrap();
    let service = load_service(&fixture("user_service")).unwrap();
    let report = check(&contract, &service);

    assert_eq!(report.spec_endpoint_count(), 5);
    assert_eq!(report.impl_endpoint_count(), 5);
    assert_eq!(report.compliant_count(), 3);
    assert_eq!(report.compliance_percentage(), 60.0);
    assert_eq!(report.error_count(), 2);
    assert_eq!(report.warning_count(), 2);
    assert!(!report.is_compliant());

    let kinds: Vec<(IssueKind, Severity)> = report
        .issues()
        .iter()
        .map(|i| (i.kind(), i.severity()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (IssueKind::MissingEndpoint, Severity::Error),
            (IssueKind::ExtraEndpoint, Severity::Warning),
            (IssueKind::MissingField, Severity::Error),
            (IssueKind::StatusMismatch, Severity::Warning),
        ]
    );
    assert_eq!(
        report.issues()[0].message(),
        "Missing endpoint: GET /users/{user_id}/orders"
    );
    assert_eq!(
        report.issues()[2].message(),
        "Required field 'name' missing from schema 'UserProfile'"
    );
    assert!(report.issues()[3].message().contains("contract declares 204, implementation returns 200"));

    let text = render_text(&report);
    assert!(text.contains("Contract: User Service v2.1.0"));
    assert!(text.contains("Compliance:               60.0%"));
    let md = render_markdown(&report);
    assert!(md.contains("**Status:** ❌ Not compliant"));
}

#[test]
fn test_apply_is_append_only_and_idempotent() {
    let (_dir, root) = scratch_service();
    let contract = load_contract(fixture("users_openapi.yaml")).unwrap();
    let handwritten = fs::read_to_string(root.join("src/handlers.rs")).unwrap();

    let service = scan_service(&root).unwrap();
    let report = check(&contract, &service);
    let plan = plan_fixes(&report, &contract, &service, ArtifactTargets::default()).unwrap();
    assert_eq!(plan.count(ArtifactKind::Stub), 1);
    assert_eq!(plan.count(ArtifactKind::Test), 1);
    assert_eq!(plan.count(ArtifactKind::Model), 1);

    let mut sink = AppendFileSink::new(&root);
    let first = apply_plan(&plan, &mut sink).unwrap();
    assert_eq!(first.appended, 3);

    let stubs = fs::read_to_string(root.join("src/generated_handlers.rs")).unwrap();
    assert!(stubs.contains("pub async fn list_user_orders(Path(user_id): Path<i64>) -> impl IntoResponse {"));
    let models = fs::read_to_string(root.join("src/generated_models.rs")).unwrap();
    assert!(models.contains("pub struct Order {"));
    assert!(models.contains("pub note: Option<String>,"));
    let tests = fs::read_to_string(root.join("tests/generated_contract_tests.rs")).unwrap();
    assert!(tests.contains("async fn test_get_users_user_id_orders()"));
    // the orders body is an array: fields are checked on its items
    assert!(tests.contains(r#"assert!(item.get("total").is_some()"#));
    assert!(!tests.contains(r#"body.get("total")"#));

    // the generated model is now part of the service, so only the endpoint is missing
    let service = scan_service(&root).unwrap();
    assert!(service.schemas.contains_key("Order"));
    let report = check(&contract, &service);
    let plan = plan_fixes(&report, &contract, &service, ArtifactTargets::default()).unwrap();
    assert_eq!(plan.count(ArtifactKind::Model), 0);

    let second = apply_plan(&plan, &mut sink).unwrap();
    assert_eq!(second.appended, 0);
    assert_eq!(second.already_present, 2);
    assert_eq!(fs::read_to_string(root.join("src/generated_handlers.rs")).unwrap(), stubs);
    assert_eq!(fs::read_to_string(root.join("src/handlers.rs")).unwrap(), handwritten);
}

#[test]
fn test_single_user_for_listed_users_is_reported() {
    let contract = load_contract(fixture("users_openapi.yaml")).unwrap();
    let service = scan_sources([
        r#"Router::new().route("/users", get(list_users));"#,
        "async fn list_users() -> Json<User> { todo!() }",
        "#[derive(Serialize)] pub struct User { pub id: i64, pub email: String, pub name: String }",
    ]);
    let report = check(&contract, &service);

    let shape: Vec<&str> = report
        .issues_of(IssueKind::SchemaMismatch)
        .map(|i| i.message())
        .collect();
    assert_eq!(
        shape,
        vec![
            "Response shape mismatch for GET /users: contract declares an array of 'User', implementation returns a single 'User'"
        ]
    );
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::model::HttpMethod;

const USERS_YAML: &str = r##"
openapi: 3.1.0
info:
  title: User Management API
  version: 1.0.0
paths:
  /users:
    get:
      operationId: listUsers
      summary: List users
      parameters:
        - name: limit
          in: query
          required: false
          schema: { type: integer }
        - name: X-Tenant
          in: header
          required: true
          schema: { type: string }
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/User"
    post:
      operationId: createUser
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/UserCreate"
      responses:
        "422":
          description: invalid
        "201":
          description: created
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/User"
  /users/{user_id}:
    parameters:
      - name: user_id
        in: path
        required: true
        schema: { type: integer }
    delete:
      responses:
        "204":
          description: deleted
    get:
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/User"
  /ping:
    head:
      responses:
        default:
          description: anything
components:
  schemas:
    User:
      type: object
      required: [id, email]
      properties:
        id: { type: integer, format: int64 }
        email: { type: string, format: email }
        tags:
          type: array
          items: { type: string }
        address:
          $ref: "#/components/schemas/Address"
        friends:
          type: array
          items:
            $ref: "#/components/schemas/User"
    UserCreate:
      type: object
      required: [email]
      properties:
        email: { type: string, format: email }
    Address:
      type: object
      properties:
        city: { type: string }
"##;

fn contract() -> crate::model::ContractModel {
    parse_contract(USERS_YAML, DocumentFormat::Yaml).unwrap()
}

#[test]
fn test_metadata_and_endpoint_order() {
    let contract = contract();
    assert_eq!(contract.title, "User Management API");
    assert_eq!(contract.version, "1.0.0");

    let listed: Vec<(HttpMethod, &str)> = contract
        .endpoints
        .iter()
        .map(|e| (e.method, e.path.as_str()))
        .collect();
    assert_eq!(
        listed,
        vec![
            (HttpMethod::Head, "/ping"),
            (HttpMethod::Get, "/users"),
            (HttpMethod::Post, "/users"),
            (HttpMethod::Get, "/users/{user_id}"),
            (HttpMethod::Delete, "/users/{user_id}"),
        ]
    );
}

#[test]
fn test_operation_details() {
    let contract = contract();
    let list = &contract.endpoints[1];
    assert_eq!(list.operation_id.as_deref(), Some("listUsers"));
    assert_eq!(list.summary.as_deref(), Some("List users"));
    assert_eq!(list.response_status, Some(200));
    // array of User responses reference the item schema and keep the array marker
    assert_eq!(list.response_schema_ref.as_deref(), Some("User"));
    assert!(list.response_is_array);
    assert_eq!(list.required_params, vec!["X-Tenant".to_string()]);

    let create = &contract.endpoints[2];
    assert_eq!(create.request_schema_ref.as_deref(), Some("UserCreate"));
    assert_eq!(create.response_status, Some(201));
    assert_eq!(create.response_schema_ref.as_deref(), Some("User"));
    assert!(!create.response_is_array);
}

#[test]
fn test_path_level_parameters_and_statuses() {
    let contract = contract();
    let get = &contract.endpoints[3];
    assert_eq!(get.required_params, vec!["user_id".to_string()]);

    let delete = &contract.endpoints[4];
    assert_eq!(delete.response_status, Some(204));
    assert!(delete.response_schema_ref.is_none());

    let ping = &contract.endpoints[0];
    assert_eq!(ping.response_status, Some(200));
}

#[test]
fn test_schema_fields() {
    let contract = contract();
    let user = &contract.schemas["User"];

    let id = user.field("id").unwrap();
    assert_eq!(id.type_tag, "integer");
    assert!(id.required);

    let email = user.field("email").unwrap();
    assert_eq!(email.format.as_deref(), Some("email"));

    assert_eq!(user.field("tags").unwrap().type_tag, "array[string]");
    assert!(!user.field("tags").unwrap().required);

    let address = user.field("address").unwrap();
    assert_eq!(address.type_tag, "object");
    assert_eq!(address.nested_schema.as_deref(), Some("Address"));

    assert_eq!(user.field("friends").unwrap().type_tag, "array[User]");
    assert_eq!(contract.schemas.len(), 3);
}

#[test]
fn test_json_documents_load_too() {
    let json = r##"{
        "openapi": "3.1.0",
        "info": { "title": "Tiny", "version": "0.1.0" },
        "paths": { "/health": { "get": { "responses": { "200": { "description": "ok" } } } } }
    }"##;
    let contract = parse_contract(json, DocumentFormat::Json).unwrap();
    assert_eq!(contract.endpoints.len(), 1);
    assert!(contract.schemas.is_empty());
}

#[test]
fn test_invalid_document_is_error() {
    let err = parse_contract("info: [unclosed", DocumentFormat::Yaml);
    assert!(err.is_err());
    let err = parse_contract(r#"{"paths": {}}"#, DocumentFormat::Json);
    assert!(err.is_err());
}

#[test]
fn test_load_contract_reports_path_on_failure() {
    let err = load_contract("/definitely/not/here.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.yaml"));
}

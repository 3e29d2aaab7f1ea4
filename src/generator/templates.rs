use askama::Template;

use super::naming::{
    example_value, handler_symbol, path_param_type, rust_type_for, sanitize_field_name,
    test_symbol, to_camel_case,
};
use crate::model::{EndpointInfo, SchemaInfo};

/// Template data for a handler stub
#[derive(Template)]
#[template(path = "handler_stub.rs.txt", escape = "none")]
pub struct HandlerStubTemplate {
    pub symbol: String,
    pub method_lower: String,
    pub path: String,
    /// Doc comment lines, each already carrying its leading space
    pub doc_lines: Vec<String>,
    /// Extractor parameters in signature order
    pub params: Vec<String>,
    /// Bound parameter names, as a single expression (empty when none)
    pub bindings: String,
}

/// Template data for an endpoint regression test
#[derive(Template)]
#[template(path = "endpoint_test.rs.txt", escape = "none")]
pub struct EndpointTestTemplate {
    pub symbol: String,
    pub method: String,
    pub path: String,
    /// Concrete request path with placeholders filled in
    pub request_path: String,
    pub status: u16,
    pub has_payload: bool,
    /// JSON literal for the request body
    pub payload: String,
    pub body_binding: String,
    /// Assert the body is a JSON array and check fields on its first item
    pub expects_array: bool,
    pub required_fields: Vec<String>,
}

/// Field of a generated data model
#[derive(Debug, Clone)]
pub struct ModelField {
    /// Rust field name
    pub name: String,
    /// Name on the wire
    pub original_name: String,
    pub ty: String,
}

/// Template data for a serde data model
#[derive(Template)]
#[template(path = "model.rs.txt", escape = "none")]
pub struct ModelTemplate {
    pub schema_name: String,
    pub struct_name: String,
    pub fields: Vec<ModelField>,
}

impl HandlerStubTemplate {
    pub fn for_endpoint(endpoint: &EndpointInfo, response: Option<&SchemaInfo>) -> Self {
        let status = endpoint.effective_status();

        let mut doc_lines = Vec::new();
        match endpoint.summary.as_deref().map(str::trim) {
            Some(summary) if !summary.is_empty() => doc_lines.push(format!(" {summary}")),
            _ => doc_lines.push(format!(" Handler for `{} {}`.", endpoint.method, endpoint.path)),
        }
        doc_lines.push(String::new());
        match &endpoint.response_schema_ref {
            Some(name) if endpoint.response_is_array => {
                doc_lines.push(format!(" Contract: responds {status} with an array of `{name}`."))
            }
            Some(name) => doc_lines.push(format!(" Contract: responds {status} with `{name}`.")),
            None => doc_lines.push(format!(" Contract: responds {status}.")),
        }
        if let Some(schema) = response {
            let required: Vec<&str> = schema.required_fields().map(|f| f.name.as_str()).collect();
            if !required.is_empty() {
                doc_lines.push(format!(" Required response fields: {}.", required.join(", ")));
            }
        }

        let names = endpoint.path_params();
        let mut params = Vec::new();
        let mut bound = Vec::new();
        match names.as_slice() {
            [] => {}
            [single] => {
                let ident = sanitize_field_name(single);
                params.push(format!("Path({ident}): Path<{}>", path_param_type(single)));
                bound.push(ident);
            }
            many => {
                let idents: Vec<String> = many.iter().map(|n| sanitize_field_name(n)).collect();
                let types: Vec<&str> = many.iter().map(|n| path_param_type(n)).collect();
                params.push(format!(
                    "Path(({})): Path<({})>",
                    idents.join(", "),
                    types.join(", ")
                ));
                bound.extend(idents);
            }
        }
        if endpoint.method.takes_body() {
            let body_ty = endpoint
                .request_schema_ref
                .as_deref()
                .map(to_camel_case)
                .unwrap_or_else(|| "serde_json::Value".to_string());
            params.push(format!("Json(body): Json<{body_ty}>"));
            bound.push("body".to_string());
        }

        let bindings = match bound.len() {
            0 => String::new(),
            1 => bound.remove(0),
            _ => format!("({})", bound.join(", ")),
        };

        HandlerStubTemplate {
            symbol: handler_symbol(endpoint),
            method_lower: endpoint.method.as_lower().to_string(),
            path: endpoint.path.clone(),
            doc_lines,
            params,
            bindings,
        }
    }
}

impl EndpointTestTemplate {
    pub fn for_endpoint(
        endpoint: &EndpointInfo,
        request: Option<&SchemaInfo>,
        response: Option<&SchemaInfo>,
    ) -> Self {
        let status = endpoint.effective_status();

        let request_path = endpoint
            .path
            .split('/')
            .map(|seg| {
                if seg.starts_with('{') && seg.ends_with('}') {
                    "1"
                } else {
                    seg
                }
            })
            .collect::<Vec<_>>()
            .join("/");

        let payload = if endpoint.method.takes_body() {
            let mut body = serde_json::Map::new();
            if let Some(schema) = request {
                for field in schema.required_fields() {
                    body.insert(field.name.clone(), example_value(field));
                }
            }
            Some(serde_json::Value::Object(body).to_string())
        } else {
            None
        };

        // Body assertions only make sense for a 2xx that carries content.
        // For an array body the required fields apply to each item.
        let carries_body = (200..300).contains(&status) && status != 204;
        let required_fields: Vec<String> = match response {
            Some(schema) if carries_body => schema
                .required_fields()
                .map(|f| f.name.clone())
                .collect(),
            _ => Vec::new(),
        };

        let expects_array = carries_body && endpoint.response_is_array;

        EndpointTestTemplate {
            symbol: test_symbol(endpoint),
            method: endpoint.method.as_str().to_string(),
            path: endpoint.path.clone(),
            request_path,
            status,
            has_payload: payload.is_some(),
            payload: payload.unwrap_or_default(),
            body_binding: if required_fields.is_empty() && !expects_array {
                "_body".to_string()
            } else {
                "body".to_string()
            },
            expects_array,
            required_fields,
        }
    }
}

impl ModelTemplate {
    pub fn for_schema(schema: &SchemaInfo) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                let ty = rust_type_for(field);
                ModelField {
                    name: sanitize_field_name(&field.name),
                    original_name: field.name.clone(),
                    ty: if field.required {
                        ty
                    } else {
                        format!("Option<{ty}>")
                    },
                }
            })
            .collect();
        ModelTemplate {
            schema_name: schema.name.clone(),
            struct_name: to_camel_case(&schema.name),
            fields,
        }
    }
}

/// Normalize rendered output to end with exactly one newline
pub(crate) fn finish(rendered: String) -> String {
    let mut text = rendered.trim_end().to_string();
    text.push('\n');
    text
}

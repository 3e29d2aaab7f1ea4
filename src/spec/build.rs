use crate::model::{ContractModel, EndpointInfo, FieldInfo, HttpMethod, SchemaInfo, SchemaMap};
use oas3::spec::{MediaType, ObjectOrReference, ObjectSchema, Operation, Parameter, ParameterIn};
use oas3::OpenApiV3Spec;
use serde_json::Value;
use tracing::{debug, warn};

/// Media type whose schemas describe request and response bodies
const JSON_MEDIA_TYPE: &str = "application/json";

/// Status recorded for operations that declare no 2xx response
const FALLBACK_STATUS: u16 = 200;

/// Last segment of a `$ref` path (`#/components/schemas/User` → `User`)
pub fn ref_name(ref_path: &str) -> Option<&str> {
    ref_path.rsplit('/').next().filter(|s| !s.is_empty())
}

/// Resolve a `#/components/schemas/...` reference to its schema object
pub fn resolve_schema_ref<'a>(spec: &'a OpenApiV3Spec, ref_path: &str) -> Option<&'a ObjectSchema> {
    let name = ref_path.strip_prefix("#/components/schemas/")?;
    spec.components
        .as_ref()?
        .schemas
        .get(name)
        .and_then(|schema_ref| match schema_ref {
            ObjectOrReference::Object(schema) => Some(schema),
            _ => None,
        })
}

fn resolve_parameter_ref<'a>(spec: &'a OpenApiV3Spec, ref_path: &str) -> Option<&'a Parameter> {
    let name = ref_path.strip_prefix("#/components/parameters/")?;
    spec.components
        .as_ref()?
        .parameters
        .get(name)
        .and_then(|param_ref| match param_ref {
            ObjectOrReference::Object(param) => Some(param),
            _ => None,
        })
}

/// Normalize a parsed OpenAPI document into a [`ContractModel`]
pub fn build_contract(spec: &OpenApiV3Spec) -> anyhow::Result<ContractModel> {
    Ok(ContractModel {
        title: spec.info.title.clone(),
        version: spec.info.version.clone(),
        endpoints: build_endpoints(spec),
        schemas: build_schemas(spec)?,
    })
}

/// Every named schema under `components.schemas`
pub fn build_schemas(spec: &OpenApiV3Spec) -> anyhow::Result<SchemaMap> {
    let mut schemas = SchemaMap::new();
    let Some(components) = spec.components.as_ref() else {
        return Ok(schemas);
    };
    for (name, schema_ref) in &components.schemas {
        let resolved = match schema_ref {
            ObjectOrReference::Object(obj) => Some(obj),
            ObjectOrReference::Ref { ref_path, .. } => resolve_schema_ref(spec, ref_path),
        };
        match resolved {
            Some(obj) => {
                let value = serde_json::to_value(obj)?;
                schemas.insert(name.clone(), schema_from_value(name, &value));
            }
            None => warn!(schema = %name, "Schema alias could not be resolved; skipping"),
        }
    }
    Ok(schemas)
}

/// Build a [`SchemaInfo`] from the JSON form of an object schema
pub fn schema_from_value(name: &str, schema: &Value) -> SchemaInfo {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut info = SchemaInfo::new(name);
    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        for (field_name, prop) in props {
            let is_required = required.contains(&field_name.as_str());
            info.insert_field(field_from_value(field_name, prop, is_required));
        }
    }
    info
}

fn field_from_value(name: &str, prop: &Value, required: bool) -> FieldInfo {
    if let Some(target) = single_ref(prop) {
        return FieldInfo::new(name, "object", required).nested(target);
    }

    let tag = match type_of(prop).as_deref() {
        Some("array") => {
            let item = match prop.get("items") {
                Some(items) => match single_ref(items) {
                    Some(target) => target.to_string(),
                    None => type_of(items).unwrap_or_else(|| "any".to_string()),
                },
                None => "any".to_string(),
            };
            format!("array[{item}]")
        }
        Some(other) => other.to_string(),
        None if prop.get("properties").is_some() => "object".to_string(),
        None => "any".to_string(),
    };

    let mut field = FieldInfo::new(name, tag, required);
    field.format = prop.get("format").and_then(Value::as_str).map(str::to_string);
    field
}

/// Schema name of a `$ref`, including the `allOf: [{$ref}]` wrapper used to
/// attach siblings such as `nullable` to a reference
fn single_ref(value: &Value) -> Option<&str> {
    if let Some(r) = value.get("$ref").and_then(Value::as_str) {
        return ref_name(r);
    }
    for combinator in ["allOf", "oneOf", "anyOf"] {
        if let Some([only]) = value.get(combinator).and_then(Value::as_array).map(Vec::as_slice) {
            if let Some(r) = only.get("$ref").and_then(Value::as_str) {
                return ref_name(r);
            }
        }
    }
    None
}

/// `type` keyword, taking the first non-null entry of a type array
fn type_of(value: &Value) -> Option<String> {
    match value.get("type")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .map(str::to_string),
        _ => None,
    }
}

/// Endpoints in path order, methods get/post/put/patch/delete/head/options
pub fn build_endpoints(spec: &OpenApiV3Spec) -> Vec<EndpointInfo> {
    let mut endpoints = Vec::new();
    let Some(paths) = spec.paths.as_ref() else {
        return endpoints;
    };

    for (path, item) in paths {
        let operations = [
            (HttpMethod::Get, &item.get),
            (HttpMethod::Post, &item.post),
            (HttpMethod::Put, &item.put),
            (HttpMethod::Patch, &item.patch),
            (HttpMethod::Delete, &item.delete),
            (HttpMethod::Head, &item.head),
            (HttpMethod::Options, &item.options),
        ];
        for (method, operation) in operations {
            let Some(operation) = operation else {
                continue;
            };
            let endpoint = endpoint_from_operation(spec, path, method, &item.parameters, operation);
            debug!(endpoint = %endpoint, "Contract endpoint");
            endpoints.push(endpoint);
        }
    }
    endpoints
}

fn endpoint_from_operation(
    spec: &OpenApiV3Spec,
    path: &str,
    method: HttpMethod,
    item_params: &[ObjectOrReference<Parameter>],
    operation: &Operation,
) -> EndpointInfo {
    let mut endpoint = EndpointInfo::new(method, path);
    endpoint.operation_id = operation.operation_id.clone();
    endpoint.summary = operation.summary.clone();
    endpoint.request_schema_ref = request_schema_ref(operation);

    let (status, response) = success_response(operation);
    endpoint.response_status = Some(status);
    if let Some(body) = response {
        endpoint.response_schema_ref = Some(body.name);
        endpoint.response_is_array = body.is_array;
    }

    let mut required = endpoint.path_params();
    for param in item_params.iter().chain(operation.parameters.iter()) {
        let param = match param {
            ObjectOrReference::Object(obj) => Some(obj),
            ObjectOrReference::Ref { ref_path, .. } => resolve_parameter_ref(spec, ref_path),
        };
        let Some(param) = param else {
            continue;
        };
        let wanted = matches!(param.location, ParameterIn::Query | ParameterIn::Header)
            && param.required.unwrap_or(false);
        if wanted && !required.contains(&param.name) {
            required.push(param.name.clone());
        }
    }
    endpoint.required_params = required;
    endpoint
}

fn request_schema_ref(operation: &Operation) -> Option<String> {
    match operation.request_body.as_ref()? {
        ObjectOrReference::Object(body) => {
            body_schema_ref(body.content.get(JSON_MEDIA_TYPE)).map(|b| b.name)
        }
        ObjectOrReference::Ref { .. } => None,
    }
}

/// Lowest declared 2xx status and the schema its JSON content references
fn success_response(operation: &Operation) -> (u16, Option<BodyRef>) {
    let Some(responses) = operation.responses.as_ref() else {
        return (FALLBACK_STATUS, None);
    };
    let lowest = responses
        .iter()
        .filter_map(|(code, resp)| code.parse::<u16>().ok().map(|c| (c, resp)))
        .filter(|(code, _)| (200..300).contains(code))
        .min_by_key(|(code, _)| *code);

    match lowest {
        Some((code, ObjectOrReference::Object(resp))) => {
            (code, body_schema_ref(resp.content.get(JSON_MEDIA_TYPE)))
        }
        Some((code, ObjectOrReference::Ref { .. })) => (code, None),
        None => (FALLBACK_STATUS, None),
    }
}

/// Named schema carried by a JSON body
struct BodyRef {
    name: String,
    /// Body is an array of `name`
    is_array: bool,
}

/// Schema referenced by JSON content, directly or as the item of an array
fn body_schema_ref(media: Option<&MediaType>) -> Option<BodyRef> {
    match media?.schema.as_ref()? {
        ObjectOrReference::Ref { ref_path, .. } => ref_name(ref_path).map(|name| BodyRef {
            name: name.to_string(),
            is_array: false,
        }),
        ObjectOrReference::Object(obj) => {
            let value = serde_json::to_value(obj).ok()?;
            if type_of(&value).as_deref() != Some("array") {
                return None;
            }
            single_ref(value.get("items")?).map(|name| BodyRef {
                name: name.to_string(),
                is_array: true,
            })
        }
    }
}

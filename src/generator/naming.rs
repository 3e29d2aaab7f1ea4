use crate::model::{EndpointInfo, FieldInfo};
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder names that conventionally carry numeric identifiers:
/// `id`, `user_id`, `userId`
static NUMERIC_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:id|[a-z0-9_]*_id|[a-z][A-Za-z0-9]*Id)$").expect("valid numeric id regex")
});

/// Collapse a method and path into a snake_case identifier body.
///
/// `DELETE /users/{user_id}` → `delete_users_user_id`. Separators, braces
/// and any other non-alphanumeric character become a single underscore.
pub fn endpoint_ident(endpoint: &EndpointInfo) -> String {
    let raw = format!("{}_{}", endpoint.method.as_lower(), endpoint.path);
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Name of the generated test function for an endpoint
pub fn test_symbol(endpoint: &EndpointInfo) -> String {
    format!("test_{}", endpoint_ident(endpoint))
}

/// Name of the generated handler: the operationId in snake_case when the
/// contract declares one, otherwise derived from method and path
pub fn handler_symbol(endpoint: &EndpointInfo) -> String {
    match endpoint.operation_id.as_deref() {
        Some(op) if !op.trim().is_empty() => sanitize_rust_identifier(&to_snake_case(op)),
        _ => endpoint_ident(endpoint),
    }
}

/// Rust type for a path placeholder, inferred from its name
pub fn path_param_type(name: &str) -> &'static str {
    if NUMERIC_ID.is_match(name) {
        "i64"
    } else {
        "String"
    }
}

/// Rust type for a semantic type tag
pub fn rust_type_for(field: &FieldInfo) -> String {
    if let Some(nested) = &field.nested_schema {
        return to_camel_case(nested);
    }
    rust_type_for_tag(&field.type_tag)
}

fn rust_type_for_tag(tag: &str) -> String {
    if let Some(inner) = tag.strip_prefix("array[").and_then(|s| s.strip_suffix(']')) {
        return format!("Vec<{}>", rust_type_for_tag(inner));
    }
    match tag {
        "string" => "String".to_string(),
        "integer" => "i64".to_string(),
        "number" => "f64".to_string(),
        "boolean" => "bool".to_string(),
        "object" | "any" | "array" => "serde_json::Value".to_string(),
        other => to_camel_case(other),
    }
}

/// JSON example value for a request field
pub fn example_value(field: &FieldInfo) -> serde_json::Value {
    use serde_json::Value;
    if field.format.as_deref() == Some("email") {
        return Value::String("test@example.com".to_string());
    }
    match field.type_tag.as_str() {
        "string" => Value::String(format!("{}_value", field.name)),
        "integer" => Value::from(1),
        "number" => Value::from(1.5),
        "boolean" => Value::Bool(true),
        t if t.starts_with("array") => Value::Array(Vec::new()),
        _ => Value::Object(serde_json::Map::new()),
    }
}

/// Convert a snake_case string to CamelCase
pub fn to_camel_case(s: &str) -> String {
    s.split(['_', '-', ' '])
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert a camelCase or kebab-case string to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for ch in s.chars() {
        if ch.is_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch.is_alphanumeric() || ch == '_' {
            result.push(ch);
        } else if !result.is_empty() && !result.ends_with('_') {
            result.push('_');
        }
    }
    result.trim_end_matches('_').to_string()
}

/// Turn a schema property name into a usable Rust field name
pub fn sanitize_field_name(name: &str) -> String {
    let mut s = to_snake_case(name);
    if s.is_empty() {
        s = "_".to_string();
    }
    if s.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    sanitize_rust_identifier(&s)
}

fn sanitize_rust_identifier(name: &str) -> String {
    const KEYWORDS: &[&str] = &[
        "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn",
        "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
        "return", "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe",
        "use", "where", "while", "async", "await", "dyn",
    ];
    if KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::rust_types::{camel_case, field_for};
use super::source::{balanced, split_top_level, strip_comments};
use crate::model::{EndpointInfo, FieldInfo, HttpMethod, SchemaInfo, SchemaMap, ServiceModel};

static ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\.route\(\s*"([^"]*)"\s*,"#).expect("valid route regex"));

static METHOD_HANDLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(get|post|put|patch|delete|head|options|trace)\s*\(\s*((?:[A-Za-z_]\w*::)*[A-Za-z_]\w*)\s*\)")
        .expect("valid method router regex")
});

static FN_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfn\s+([A-Za-z_]\w*)\s*(?:<[^>{]*>)?\s*\(").expect("valid fn regex")
});

static STATUS_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"StatusCode::([A-Z_]+)").expect("valid status regex"));

static JSON_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Json\s*<\s*(Vec\s*<\s*)?((?:[A-Za-z_]\w*::)*[A-Za-z_]\w*)")
        .expect("valid Json regex")
});

static NEST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\.nest\(\s*"([^"]*)"\s*,"#).expect("valid nest regex"));

static SERDE_STRUCT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"#\[derive\(([^)]*)\)\]\s*((?:#\[[^\]]*\]\s*)*)(?:pub(?:\([^)]*\))?\s+)?struct\s+([A-Za-z_]\w*)\s*(?:<[^>{]*>)?\s*(?:where[^{]*)?\{",
    )
    .expect("valid struct regex")
});

static SERDE_RENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"#\[serde\([^\]]*\brename\s*=\s*"([^"]*)""#).expect("valid rename regex")
});

static SERDE_DEFAULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\[serde\([^\]]*\bdefault\b").expect("valid default regex"));

static SERDE_SKIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\[serde\([^\]]*\bskip\b\s*[,)]").expect("valid skip regex"));

static VISIBILITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^pub(?:\s*\([^)]*\))?\s+").expect("valid visibility regex"));

static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\[[^\]]*\]").expect("valid attribute regex"));

/// Types that carry no schema of their own
const OPAQUE_BODY_TYPES: [&str; 2] = ["Value", "serde_json::Value"];

/// A route declaration found in source
#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteDecl {
    method: HttpMethod,
    path: String,
    handler: String,
}

/// Signature pieces of a function found in source
#[derive(Debug, Clone, Default)]
struct FnParts<'a> {
    params: &'a str,
    ret: &'a str,
    body: &'a str,
}

/// Statically scan every `.rs` file under `root` and build the
/// implementation model. Nothing is compiled or executed.
pub fn scan_service(root: &Path) -> anyhow::Result<ServiceModel> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|x| x.to_str()) != Some("rs")
        {
            continue;
        }
        let text = std::fs::read_to_string(entry.path())
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;
        sources.push(text);
    }

    let model = scan_sources(sources.iter().map(String::as_str));
    info!(
        root = %root.display(),
        files = sources.len(),
        endpoints = model.endpoints.len(),
        schemas = model.schemas.len(),
        "Scanned implementation"
    );
    Ok(model)
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name == "target" || name.starts_with('.'))
}

/// Build an implementation model from in-memory source texts.
///
/// Routes, handlers and models may live in different sources; the first
/// definition of a handler name wins.
pub fn scan_sources<'a>(sources: impl IntoIterator<Item = &'a str>) -> ServiceModel {
    let cleaned: Vec<String> = sources.into_iter().map(strip_comments).collect();

    let mut routes = Vec::new();
    let mut handlers: HashMap<String, FnParts<'_>> = HashMap::new();
    let mut schemas = SchemaMap::new();
    for source in &cleaned {
        routes.extend(find_routes(source));
        for (name, parts) in find_fns(source) {
            handlers.entry(name).or_insert(parts);
        }
        for schema in find_serde_structs(source) {
            schemas.entry(schema.name.clone()).or_insert(schema);
        }
    }

    let endpoints = routes
        .into_iter()
        .map(|route| {
            let mut endpoint = EndpointInfo::new(route.method, route.path);
            if let Some(parts) = handlers.get(&route.handler) {
                endpoint.request_schema_ref = json_body(parts.params).map(|b| b.name);
                if let Some(body) = json_body(parts.ret) {
                    endpoint.response_schema_ref = Some(body.name);
                    endpoint.response_is_array = body.is_array;
                }
                endpoint.response_status = success_status(parts.body)
                    .or_else(|| success_status(parts.ret));
            } else {
                debug!(handler = %route.handler, "Handler body not found; schemas unknown");
            }
            endpoint.operation_id = Some(route.handler);
            endpoint.required_params = endpoint.path_params();
            endpoint
        })
        .collect();

    ServiceModel { endpoints, schemas }
}

/// Prefix applied by a `.nest("/prefix", ..)` whose arguments span `start..end`
struct NestScope<'a> {
    start: usize,
    end: usize,
    prefix: &'a str,
}

fn find_nest_scopes(source: &str) -> Vec<NestScope<'_>> {
    let mut scopes = Vec::new();
    for caps in NEST.captures_iter(source) {
        let (Some(whole), Some(prefix)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let open_at = whole.start() + ".nest".len();
        let Some(args) = balanced(source, open_at, '(', ')') else {
            continue;
        };
        scopes.push(NestScope {
            start: open_at + 1,
            end: open_at + 1 + args.len(),
            prefix: prefix.as_str(),
        });
    }
    scopes
}

/// Join the prefixes of every inline `nest` enclosing `at`, outermost first
fn nest_prefix(scopes: &[NestScope<'_>], at: usize) -> String {
    scopes
        .iter()
        .filter(|scope| scope.start <= at && at < scope.end)
        .map(|scope| scope.prefix.trim_end_matches('/'))
        .collect()
}

fn join_route(prefix: &str, path: &str) -> String {
    match (prefix.is_empty(), path) {
        (true, _) => path.to_string(),
        (false, "" | "/") => prefix.to_string(),
        (false, _) => format!("{prefix}{path}"),
    }
}

fn find_routes(source: &str) -> Vec<RouteDecl> {
    let scopes = find_nest_scopes(source);
    let mut routes = Vec::new();
    for caps in ROUTE.captures_iter(source) {
        let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        // `.route(` is followed by the router arguments up to the matching `)`
        let open_at = whole.start() + ".route".len();
        let Some(args) = balanced(source, open_at, '(', ')') else {
            continue;
        };
        let prefix = nest_prefix(&scopes, whole.start());
        let path = axum_path_to_template(&join_route(&prefix, path.as_str()));
        for mh in METHOD_HANDLER.captures_iter(args) {
            let (Some(method), Some(handler)) = (mh.get(1), mh.get(2)) else {
                continue;
            };
            let Ok(method) = method.as_str().parse::<HttpMethod>() else {
                continue;
            };
            let handler = handler.as_str().rsplit("::").next().unwrap_or_default();
            routes.push(RouteDecl {
                method,
                path: path.clone(),
                handler: handler.to_string(),
            });
        }
    }
    routes
}

/// `/users/:id/*rest` → `/users/{id}/{rest}`
pub fn axum_path_to_template(path: &str) -> String {
    path.split('/')
        .map(|seg| match seg.strip_prefix(':').or_else(|| seg.strip_prefix('*')) {
            Some(name) if !name.is_empty() => format!("{{{name}}}"),
            _ => seg.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn find_fns(source: &str) -> Vec<(String, FnParts<'_>)> {
    let mut out = Vec::new();
    for caps in FN_DECL.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let params_open = whole.end() - 1;
        let Some(params) = balanced(source, params_open, '(', ')') else {
            continue;
        };
        let after_params = params_open + params.len() + 2;
        let Some(rest) = source.get(after_params..) else {
            continue;
        };
        // trait method declarations end in `;` and have no body
        let Some(body_rel) = rest.find(['{', ';']) else {
            continue;
        };
        if rest[body_rel..].starts_with(';') {
            continue;
        }
        let ret = rest[..body_rel].trim();
        let ret = ret.strip_prefix("->").unwrap_or(ret);
        let ret = ret.split(" where ").next().unwrap_or(ret).trim();
        let body = balanced(source, after_params + body_rel, '{', '}').unwrap_or_default();
        out.push((name.as_str().to_string(), FnParts { params, ret, body }));
    }
    out
}

/// Schema named by a `Json<T>` type
struct JsonBody {
    name: String,
    /// `Json<Vec<T>>`
    is_array: bool,
}

fn json_body(text: &str) -> Option<JsonBody> {
    JSON_TYPE
        .captures_iter(text)
        .filter_map(|c| Some((c.get(1).is_some(), c.get(2)?.as_str())))
        .find(|(_, name)| !OPAQUE_BODY_TYPES.contains(name))
        .map(|(is_array, name)| JsonBody {
            name: name.rsplit("::").next().unwrap_or(name).to_string(),
            is_array,
        })
}

/// First 2xx `StatusCode::NAME` constant in `text`
fn success_status(text: &str) -> Option<u16> {
    STATUS_CODE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .filter_map(|m| status_for_name(m.as_str()))
        .find(|code| (200..300).contains(code))
}

fn status_for_name(name: &str) -> Option<u16> {
    Some(match name {
        "OK" => 200,
        "CREATED" => 201,
        "ACCEPTED" => 202,
        "NON_AUTHORITATIVE_INFORMATION" => 203,
        "NO_CONTENT" => 204,
        "RESET_CONTENT" => 205,
        "PARTIAL_CONTENT" => 206,
        "BAD_REQUEST" => 400,
        "UNAUTHORIZED" => 401,
        "FORBIDDEN" => 403,
        "NOT_FOUND" => 404,
        "CONFLICT" => 409,
        "UNPROCESSABLE_ENTITY" => 422,
        "INTERNAL_SERVER_ERROR" => 500,
        "NOT_IMPLEMENTED" => 501,
        _ => return None,
    })
}

fn find_serde_structs(source: &str) -> Vec<SchemaInfo> {
    let mut out = Vec::new();
    for caps in SERDE_STRUCT.captures_iter(source) {
        let (Some(whole), Some(derives), Some(name)) = (caps.get(0), caps.get(1), caps.get(3)) else {
            continue;
        };
        let is_serde = derives
            .as_str()
            .split(',')
            .map(|d| d.trim().rsplit("::").next().unwrap_or_default())
            .any(|d| d == "Serialize" || d == "Deserialize");
        if !is_serde {
            continue;
        }
        let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        let camel = attrs.contains("rename_all") && attrs.contains("\"camelCase\"");

        let Some(body) = balanced(source, whole.end() - 1, '{', '}') else {
            continue;
        };
        let mut schema = SchemaInfo::new(name.as_str());
        for raw in split_top_level(body) {
            if let Some(field) = parse_field(raw, camel) {
                schema.insert_field(field);
            }
        }
        out.push(schema);
    }
    out
}

fn parse_field(raw: &str, camel: bool) -> Option<FieldInfo> {
    if SERDE_SKIP.is_match(raw) {
        return None;
    }
    let rename = SERDE_RENAME
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    let has_default = SERDE_DEFAULT.is_match(raw);

    let without_attrs = ATTRIBUTE.replace_all(raw, "");
    let decl = VISIBILITY.replace(without_attrs.trim(), "");
    let (name, ty) = decl.split_once(':')?;
    let name = name.trim().trim_start_matches("r#");
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let wire = match rename {
        Some(r) => r,
        None if camel => camel_case(name),
        None => name.to_string(),
    };
    Some(field_for(&wire, ty.trim(), has_default))
}

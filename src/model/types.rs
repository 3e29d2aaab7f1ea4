use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// HTTP verbs an endpoint can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
    #[serde(alias = "put")]
    Put,
    #[serde(alias = "patch")]
    Patch,
    #[serde(alias = "delete")]
    Delete,
    #[serde(alias = "head")]
    Head,
    #[serde(alias = "options")]
    Options,
    #[serde(alias = "trace")]
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Lower-case form, as used in generated symbol names and router calls
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Trace => "trace",
        }
    }

    /// Success status assumed when a declaration does not name one
    pub fn default_status(&self) -> u16 {
        match self {
            HttpMethod::Post => 201,
            HttpMethod::Delete => 204,
            _ => 200,
        }
    }

    /// Whether generated handlers for this verb take a JSON body parameter
    pub fn takes_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a recognised HTTP verb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HTTP method '{}'", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// One endpoint as seen by either the contract or the implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub method: HttpMethod,
    /// Path template with `{param}` placeholders
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_schema_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema_ref: Option<String>,
    /// The response body is a JSON array of `response_schema_ref` items
    #[serde(default, skip_serializing_if = "is_false")]
    pub response_is_array: bool,
    /// Declared success status; `None` when the source did not declare one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<u16>,
    #[serde(default)]
    pub required_params: Vec<String>,
}

impl EndpointInfo {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        EndpointInfo {
            method,
            path: path.into(),
            operation_id: None,
            summary: None,
            request_schema_ref: None,
            response_schema_ref: None,
            response_is_array: false,
            response_status: None,
            required_params: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.response_status = Some(status);
        self
    }

    pub fn with_response_schema(mut self, name: impl Into<String>) -> Self {
        self.response_schema_ref = Some(name.into());
        self
    }

    /// Response body is an array whose items are `name`
    pub fn with_array_response(mut self, name: impl Into<String>) -> Self {
        self.response_schema_ref = Some(name.into());
        self.response_is_array = true;
        self
    }

    pub fn with_request_schema(mut self, name: impl Into<String>) -> Self {
        self.request_schema_ref = Some(name.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Declared status, or the method default when none was declared
    pub fn effective_status(&self) -> u16 {
        self.response_status
            .unwrap_or_else(|| self.method.default_status())
    }

    /// Placeholder names in path order (`/users/{user_id}` → `["user_id"]`)
    pub fn path_params(&self) -> Vec<String> {
        self.path
            .split('/')
            .filter_map(|seg| seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
            .map(str::to_string)
            .collect()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl fmt::Display for EndpointInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// A single field of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    /// Semantic type tag: `string`, `integer`, `number`, `boolean`,
    /// `object`, `array[<item>]`
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>, required: bool) -> Self {
        FieldInfo {
            name: name.into(),
            type_tag: type_tag.into(),
            required,
            nested_schema: None,
            format: None,
        }
    }

    pub fn nested(mut self, schema: impl Into<String>) -> Self {
        self.nested_schema = Some(schema.into());
        self
    }
}

/// A named schema definition. Field names are unique within a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_unique_fields")]
    fields: Vec<FieldInfo>,
}

impl SchemaInfo {
    pub fn new(name: impl Into<String>) -> Self {
        SchemaInfo {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder form of [`SchemaInfo::insert_field`]
    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.insert_field(field);
        self
    }

    /// Insert a field, replacing any existing field with the same name in place
    pub fn insert_field(&mut self, field: FieldInfo) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|f| f.required)
    }
}

fn deserialize_unique_fields<'de, D>(deserializer: D) -> Result<Vec<FieldInfo>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<FieldInfo>::deserialize(deserializer)?;
    let mut schema = SchemaInfo::new("");
    for field in raw {
        schema.insert_field(field);
    }
    Ok(schema.fields)
}

/// Named schema definitions keyed by schema name
pub type SchemaMap = BTreeMap<String, SchemaInfo>;

/// Normalized contract: what the API document promises
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractModel {
    pub title: String,
    pub version: String,
    pub endpoints: Vec<EndpointInfo>,
    pub schemas: SchemaMap,
}

/// Normalized implementation: what static inspection of the service found
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceModel {
    #[serde(default)]
    pub endpoints: Vec<EndpointInfo>,
    #[serde(default)]
    pub schemas: SchemaMap,
}

use super::build::build_contract;
use crate::model::ContractModel;
use anyhow::Context;
use oas3::OpenApiV3Spec;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;

/// Serialization of a document on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// YAML for `.yaml` / `.yml`, JSON for anything else
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }

    /// Parse `content` into any deserializable type
    pub fn parse<T: DeserializeOwned>(self, content: &str) -> anyhow::Result<T> {
        Ok(match self {
            DocumentFormat::Yaml => serde_yaml::from_str(content)?,
            DocumentFormat::Json => serde_json::from_str(content)?,
        })
    }
}

/// Drop path-item keys that are neither operations nor standard path-item
/// fields, so vendor drafts do not fail typed parsing
fn strip_unknown_verbs(val: &mut serde_json::Value) {
    const METHODS: [&str; 8] = ["get", "post", "put", "delete", "patch", "options", "head", "trace"];

    let Some(serde_json::Value::Object(paths_map)) = val.get_mut("paths") else {
        return;
    };
    for item in paths_map.values_mut() {
        if let serde_json::Value::Object(obj) = item {
            obj.retain(|k, _| {
                let lk = k.to_ascii_lowercase();
                match lk.as_str() {
                    "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                    m if METHODS.contains(&m) => true,
                    _ => k.starts_with("x-"),
                }
            });
        }
    }
}

/// Read an OpenAPI 3.x document and normalize it into a [`ContractModel`]
pub fn load_contract(path: impl AsRef<Path>) -> anyhow::Result<ContractModel> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read contract {}", path.display()))?;
    let contract = parse_contract(&content, DocumentFormat::from_path(path))
        .with_context(|| format!("Failed to parse contract {}", path.display()))?;

    info!(
        path = %path.display(),
        title = %contract.title,
        endpoints = contract.endpoints.len(),
        schemas = contract.schemas.len(),
        "Loaded contract"
    );
    Ok(contract)
}

/// Parse contract text already in memory
pub fn parse_contract(content: &str, format: DocumentFormat) -> anyhow::Result<ContractModel> {
    let mut value: serde_json::Value = format.parse(content)?;
    strip_unknown_verbs(&mut value);
    let spec: OpenApiV3Spec =
        serde_json::from_value(value).context("Document is not a valid OpenAPI 3 description")?;
    build_contract(&spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_unknown_verbs() {
        let mut v = json!({
            "paths": {
                "/x": { "get": {}, "patch": {}, "unknown": {}, "x-owner": "team" }
            }
        });
        strip_unknown_verbs(&mut v);
        assert!(v["paths"]["/x"].get("unknown").is_none());
        assert!(v["paths"]["/x"].get("get").is_some());
        assert!(v["paths"]["/x"].get("x-owner").is_some());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("openapi")), DocumentFormat::Json);
    }
}

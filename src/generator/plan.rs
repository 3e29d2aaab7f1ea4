use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

use super::artifacts::{ArtifactGenerator, ArtifactTargets};
use crate::diff::lookup;
use crate::model::{
    ArtifactKind, ComplianceReport, ContractModel, EndpointInfo, EndpointKey, FieldInfo,
    GeneratedArtifact, ServiceModel,
};

/// Artifacts proposed to close the gaps a report found
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixPlan {
    artifacts: Vec<GeneratedArtifact>,
}

impl FixPlan {
    pub fn artifacts(&self) -> &[GeneratedArtifact] {
        &self.artifacts
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.artifacts.iter().filter(|a| a.kind() == kind).count()
    }

    /// Distinct target files, sorted
    pub fn target_files(&self) -> BTreeSet<&Path> {
        self.artifacts.iter().map(|a| a.target_file()).collect()
    }

    /// Human readable overview of the plan
    pub fn summary(&self) -> String {
        let mut out = String::new();
        if self.is_empty() {
            out.push_str("No fixes needed: every contract endpoint is implemented.\n");
            return out;
        }
        out.push_str(&format!(
            "Planned {} artifact(s): {} handler stub(s), {} test(s), {} data model(s)\n",
            self.artifacts.len(),
            self.count(ArtifactKind::Stub),
            self.count(ArtifactKind::Test),
            self.count(ArtifactKind::Model),
        ));
        for file in self.target_files() {
            let symbols: Vec<&str> = self
                .artifacts
                .iter()
                .filter(|a| a.target_file() == file)
                .map(GeneratedArtifact::symbol_name)
                .collect();
            out.push_str(&format!("  {}: {}\n", file.display(), symbols.join(", ")));
        }
        out
    }
}

/// Build stubs, tests and models for every endpoint the report lists as
/// missing.
///
/// Models are proposed for schemas those endpoints reference (directly or
/// through one level of nesting) that the implementation does not define.
/// Rendering is pure; nothing touches the filesystem here.
pub fn plan_fixes(
    report: &ComplianceReport,
    contract: &ContractModel,
    service: &ServiceModel,
    targets: ArtifactTargets,
) -> anyhow::Result<FixPlan> {
    let generator = ArtifactGenerator::new(&contract.schemas, targets);
    let mut artifacts = Vec::new();
    let mut wanted_schemas = BTreeSet::new();

    for issue in report.missing_endpoints() {
        let Some(key) = issue.endpoint_key() else {
            continue;
        };
        let Some(endpoint) = find_endpoint(&contract.endpoints, key) else {
            warn!(endpoint = %key, "Missing endpoint not found in contract; skipping");
            continue;
        };

        let response = endpoint
            .response_schema_ref
            .as_deref()
            .and_then(|name| lookup(&contract.schemas, name));
        artifacts.push(generator.generate_stub(endpoint, response)?);
        artifacts.push(generator.generate_test(endpoint)?);

        for name in [&endpoint.request_schema_ref, &endpoint.response_schema_ref]
            .into_iter()
            .flatten()
        {
            wanted_schemas.insert(name.clone());
            if let Some(schema) = lookup(&contract.schemas, name) {
                wanted_schemas.extend(
                    schema
                        .fields()
                        .iter()
                        .filter_map(referenced_schema),
                );
            }
        }
    }

    for name in &wanted_schemas {
        if lookup(&service.schemas, name).is_some() {
            continue;
        }
        match lookup(&contract.schemas, name) {
            Some(schema) => artifacts.push(generator.generate_schema(schema)?),
            None => debug!(schema = %name, "Referenced schema not defined in contract"),
        }
    }

    Ok(FixPlan { artifacts })
}

/// Schema a field points at, either directly or as its array item type
fn referenced_schema(field: &FieldInfo) -> Option<String> {
    if let Some(nested) = &field.nested_schema {
        return Some(nested.clone());
    }
    let item = field.type_tag.strip_prefix("array[")?.strip_suffix(']')?;
    match item {
        "string" | "integer" | "number" | "boolean" | "object" | "array" | "any" => None,
        named => Some(named.to_string()),
    }
}

fn find_endpoint<'a>(endpoints: &'a [EndpointInfo], key: &EndpointKey) -> Option<&'a EndpointInfo> {
    endpoints
        .iter()
        .find(|ep| EndpointKey::for_endpoint(ep).is_ok_and(|k| &k == key))
}

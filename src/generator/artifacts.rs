use askama::Template;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::naming::{handler_symbol, test_symbol, to_camel_case};
use super::templates::{finish, EndpointTestTemplate, HandlerStubTemplate, ModelTemplate};
use crate::diff::lookup;
use crate::model::{ArtifactKind, EndpointInfo, GeneratedArtifact, SchemaInfo, SchemaMap};

/// Files generated artifacts are aimed at, relative to the service root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactTargets {
    pub stubs_file: PathBuf,
    pub tests_file: PathBuf,
    pub models_file: PathBuf,
}

impl Default for ArtifactTargets {
    fn default() -> Self {
        ArtifactTargets {
            stubs_file: PathBuf::from("src/generated_handlers.rs"),
            tests_file: PathBuf::from("tests/generated_contract_tests.rs"),
            models_file: PathBuf::from("src/generated_models.rs"),
        }
    }
}

/// Renders handler stubs, endpoint tests and data models.
///
/// Holds no mutable state: the same input always renders byte-identical
/// text. Contract schemas are consulted to fill in request payloads and
/// response assertions for tests.
#[derive(Debug, Clone)]
pub struct ArtifactGenerator<'a> {
    schemas: &'a SchemaMap,
    targets: ArtifactTargets,
}

impl<'a> ArtifactGenerator<'a> {
    pub fn new(schemas: &'a SchemaMap, targets: ArtifactTargets) -> Self {
        ArtifactGenerator { schemas, targets }
    }

    pub fn targets(&self) -> &ArtifactTargets {
        &self.targets
    }

    /// Handler stub for an endpoint the implementation lacks.
    ///
    /// `schema` is the endpoint's response schema, used only to document
    /// what the handler must eventually return.
    pub fn generate_stub(
        &self,
        endpoint: &EndpointInfo,
        schema: Option<&SchemaInfo>,
    ) -> anyhow::Result<GeneratedArtifact> {
        let rendered = HandlerStubTemplate::for_endpoint(endpoint, schema).render()?;
        Ok(GeneratedArtifact::new(
            &self.targets.stubs_file,
            handler_symbol(endpoint),
            ArtifactKind::Stub,
            finish(rendered),
        ))
    }

    /// Regression test exercising an endpoint's contract
    pub fn generate_test(&self, endpoint: &EndpointInfo) -> anyhow::Result<GeneratedArtifact> {
        let request = self.resolve(endpoint.request_schema_ref.as_deref());
        let response = self.resolve(endpoint.response_schema_ref.as_deref());
        let rendered = EndpointTestTemplate::for_endpoint(endpoint, request, response).render()?;
        Ok(GeneratedArtifact::new(
            &self.targets.tests_file,
            test_symbol(endpoint),
            ArtifactKind::Test,
            finish(rendered),
        ))
    }

    /// Serde struct mirroring a contract schema
    pub fn generate_schema(&self, schema: &SchemaInfo) -> anyhow::Result<GeneratedArtifact> {
        let rendered = ModelTemplate::for_schema(schema).render()?;
        Ok(GeneratedArtifact::new(
            &self.targets.models_file,
            to_camel_case(&schema.name),
            ArtifactKind::Model,
            finish(rendered),
        ))
    }

    fn resolve(&self, name: Option<&str>) -> Option<&'a SchemaInfo> {
        name.and_then(|n| lookup(self.schemas, n))
    }
}

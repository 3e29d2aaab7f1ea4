//! # Contract Enforcer
//!
//! **Contract Enforcer** checks that a service implements the endpoint surface its
//! [OpenAPI 3.1.0](https://spec.openapis.org/oas/v3.1.0) contract promises, and proposes
//! append-only fixes for whatever is missing.
//!
//! ## Overview
//!
//! Both sides are first normalized into the same shape: a list of
//! [`EndpointInfo`](model::EndpointInfo) plus a map of named
//! [`SchemaInfo`](model::SchemaInfo). The contract side comes from the OpenAPI
//! document, the implementation side from a static scan of the service's Rust
//! sources (or a manifest written by another inspector). The two models are
//! then compared and every discrepancy becomes a
//! [`ComplianceIssue`](model::ComplianceIssue).
//!
//! ## Architecture
//!
//! - **[`model`]** - Endpoint keys, schemas, issues, reports and artifacts
//! - **[`diff`]** - Field-level schema comparison with one level of nesting
//! - **[`compliance`]** - Endpoint matching and report assembly
//! - **[`generator`]** - Handler stubs, endpoint tests and data models rendered with Askama
//! - **[`spec`]** - OpenAPI 3.x loading and normalization
//! - **[`inspect`]** - Static route and model scanning of a service
//! - **[`report`]** - Text, Markdown and JSON report rendering
//! - **[`config`]** - `contract-enforcer.toml` loading
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `contract-enforcer` command surface
//!
//! ### Check Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(contract-enforcer)
//!     participant Spec as spec::load_contract
//!     participant Inspect as inspect::load_service
//!     participant Compliance as compliance::check
//!     participant Generator as generator::plan_fixes
//!     participant FS as File System
//!
//!     User->>CLI: contract-enforcer generate --apply
//!     CLI->>Spec: load_contract("openapi.yaml")
//!     Spec-->>CLI: ContractModel
//!     CLI->>Inspect: load_service("services/user")
//!     Inspect-->>CLI: ServiceModel
//!     CLI->>Compliance: check(&contract, &service)
//!     Compliance-->>CLI: ComplianceReport
//!     CLI->>Generator: plan_fixes(&report, ...)
//!     Generator-->>CLI: FixPlan
//!     CLI->>FS: AppendFileSink appends missing symbols
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use contract_enforcer::{compliance, inspect, report, spec};
//!
//! let contract = spec::load_contract("openapi.yaml")?;
//! let service = inspect::load_service("services/user".as_ref())?;
//! let report = compliance::check(&contract, &service);
//! print!("{}", report::render_text(&report));
//! ```

pub mod cli;
pub mod compliance;
pub mod config;
pub mod diff;
pub mod generator;
pub mod inspect;
pub mod logging;
pub mod model;
pub mod report;
pub mod spec;

pub use compliance::check;
pub use model::{ComplianceIssue, ComplianceReport, EndpointInfo, EndpointKey, SchemaInfo};
pub use spec::load_contract;

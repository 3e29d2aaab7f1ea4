//! # Artifact Generator
//!
//! Renders source text that closes the gaps a [`ComplianceReport`] found:
//!
//! - **Handler stubs** for missing endpoints. Path placeholders become a
//!   typed `Path` extractor (`i64` for id-like names, `String` otherwise) and
//!   body-carrying verbs take a `Json` body typed as the request schema. The
//!   body is an inert placeholder answering 501.
//! - **Endpoint tests** asserting the contract status and, for 2xx responses
//!   with a body, the presence of every required top-level field.
//! - **Data models** for contract schemas the implementation does not define.
//!
//! Rendering goes through Askama templates in `templates/`. Output depends
//! only on the input, so rendering twice gives byte-identical text.
//!
//! Writing is separate: a [`FixPlan`] is handed to an [`ArtifactSink`].
//! [`PreviewSink`] renders a dry run; [`AppendFileSink`] appends to target
//! files and skips symbols that already exist, so it can never break code
//! that is already there.
//!
//! [`ComplianceReport`]: crate::model::ComplianceReport

mod artifacts;
mod naming;
mod plan;
mod sink;
mod templates;

pub use artifacts::{ArtifactGenerator, ArtifactTargets};
pub use naming::{handler_symbol, test_symbol, to_camel_case, to_snake_case};
pub use plan::{plan_fixes, FixPlan};
pub use sink::{apply_plan, AppendFileSink, AppendOutcome, ApplySummary, ArtifactSink, PreviewSink};

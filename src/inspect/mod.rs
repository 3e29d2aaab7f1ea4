//! Static inspection of an implementation.
//!
//! A service is described either by its Rust sources, scanned for axum
//! `.route(..)` registrations, handler signatures and serde structs, or by a
//! JSON/YAML manifest in the [`ServiceModel`](crate::model::ServiceModel)
//! shape. Source scanning is lexical: nothing is compiled or executed, and
//! handlers whose types cannot be read simply contribute no schema names.
//!
//! Routes registered inside an inline `.nest("/api", Router::new()...)` carry
//! the nest prefix. A router nested from a value built elsewhere, such as
//! `.nest("/api", api_router())`, is not followed: its routes are reported
//! without the prefix.

mod manifest;
mod rust_types;
mod scanner;
mod source;


pub use manifest::{load_manifest, load_service};
pub use rust_types::{shape_of, TypeShape};
pub use scanner::{axum_path_to_template, scan_service, scan_sources};

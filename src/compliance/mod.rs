//! # Compliance Module
//!
//! Reconciles the contract model with the implementation model and classifies
//! every discrepancy as a [`ComplianceIssue`](crate::model::ComplianceIssue).
//!
//! ## Matching
//!
//! Endpoints are matched by [`EndpointKey`](crate::model::EndpointKey): the
//! HTTP method plus the path with every `{placeholder}` treated as a
//! positional wildcard, so `/users/{user_id}` matches `/users/{id}`.
//!
//! ## Issue Ordering
//!
//! 1. `MISSING_ENDPOINT` for each contract endpoint without a match (contract order)
//! 2. `EXTRA_ENDPOINT` for each implementation endpoint the contract lacks
//! 3. Per matched endpoint (contract order): status and schema issues,
//!    errors before warnings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contract_enforcer::compliance::compare;
//!
//! let report = compare(&contract.endpoints, &service.endpoints, &contract.schemas, &service.schemas);
//! println!("{:.1}% compliant", report.compliance_percentage());
//! ```

mod comparator;


pub use comparator::{check, compare, compare_titled};

//! Contract loader: OpenAPI 3.x documents normalized into a
//! [`ContractModel`](crate::model::ContractModel).

mod build;
mod load;
#[cfg(test)]
mod tests;

pub use build::{build_contract, build_endpoints, build_schemas, ref_name, resolve_schema_ref, schema_from_value};
pub use load::{load_contract, parse_contract, DocumentFormat};

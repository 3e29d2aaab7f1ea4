//! Normalized endpoint and schema models shared by the comparator, the
//! generator and the loaders that feed them.

mod artifact;
mod issue;
mod key;
mod report;
mod types;

#[cfg(test)]
mod tests;

pub use artifact::*;
pub use issue::*;
pub use key::*;
pub use report::*;
pub use types::*;

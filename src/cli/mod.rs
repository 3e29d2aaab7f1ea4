//! # CLI Module
//!
//! Command-line surface of the `contract-enforcer` binary.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Compare a service against its contract and print a report:
//!
//! ```bash
//! contract-enforcer check --spec openapi.yaml --service services/user --format markdown
//! ```
//!
//! With `--fail-on-error` (or `[check] fail_on_error = true`) the process
//! exits with status 1 when the report contains errors.
//!
//! ### `generate`
//!
//! Preview handler stubs, contract tests and data models for every missing
//! endpoint, or append them with `--apply`:
//!
//! ```bash
//! contract-enforcer generate --spec openapi.yaml --service services/user --apply
//! ```
//!
//! ### `inspect`
//!
//! Print the implementation model found for a service:
//!
//! ```bash
//! contract-enforcer inspect --service services/user
//! ```
//!
//! Paths not given on the command line are read from `ENFORCER_SPEC` and
//! `ENFORCER_SERVICE`, then from `contract-enforcer.toml` (see
//! [`crate::config`]).

mod commands;


pub use commands::{run_cli, Cli, CommandStatus, Commands};

//! declare-rules core library.
//!
//! Builds the declarative blocking rule list for fixed-size CDN image
//! variants and writes it as JSON for a browser extension's rule engine.
//!
//! High-level modules:
//! - `builder`: Rule construction, rendering, writing and drift checks.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `error`: Shared error type.
//! - `models`: Rule records and the run report.
//! - `output`: Human/JSON report printers.
//! - `utils`: Stderr diagnostic prefixes.
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod utils;

pub use error::{Error, Result};

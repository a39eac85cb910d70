//! Command-line front end of tsr.
//!
//! `tsr generate` reads a serialized static type graph and emits reflection
//! metadata; `tsr inspect` loads that metadata into a runtime store and
//! prints the reconstructed types.

pub mod args;
pub mod driver;
pub mod reporter;
pub mod tracing_config;

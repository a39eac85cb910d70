//! Runtime type reflection for TypeScript programs.
//!
//! - [`generator`]: walks a static type graph and emits per-module type
//!   descriptions plus call-site replacements.
//! - [`runtime`]: registers emitted descriptions and reconstructs live,
//!   lazily linked [`Type`] objects on demand.
//! - [`common`]: the wire format shared by both.

pub use tsr_common as common;
pub use tsr_generator as generator;
pub use tsr_runtime as runtime;

pub use tsr_generator::{ResolvedConfig, TypeGraph, generate};
pub use tsr_runtime::{
    GenericParams, LocalMetadataStore, MetadataStore, ProcessMetadataStore, RuntimeError, Type,
    TypeId, get_type, get_type_in, load_metadata,
};

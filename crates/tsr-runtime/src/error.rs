//! Runtime failures surfaced to the caller of a reflective query.

use std::fmt;
use tsr_common::TypeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Lookup of an id that was never registered.
    UnknownTypeId(TypeId),
    /// A reflective query reached the runtime without being rewritten at
    /// compile time.
    NotTransformed,
    /// An emitted metadata batch could not be decoded.
    InvalidMetadata(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UnknownTypeId(id) => {
                write!(f, "Unknown type identifier '{id}'. Metadata not found.")
            }
            RuntimeError::NotTransformed => write!(
                f,
                "Cannot be called. Call of this function should be replaced by Type during compilation. \
                 Check that the tsr generator ran over this module."
            ),
            RuntimeError::InvalidMetadata(reason) => {
                write!(f, "Invalid reflection metadata: {reason}")
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

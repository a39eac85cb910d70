//! Generation-time failures. Any of these stops output for the module being
//! transformed; other modules are unaffected.

use crate::config::ConfigError;
use crate::oracle::TypeHandle;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A declared class/interface type has no resolvable declaration.
    MissingDeclaration { handle: TypeHandle },
    /// A reflective query or reflected generic call lacks a type argument.
    MissingTypeArgument { site: String, parameter: Option<String> },
    /// The oracle knows nothing about a handle it handed out.
    UnknownType { handle: TypeHandle },
    /// Nesting of anonymous structural types exceeded the configured depth.
    RecursionLimit { handle: TypeHandle, depth: u32 },
    Config(ConfigError),
    Middleware { name: String, message: String },
    Serialization(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::MissingDeclaration { handle } => {
                write!(f, "Unable to resolve declaration of type {handle}")
            }
            GenerationError::MissingTypeArgument { site, parameter: None } => {
                write!(f, "Type argument of reflective query at {site} is missing")
            }
            GenerationError::MissingTypeArgument {
                site,
                parameter: Some(name),
            } => write!(f, "Type argument '{name}' of reflected call at {site} is missing"),
            GenerationError::UnknownType { handle } => {
                write!(f, "Type {handle} is not part of the type graph")
            }
            GenerationError::RecursionLimit { handle, depth } => write!(
                f,
                "Type {handle} is nested too deeply to describe (limit {depth}); \
                 name the recursive part with an interface or class"
            ),
            GenerationError::Config(err) => write!(f, "{err}"),
            GenerationError::Middleware { name, message } => {
                write!(f, "Metadata middleware '{name}' failed: {message}")
            }
            GenerationError::Serialization(message) => {
                write!(f, "Failed to serialize metadata: {message}")
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for GenerationError {
    fn from(err: ConfigError) -> Self {
        GenerationError::Config(err)
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Serialization(err.to_string())
    }
}

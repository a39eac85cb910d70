//! Generator configuration.
//!
//! Options live either in the `reflection` section of a project file
//! (`tsconfig.json`-style) or in a standalone `tsr.json` holding the section
//! itself. The project root is the nearest ancestor directory containing a
//! `package.json`; its `name` prefixes every identity key.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Package name used when `package.json` has none.
pub const DEFAULT_PACKAGE_NAME: &str = "@@this";
/// File name of a standalone configuration.
pub const STANDALONE_CONFIG: &str = "tsr.json";
pub const DEFAULT_MAX_DEPTH: u32 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ProjectRootNotFound { start: PathBuf },
    Io { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
    UnknownMiddleware { name: String },
    InvalidMaxDepth,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ProjectRootNotFound { start } => write!(
                f,
                "Unable to find project root: no package.json in {} or any parent directory",
                start.display()
            ),
            ConfigError::Io { path, message } => {
                write!(f, "failed to read {}: {message}", path.display())
            }
            ConfigError::Parse { path, message } => {
                write!(f, "failed to parse {}: {message}", path.display())
            }
            ConfigError::UnknownMiddleware { name } => {
                write!(f, "unknown metadata middleware '{name}'")
            }
            ConfigError::InvalidMaxDepth => write!(f, "maxDepth must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Boolean options accept `true` as well as `"true"`, `"yes"`, `"1"`, ...
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// Raw `reflection` options as written by the user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectConfig {
    #[serde(default)]
    pub project_root: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
    /// Describe natives in place instead of registering them.
    #[serde(default, alias = "inlineNatives", deserialize_with = "deserialize_bool_or_string")]
    pub inline_leaf_types: Option<bool>,
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Built-in middlewares to run, in order, before the short-array serializer.
    #[serde(default)]
    pub middlewares: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub debug_mode: Option<bool>,
}

#[derive(Deserialize)]
struct ProjectFile {
    #[serde(default)]
    reflection: Option<ReflectConfig>,
}

#[derive(Deserialize)]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,
}

/// Options with every default applied and the project root located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub project_root: PathBuf,
    pub package_name: String,
    pub inline_leaf_types: bool,
    pub max_depth: u32,
    pub middlewares: Vec<String>,
    pub debug_mode: bool,
}

impl ResolvedConfig {
    /// Defaults for a known root, without touching the file system.
    pub fn for_root(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            inline_leaf_types: true,
            max_depth: DEFAULT_MAX_DEPTH,
            middlewares: Vec::new(),
            debug_mode: false,
        }
    }
}

impl ReflectConfig {
    pub fn parse(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let parse_err = |e: serde_json::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if path.file_name().is_some_and(|name| name == STANDALONE_CONFIG) {
            return serde_json::from_str(source).map_err(parse_err);
        }
        let project: ProjectFile = serde_json::from_str(source).map_err(parse_err)?;
        Ok(project.reflection.unwrap_or_default())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&source, path)
    }

    /// Apply defaults. Relative paths are taken from `base_dir`, which is
    /// also where project-root discovery starts.
    pub fn resolve(self, base_dir: &Path) -> Result<ResolvedConfig, ConfigError> {
        let project_root = match self.project_root.as_deref().map(str::trim) {
            Some(root) if !root.is_empty() => base_dir.join(root),
            _ => discover_project_root(base_dir).ok_or_else(|| ConfigError::ProjectRootNotFound {
                start: base_dir.to_path_buf(),
            })?,
        };

        let package_name = match self.package_name.filter(|name| !name.trim().is_empty()) {
            Some(name) => name,
            None => read_package_name(&project_root)?
                .unwrap_or_else(|| DEFAULT_PACKAGE_NAME.to_string()),
        };

        let max_depth = self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
        if max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }

        let resolved = ResolvedConfig {
            project_root,
            package_name,
            inline_leaf_types: self.inline_leaf_types.unwrap_or(true),
            max_depth,
            middlewares: self.middlewares,
            debug_mode: self.debug_mode.unwrap_or(false),
        };
        debug!(
            root = %resolved.project_root.display(),
            package = %resolved.package_name,
            "ReflectConfig::resolve"
        );
        Ok(resolved)
    }
}

/// Nearest directory at or above `start` containing a `package.json`.
pub fn discover_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join("package.json").is_file())
        .map(Path::to_path_buf)
}

fn read_package_name(root: &Path) -> Result<Option<String>, ConfigError> {
    let path = root.join("package.json");
    let Ok(source) = std::fs::read_to_string(&path) else {
        return Ok(None);
    };
    let package: PackageJson = serde_json::from_str(&source).map_err(|e| ConfigError::Parse {
        path,
        message: e.to_string(),
    })?;
    Ok(package.name.filter(|name| !name.trim().is_empty()))
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;

//! Identity keys.
//!
//! A declared type's key is `{package}/{module path}:{Name}` with the module
//! path relative to the project root, plus `<{arg keys}>` for a generic
//! instantiation, so `Box<number>` and `Box<string>` are different types.
//! A native's key is its name (plus arguments).

use crate::config::ResolvedConfig;
use crate::oracle::{DeclarationInfo, TypeHandle, TypeOracle, TypeShape};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use smallvec::SmallVec;
use std::path::Path;

/// Module path of `file` relative to `root`, with `/` separators and no
/// leading `./`.
pub fn module_path(root: &Path, file: &str) -> String {
    let path = Path::new(file);
    let relative = path.strip_prefix(root).unwrap_or(path);
    let normalized = relative.to_string_lossy().replace('\\', "/");
    normalized.trim_start_matches("./").to_string()
}

pub struct KeyBuilder<'a, O: TypeOracle + ?Sized> {
    oracle: &'a O,
    config: &'a ResolvedConfig,
    guard: RecursionGuard<TypeHandle>,
}

impl<'a, O: TypeOracle + ?Sized> KeyBuilder<'a, O> {
    pub fn new(oracle: &'a O, config: &'a ResolvedConfig) -> Self {
        Self {
            oracle,
            config,
            guard: RecursionGuard::with_profile(RecursionProfile::IdentityKey),
        }
    }

    /// Key under which `ty` is registered, or `None` when it is described
    /// in place.
    pub fn identity_key(&mut self, ty: TypeHandle) -> Option<String> {
        match self.oracle.shape(ty)? {
            TypeShape::Object => {
                let declaration = self.oracle.declaration(ty)?;
                Some(self.declared_key(ty, &declaration))
            }
            TypeShape::Native { name } if !self.config.inline_leaf_types => {
                Some(self.with_arguments(ty, name))
            }
            _ => None,
        }
    }

    pub fn declared_key(&mut self, ty: TypeHandle, declaration: &DeclarationInfo) -> String {
        let base = format!(
            "{}/{}:{}",
            self.config.package_name,
            module_path(&self.config.project_root, &declaration.file),
            declaration.name
        );
        self.with_arguments(ty, base)
    }

    /// Key of a native type, used as its full name.
    pub fn native_key(&mut self, ty: TypeHandle, name: &str) -> String {
        self.with_arguments(ty, name.to_string())
    }

    fn with_arguments(&mut self, ty: TypeHandle, mut base: String) -> String {
        let args = self.oracle.type_arguments(ty);
        if args.is_empty() {
            return base;
        }
        let keys: SmallVec<[String; 4]> = args.iter().map(|&arg| self.key_of(arg)).collect();
        base.push('<');
        base.push_str(&keys.join(","));
        base.push('>');
        base
    }

    /// Descriptive key of any type, used inside argument lists.
    fn key_of(&mut self, ty: TypeHandle) -> String {
        match self.guard.enter(ty) {
            RecursionResult::Entered => {}
            _ => return "...".to_string(),
        }
        let key = self.key_of_inner(ty);
        self.guard.leave(ty);
        key
    }

    fn key_of_inner(&mut self, ty: TypeHandle) -> String {
        let Some(shape) = self.oracle.shape(ty) else {
            return format!("?{}", ty.0);
        };
        match shape {
            TypeShape::Native { name } => self.native_key(ty, &name),
            TypeShape::Literal { value } => value.to_string(),
            TypeShape::Union { members } => self.join(&members, "|"),
            TypeShape::Intersection { members } => self.join(&members, "&"),
            TypeShape::TypeParameter { name } => name,
            TypeShape::Object => match self.oracle.declaration(ty) {
                Some(declaration) => self.declared_key(ty, &declaration),
                None => format!("?{}", ty.0),
            },
            TypeShape::Anonymous => {
                let props: Vec<String> = self
                    .oracle
                    .properties(ty)
                    .into_iter()
                    .map(|prop| format!("{}:{}", prop.name, self.key_of(prop.ty)))
                    .collect();
                format!("{{{}}}", props.join(";"))
            }
        }
    }

    fn join(&mut self, members: &[TypeHandle], separator: &str) -> String {
        let keys: SmallVec<[String; 4]> = members.iter().map(|&m| self.key_of(m)).collect();
        keys.join(separator)
    }
}

#[cfg(test)]
#[path = "../tests/identity_tests.rs"]
mod tests;

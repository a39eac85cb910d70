use colored::Colorize;
use std::fmt::Write as _;
use tsr_generator::transformer::{ModuleFailure, TransformOutcome};
use tsr_runtime::{AccessModifier, Accessor, Type, TypeId, TypeKind};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render_failures(&self, failures: &[ModuleFailure]) -> String {
        let mut out = String::new();
        for (index, failure) in failures.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_failure(failure));
        }
        out
    }

    pub fn format_failure(&self, failure: &ModuleFailure) -> String {
        let label = self.paint_error("error");
        format!("{} - {}: {}", failure.path, label, failure.error)
    }

    pub fn summary(&self, outcome: &TransformOutcome) -> String {
        let types: usize = outcome
            .artifact
            .modules
            .iter()
            .map(|module| module.registrations.types.len())
            .sum();
        let line = format!(
            "{} module(s), {} registration(s), {} failure(s)",
            outcome.artifact.modules.len(),
            types,
            outcome.failures.len()
        );
        if !self.color {
            return line;
        }
        if outcome.failures.is_empty() {
            line.green().to_string()
        } else {
            line.yellow().to_string()
        }
    }

    /// Header line plus one indented line per property.
    ///
    /// ```text
    /// #1 class @@this/src/user.ts:User
    ///   protected readonly id?: number
    /// ```
    pub fn format_type(&self, id: TypeId, ty: &Type) -> String {
        let mut out = String::new();
        let name = if ty.full_name().is_empty() {
            ty.to_string()
        } else {
            ty.full_name().to_string()
        };
        let header = format!("#{id} {} {name}", kind_label(ty));
        out.push_str(&if self.color {
            header.bold().to_string()
        } else {
            header
        });

        if let Some(base) = ty.base_type() {
            let _ = write!(out, " extends {base}");
        }
        if !ty.decorators().is_empty() {
            let names: Vec<&str> = ty.decorators().iter().map(|d| d.name.as_str()).collect();
            let _ = write!(out, " @{}", names.join(" @"));
        }

        for prop in ty.properties() {
            out.push_str("\n  ");
            match prop.access_modifier {
                AccessModifier::Private => out.push_str("private "),
                AccessModifier::Protected => out.push_str("protected "),
                AccessModifier::Public => {}
            }
            match prop.accessor {
                Accessor::Getter => out.push_str("get "),
                Accessor::Setter => out.push_str("set "),
                Accessor::None => {}
            }
            if prop.readonly {
                out.push_str("readonly ");
            }
            out.push_str(&prop.name);
            if prop.optional {
                out.push('?');
            }
            let ty_name = prop
                .ty()
                .map(|t| t.to_string())
                .unwrap_or_else(|| self.paint_dimmed("<unresolved>"));
            let _ = write!(out, ": {ty_name}");
        }
        out
    }

    fn paint_error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_dimmed(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

fn kind_label(ty: &Type) -> &'static str {
    match ty.kind() {
        TypeKind::Interface => "interface",
        TypeKind::Class => "class",
        TypeKind::Native => "native",
        TypeKind::Container if ty.is_union() => "union",
        TypeKind::Container => "intersection",
        TypeKind::LiteralValue => "literal",
    }
}

#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod tests;

//! JS-flavoured rendering of emitted modules.
//!
//! Registrations become `_tsr_set(<id>, <json>);` statements placed ahead of
//! any use; call-site replacements become expressions:
//!
//! - store lookup: `_tsr_get(<id>)`
//! - inline: `_tsr_wrap(<json>)`
//! - generic parameter: `(__genericParams__ && __genericParams__.T)`
//! - generic arguments: `{"T": <expr>, ...}`

use crate::call_site::Replacement;
use crate::transformer::EmittedModule;
use serde::de::Error as _;
use serde_json::{Map, Value};
use std::fmt::Write as _;
use tsr_common::short_array::{KEYS_FIELD, VALUES_FIELD};

pub const SET_FN: &str = "_tsr_set";
pub const GET_FN: &str = "_tsr_get";
pub const WRAP_FN: &str = "_tsr_wrap";
const GENERIC_PARAMS: &str = "__genericParams__";

/// One `_tsr_set` per registration of a pipeline output batch. Descriptions
/// are written in the form the pipeline left them (compacted or not).
pub fn render_registrations(metadata: &Value) -> Result<String, serde_json::Error> {
    let modules = metadata
        .get("modules")
        .ok_or_else(|| serde_json::Error::custom("metadata batch without modules"))?;
    let mut out = String::new();
    for module in rows(modules) {
        let Some(types) = module.get("t") else {
            continue;
        };
        for entry in rows(types) {
            let (Some(id), Some(description)) = (entry.get("i").and_then(Value::as_u64), entry.get("d"))
            else {
                return Err(serde_json::Error::custom("malformed registration entry"));
            };
            let json = serde_json::to_string(description)?;
            let _ = writeln!(out, "{SET_FN}({id}, {json});");
        }
    }
    Ok(out)
}

/// Objects of an array, decoding one level of short-array encoding.
fn rows(value: &Value) -> Vec<Map<String, Value>> {
    match value {
        Value::Array(items) => items.iter().filter_map(|item| item.as_object().cloned()).collect(),
        Value::Object(map) => {
            let (Some(Value::Array(keys)), Some(Value::Array(values))) =
                (map.get(KEYS_FIELD), map.get(VALUES_FIELD))
            else {
                return Vec::new();
            };
            values
                .iter()
                .filter_map(Value::as_array)
                .map(|row| {
                    keys.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .zip(row.iter().cloned())
                        .collect()
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

pub fn render_replacement(replacement: &Replacement) -> Result<String, serde_json::Error> {
    Ok(match replacement {
        Replacement::StoreLookup { id } => format!("{GET_FN}({id})"),
        Replacement::Inline { description } => {
            format!("{WRAP_FN}({})", serde_json::to_string(description)?)
        }
        Replacement::GenericParameter { name } => {
            format!("({GENERIC_PARAMS} && {GENERIC_PARAMS}.{name})")
        }
        Replacement::GenericArguments { args } => {
            let mut fields = Vec::with_capacity(args.len());
            for arg in args {
                let key = serde_json::to_string(&arg.name)?;
                fields.push(format!("{key}: {}", render_replacement(&arg.value)?));
            }
            format!("{{{}}}", fields.join(", "))
        }
    })
}

/// Whole module: registrations of the pipeline output, then one commented
/// line per call site.
pub fn render_module(module: &EmittedModule) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    let _ = writeln!(out, "// {}", module.path);
    out.push_str(&render_registrations(&module.metadata)?);
    for site in &module.call_sites {
        let _ = writeln!(out, "/* {} */ {};", site.site, render_replacement(&site.replacement)?);
    }
    for function in &module.traced_functions {
        let _ = writeln!(out, "/* trace */ {function};");
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/printer_tests.rs"]
mod tests;

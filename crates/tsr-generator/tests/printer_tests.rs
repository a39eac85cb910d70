use super::*;
use crate::call_site::{GenericArgument, SiteReplacement};
use crate::middleware::{MetadataPipeline, StripAnnotations};
use tsr_common::{
    MetadataSource, ModuleMetadata, PropertyDescription, TypeDescription, TypeId, TypeKind,
    TypeRef, short_array,
};

#[test]
fn test_render_store_lookup_and_inline() {
    assert_eq!(
        render_replacement(&Replacement::StoreLookup { id: TypeId(7) }).unwrap(),
        "_tsr_get(7)"
    );

    let inline = Replacement::Inline {
        description: TypeDescription::native("number"),
    };
    let rendered = render_replacement(&inline).unwrap();
    assert!(rendered.starts_with("_tsr_wrap({"));
    assert!(rendered.contains(r#""n":"number""#));
}

#[test]
fn test_render_generic_forms() {
    assert_eq!(
        render_replacement(&Replacement::GenericParameter { name: "T".into() }).unwrap(),
        "(__genericParams__ && __genericParams__.T)"
    );

    let args = Replacement::GenericArguments {
        args: vec![
            GenericArgument {
                name: "A".into(),
                value: Replacement::StoreLookup { id: TypeId(1) },
            },
            GenericArgument {
                name: "B".into(),
                value: Replacement::GenericParameter { name: "U".into() },
            },
        ],
    };
    assert_eq!(
        render_replacement(&args).unwrap(),
        r#"{"A": _tsr_get(1), "B": (__genericParams__ && __genericParams__.U)}"#
    );
}

fn emitted(registrations: ModuleMetadata, pipeline: &MetadataPipeline) -> EmittedModule {
    let source = MetadataSource {
        modules: vec![registrations.clone()],
    };
    EmittedModule {
        path: "src/main.ts".into(),
        metadata: pipeline.run("src/main.ts", &source).unwrap(),
        registrations,
        call_sites: vec![SiteReplacement {
            site: "src/main.ts:3:1".into(),
            replacement: Replacement::StoreLookup { id: TypeId(1) },
        }],
        traced_functions: vec!["handler".into()],
    }
}

#[test]
fn test_render_module() {
    let mut registrations = ModuleMetadata::new("src/main.ts");
    registrations.push(
        TypeId(1),
        TypeDescription::new(TypeKind::Interface, "Point", "@@this/src/point.ts:Point"),
    );
    let module = emitted(registrations, &MetadataPipeline::new());

    let rendered = render_module(&module).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "// src/main.ts");
    assert!(lines[1].starts_with("_tsr_set(1, {"));
    assert!(lines[1].ends_with("});"));
    assert_eq!(lines[2], "/* src/main.ts:3:1 */ _tsr_get(1);");
    assert_eq!(lines[3], "/* trace */ handler;");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_registrations_come_from_pipeline_output() {
    let mut registrations = ModuleMetadata::new("src/main.ts");
    registrations.push(
        TypeId(1),
        TypeDescription::new(TypeKind::Class, "User", "@@this/src/user.ts:User")
            .with_decorator("secret", None)
            .with_property(PropertyDescription::new(
                "id",
                TypeRef::inline(TypeDescription::native("number")),
            ))
            .with_property(PropertyDescription::new(
                "name",
                TypeRef::inline(TypeDescription::native("string")),
            )),
    );
    registrations.push(
        TypeId(2),
        TypeDescription::new(TypeKind::Interface, "Named", "@@this/src/user.ts:Named"),
    );
    let module = emitted(registrations, &MetadataPipeline::new().with(StripAnnotations));

    let rendered = render_registrations(&module.metadata).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("_tsr_set(1, {"));
    assert!(lines[1].starts_with("_tsr_set(2, {"));
    assert!(!rendered.contains("secret"));
    // Both properties share their keys, so the serializer compacted them.
    assert!(lines[0].contains(short_array::KEYS_FIELD));
    assert!(render_module(&module).unwrap().contains(&rendered));
}

#[test]
fn test_render_registrations_rejects_foreign_shape() {
    assert!(render_registrations(&serde_json::json!({ "module": "src/a.ts" })).is_err());
}

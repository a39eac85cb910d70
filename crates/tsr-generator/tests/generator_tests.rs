use super::*;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::graph::{PropertyAccess, PropertyAccessor, PropertyNode, TypeGraph};
use crate::oracle::{ConstructorExport, ParameterSymbol};
use tsr_common::{LiteralValue, TypeId};

fn config() -> ResolvedConfig {
    ResolvedConfig::for_root("/project")
}

fn describe(
    graph: &TypeGraph,
    config: &ResolvedConfig,
    ty: TypeHandle,
) -> (Result<TypeRef, GenerationError>, GenerationContext) {
    let mut ctx = GenerationContext::new();
    let result = DescriptionGenerator::new(graph, config, &mut ctx).describe(ty);
    (result, ctx)
}

fn prop_type<'d>(description: &'d TypeDescription, name: &str) -> &'d TypeRef {
    &description
        .properties
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("property {name} missing"))
        .ty
}

#[test]
fn test_self_referencing_interface() {
    let mut graph = TypeGraph::new();
    let number = graph.native("number");
    let node = graph.interface("Node", "src/node.ts");
    graph.add_property(node, PropertyNode::new("value", number));
    graph.add_property(node, PropertyNode::new("left", node));
    graph.add_property(node, PropertyNode::new("right", node));

    let config = config();
    let (result, ctx) = describe(&graph, &config, node);
    assert_eq!(result.expect("describes"), TypeRef::Id(TypeId(1)));
    assert_eq!(ctx.len(), 1);

    let description = ctx.description(TypeId(1)).expect("registered");
    assert_eq!(description.full_name, "@@this/src/node.ts:Node");
    assert_eq!(description.kind, TypeKind::Interface);
    assert_eq!(prop_type(description, "left"), &TypeRef::lazy(TypeId(1)));
    assert_eq!(prop_type(description, "right"), &TypeRef::lazy(TypeId(1)));
    assert_eq!(
        prop_type(description, "value"),
        &TypeRef::inline(TypeDescription::native("number"))
    );
}

#[test]
fn test_cross_type_cycle_through_array_arguments() {
    let mut graph = TypeGraph::new();
    let array = graph.native("Array");
    let settings = graph.class("Settings", "/project/src/model.ts");
    let user = graph.class("User", "/project/src/model.ts");
    let users = graph.instantiate(array, vec![user]);
    let settings_list = graph.instantiate(array, vec![settings]);
    graph.add_property(settings, PropertyNode::new("users", users));
    graph.add_property(user, PropertyNode::new("settings", settings_list));

    let config = config();
    let (result, ctx) = describe(&graph, &config, settings);
    assert_eq!(result.expect("describes"), TypeRef::Id(TypeId(1)));

    // User completes first: it is a non-cyclic dependency of Settings.
    assert_eq!(ctx.order().collect::<Vec<_>>(), vec![TypeId(2), TypeId(1)]);

    let user_description = ctx.description(TypeId(2)).expect("user");
    assert_eq!(user_description.full_name, "@@this/src/model.ts:User");
    match prop_type(user_description, "settings") {
        TypeRef::Inline(array) => {
            assert_eq!(array.full_name, "Array<@@this/src/model.ts:Settings>");
            assert_eq!(array.type_arguments, vec![TypeRef::lazy(TypeId(1))]);
        }
        other => panic!("expected inline Array, got {other:?}"),
    }

    let settings_description = ctx.description(TypeId(1)).expect("settings");
    match prop_type(settings_description, "users") {
        TypeRef::Inline(array) => assert_eq!(array.type_arguments, vec![TypeRef::Id(TypeId(2))]),
        other => panic!("expected inline Array, got {other:?}"),
    }
}

#[test]
fn test_generic_instantiations_are_distinct() {
    let mut graph = TypeGraph::new();
    let number = graph.native("number");
    let string = graph.native("string");
    let generic_box = graph.class("Box", "src/box.ts");
    let param = graph.type_parameter("T");
    graph.add_property(generic_box, PropertyNode::new("value", param));
    let box_number = graph.instantiate(generic_box, vec![number]);
    let box_string = graph.instantiate(generic_box, vec![string]);

    let config = config();
    let mut ctx = GenerationContext::new();
    let mut generator = DescriptionGenerator::new(&graph, &config, &mut ctx);
    let first = generator.describe(box_number).expect("Box<number>");
    let second = generator.describe(box_string).expect("Box<string>");
    let again = generator.describe(box_number).expect("Box<number> again");
    drop(generator);

    assert_eq!(first, TypeRef::Id(TypeId(1)));
    assert_eq!(second, TypeRef::Id(TypeId(2)));
    assert_eq!(again, TypeRef::Id(TypeId(1)));
    assert_eq!(
        ctx.description(TypeId(1)).map(|d| d.full_name.as_str()),
        Some("@@this/src/box.ts:Box<number>")
    );
    assert_eq!(
        ctx.description(TypeId(2)).map(|d| d.full_name.as_str()),
        Some("@@this/src/box.ts:Box<string>")
    );
    assert_eq!(
        ctx.description(TypeId(2)).map(|d| d.type_arguments.clone()),
        Some(vec![TypeRef::inline(TypeDescription::native("string"))])
    );
}

#[test]
fn test_type_parameter_member_is_named_native() {
    let mut graph = TypeGraph::new();
    let generic_box = graph.class("Box", "src/box.ts");
    let param = graph.type_parameter("T");
    graph.add_property(generic_box, PropertyNode::new("value", param));

    let config = config();
    let (result, ctx) = describe(&graph, &config, generic_box);
    let id = result.expect("describes").id().expect("keyed");
    let description = ctx.description(id).expect("registered");
    assert_eq!(
        prop_type(description, "value"),
        &TypeRef::inline(TypeDescription::native("T"))
    );
}

#[test]
fn test_class_details() {
    let mut graph = TypeGraph::new();
    let string = graph.native("string");
    let number = graph.native("number");
    let entity = graph.class("Entity", "src/entity.ts");
    let named = graph.interface("Named", "src/entity.ts");
    let person = graph.class("Person", "src/person.ts");

    graph.set_base_type(person, entity);
    graph.set_interface(person, named);
    graph.add_constructor(
        person,
        vec![ParameterSymbol {
            name: "name".into(),
            ty: string,
        }],
    );
    graph.add_attribute(
        person,
        crate::oracle::AttributeInfo {
            name: "model".into(),
            full_name: Some("@@this/src/decorators.ts:model".into()),
        },
    );
    graph.set_constructor_export(
        person,
        ConstructorExport {
            export_name: "Person".into(),
            source_path: "src/person.ts".into(),
            out_path: Some("dist/person.js".into()),
        },
    );
    let mut age = PropertyNode::new("age", number);
    age.optional = true;
    age.readonly = true;
    age.access = PropertyAccess::Protected;
    age.accessor = PropertyAccessor::Getter;
    graph.add_property(person, age);

    let config = config();
    let (result, ctx) = describe(&graph, &config, person);
    let id = result.expect("describes").id().expect("keyed");
    let description = ctx.description(id).expect("registered");

    assert_eq!(description.kind, TypeKind::Class);
    assert_eq!(description.constructors.len(), 1);
    assert_eq!(description.constructors[0].params[0].name, "name");
    assert_eq!(description.decorators[0].name, "model");
    assert!(matches!(description.base_type, Some(TypeRef::Id(_))));
    assert!(matches!(description.interface, Some(TypeRef::Id(_))));

    let ctor = description.constructor_import.as_ref().expect("ctor locator");
    assert_eq!(ctor.export_name, "Person");
    assert_eq!(ctor.name, "Person");
    assert_eq!(ctor.out_path.as_deref(), Some("dist/person.js"));

    let age = &description.properties[0];
    assert!(age.optional);
    assert!(age.readonly);
    assert_eq!(age.access_modifier, AccessModifier::Protected);
    assert_eq!(age.accessor, Accessor::Getter);
}

#[test]
fn test_union_of_literals_is_inline() {
    let mut graph = TypeGraph::new();
    let on = graph.literal(LiteralValue::String("on".into()));
    let off = graph.literal(LiteralValue::String("off".into()));
    let state = graph.union(vec![on, off]);

    let config = config();
    let (result, ctx) = describe(&graph, &config, state);
    assert!(ctx.is_empty());
    match result.expect("describes") {
        TypeRef::Inline(description) => {
            assert!(description.union);
            assert_eq!(description.types.len(), 2);
        }
        other => panic!("expected inline union, got {other:?}"),
    }
}

#[test]
fn test_missing_declaration_rolls_back() {
    let mut graph = TypeGraph::new();
    let broken = graph.add(TypeShape::Object);
    let a = graph.interface("A", "src/a.ts");
    let b = graph.interface("B", "src/b.ts");
    graph.add_property(a, PropertyNode::new("b", b));
    graph.add_property(b, PropertyNode::new("a", a));
    graph.add_property(a, PropertyNode::new("broken", broken));

    let config = config();
    let (result, ctx) = describe(&graph, &config, a);
    assert_eq!(
        result.expect_err("no declaration"),
        GenerationError::MissingDeclaration { handle: broken }
    );
    // B was completed while A was in progress and references it.
    assert!(ctx.is_empty());
}

#[test]
fn test_unknown_handle() {
    let graph = TypeGraph::new();
    let config = config();
    let (result, _) = describe(&graph, &config, TypeHandle(42));
    assert_eq!(
        result.expect_err("not in graph"),
        GenerationError::UnknownType {
            handle: TypeHandle(42)
        }
    );
}

#[test]
fn test_anonymous_nesting_is_depth_limited() {
    let mut graph = TypeGraph::new();
    let number = graph.native("number");
    let mut inner = number;
    for _ in 0..5 {
        let outer = graph.anonymous();
        graph.add_property(outer, PropertyNode::new("next", inner));
        inner = outer;
    }

    let mut config = config();
    config.max_depth = 3;
    let (result, ctx) = describe(&graph, &config, inner);
    assert!(matches!(
        result,
        Err(GenerationError::RecursionLimit { depth: 3, .. })
    ));
    assert!(ctx.is_empty());

    config.max_depth = 16;
    let (result, _) = describe(&graph, &config, inner);
    assert!(matches!(result, Ok(TypeRef::Inline(_))));
}

#[test]
fn test_anonymous_cycle_is_reported() {
    let mut graph = TypeGraph::new();
    let anon = graph.anonymous();
    graph.add_property(anon, PropertyNode::new("me", anon));

    let config = config();
    let (result, _) = describe(&graph, &config, anon);
    assert!(matches!(result, Err(GenerationError::RecursionLimit { .. })));
}

#[test]
fn test_registered_natives_when_not_inlined() {
    let mut graph = TypeGraph::new();
    let number = graph.native("number");
    let point = graph.interface("Point", "src/point.ts");
    graph.add_property(point, PropertyNode::new("x", number));
    graph.add_property(point, PropertyNode::new("y", number));

    let mut config = config();
    config.inline_leaf_types = false;
    let (result, ctx) = describe(&graph, &config, point);
    assert_eq!(result.expect("describes"), TypeRef::Id(TypeId(1)));

    let description = ctx.description(TypeId(1)).expect("point");
    assert_eq!(prop_type(description, "x"), &TypeRef::Id(TypeId(2)));
    assert_eq!(prop_type(description, "y"), &TypeRef::Id(TypeId(2)));
    assert_eq!(
        ctx.description(TypeId(2)).map(|d| d.full_name.as_str()),
        Some("number")
    );
}

#[test]
fn test_nullable_self_reference_ends_at_lazy() {
    let mut graph = TypeGraph::new();
    let null = graph.native("null");
    let node = graph.interface("Node", "src/node.ts");
    let maybe_node = graph.union(vec![node, null]);
    graph.add_property(node, PropertyNode::new("next", maybe_node));

    let config = config();
    let (result, ctx) = describe(&graph, &config, maybe_node);
    assert_eq!(
        result.expect("describes"),
        TypeRef::inline(TypeDescription::union(vec![
            TypeRef::Id(TypeId(1)),
            TypeRef::inline(TypeDescription::native("null")),
        ]))
    );
    let description = ctx.description(TypeId(1)).expect("node");
    assert_eq!(
        prop_type(description, "next"),
        &TypeRef::inline(TypeDescription::union(vec![
            TypeRef::lazy(TypeId(1)),
            TypeRef::inline(TypeDescription::native("null")),
        ]))
    );
}

#[test]
fn test_array_of_self_ends_at_lazy() {
    let mut graph = TypeGraph::new();
    let array = graph.native("Array");
    let tree = graph.interface("Tree", "src/tree.ts");
    let children = graph.instantiate(array, vec![tree]);
    graph.add_property(tree, PropertyNode::new("children", children));

    let config = config();
    let (result, ctx) = describe(&graph, &config, children);
    let TypeRef::Inline(outer) = result.expect("describes") else {
        panic!("expected inline Array");
    };
    assert_eq!(outer.type_arguments, vec![TypeRef::Id(TypeId(1))]);

    let description = ctx.description(TypeId(1)).expect("tree");
    let TypeRef::Inline(inner) = prop_type(description, "children") else {
        panic!("expected inline Array");
    };
    assert_eq!(inner.type_arguments, vec![TypeRef::lazy(TypeId(1))]);
}

#[test]
fn test_long_chain_of_declared_types_is_not_depth_limited() {
    let mut graph = TypeGraph::new();
    let null = graph.native("null");
    let count = DEFAULT_MAX_DEPTH as usize + 6;
    let links: Vec<TypeHandle> = (0..count)
        .map(|i| graph.interface(&format!("Link{i}"), "src/chain.ts"))
        .collect();
    for pair in links.windows(2) {
        let next = graph.union(vec![pair[1], null]);
        graph.add_property(pair[0], PropertyNode::new("next", next));
    }

    let config = config();
    let (result, ctx) = describe(&graph, &config, links[0]);
    assert_eq!(result.expect("describes"), TypeRef::Id(TypeId(1)));
    assert_eq!(ctx.len(), count);
}

#[test]
fn test_instantiated_member_uses_bound_argument() {
    let mut graph = TypeGraph::new();
    let number = graph.native("number");
    let generic_box = graph.class("Box", "src/box.ts");
    let param = graph.add_type_parameter(generic_box, "T");
    graph.add_property(generic_box, PropertyNode::new("value", param));
    let box_number = graph.instantiate(generic_box, vec![number]);

    let config = config();
    let (result, ctx) = describe(&graph, &config, box_number);
    let id = result.expect("describes").id().expect("keyed");
    let description = ctx.description(id).expect("registered");
    assert_eq!(description.full_name, "@@this/src/box.ts:Box<number>");
    assert_eq!(
        prop_type(description, "value"),
        &TypeRef::inline(TypeDescription::native("number"))
    );
}

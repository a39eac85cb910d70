use super::*;
use crate::constructors::register_constructor;
use crate::store::LocalMetadataStore;
use tsr_common::{ParameterDescription, PropertyDescription, TypeId};

fn native(name: &str) -> TypeRef {
    TypeRef::inline(TypeDescription::native(name))
}

#[test]
fn test_cyclic_property_resolves_to_same_instance() {
    let store = LocalMetadataStore::new();
    let node = TypeDescription::new(TypeKind::Interface, "Node", "@@this/node.ts:Node")
        .with_property(PropertyDescription::new("value", native("number")))
        .with_property(PropertyDescription::new("left", TypeRef::lazy(TypeId(1))))
        .with_property(PropertyDescription::new("right", TypeRef::lazy(TypeId(1))));

    let ty = store.set(TypeId(1), &node);
    let left = ty.property("left").and_then(PropertyInfo::ty).expect("left resolves");
    let right = ty.property("right").and_then(PropertyInfo::ty).expect("right resolves");

    assert!(Arc::ptr_eq(&left, &ty));
    assert!(Arc::ptr_eq(&right, &ty));
    assert_eq!(
        ty.property("value").and_then(PropertyInfo::ty).map(|t| t.name().to_string()),
        Some("number".to_string())
    );
}

#[test]
fn test_cross_type_cycle_through_type_arguments() {
    // Settings { users: Array<User> }, User { settings: Array<Settings> }
    let store = LocalMetadataStore::new();
    let settings = TypeDescription::new(TypeKind::Class, "Settings", "@@this/a.ts:Settings").with_property(
        PropertyDescription::new(
            "users",
            TypeRef::inline(TypeDescription::native("Array").with_type_arguments(vec![TypeRef::lazy(TypeId(2))])),
        ),
    );
    let user = TypeDescription::new(TypeKind::Class, "User", "@@this/a.ts:User").with_property(
        PropertyDescription::new(
            "settings",
            TypeRef::inline(TypeDescription::native("Array").with_type_arguments(vec![TypeRef::Id(TypeId(1))])),
        ),
    );

    let a = store.set(TypeId(1), &settings);
    let b = store.set(TypeId(2), &user);

    let users = a.property("users").and_then(PropertyInfo::ty).expect("users");
    let user_ty = users.type_arguments().into_iter().next().expect("Array<User>");
    assert!(Arc::ptr_eq(&user_ty, &b));

    let back = user_ty
        .property("settings")
        .and_then(PropertyInfo::ty)
        .and_then(|array| array.type_arguments().into_iter().next())
        .expect("Array<Settings>");
    assert!(Arc::ptr_eq(&back, &a));
}

#[test]
fn test_constructors_only_for_classes() {
    let store = LocalMetadataStore::new();
    let params = vec![ParameterDescription {
        name: "name".into(),
        ty: native("string"),
    }];

    let class = store.wrap(
        &TypeDescription::new(TypeKind::Class, "Person", "@@this/p.ts:Person").with_constructor(params.clone()),
    );
    let ctors = class.constructors().expect("class has constructors");
    assert_eq!(ctors.len(), 1);
    assert_eq!(ctors[0].parameters[0].name, "name");
    assert_eq!(
        ctors[0].parameters[0].ty().map(|t| t.full_name().to_string()),
        Some("string".to_string())
    );

    let iface = store.wrap(
        &TypeDescription::new(TypeKind::Interface, "IPerson", "@@this/p.ts:IPerson").with_constructor(params),
    );
    assert!(iface.constructors().is_none());
}

#[test]
fn test_property_details_and_decorators() {
    let store = LocalMetadataStore::new();
    let mut prop = PropertyDescription::new("id", native("number"));
    prop.optional = true;
    prop.readonly = true;
    prop.access_modifier = AccessModifier::Protected;
    prop.accessor = Accessor::Getter;
    prop.decorators.push(DecoratorDescription {
        name: "key".into(),
        full_name: Some("@@this/decorators.ts:key".into()),
    });

    let ty = store.wrap(
        &TypeDescription::new(TypeKind::Class, "Entity", "@@this/e.ts:Entity")
            .with_property(prop)
            .with_decorator("entity", None),
    );

    let id = ty.property("id").expect("id property");
    assert!(id.optional);
    assert!(id.readonly);
    assert_eq!(id.access_modifier, AccessModifier::Protected);
    assert_eq!(id.accessor, Accessor::Getter);
    assert_eq!(id.decorators[0].name, "key");
    assert_eq!(ty.decorators()[0].name, "entity");
    assert!(ty.property("missing").is_none());
}

#[test]
fn test_union_and_literal_members() {
    let store = LocalMetadataStore::new();
    let ty = store.wrap(&TypeDescription::union(vec![
        TypeRef::inline(TypeDescription::literal(LiteralValue::String("on".into()))),
        TypeRef::inline(TypeDescription::literal(LiteralValue::String("off".into()))),
        native("undefined"),
    ]));

    assert!(ty.is_union());
    assert!(!ty.is_intersection());
    let members = ty.types();
    assert_eq!(members.len(), 3);
    assert!(members[0].is_literal());
    assert_eq!(members[0].literal_value(), Some(&LiteralValue::String("on".into())));
    assert!(members[2].is_native());
    assert_eq!(ty.to_string(), "<union>");
    assert_eq!(members[1].to_string(), "\"off\"");
}

#[test]
fn test_identity_is_full_name() {
    let store = LocalMetadataStore::new();
    let description = TypeDescription::new(TypeKind::Interface, "A", "@@this/a.ts:A");
    let first = store.wrap(&description);
    let second = store.wrap(&description);
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(first.is(&second));

    let other = store.wrap(&TypeDescription::new(TypeKind::Interface, "A", "@@this/b.ts:A"));
    assert!(!first.is(&other));

    // Anonymous types are only equal to themselves.
    let anon = store.wrap(&TypeDescription::new(TypeKind::Interface, "", ""));
    let anon_again = store.wrap(&TypeDescription::new(TypeKind::Interface, "", ""));
    assert!(anon.is(&anon));
    assert!(!anon.is(&anon_again));
}

#[test]
fn test_base_type_chain() {
    let store = LocalMetadataStore::new();
    let animal = store.set(TypeId(10), &TypeDescription::new(TypeKind::Class, "Animal", "@@this/z.ts:Animal"));
    store.set(
        TypeId(11),
        &TypeDescription::new(TypeKind::Class, "Dog", "@@this/z.ts:Dog").with_base_type(TypeRef::Id(TypeId(10))),
    );
    let puppy = store.set(
        TypeId(12),
        &TypeDescription::new(TypeKind::Class, "Puppy", "@@this/z.ts:Puppy")
            .with_base_type(TypeRef::Id(TypeId(11)))
            .with_interface(TypeRef::inline(TypeDescription::new(
                TypeKind::Interface,
                "Cute",
                "@@this/z.ts:Cute",
            ))),
    );

    assert_eq!(puppy.base_type().map(|t| t.name().to_string()), Some("Dog".to_string()));
    assert!(puppy.is_derived_from(&animal));
    assert!(!animal.is_derived_from(&puppy));
    assert_eq!(puppy.interface().map(|t| t.name().to_string()), Some("Cute".to_string()));
}

#[test]
fn test_registered_constructor_is_exposed_for_classes() {
    #[derive(Debug, PartialEq)]
    struct Widget {
        size: u32,
    }

    register_constructor("@@this/widget.ts:Widget", || Widget { size: 3 });

    let store = LocalMetadataStore::new();
    let class = store.wrap(&TypeDescription::new(TypeKind::Class, "Widget", "@@this/widget.ts:Widget"));
    let ctor = class.ctor().expect("constructor registered");
    let instance = ctor();
    assert_eq!(instance.downcast_ref::<Widget>(), Some(&Widget { size: 3 }));

    let iface = store.wrap(&TypeDescription::new(TypeKind::Interface, "Widget", "@@this/widget.ts:Widget"));
    assert!(iface.ctor().is_none());

    let unregistered = store.wrap(&TypeDescription::new(TypeKind::Class, "Gadget", "@@this/widget.ts:Gadget"));
    assert!(unregistered.ctor().is_none());
}

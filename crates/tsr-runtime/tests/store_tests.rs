use super::*;
use crate::entry::{TypeRequest, get_type, get_type_in};
use tsr_common::TypeKind;

fn interface(name: &str) -> TypeDescription {
    TypeDescription::new(TypeKind::Interface, name, format!("@@this/store.ts:{name}"))
}

#[test]
fn test_get_never_constructs() {
    let store = LocalMetadataStore::new();
    assert!(store.get(TypeId(1)).is_none());
    assert!(store.is_empty());
}

#[test]
fn test_set_is_idempotent_per_id() {
    let store = LocalMetadataStore::new();
    let first = store.set(TypeId(1), &interface("A"));
    let second = store.set(TypeId(1), &interface("A"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(store.len(), 1);

    // A conflicting description for a bound id does not replace it.
    let third = store.set(TypeId(1), &interface("B"));
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(third.name(), "A");
}

#[test]
fn test_same_identity_under_two_ids_is_one_type() {
    let store = LocalMetadataStore::new();
    let first = store.set(TypeId(3), &interface("Shared"));
    let second = store.set(TypeId(40), &interface("Shared"));
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&store.get(TypeId(40)).expect("aliased"), &first));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_anonymous_descriptions_are_not_deduplicated() {
    let store = LocalMetadataStore::new();
    let anon = TypeDescription::new(TypeKind::Interface, "", "");
    let first = store.set(TypeId(1), &anon);
    let second = store.set(TypeId(2), &anon);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_resolve_unknown_id() {
    let store = LocalMetadataStore::new();
    let err = store.resolve(TypeId(77)).expect_err("not registered");
    assert_eq!(err, RuntimeError::UnknownTypeId(TypeId(77)));
    assert_eq!(err.to_string(), "Unknown type identifier '77'. Metadata not found.");
}

#[test]
fn test_lazy_accessor_before_set() {
    let store = LocalMetadataStore::new();
    let thunk = store.get_lazy(TypeId(5));
    assert!(thunk().is_none());
    let ty = store.set(TypeId(5), &interface("Later"));
    assert!(Arc::ptr_eq(&thunk().expect("registered now"), &ty));
}

#[test]
fn test_local_stores_are_isolated() {
    let a = LocalMetadataStore::new();
    let b = LocalMetadataStore::new();
    a.set(TypeId(1), &interface("OnlyInA"));
    assert!(b.get(TypeId(1)).is_none());

    // Clones share the table.
    let a2 = a.clone();
    assert!(a2.get(TypeId(1)).is_some());
}

#[test]
fn test_process_handles_share_one_table() {
    let first = ProcessMetadataStore::initiate();
    let second = ProcessMetadataStore::initiate();
    assert!(ProcessMetadataStore::is_initiated());

    let id = TypeId(910_001);
    let ty = first.set(id, &interface("ProcessShared"));
    assert!(Arc::ptr_eq(&second.get(id).expect("visible through second handle"), &ty));
    assert!(second.get_lazy(id)().is_some());
}

#[test]
fn test_select_store_takes_first_match() {
    fn none() -> Option<Arc<dyn MetadataStore>> {
        None
    }
    fn local() -> Option<Arc<dyn MetadataStore>> {
        Some(Arc::new(LocalMetadataStore::new()))
    }
    fn process() -> Option<Arc<dyn MetadataStore>> {
        Some(Arc::new(ProcessMetadataStore::initiate()))
    }

    let selected = select_store(&[none, local, process]).expect("one detector matches");
    assert_eq!(selected.name(), "local");
    assert!(select_store(&[none]).is_none());
}

#[test]
fn test_global_store_is_selected_once() {
    let first = global_store();
    let second = global_store();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_get_type_requests() {
    let store = LocalMetadataStore::new();

    let registered = get_type_in(
        &store,
        TypeRequest::Description {
            description: interface("Registered"),
            id: Some(TypeId(8)),
        },
    )
    .expect("description with id");
    assert!(Arc::ptr_eq(&get_type_in(&store, TypeId(8)).expect("by id"), &registered));

    let inline = get_type_in(&store, TypeDescription::native("number")).expect("inline");
    assert!(inline.is_native());
    assert_eq!(store.len(), 1);

    assert_eq!(
        get_type_in(&store, TypeId(9)).expect_err("unknown"),
        RuntimeError::UnknownTypeId(TypeId(9))
    );
}

#[test]
fn test_unprocessed_request_fails() {
    let err = get_type(TypeRequest::Unprocessed).expect_err("never rewritten");
    assert_eq!(err, RuntimeError::NotTransformed);
}

#[test]
fn test_get_type_against_global_store() {
    let id = TypeId(910_100);
    let description = TypeDescription::new(TypeKind::Class, "Global", "@@this/global.ts:Global");
    let ty = get_type(TypeRequest::Description {
        description,
        id: Some(id),
    })
    .expect("registered globally");
    assert!(Arc::ptr_eq(&get_type(id).expect("lookup"), &ty));
}

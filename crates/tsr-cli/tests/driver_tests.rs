use super::*;
use std::fs;
use tsr_generator::graph::{CallSite, PropertyNode, SourceModule};

fn write_project(dir: &Path) {
    fs::write(dir.join("package.json"), r#"{ "name": "shop" }"#).unwrap();

    let mut graph = TypeGraph::new();
    let number = graph.native("number");
    let node = graph.class("Node", "src/node.ts");
    graph.add_property(node, PropertyNode::new("value", number));
    graph.add_property(node, PropertyNode::new("next", node));
    graph.add_module(SourceModule::new("src/main.ts").with_call_site(CallSite::GetType {
        site: "src/main.ts:1:1".into(),
        type_argument: Some(node),
    }));
    graph.add_module(SourceModule::new("src/broken.ts").with_call_site(CallSite::GetType {
        site: "src/broken.ts:1:1".into(),
        type_argument: None,
    }));
    fs::write(dir.join("graph.json"), graph.to_json().unwrap()).unwrap();
}

fn generate_args(emit: Emit, out: Option<&str>) -> GenerateArgs {
    GenerateArgs {
        graph: PathBuf::from("graph.json"),
        project: None,
        out: out.map(PathBuf::from),
        emit,
    }
}

#[test]
fn test_resolve_config_discovers_package() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("package.json"), r#"{ "name": "shop" }"#).unwrap();
    let config = resolve_config(None, dir.path()).unwrap();
    assert_eq!(config.package_name, "shop");
    assert_eq!(config.project_root, dir.path());
}

#[test]
fn test_resolve_config_from_project_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("package.json"), r#"{ "name": "shop" }"#).unwrap();
    fs::write(
        dir.path().join("tsconfig.json"),
        r#"{ "reflection": { "packageName": "custom", "inlineLeafTypes": "false" } }"#,
    )
    .unwrap();

    let config = resolve_config(Some(Path::new(".")), dir.path()).unwrap();
    assert_eq!(config.package_name, "custom");
    assert!(!config.inline_leaf_types);
}

#[test]
fn test_resolve_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = resolve_config(Some(Path::new("nope.json")), dir.path()).unwrap_err();
    assert!(err.to_string().contains("project config not found"));
}

#[test]
fn test_generate_json_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let report = run_generate(&generate_args(Emit::Json, Some("out.json")), dir.path()).unwrap();
    assert_eq!(report.outcome.artifact.package, "shop");
    assert_eq!(report.outcome.artifact.modules.len(), 1);
    assert_eq!(report.outcome.failures.len(), 1);
    assert_eq!(report.outcome.failures[0].path, "src/broken.ts");

    let written = fs::read_to_string(dir.path().join("out.json")).unwrap();
    assert_eq!(written, report.output);
    let artifact: GenerationArtifact = serde_json::from_str(&written).unwrap();
    assert_eq!(artifact.modules[0].path, "src/main.ts");
}

#[test]
fn test_generate_js_statements() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let report = run_generate(&generate_args(Emit::Js, None), dir.path()).unwrap();
    assert!(report.output.contains("_tsr_set(1, {"));
    assert!(report.output.contains("/* src/main.ts:1:1 */ _tsr_get(1);"));
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn test_inspect_reconstructs_cycle() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    run_generate(&generate_args(Emit::Json, Some("out.json")), dir.path()).unwrap();

    let args = InspectArgs {
        metadata: PathBuf::from("out.json"),
        id: None,
    };
    let report = run_inspect(&args, dir.path()).unwrap();
    assert_eq!(report.store.len(), 1);
    assert_eq!(report.types.len(), 1);
    let node = &report.types[0].ty;
    assert_eq!(node.full_name(), "shop/src/node.ts:Node");
    let next = node.property("next").and_then(|p| p.ty()).unwrap();
    assert!(Arc::ptr_eq(&next, node));
}

#[test]
fn test_inspect_unknown_id() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    run_generate(&generate_args(Emit::Json, Some("out.json")), dir.path()).unwrap();

    let args = InspectArgs {
        metadata: PathBuf::from("out.json"),
        id: Some(99),
    };
    let err = run_inspect(&args, dir.path()).err().unwrap();
    assert!(err.to_string().contains("Unknown type identifier '99'"));
}

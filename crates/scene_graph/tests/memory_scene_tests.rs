//! Integration tests for scene_graph's in-memory scene

use scene_graph::prelude::*;
use scene_graph::scene_math::Vec3;
use std::fs;

const LEVEL_TOML: &str = r#"
name = "Level"

[types."Game.Player"]
base = "UnityEngine.MonoBehaviour"
interfaces = ["Game.IDamageable"]

[[roots]]
id = 1
name = "Root"
tag = "Respawn"
layer = 3

[[roots.components]]
id = 10
type = "UnityEngine.Transform"
kind = "transform"
transform = { position = [1.0, 2.0, 3.0] }

[[roots.components]]
id = 11
type = "Game.Player"
kind = "script"
enabled = false

[[roots.components.properties]]
name = "speed"
value = { float = 2.5 }

[[roots.components.properties]]
name = "target"
type = "UnityEngine.GameObject"
value = { reference = { id = 2, name = "Target" } }

[[roots.components.properties]]
name = "secret"
unreadable = "access denied"

[[roots.children]]
id = 2
name = "Target"
static = true
"#;

#[test]
fn test_load_toml_description() {
    let scene = MemoryScene::from_toml_str(LEVEL_TOML).expect("Failed to parse scene");
    assert_eq!(scene.name, "Level");
    assert_eq!(scene.node_count(), 2);

    let roots = scene.roots().unwrap();
    assert_eq!(roots.len(), 1);
    let root = roots[0];
    assert_eq!(root.id(), ObjectId::new(1));
    assert_eq!(root.tag(), Some("Respawn"));
    assert_eq!(root.layer(), 3);
    assert!(root.active());

    let children = root.children().unwrap();
    assert_eq!(children[0].name(), "Target");
    assert!(children[0].is_static());
    assert_eq!(children[0].tag(), None);
}

#[test]
fn test_component_views() {
    let scene = MemoryScene::from_toml_str(LEVEL_TOML).unwrap();
    let roots = scene.roots().unwrap();
    let components = roots[0].components().unwrap();

    let transform = components[0];
    assert!(transform.is_transform_like());
    let data = transform.transform().expect("transform data");
    assert_eq!(data.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(data.scale, Vec3::ONE);
    assert!(transform.enablement().is_none());

    let script = components[1];
    assert_eq!(script.kind(), ComponentKind::Script);
    assert!(script.transform().is_none());
    let enablement = script.enablement().expect("scripts are toggleable");
    assert!(!enablement.enabled);
    assert!(!enablement.active_and_enabled);
}

#[test]
fn test_property_reads_and_faults() {
    let scene = MemoryScene::from_toml_str(LEVEL_TOML).unwrap();
    let roots = scene.roots().unwrap();
    let components = roots[0].components().unwrap();
    let reads = components[1].properties().unwrap();
    assert_eq!(reads.len(), 3);

    let speed = reads[0].as_ref().unwrap();
    assert_eq!(speed.runtime_type, "float");
    assert_eq!(speed.value.as_float(), Some(2.5));

    let target = reads[1].as_ref().unwrap();
    assert_eq!(target.runtime_type, "UnityEngine.GameObject");
    assert_eq!(target.value.as_reference().map(|r| r.id), Some(ObjectId::new(2)));

    let fault = reads[2].as_ref().unwrap_err();
    assert_eq!(fault.property, "secret");
    assert_eq!(fault.reason, "access denied");
}

#[test]
fn test_type_metadata_from_description() {
    let scene = MemoryScene::from_toml_str(LEVEL_TOML).unwrap();
    let types = scene.types();
    assert_eq!(types.base_type("Game.Player"), Some("UnityEngine.MonoBehaviour"));
    assert_eq!(types.interfaces("Game.Player"), vec!["Game.IDamageable"]);
}

#[test]
fn test_broken_parts_raise_structural_errors() {
    let scene = MemoryScene::new("Broken")
        .with_root(
            NodeDesc::new(1, "Root")
                .broken("host refused")
                .with_child(NodeDesc::new(2, "Child")),
        )
        .with_root(
            NodeDesc::new(3, "Other").with_component(
                ComponentDesc::new(4, "Game.Thing", ComponentKind::Plain).broken("detached"),
            ),
        );

    let roots = scene.roots().unwrap();
    match roots[0].children() {
        Err(GraphError::Unavailable { object, what, .. }) => {
            assert_eq!(object, ObjectId::new(1));
            assert_eq!(what, "children");
        }
        other => panic!("expected unavailable, got {:?}", other.map(|c| c.len())),
    }
    assert!(roots[0].components().is_err());

    let components = roots[1].components().unwrap();
    assert!(components[0].properties().is_err());

    let mut no_roots = MemoryScene::new("Empty");
    no_roots.broken = Some("not loaded".into());
    assert!(matches!(no_roots.roots(), Err(GraphError::RootsUnavailable(_))));
}

#[test]
fn test_builder_matches_description() {
    let built = MemoryScene::new("Level").with_root(
        NodeDesc::new(1, "Root").with_component(
            ComponentDesc::new_transform(10, TransformData::from_position(Vec3::new(0.0, 1.0, 0.0)))
                .with_value("note", "hello"),
        ),
    );
    let text = built.to_toml_string().unwrap();
    let reparsed = MemoryScene::from_toml_str(&text).unwrap();
    assert_eq!(reparsed.node_count(), 1);
    let roots = reparsed.roots().unwrap();
    let components = roots[0].components().unwrap();
    assert_eq!(components[0].type_name(), "UnityEngine.Transform");
    let reads = components[0].properties().unwrap();
    assert_eq!(reads[0].as_ref().unwrap().value.as_str(), Some("hello"));
}

#[test]
fn test_load_from_file_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("level.toml");
    fs::write(&toml_path, LEVEL_TOML).unwrap();
    let scene = MemoryScene::load_from_file(&toml_path).unwrap();
    assert_eq!(scene.name, "Level");

    let json_path = dir.path().join("level.json");
    fs::write(
        &json_path,
        r#"{"name": "Json", "roots": [{"id": 5, "name": "Solo", "components": []}]}"#,
    )
    .unwrap();
    let scene = MemoryScene::load_from_file(&json_path).unwrap();
    assert_eq!(scene.roots().unwrap()[0].id(), ObjectId::new(5));

    let bad_path = dir.path().join("level.yaml");
    fs::write(&bad_path, "name: nope").unwrap();
    assert!(matches!(
        MemoryScene::load_from_file(&bad_path),
        Err(GraphError::UnsupportedFormat(_))
    ));

    assert!(matches!(
        MemoryScene::load_from_file(dir.path().join("missing.toml")),
        Err(GraphError::Io(_))
    ));
}

#[test]
fn test_parse_error_reported() {
    assert!(matches!(
        MemoryScene::from_toml_str("roots = 5"),
        Err(GraphError::Parse(_))
    ));
}

#[test]
fn test_array_dims_must_match_items() {
    let template = r#"
[[roots]]
id = 1
name = "Root"

[[roots.components]]
id = 11
type = "Game.Grid"

[[roots.components.properties]]
name = "cells"
value = { array = { element_type = "int", dims = [DIMS], items = [{ int = 1 }, { int = 2 }] } }
"#;
    let err = MemoryScene::from_toml_str(&template.replace("DIMS", "3")).unwrap_err();
    assert!(matches!(&err, GraphError::Parse(reason) if reason.contains("cells")));

    let scene = MemoryScene::from_toml_str(&template.replace("DIMS", "2")).unwrap();
    let read = scene.roots[0].components[0].properties[0].value.clone();
    assert!(matches!(read, Value::Array(a) if a.len() == 2));
}

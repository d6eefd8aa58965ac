//! Tests for TemplateSpec file loading and engine construction.

use serde_json::json;

use json_render::{HelperRegistry, TemplateError, TemplateSpec, build_engine_from_spec};

fn concat_registry() -> HelperRegistry {
    let mut registry = HelperRegistry::new();
    registry.register_fn("concat", |input, _args| async move {
        let first = input["first"].as_str().unwrap_or_default();
        let last = input["last"].as_str().unwrap_or_default();
        Ok(json!(format!("{first} {last}")))
    });
    registry
}

#[tokio::test]
async fn load_json_spec_from_disk_and_render() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.json");
    std::fs::write(
        &path,
        r#"{"properties": [{"path": "fullName", "fns": [{"helper": "concat"}]}]}"#,
    )
    .unwrap();

    let spec = TemplateSpec::from_path(&path).unwrap();
    let engine = build_engine_from_spec(spec, concat_registry()).unwrap();

    let out = engine
        .render(&json!({"first": "Cameron", "last": "Lee"}))
        .await
        .unwrap();
    assert_eq!(out, json!({"fullName": "Cameron Lee"}));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.toml");
    std::fs::write(&path, "properties = []").unwrap();

    let err = TemplateSpec::from_path(&path).unwrap_err();
    assert!(matches!(err, TemplateError::UnsupportedExtension(ext) if ext == "toml"));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = TemplateSpec::from_path("does-not-exist.json").unwrap_err();
    assert!(matches!(err, TemplateError::Io(_)));
}

#[cfg(feature = "yaml")]
#[tokio::test]
async fn load_yaml_spec_from_disk_and_render() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.yaml");
    std::fs::write(
        &path,
        "properties:\n  - path: fullName\n    fns:\n      - helper: concat\n",
    )
    .unwrap();

    let spec = TemplateSpec::from_path(&path).unwrap();
    let engine = build_engine_from_spec(spec, concat_registry()).unwrap();

    let out = engine
        .render(&json!({"first": "Cameron", "last": "Lee"}))
        .await
        .unwrap();
    assert_eq!(out, json!({"fullName": "Cameron Lee"}));
}

//! Tests for stream sessions: per-record rendering over a sequence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::error::Stage;
use crate::helper::HelperRegistry;
use crate::template::Step;
use crate::{RenderBuilder, RenderError, StreamOptions};

fn name_registry() -> HelperRegistry {
    let mut registry = HelperRegistry::new();
    registry.register_fn("name_of", |input, _args| async move {
        match &input["name"] {
            Value::String(name) => Ok(json!(name)),
            _ => Err("record has no name".into()),
        }
    });
    registry
}

struct Recorded {
    items: Arc<Mutex<Vec<Value>>>,
    errors: Arc<Mutex<Vec<RenderError>>>,
    finishes: Arc<AtomicUsize>,
}

fn recording_options() -> (StreamOptions, Recorded) {
    let items = Arc::new(Mutex::new(Vec::new()));
    let errors = Arc::new(Mutex::new(Vec::new()));
    let finishes = Arc::new(AtomicUsize::new(0));

    let items_h = items.clone();
    let errors_h = errors.clone();
    let finishes_h = finishes.clone();

    let options = StreamOptions::new()
        .on_item(move |value| items_h.lock().unwrap().push(value))
        .on_error(move |err| errors_h.lock().unwrap().push(err))
        .on_finish(move || {
            finishes_h.fetch_add(1, Ordering::SeqCst);
        });

    (
        options,
        Recorded {
            items,
            errors,
            finishes,
        },
    )
}

#[tokio::test]
async fn stream_renders_each_record_in_input_order() {
    let engine = RenderBuilder::new(name_registry())
        .add_property("who", vec![Step::new("name_of")])
        .build()
        .unwrap();

    let data = json!([
        {"name": "Cameron"},
        {"name": "Scott"},
        {"name": "Dave"}
    ]);

    let (options, recorded) = recording_options();
    engine.render_stream(&data, options).await.unwrap();

    let items = recorded.items.lock().unwrap();
    assert_eq!(
        *items,
        vec![
            json!({"who": "Cameron"}),
            json!({"who": "Scott"}),
            json!({"who": "Dave"})
        ]
    );
    assert!(recorded.errors.lock().unwrap().is_empty());
    assert_eq!(recorded.finishes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stream_isolates_per_record_failures() {
    let engine = RenderBuilder::new(name_registry())
        .add_property("who", vec![Step::new("name_of")])
        .build()
        .unwrap();

    // The middle record has no name, so its render fails
    let data = json!([
        {"name": "Cameron"},
        {"age": 42},
        {"name": "Dave"}
    ]);

    let (options, recorded) = recording_options();
    engine.render_stream(&data, options).await.unwrap();

    let items = recorded.items.lock().unwrap();
    assert_eq!(
        *items,
        vec![json!({"who": "Cameron"}), json!({"who": "Dave"})]
    );

    let errors = recorded.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].stage, Stage::Step);
    assert_eq!(errors[0].target, "who");

    assert_eq!(recorded.finishes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn delivered_values_never_alias_each_other() {
    let engine = RenderBuilder::new(name_registry())
        .add_property("who", vec![Step::new("name_of")])
        .build()
        .unwrap();

    let data = json!([{"name": "Cameron"}, {"name": "Scott"}]);

    let (options, recorded) = recording_options();
    engine.render_stream(&data, options).await.unwrap();

    let mut items = recorded.items.lock().unwrap();
    items[1]["who"] = json!("mutated");
    assert_eq!(items[0], json!({"who": "Cameron"}));
}

#[tokio::test]
async fn empty_sequence_still_finishes() {
    let engine = RenderBuilder::new(name_registry())
        .add_property("who", vec![Step::new("name_of")])
        .build()
        .unwrap();

    let (options, recorded) = recording_options();
    engine.render_stream(&json!([]), options).await.unwrap();

    assert!(recorded.items.lock().unwrap().is_empty());
    assert!(recorded.errors.lock().unwrap().is_empty());
    assert_eq!(recorded.finishes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_array_data_is_a_configure_error() {
    let engine = RenderBuilder::new(name_registry())
        .add_property("who", vec![Step::new("name_of")])
        .build()
        .unwrap();

    let (options, recorded) = recording_options();
    let err = engine
        .render_stream(&json!({"name": "Cameron"}), options)
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::Configure);
    assert!(err.error.to_string().contains("not an array"));

    // None of the session handlers may have fired
    assert!(recorded.items.lock().unwrap().is_empty());
    assert!(recorded.errors.lock().unwrap().is_empty());
    assert_eq!(recorded.finishes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn each_missing_handler_is_a_distinct_configure_error() {
    let engine = RenderBuilder::new(name_registry())
        .add_property("who", vec![Step::new("name_of")])
        .build()
        .unwrap();

    let data = json!([{"name": "Cameron"}]);

    let err = engine
        .render_stream(&data, StreamOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.stage, Stage::Configure);
    assert!(err.error.to_string().contains("on_item"));

    let err = engine
        .render_stream(&data, StreamOptions::new().on_item(|_| {}))
        .await
        .unwrap_err();
    assert_eq!(err.stage, Stage::Configure);
    assert!(err.error.to_string().contains("on_error"));

    let err = engine
        .render_stream(&data, StreamOptions::new().on_item(|_| {}).on_error(|_| {}))
        .await
        .unwrap_err();
    assert_eq!(err.stage, Stage::Configure);
    assert!(err.error.to_string().contains("on_finish"));
}

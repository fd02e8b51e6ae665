use docgen_api::{DocEventAccumulator, DocStreamEvent};
use serde_json::json;

#[test]
fn events_deserialize_partial_records() {
    let event: DocStreamEvent =
        serde_json::from_value(json!({"step": "analysis"})).expect("step-only event");
    assert_eq!(event.step.as_deref(), Some("analysis"));
    assert!(!event.is_empty());
    assert!(!event.is_complete());

    let event: DocStreamEvent =
        serde_json::from_value(json!({"complete": true})).expect("complete-only event");
    assert!(event.is_complete());
}

#[test]
fn events_with_no_fields_are_flagged_empty() {
    let event: DocStreamEvent = serde_json::from_value(json!({})).expect("empty object parses");
    assert!(event.is_empty());
}

#[test]
fn events_serialize_without_absent_fields() {
    let event = DocStreamEvent {
        content: Some("Hi".to_owned()),
        ..Default::default()
    };
    let value = serde_json::to_value(&event).expect("serialize event");
    assert_eq!(value, json!({"content": "Hi"}));
}

#[test]
fn events_unknown_fields_are_tolerated() {
    let event: DocStreamEvent =
        serde_json::from_value(json!({"content": "x", "trace_id": "t-1"}))
            .expect("extra fields ignored");
    assert_eq!(event.content.as_deref(), Some("x"));
}

#[test]
fn accumulator_assembles_steps_content_and_completion() {
    let mut acc = DocEventAccumulator::default();
    for event in [
        DocStreamEvent {
            step: Some("analysis".to_owned()),
            ..Default::default()
        },
        DocStreamEvent {
            content: Some("# Readme".to_owned()),
            ..Default::default()
        },
        DocStreamEvent {
            content: Some("\nBody".to_owned()),
            complete: Some(true),
            ..Default::default()
        },
    ] {
        acc.push(&event);
    }

    assert_eq!(acc.steps, vec!["analysis".to_owned()]);
    assert_eq!(acc.content, "# Readme\nBody");
    assert!(acc.completed);
}

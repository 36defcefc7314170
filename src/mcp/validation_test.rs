//! Tests for tool argument validation

use rmcp::{schemars, schemars::JsonSchema};
use serde::Deserialize;
use serde_json::{Value, json};

use super::validation::{ArgumentValidator, TrelloId, ValidationError, input_schema};

#[allow(dead_code)]
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct Inner {
    #[schemars(length(min = 1))]
    title: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Sample {
    card_id: TrelloId,
    #[schemars(length(min = 1, max = 16))]
    name: String,
    checked: Option<bool>,
    nested: Option<Inner>,
}

fn validator() -> ArgumentValidator {
    ArgumentValidator::compile("sample", &input_schema::<Sample>()).unwrap()
}

fn violations(arguments: Value) -> ValidationError {
    validator().validate(&arguments).unwrap_err()
}

fn paths(err: &ValidationError) -> Vec<&str> {
    let mut paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
    paths.sort_unstable();
    paths
}

#[test]
fn test_valid_arguments_pass() {
    let arguments = json!({
        "cardId": "5f1a2b3c4d5e6f7a8b9c0d1e",
        "name": "Ship it",
        "checked": true,
        "nested": {"title": "x"}
    });

    validator().validate(&arguments).unwrap();
    let sample: Sample = serde_json::from_value(arguments).unwrap();
    assert_eq!(sample.card_id.as_str(), "5f1a2b3c4d5e6f7a8b9c0d1e");
}

#[test]
fn test_schema_is_closed_and_lists_required_fields() {
    let schema = input_schema::<Sample>();

    assert_eq!(schema["type"], "object");
    assert_eq!(schema["additionalProperties"], false);
    assert_eq!(schema["required"], json!(["cardId", "name"]));
    assert_eq!(schema["properties"]["nested"]["additionalProperties"], false);
}

#[test]
fn test_optional_fields_do_not_admit_null() {
    let schema = input_schema::<Sample>();
    assert_eq!(schema["properties"]["checked"]["type"], "boolean");

    let err = violations(json!({
        "cardId": "5f1a2b3c4d5e6f7a8b9c0d1e",
        "name": "Ship it",
        "checked": null
    }));
    assert_eq!(paths(&err), vec!["checked"]);
}

#[test]
fn test_every_violation_is_reported() {
    let err = violations(json!({
        "cardId": "not-an-id",
        "checked": "yes",
        "extra": 1
    }));

    assert_eq!(paths(&err), vec!["cardId", "checked", "extra", "name"]);
    assert_eq!(err.tool, "sample");
}

#[test]
fn test_malformed_id_is_a_single_violation() {
    for id in ["short", "5f1a2b3c4d5e6f7a8b9c0d1e00", "5f1a2b3c4d5e6f7a8b9c0d1!"] {
        let err = violations(json!({"cardId": id, "name": "Ship it"}));
        assert_eq!(err.violations.len(), 1, "{id}");
        assert_eq!(err.violations[0].path, "cardId");
    }
}

#[test]
fn test_missing_and_unexpected_keys_are_named() {
    let err = violations(json!({"name": "Ship it", "verbose": true}));

    let missing = err.violations.iter().find(|v| v.path == "cardId").unwrap();
    assert_eq!(missing.message, "Required");
    let unexpected = err.violations.iter().find(|v| v.path == "verbose").unwrap();
    assert_eq!(unexpected.message, "Unrecognized key");
}

#[test]
fn test_nested_paths_are_dotted() {
    let err = violations(json!({
        "cardId": "5f1a2b3c4d5e6f7a8b9c0d1e",
        "name": "Ship it",
        "nested": {"title": "", "color": "red"}
    }));

    assert_eq!(paths(&err), vec!["nested.color", "nested.title"]);
}

#[test]
fn test_length_bounds_count_characters() {
    let ok = json!({"cardId": "5f1a2b3c4d5e6f7a8b9c0d1e", "name": "ééééééééééééééé"});
    validator().validate(&ok).unwrap();

    let err = violations(json!({"cardId": "5f1a2b3c4d5e6f7a8b9c0d1e", "name": "x".repeat(17)}));
    assert_eq!(paths(&err), vec!["name"]);
}

#[test]
fn test_error_message_lists_violations() {
    let err = violations(json!({"cardId": "5f1a2b3c4d5e6f7a8b9c0d1e"}));

    assert_eq!(
        err.to_string(),
        "Invalid arguments for tool sample: name: Required"
    );
}

#[test]
fn test_malformed_wraps_deserialize_error() {
    let source = serde_json::from_value::<Sample>(json!([])).unwrap_err();

    let err = ValidationError::malformed("sample", &source);

    assert_eq!(err.violations.len(), 1);
    assert_eq!(err.violations[0].path, "");
    assert!(err.to_string().starts_with("Invalid arguments for tool sample: "));
}

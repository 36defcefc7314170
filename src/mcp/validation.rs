//! Argument validation for MCP tools.
//!
//! Every tool takes a parameter struct deriving [`JsonSchema`]. The derived
//! schema is advertised in `tools/list` and compiled into an
//! [`ArgumentValidator`], which reports every violated constraint of a call
//! before the arguments are deserialized into the struct. Objects are
//! closed: parameter structs deny unknown fields, so the schema carries
//! `additionalProperties: false` at every level.

use std::borrow::Cow;
use std::fmt;

use jsonschema::error::ValidationErrorKind;
use miette::Diagnostic;
use rmcp::schemars::{JsonSchema, Schema, SchemaGenerator, generate::SchemaSettings, json_schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// JSON object as carried in tool calls.
pub type JsonObject = Map<String, Value>;

/// Trello object ids: 24 alphanumeric characters.
pub const TRELLO_ID_PATTERN: &str = r"^[a-zA-Z0-9]{24}$";

/// A remote object id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrelloId(String);

impl TrelloId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrelloId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TrelloId> for Value {
    fn from(id: TrelloId) -> Self {
        Value::String(id.0)
    }
}

impl JsonSchema for TrelloId {
    fn schema_name() -> Cow<'static, str> {
        "TrelloId".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": TRELLO_ID_PATTERN,
        })
    }
}

/// Render the input schema of a parameter struct.
///
/// Subschemas are inlined so the result is self-contained, and optional
/// fields do not admit `null`: an absent field and an explicit `null` are
/// not the same thing.
pub fn input_schema<P: JsonSchema>() -> JsonObject {
    let settings = SchemaSettings::draft2020_12().with(|settings| {
        settings.option_add_null_type = false;
        settings.inline_subschemas = true;
    });
    let schema = settings.into_generator().into_root_schema_for::<P>();
    match schema.to_value() {
        Value::Object(object) => object,
        _ => JsonObject::new(),
    }
}

/// One violated constraint. `path` is dotted (`updates.name`) and empty for
/// the argument object itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Tool arguments that failed validation.
#[derive(Error, Diagnostic, Debug, Clone)]
#[error("Invalid arguments for tool {tool}: {}", join_violations(.violations))]
#[diagnostic(code(trello_mcp::mcp::validation))]
pub struct ValidationError {
    pub tool: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Arguments that passed the schema but still did not fit the
    /// parameter struct.
    pub fn malformed(tool: &str, error: &serde_json::Error) -> Self {
        Self {
            tool: tool.to_string(),
            violations: vec![Violation::new("", error.to_string())],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A tool's input schema failed to compile.
#[derive(Error, Diagnostic, Debug, Clone)]
#[error("Input schema of tool {tool} is invalid: {message}")]
#[diagnostic(code(trello_mcp::mcp::schema))]
pub struct SchemaError {
    pub tool: String,
    pub message: String,
}

/// Compiled input schema of one tool.
pub struct ArgumentValidator {
    tool: &'static str,
    validator: jsonschema::Validator,
}

impl ArgumentValidator {
    pub fn compile(tool: &'static str, schema: &JsonObject) -> Result<Self, SchemaError> {
        let validator = jsonschema::validator_for(&Value::Object(schema.clone())).map_err(|e| {
            SchemaError {
                tool: tool.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { tool, validator })
    }

    /// Check `arguments`, collecting every violation rather than the first.
    pub fn validate(&self, arguments: &Value) -> Result<(), ValidationError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(arguments)
            .flat_map(|error| violations_of(&error))
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                tool: self.tool.to_string(),
                violations,
            })
        }
    }
}

/// Missing and unexpected keys are reported at the key itself.
fn violations_of(error: &jsonschema::ValidationError<'_>) -> Vec<Violation> {
    let at = dotted(&error.instance_path().to_string());
    match error.kind() {
        ValidationErrorKind::Required { property } => {
            let key = property.as_str().unwrap_or_default();
            vec![Violation::new(join_path(&at, key), "Required")]
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => unexpected
            .iter()
            .map(|key| Violation::new(join_path(&at, key), "Unrecognized key"))
            .collect(),
        _ => vec![Violation::new(at, error.to_string())],
    }
}

/// `/updates/name` becomes `updates.name`.
fn dotted(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

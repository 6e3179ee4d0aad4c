//! Command DTOs - the write-side boundary
//!
//! A command is a named operation plus a field map. Each operation declares
//! the fields it accepts and the ones it cannot do without; structural
//! validation holds commands to that contract before the pipeline reads any
//! business state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::value_objects::RequestId;

/// The operations the executor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Create,
    Approve,
    Reject,
    Cancel,
    Finalize,
    UseCarryover,
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::Finalize => "finalize",
            Self::UseCarryover => "use_carryover",
        }
    }

    /// Fields the operation accepts. Anything outside this list is a
    /// structural failure.
    pub fn accepted_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Create => &["quantity", "starts_on", "note", "requester"],
            Self::Approve => &["request_id", "note"],
            Self::Reject => &["request_id", "reason"],
            Self::Cancel => &["request_id"],
            Self::Finalize => &["request_id"],
            Self::UseCarryover => &["request_id", "days"],
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One request to change state. Consumed by a single execution; outcomes
/// are reported through the execution result, never by mutating this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Command {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    pub fn create(quantity: u32) -> Self {
        Self::new(CommandKind::Create).with_field("quantity", quantity)
    }

    pub fn approve(request_id: RequestId) -> Self {
        Self::new(CommandKind::Approve).with_field("request_id", request_id.to_string())
    }

    pub fn reject(request_id: RequestId, reason: impl Into<String>) -> Self {
        Self::new(CommandKind::Reject)
            .with_field("request_id", request_id.to_string())
            .with_field("reason", reason.into())
    }

    pub fn cancel(request_id: RequestId) -> Self {
        Self::new(CommandKind::Cancel).with_field("request_id", request_id.to_string())
    }

    pub fn finalize(request_id: RequestId) -> Self {
        Self::new(CommandKind::Finalize).with_field("request_id", request_id.to_string())
    }

    pub fn use_carryover(request_id: RequestId, days: u32) -> Self {
        Self::new(CommandKind::UseCarryover)
            .with_field("request_id", request_id.to_string())
            .with_field("days", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_wire_format() {
        let json = serde_json::to_value(CommandKind::UseCarryover).unwrap();
        assert_eq!(json, "use_carryover");
        assert_eq!(CommandKind::UseCarryover.name(), "use_carryover");
    }

    #[test]
    fn test_command_deserializes_without_fields() {
        let command: Command = serde_json::from_str(r#"{"kind":"cancel"}"#).unwrap();
        assert_eq!(command.kind, CommandKind::Cancel);
        assert!(command.fields.is_empty());
    }

    #[test]
    fn test_builder_sets_fields() {
        let command = Command::create(3).with_field("note", "conference");
        assert_eq!(command.field("quantity"), Some(&Value::from(3)));
        assert_eq!(command.field("note"), Some(&Value::from("conference")));
    }
}

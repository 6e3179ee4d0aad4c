//! Structural command validation
//!
//! Holds a command to the field contract its operation declares: no
//! undeclared fields, nothing required missing, every value well-formed.
//! All problems are collected and reported together. Runs before any
//! business state is read, so a malformed command costs nothing.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::application::dto::{Command, CommandKind};
use crate::application::ports::inbound::FieldError;
use crate::domain::value_objects::{DayCount, RequestId, UserId};

/// A structurally valid command, with fields parsed into domain values.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandPayload {
    Create(CreateFields),
    /// Everything except `create` targets an existing request.
    OnRequest {
        request_id: RequestId,
        action: RequestAction,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateFields {
    pub quantity: DayCount,
    pub starts_on: Option<NaiveDate>,
    pub note: Option<String>,
    /// Present when filing on someone else's behalf.
    pub requester: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestAction {
    Approve { note: Option<String> },
    Reject { reason: String },
    Cancel,
    Finalize,
    UseCarryover { days: DayCount },
}

/// Check `command` against its operation's field contract.
pub fn validate(command: &Command) -> Result<CommandPayload, Vec<FieldError>> {
    let mut errors = Vec::new();
    let fields = &command.fields;

    for name in fields.keys() {
        if !command.kind.accepted_fields().contains(&name.as_str()) {
            errors.push(FieldError::new(
                name.clone(),
                "not accepted by this operation",
            ));
        }
    }

    let payload = match command.kind {
        CommandKind::Create => {
            let quantity = required_days(fields, "quantity", &mut errors);
            let starts_on = optional_date(fields, "starts_on", &mut errors);
            let note = optional_text(fields, "note", &mut errors);
            let requester = optional_user(fields, "requester", &mut errors);
            match (quantity, starts_on, note, requester) {
                (Some(quantity), Some(starts_on), Some(note), Some(requester)) => {
                    Some(CommandPayload::Create(CreateFields {
                        quantity,
                        starts_on,
                        note,
                        requester,
                    }))
                }
                _ => None,
            }
        }
        CommandKind::Approve => {
            let request_id = required_request_id(fields, &mut errors);
            let note = optional_text(fields, "note", &mut errors);
            match (request_id, note) {
                (Some(request_id), Some(note)) => Some(CommandPayload::OnRequest {
                    request_id,
                    action: RequestAction::Approve { note },
                }),
                _ => None,
            }
        }
        CommandKind::Reject => {
            let request_id = required_request_id(fields, &mut errors);
            let reason = required_text(fields, "reason", &mut errors);
            match (request_id, reason) {
                (Some(request_id), Some(reason)) => Some(CommandPayload::OnRequest {
                    request_id,
                    action: RequestAction::Reject { reason },
                }),
                _ => None,
            }
        }
        CommandKind::Cancel => {
            required_request_id(fields, &mut errors).map(|request_id| CommandPayload::OnRequest {
                request_id,
                action: RequestAction::Cancel,
            })
        }
        CommandKind::Finalize => {
            required_request_id(fields, &mut errors).map(|request_id| CommandPayload::OnRequest {
                request_id,
                action: RequestAction::Finalize,
            })
        }
        CommandKind::UseCarryover => {
            let request_id = required_request_id(fields, &mut errors);
            let days = required_days(fields, "days", &mut errors);
            match (request_id, days) {
                (Some(request_id), Some(days)) => Some(CommandPayload::OnRequest {
                    request_id,
                    action: RequestAction::UseCarryover { days },
                }),
                _ => None,
            }
        }
    };

    match payload {
        Some(payload) if errors.is_empty() => Ok(payload),
        _ => Err(errors),
    }
}

// ============================================================================
// Field helpers
//
// Each returns `None` after pushing an error. Optional helpers wrap the
// parsed value once more: `Some(None)` is a legitimately absent field.
// ============================================================================

fn required_days(
    fields: &Map<String, Value>,
    name: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<DayCount> {
    let Some(value) = fields.get(name) else {
        errors.push(FieldError::new(name, "required"));
        return None;
    };
    match value.as_u64() {
        Some(0) => {
            errors.push(FieldError::new(name, "must be at least 1"));
            None
        }
        Some(days) if days <= u64::from(u32::MAX) => Some(DayCount::new(days as u32)),
        _ => {
            errors.push(FieldError::new(name, "must be a positive whole number"));
            None
        }
    }
}

fn required_request_id(
    fields: &Map<String, Value>,
    errors: &mut Vec<FieldError>,
) -> Option<RequestId> {
    let Some(value) = fields.get("request_id") else {
        errors.push(FieldError::new("request_id", "required"));
        return None;
    };
    value
        .as_str()
        .and_then(|raw| RequestId::parse_str(raw).ok())
        .or_else(|| {
            errors.push(FieldError::new("request_id", "must be a UUID"));
            None
        })
}

fn required_text(
    fields: &Map<String, Value>,
    name: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let Some(value) = fields.get(name) else {
        errors.push(FieldError::new(name, "required"));
        return None;
    };
    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Some(text.to_string()),
        Some(_) => {
            errors.push(FieldError::new(name, "must not be blank"));
            None
        }
        None => {
            errors.push(FieldError::new(name, "must be text"));
            None
        }
    }
}

fn optional_text(
    fields: &Map<String, Value>,
    name: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null) => Some(None),
        Some(value) => match value.as_str() {
            Some(text) => Some(Some(text.to_string())),
            None => {
                errors.push(FieldError::new(name, "must be text"));
                None
            }
        },
    }
}

fn optional_date(
    fields: &Map<String, Value>,
    name: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<Option<NaiveDate>> {
    match fields.get(name) {
        None | Some(Value::Null) => Some(None),
        Some(value) => match value.as_str().and_then(|raw| raw.parse::<NaiveDate>().ok()) {
            Some(date) => Some(Some(date)),
            None => {
                errors.push(FieldError::new(name, "must be a date (YYYY-MM-DD)"));
                None
            }
        },
    }
}

fn optional_user(
    fields: &Map<String, Value>,
    name: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<Option<UserId>> {
    match fields.get(name) {
        None | Some(Value::Null) => Some(None),
        Some(value) => match value.as_str().and_then(|raw| UserId::parse_str(raw).ok()) {
            Some(user) => Some(Some(user)),
            None => {
                errors.push(FieldError::new(name, "must be a user UUID"));
                None
            }
        },
    }
}

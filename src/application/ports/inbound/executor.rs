//! Inbound command-execution port
//!
//! The single entry point callers bind to. Runners, queue consumers and any
//! future HTTP surface hand a command to [`CommandExecutor`] and get one
//! terminal [`ExecutionResult`] back; no outcome is ever reported by
//! mutating the command.

use async_trait::async_trait;
use serde::Serialize;

use crate::application::dto::{Command, RequestView};
use crate::application::ports::outbound::{PublishError, StoreError};
use crate::domain::policies::PolicyFault;
use crate::domain::value_objects::{Actor, ExecutionContext};

/// One structural problem with a command field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Where in the pipeline a fault happened. Steps up to and including
/// `Persistence` mean nothing was committed; `Publication` means the
/// mutation committed but the event did not go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStep {
    Load,
    Authorization,
    Persistence,
    Publication,
}

impl ExecutionStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Authorization => "authorization",
            Self::Persistence => "persistence",
            Self::Publication => "publication",
        }
    }
}

impl std::fmt::Display for ExecutionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of collaborator failure interrupted the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum FaultKind {
    /// A concurrent execution changed the request first. Retry by
    /// re-running the whole pipeline against fresh state.
    #[error("a concurrent execution already changed this request")]
    Conflict,
    #[error(transparent)]
    Policy(#[from] PolicyFault),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Publisher(#[from] PublishError),
}

/// A fault, annotated with the operation and pipeline step it interrupted.
#[derive(Debug, thiserror::Error)]
#[error("{operation} faulted during {step}: {kind}")]
pub struct ExecutionFault {
    pub operation: &'static str,
    pub step: ExecutionStep,
    pub kind: FaultKind,
}

impl ExecutionFault {
    pub fn new(operation: &'static str, step: ExecutionStep, kind: FaultKind) -> Self {
        Self {
            operation,
            step,
            kind,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self.kind, FaultKind::Conflict)
    }
}

/// Terminal outcome of one pipeline invocation.
#[derive(Debug)]
pub enum ExecutionResult {
    /// The mutation committed; the view shows the final state.
    Success(RequestView),
    /// A policy said no. Nothing was read beyond the subject and nothing
    /// was written.
    Denied {
        policy: &'static str,
        reason: String,
    },
    /// The command's shape, or a domain precondition, rejected the input.
    /// Nothing was written.
    ValidationFailed(Vec<FieldError>),
    /// A collaborator failed; the step inside says whether state changed.
    Fault(ExecutionFault),
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// The executor contract: one command in, one typed result out.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        command: Command,
        actor: Actor,
        ctx: ExecutionContext,
    ) -> ExecutionResult;
}

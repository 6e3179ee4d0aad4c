//! TimeOff Engine - policy-gated backend core for time-off requests
//!
//! The binary is a queue-consumer-style caller: it reads one JSON envelope
//! per stdin line, runs it through the execution pipeline (or the read
//! side), and prints one JSON result per line. Any transport that can
//! produce the same envelopes gets the same contract.

mod application;
mod domain;
mod infrastructure;

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::dto::Command;
use crate::application::ports::inbound::{CommandExecutor, ExecutionResult};
use crate::application::services::{RequestFilter, RequestOrdering};
use crate::domain::value_objects::{Actor, ExecutionContext, TenantId};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::state::AppState;

/// One line of input: either a command for the write side or a search
/// against the read side.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Envelope {
    Execute {
        command: Command,
        actor: Actor,
        /// Tenant scope; defaults to the actor's own tenant.
        #[serde(default)]
        tenant: Option<TenantId>,
        #[serde(default)]
        correlation_id: Option<String>,
    },
    Search {
        tenant: TenantId,
        #[serde(default)]
        filter: RequestFilter,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timeoff_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting TimeOff Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(
        enabled = config.feature_enabled,
        requires_approval = config.requires_approval,
        limit = %config.request_limit,
        "Configuration loaded"
    );

    // Initialize application state (adapters, pipeline, workers)
    let state = AppState::new(config).await;
    tracing::info!("Application state initialized");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => {
                        let output = handle_line(&state, &line).await;
                        println!("{output}");
                    }
                    None => {
                        tracing::info!("Input closed");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    // Let subscribers drain everything already published
    state.shutdown().await;
    Ok(())
}

async fn handle_line(state: &AppState, line: &str) -> Value {
    let envelope: Envelope = match serde_json::from_str(line) {
        Ok(envelope) => envelope,
        Err(err) => {
            return json!({ "outcome": "invalid_envelope", "message": err.to_string() });
        }
    };

    match envelope {
        Envelope::Execute {
            command,
            actor,
            tenant,
            correlation_id,
        } => {
            let mut ctx = ExecutionContext::new(tenant.unwrap_or(actor.tenant));
            if let Some(correlation_id) = correlation_id {
                ctx = ctx.with_correlation_id(correlation_id);
            }
            result_to_json(state.executor.execute(command, actor, ctx).await)
        }
        Envelope::Search { tenant, filter } => {
            match state
                .queries
                .search(tenant, &filter, RequestOrdering::default())
                .await
            {
                Ok(views) => json!({ "outcome": "results", "requests": views }),
                Err(err) => json!({ "outcome": "fault", "message": err.to_string() }),
            }
        }
    }
}

fn result_to_json(result: ExecutionResult) -> Value {
    match result {
        ExecutionResult::Success(view) => json!({ "outcome": "success", "request": view }),
        ExecutionResult::Denied { policy, reason } => {
            json!({ "outcome": "denied", "policy": policy, "reason": reason })
        }
        ExecutionResult::ValidationFailed(fields) => {
            json!({ "outcome": "validation_failed", "fields": fields })
        }
        ExecutionResult::Fault(fault) => json!({
            "outcome": "fault",
            "step": fault.step.as_str(),
            "conflict": fault.is_conflict(),
            "message": fault.to_string(),
        }),
    }
}

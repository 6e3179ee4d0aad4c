//! Shared application state
//!
//! Wires the configured adapters into the executor and query service and
//! owns the subscriber workers. Shutdown closes the bus first so workers
//! drain whatever was already published, then waits for them.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::info;

use crate::application::services::{RequestExecutionService, RequestQueryService};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::event_bus::ChannelEventBus;
use crate::infrastructure::notifications::RequestNotifier;
use crate::infrastructure::persistence::{InMemoryPlanDirectory, InMemoryRequestStore};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub executor: Arc<RequestExecutionService<InMemoryRequestStore, InMemoryPlanDirectory>>,
    pub queries: Arc<RequestQueryService<InMemoryRequestStore, InMemoryPlanDirectory>>,
    pub plans: Arc<InMemoryPlanDirectory>,
    pub notifier: Arc<RequestNotifier>,
    event_bus: Arc<ChannelEventBus>,
    workers: Vec<JoinHandle<()>>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryRequestStore::new());
        let plans = Arc::new(InMemoryPlanDirectory::new(config.default_plan_rules()));
        let event_bus = Arc::new(ChannelEventBus::new());

        let executor = Arc::new(RequestExecutionService::new(
            store.clone(),
            plans.clone(),
            event_bus.clone(),
        ));
        let queries = Arc::new(RequestQueryService::new(store, plans.clone()));

        let notifier = Arc::new(RequestNotifier::new());
        let subscription = event_bus.subscribe().await;
        let workers = vec![tokio::spawn(notifier.clone().run(subscription))];

        Self {
            config,
            executor,
            queries,
            plans,
            notifier,
            event_bus,
            workers,
        }
    }

    /// Stop accepting publications and wait for subscriber workers to drain.
    pub async fn shutdown(self) {
        info!("Shutting down: closing event bus");
        self.event_bus.close().await;
        join_all(self.workers).await;
        info!("All workers drained");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::Command;
    use crate::application::ports::inbound::CommandExecutor;
    use crate::domain::value_objects::{
        Actor, Capability, ExecutionContext, TenantId, UserId,
    };

    fn test_config() -> AppConfig {
        AppConfig {
            feature_enabled: true,
            requires_approval: true,
            request_limit: Default::default(),
            carryover_allowance: crate::domain::value_objects::DayCount::new(5),
        }
    }

    #[tokio::test]
    async fn test_executed_commands_reach_the_notifier_before_shutdown_completes() {
        let state = AppState::new(test_config()).await;
        let tenant = TenantId::new();
        let actor =
            Actor::new(UserId::new(), tenant).with_capability(Capability::SubmitRequests);

        let result = state
            .executor
            .execute(Command::create(3), actor, ExecutionContext::new(tenant))
            .await;
        assert!(result.is_success());

        let notifier = state.notifier.clone();
        state.shutdown().await;

        let delivered = notifier.delivered().await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].event_name, "created");
    }
}

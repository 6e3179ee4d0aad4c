//! Command execution - the write-side pipeline
//!
//! One service owns the whole write path, in a fixed order: structural
//! validation, subject resolution, ordered policy evaluation, exactly one
//! aggregate operation, a versioned save, event publication, presentation.
//! The order is load-bearing: a denied or malformed command must cost
//! nothing, and no event may describe a mutation that did not commit.
//!
//! A command can derive one follow-up (a create under a plan that needs no
//! decision finalizes itself). The follow-up is a fresh pass through the
//! same pipeline, never a shortcut around it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use crate::application::dto::{Command, CommandKind};
use crate::application::ports::inbound::{
    CommandExecutor, ExecutionFault, ExecutionResult, ExecutionStep, FaultKind, FieldError,
};
use crate::application::ports::outbound::{
    EventPublisherPort, PlanRulesPort, RequestStorePort, StoreError,
};
use crate::application::services::command_validation::{
    validate, CommandPayload, CreateFields, RequestAction,
};
use crate::application::services::presenter::RequestPresenter;
use crate::domain::aggregates::TimeOffRequest;
use crate::domain::events::DomainEvent;
use crate::domain::policies::{
    CanDecide, CanRequest, FeatureEnabled, OwnRequest, PolicyArgs, PolicySubject, RequestPolicy,
    TenantBoundary,
};
use crate::domain::services::policy_evaluator::{evaluate, PolicyOutcome};
use crate::domain::value_objects::{Actor, ExecutionContext, PlanRules, RequestId};

/// Ordered policy lists, one per operation, owned by the executor.
///
/// Order matters: cheap plan gates run before actor-specific checks, and
/// evaluation stops at the first denial.
pub struct PolicyRegistry {
    create: Vec<Arc<dyn RequestPolicy>>,
    approve: Vec<Arc<dyn RequestPolicy>>,
    reject: Vec<Arc<dyn RequestPolicy>>,
    cancel: Vec<Arc<dyn RequestPolicy>>,
    finalize: Vec<Arc<dyn RequestPolicy>>,
    use_carryover: Vec<Arc<dyn RequestPolicy>>,
}

impl PolicyRegistry {
    /// The production policy set.
    pub fn standard() -> Self {
        let enabled: Arc<dyn RequestPolicy> = Arc::new(FeatureEnabled);
        let boundary: Arc<dyn RequestPolicy> = Arc::new(TenantBoundary);
        let can_request: Arc<dyn RequestPolicy> = Arc::new(CanRequest);
        let can_decide: Arc<dyn RequestPolicy> = Arc::new(CanDecide);
        let own_request: Arc<dyn RequestPolicy> = Arc::new(OwnRequest);
        Self {
            create: vec![enabled.clone(), boundary.clone(), can_request.clone()],
            approve: vec![enabled.clone(), boundary.clone(), can_decide.clone()],
            reject: vec![enabled.clone(), boundary.clone(), can_decide],
            // cancelling stays possible after a plan is switched off
            cancel: vec![boundary.clone(), own_request.clone()],
            finalize: vec![enabled.clone(), boundary.clone()],
            use_carryover: vec![enabled, boundary, own_request],
        }
    }

    /// Replace the list for one operation.
    pub fn set(&mut self, kind: CommandKind, policies: Vec<Arc<dyn RequestPolicy>>) {
        *self.slot(kind) = policies;
    }

    pub fn for_kind(&self, kind: CommandKind) -> &[Arc<dyn RequestPolicy>] {
        match kind {
            CommandKind::Create => &self.create,
            CommandKind::Approve => &self.approve,
            CommandKind::Reject => &self.reject,
            CommandKind::Cancel => &self.cancel,
            CommandKind::Finalize => &self.finalize,
            CommandKind::UseCarryover => &self.use_carryover,
        }
    }

    fn slot(&mut self, kind: CommandKind) -> &mut Vec<Arc<dyn RequestPolicy>> {
        match kind {
            CommandKind::Create => &mut self.create,
            CommandKind::Approve => &mut self.approve,
            CommandKind::Reject => &mut self.reject,
            CommandKind::Cancel => &mut self.cancel,
            CommandKind::Finalize => &mut self.finalize,
            CommandKind::UseCarryover => &mut self.use_carryover,
        }
    }
}

/// The use-case service behind [`CommandExecutor`].
pub struct RequestExecutionService<S, P>
where
    S: RequestStorePort,
    P: PlanRulesPort,
{
    store: Arc<S>,
    plans: Arc<P>,
    publisher: Arc<dyn EventPublisherPort>,
    policies: PolicyRegistry,
}

impl<S, P> RequestExecutionService<S, P>
where
    S: RequestStorePort,
    P: PlanRulesPort,
{
    pub fn new(store: Arc<S>, plans: Arc<P>, publisher: Arc<dyn EventPublisherPort>) -> Self {
        Self {
            store,
            plans,
            publisher,
            policies: PolicyRegistry::standard(),
        }
    }

    pub fn with_policies(mut self, policies: PolicyRegistry) -> Self {
        self.policies = policies;
        self
    }

    async fn run(
        &self,
        command: Command,
        actor: &Actor,
        ctx: &ExecutionContext,
        is_follow_up: bool,
    ) -> ExecutionResult {
        let operation = command.kind.name();

        // 1. Structural validation. A malformed command reads and writes
        //    nothing.
        let payload = match validate(&command) {
            Ok(payload) => payload,
            Err(fields) => {
                debug!(operation, problems = fields.len(), "Command failed structural validation");
                return ExecutionResult::ValidationFailed(fields);
            }
        };

        // 2. Resolve the tenant's plan rules.
        let rules = match self.plans.rules_for(ctx.tenant).await {
            Ok(rules) => rules,
            Err(err) => {
                error!(operation, %err, "Plan rules could not be resolved");
                return fault(operation, ExecutionStep::Load, err.into());
            }
        };

        match payload {
            CommandPayload::Create(create) => {
                self.run_create(operation, command.kind, create, actor, ctx, &rules, is_follow_up)
                    .await
            }
            CommandPayload::OnRequest { request_id, action } => {
                self.run_on_request(operation, command.kind, request_id, action, actor, ctx, &rules)
                    .await
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_create(
        &self,
        operation: &'static str,
        kind: CommandKind,
        create: CreateFields,
        actor: &Actor,
        ctx: &ExecutionContext,
        rules: &PlanRules,
        is_follow_up: bool,
    ) -> ExecutionResult {
        let subject = PolicySubject {
            tenant: ctx.tenant,
            rules,
            request: None,
        };
        let args = PolicyArgs {
            on_behalf_of: create.requester,
        };
        if let Some(result) = self.authorize(operation, kind, actor, &subject, &args) {
            return result;
        }

        let requester = create.requester.unwrap_or(actor.id);
        let opened = TimeOffRequest::open(
            ctx.tenant,
            requester,
            create.quantity,
            create.starts_on,
            create.note,
            rules,
        );
        let (mut request, event) = match opened {
            Ok(pair) => pair,
            Err(violation) => {
                debug!(operation, %violation, "Domain precondition rejected the command");
                return ExecutionResult::ValidationFailed(vec![FieldError::new(
                    violation.field(),
                    violation.to_string(),
                )]);
            }
        };

        if let Err(exec_fault) = self.commit(operation, &mut request, event, ctx).await {
            return ExecutionResult::Fault(exec_fault);
        }

        // Derived follow-up: under a plan with no decision step the fresh
        // request finalizes itself, through the full pipeline. The create
        // above stays committed whatever happens here.
        if !is_follow_up && !rules.requires_approval {
            info!(request_id = %request.id(), "Plan needs no decision; finalizing the new request");
            let derived = Command::finalize(request.id());
            let outcome = Box::pin(self.run(derived, actor, ctx, true)).await;
            match outcome {
                ExecutionResult::Success(view) => return ExecutionResult::Success(view),
                other => {
                    warn!(
                        request_id = %request.id(),
                        outcome = ?other,
                        "Follow-up finalize did not complete; request stays pending"
                    );
                }
            }
        }

        ExecutionResult::Success(RequestPresenter::present(&request, rules))
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_on_request(
        &self,
        operation: &'static str,
        kind: CommandKind,
        request_id: RequestId,
        action: RequestAction,
        actor: &Actor,
        ctx: &ExecutionContext,
        rules: &PlanRules,
    ) -> ExecutionResult {
        let mut request = match self.store.load(request_id).await {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!(operation, %request_id, "Command targets an unknown request");
                return ExecutionResult::ValidationFailed(vec![FieldError::new(
                    "request_id",
                    "unknown request",
                )]);
            }
            Err(err) => {
                error!(operation, %err, "Request could not be loaded");
                return fault(operation, ExecutionStep::Load, err.into());
            }
        };

        let subject = PolicySubject {
            tenant: ctx.tenant,
            rules,
            request: Some(&request),
        };
        let args = PolicyArgs::default();
        if let Some(result) = self.authorize(operation, kind, actor, &subject, &args) {
            return result;
        }

        let mutation = match action {
            RequestAction::Approve { note } => request.approve(actor.id, note),
            RequestAction::Reject { reason } => request.reject(actor.id, reason),
            RequestAction::Cancel => request.cancel(actor.id),
            RequestAction::Finalize => request.finalize(rules),
            RequestAction::UseCarryover { days } => request.use_carryover(days, rules),
        };
        let event = match mutation {
            Ok(event) => event,
            Err(violation) => {
                debug!(operation, %violation, "Domain precondition rejected the command");
                return ExecutionResult::ValidationFailed(vec![FieldError::new(
                    violation.field(),
                    violation.to_string(),
                )]);
            }
        };

        if let Err(exec_fault) = self.commit(operation, &mut request, event, ctx).await {
            return ExecutionResult::Fault(exec_fault);
        }
        ExecutionResult::Success(RequestPresenter::present(&request, rules))
    }

    /// Evaluate the operation's policy list. `None` means proceed.
    fn authorize(
        &self,
        operation: &'static str,
        kind: CommandKind,
        actor: &Actor,
        subject: &PolicySubject<'_>,
        args: &PolicyArgs,
    ) -> Option<ExecutionResult> {
        match evaluate(actor, subject, args, self.policies.for_kind(kind)) {
            Ok(PolicyOutcome::Allowed { passed }) => {
                debug!(operation, policies = ?passed, "All policies passed");
                None
            }
            Ok(PolicyOutcome::Denied { policy, reason, .. }) => {
                info!(operation, policy, %reason, "Denied by policy");
                Some(ExecutionResult::Denied { policy, reason })
            }
            Err(policy_fault) => {
                error!(operation, %policy_fault, "Policy implementation fault");
                Some(fault(
                    operation,
                    ExecutionStep::Authorization,
                    policy_fault.into(),
                ))
            }
        }
    }

    /// Save with the aggregate's expected version, then publish. Publication
    /// happens only for a committed save; a lost save publishes nothing.
    async fn commit(
        &self,
        operation: &'static str,
        request: &mut TimeOffRequest,
        mut event: DomainEvent,
        ctx: &ExecutionContext,
    ) -> Result<(), ExecutionFault> {
        let committed = match self.store.save(request, request.version()).await {
            Ok(version) => version,
            Err(StoreError::VersionConflict { expected, stored }) => {
                info!(
                    operation,
                    request_id = %request.id(),
                    %expected,
                    %stored,
                    "Optimistic lock lost to a concurrent execution"
                );
                return Err(ExecutionFault::new(
                    operation,
                    ExecutionStep::Persistence,
                    FaultKind::Conflict,
                ));
            }
            Err(err) => {
                error!(operation, %err, "Save failed");
                return Err(ExecutionFault::new(
                    operation,
                    ExecutionStep::Persistence,
                    err.into(),
                ));
            }
        };
        request.set_version(committed);

        event.metadata.correlation_id = ctx.correlation_id.clone();
        let event_name = event.name();
        let sequence = event.sequence;
        if let Err(err) = self.publisher.publish(event).await {
            error!(operation, %err, "Event publication failed after commit");
            return Err(ExecutionFault::new(
                operation,
                ExecutionStep::Publication,
                err.into(),
            ));
        }

        info!(
            operation,
            request_id = %request.id(),
            event = event_name,
            sequence = %sequence,
            version = %committed,
            "Command applied"
        );
        Ok(())
    }
}

fn fault(operation: &'static str, step: ExecutionStep, kind: FaultKind) -> ExecutionResult {
    ExecutionResult::Fault(ExecutionFault::new(operation, step, kind))
}

#[async_trait]
impl<S, P> CommandExecutor for RequestExecutionService<S, P>
where
    S: RequestStorePort,
    P: PlanRulesPort,
{
    #[instrument(
        skip(self, command, actor, ctx),
        fields(operation = command.kind.name(), actor_id = %actor.id, tenant = %ctx.tenant)
    )]
    async fn execute(
        &self,
        command: Command,
        actor: Actor,
        ctx: ExecutionContext,
    ) -> ExecutionResult {
        self.run(command, &actor, &ctx, false).await
    }
}

//! Request queries - the read side
//!
//! Pure retrieval: composable predicates over the store's snapshot, a
//! declared ordering, and presentation of whatever matched. Queries never
//! write and never block on executions; a search that races a command sees
//! the last committed state, not the in-flight one.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::dto::RequestView;
use crate::application::ports::outbound::{PlanRulesPort, RequestStorePort, StoreError};
use crate::application::services::presenter::RequestPresenter;
use crate::domain::aggregates::{RequestState, TimeOffRequest};
use crate::domain::value_objects::{RequestId, TenantId, UserId};

/// AND-composed request predicates. An empty filter matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFilter {
    #[serde(default)]
    pub requester: Option<UserId>,
    #[serde(default)]
    pub state: Option<RequestState>,
    #[serde(default)]
    pub starts_on_or_after: Option<NaiveDate>,
}

impl RequestFilter {
    pub fn with_requester(mut self, requester: UserId) -> Self {
        self.requester = Some(requester);
        self
    }

    pub fn with_state(mut self, state: RequestState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.starts_on_or_after = Some(date);
        self
    }

    fn matches(&self, request: &TimeOffRequest) -> bool {
        if let Some(requester) = self.requester {
            if request.requester() != requester {
                return false;
            }
        }
        if let Some(state) = self.state {
            if request.state() != state {
                return false;
            }
        }
        if let Some(cutoff) = self.starts_on_or_after {
            // requests without a start date never match a date filter
            match request.starts_on() {
                Some(starts_on) if starts_on >= cutoff => {}
                _ => return false,
            }
        }
        true
    }
}

/// How search results are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrdering {
    NewestFirst,
    OldestFirst,
}

impl Default for RequestOrdering {
    fn default() -> Self {
        Self::NewestFirst
    }
}

/// Read-side service over the request store.
pub struct RequestQueryService<S, P>
where
    S: RequestStorePort,
    P: PlanRulesPort,
{
    store: Arc<S>,
    plans: Arc<P>,
}

impl<S, P> RequestQueryService<S, P>
where
    S: RequestStorePort,
    P: PlanRulesPort,
{
    pub fn new(store: Arc<S>, plans: Arc<P>) -> Self {
        Self { store, plans }
    }

    /// All of a tenant's requests that match `filter`, ordered and
    /// presented.
    #[instrument(skip(self, filter), fields(tenant = %tenant))]
    pub async fn search(
        &self,
        tenant: TenantId,
        filter: &RequestFilter,
        ordering: RequestOrdering,
    ) -> Result<Vec<RequestView>, StoreError> {
        let rules = self.plans.rules_for(tenant).await?;
        let mut requests: Vec<TimeOffRequest> = self
            .store
            .list_by_tenant(tenant)
            .await?
            .into_iter()
            .filter(|request| filter.matches(request))
            .collect();

        requests.sort_by(|a, b| match ordering {
            RequestOrdering::NewestFirst => b.submitted_at().cmp(&a.submitted_at()),
            RequestOrdering::OldestFirst => a.submitted_at().cmp(&b.submitted_at()),
        });

        debug!(matched = requests.len(), "request search completed");
        Ok(requests
            .iter()
            .map(|request| RequestPresenter::present(request, &rules))
            .collect())
    }

    /// One request as a view, if it exists within the tenant.
    #[instrument(skip(self), fields(tenant = %tenant, request_id = %id))]
    pub async fn find(
        &self,
        tenant: TenantId,
        id: RequestId,
    ) -> Result<Option<RequestView>, StoreError> {
        let rules = self.plans.rules_for(tenant).await?;
        Ok(self
            .store
            .load(id)
            .await?
            .filter(|request| request.tenant() == tenant)
            .map(|request| RequestPresenter::present(&request, &rules)))
    }
}

//! Policies - Named authorization rules evaluated before any mutation

mod policy;
mod request_policies;

pub use policy::{PolicyArgs, PolicyDecision, PolicyFault, PolicySubject, RequestPolicy};
pub use request_policies::{CanDecide, CanRequest, FeatureEnabled, OwnRequest, TenantBoundary};

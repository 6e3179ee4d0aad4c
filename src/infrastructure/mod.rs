//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: In-memory request store and plan rules directory
//! - Event bus: Fan-out delivery of domain events to subscribers
//! - Notifications: The subscriber rendering events into messages
//! - Config: Application configuration
//! - State: Shared application state and worker lifecycle

pub mod config;
pub mod event_bus;
pub mod notifications;
pub mod persistence;
pub mod state;

//! Persistence adapters
//!
//! In-memory implementations of the storage ports. Durable backends plug in
//! behind the same port traits without the pipeline noticing.

mod plan_directory;
mod request_store;

pub use plan_directory::InMemoryPlanDirectory;
pub use request_store::InMemoryRequestStore;

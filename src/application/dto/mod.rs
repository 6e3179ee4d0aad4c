//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so callers (runners, queue consumers,
//! future HTTP surfaces) can serialize/deserialize without reaching into the
//! domain model.

pub mod command;
pub mod views;

pub use command::{Command, CommandKind};
pub use views::RequestView;

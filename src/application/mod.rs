//! Application layer - Use cases and ports
//!
//! This layer contains:
//! - DTOs: Commands in, views out
//! - Ports: Inbound (what callers bind to) and outbound (what the engine
//!   requires from stores and buses)
//! - Services: The execution pipeline, validation, presentation and queries

pub mod dto;
pub mod ports;
pub mod services;

//! Ports - Boundary interfaces for the application layer

pub mod inbound;
pub mod outbound;

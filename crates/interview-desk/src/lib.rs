//! Core library for the portal's interview desk: scheduling, confirmation,
//! completion, and the derived task feed for hiring and readiness
//! interviews.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

//! TextLift Gateway HTTP API Server
//!
//! Exposes the recognition client to a browser front end: JSON and raw
//! upload recognition endpoints, session reset and health.

pub mod error;
pub mod health_api;
pub mod recognize_api;
pub mod server;
pub mod session_api;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};

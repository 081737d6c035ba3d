//! REST API for the unit's web client.
//!
//! Routes are nested under `/api/`. Every request passes through the
//! audit logger and the CORS layer before reaching its handler.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::build_router;
pub use server::{start_server_on, ApiServer};
pub use types::ApiContext;

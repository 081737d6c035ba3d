//! API middleware.
//!
//! Execution order (outermost → innermost):
//! 1. CORS: answers preflight requests
//! 2. Audit logger: one line per request with status and latency

pub mod audit;

//! Service plumbing shared by mall HTTP services: health probes, tracing setup,
//! and the request-id / trace middleware stack.

pub mod health;
pub mod middleware;
pub mod tracing;

//! Employee directory facade over one upstream HTTP service.
//!
//! The crate follows a hexagonal layout: `domain` holds the directory logic
//! and its ports, `outbound` implements the upstream client and the query
//! cache, `inbound` exposes the REST surface, and `server` wires them
//! together.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;

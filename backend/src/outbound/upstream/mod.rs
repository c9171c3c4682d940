//! Adapter for the upstream employee service.

mod dto;
mod http_source;
mod retry;

pub use http_source::UpstreamEmployeeSource;
pub use retry::{BackoffJitter, RandomJitter, RetryPolicy, Sleeper, TokioSleeper};

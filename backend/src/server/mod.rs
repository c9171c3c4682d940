//! Server construction and adapter wiring.

mod config;

pub use config::{AppConfig, ConfigError};

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::domain::ports::{DirectoryCache, EmployeeSource};
use crate::domain::EmployeeDirectory;
use crate::inbound::http::{self, HttpState};
use crate::middleware::Trace;
use crate::outbound::cache::InMemoryDirectoryCache;
use crate::outbound::upstream::{RetryPolicy, UpstreamEmployeeSource};

/// Wire the adapters and run the HTTP server until shutdown.
///
/// # Errors
///
/// Returns an [`std::io::Error`] when the upstream client cannot be built
/// or the listen address cannot be bound.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let policy = RetryPolicy::new(
        config.max_retry_attempts,
        config.initial_retry_delay,
        config.max_backoff,
    );
    let source = UpstreamEmployeeSource::new(
        config.upstream_base_url.clone(),
        config.request_timeout,
        policy,
    )
    .map_err(|error| std::io::Error::other(format!("upstream client setup failed: {error}")))?;

    let source: Arc<dyn EmployeeSource> = Arc::new(source);
    let cache: Arc<dyn DirectoryCache> = Arc::new(InMemoryDirectoryCache::new());
    let directory = Arc::new(EmployeeDirectory::new(source, cache));
    let state = HttpState::new(directory);

    info!(
        bind_addr = %config.bind_addr,
        upstream = %config.upstream_base_url,
        "starting employee directory server"
    );
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Trace)
            .configure(http::configure)
    })
    .bind(config.bind_addr)?
    .run()
    .await
}

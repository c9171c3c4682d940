//! Binary entry-point: configure logging, resolve config, run the server.

use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use employee_api::server::{self, AppConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env()
        .map_err(|error| std::io::Error::other(format!("configuration error: {error}")))?;
    server::run(config).await
}

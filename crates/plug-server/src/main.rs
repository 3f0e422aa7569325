//! plug-server: the PLUG waitlist HTTP service.

use plug_server::config::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    // RUST_LOG wins over the configured level
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env().add_directive("plug=info".parse()?),
        Err(_) => EnvFilter::try_new(format!("warn,plug={}", config.logging.level))?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("PLUG waitlist starting");
    plug_server::run(config).await
}

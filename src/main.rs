use anyhow::{Error, Result, anyhow};
use translate_relay::{api::run_api_server, config::Config, utils::init_tracing};

#[tokio::main]
async fn main() -> Result<(), Error> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    init_tracing();

    let config = Config::load()?;

    run_api_server(config).await
}

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use user_search::{
    config::Config,
    dispatcher::{routes, SearchState},
    observability::{init_tracing, shutdown_tracing},
    server::Server,
};

use super::load_config;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Configuration file (skips the standard search locations)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Dataset file
    #[arg(long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Re-read the dataset on every request
    #[arg(long)]
    pub per_request: bool,
}

impl ServeArgs {
    fn apply(self, config: &mut Config) {
        if let Some(port) = self.port {
            config.service.port = port;
        }
        if let Some(dataset) = self.dataset {
            config.search.dataset_path = dataset;
        }
        if self.per_request {
            config.search.reload_per_request = true;
        }
    }
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);

    init_tracing(&config).context("Failed to initialize tracing")?;

    let state = SearchState::from_config(&config.search)
        .await
        .with_context(|| {
            format!(
                "Failed to load dataset: {}",
                config.search.dataset_path.display()
            )
        })?;

    tracing::info!(
        port = config.service.port,
        environment = %config.service.environment,
        "Serving user search"
    );

    Server::new(config)
        .serve(routes(state))
        .await
        .context("Server failed")?;

    shutdown_tracing();

    Ok(())
}

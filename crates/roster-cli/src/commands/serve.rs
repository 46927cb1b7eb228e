use anyhow::{Context as _, Result};
use clap::Args;
use roster_config::AppConfig;
use roster_store::Store;
use tracing::info;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (defaults to the config file, then 0.0.0.0)
    #[arg(long)]
    pub bind: Option<String>,
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

pub fn serve(store: Store, config: &AppConfig, args: ServeArgs) -> Result<()> {
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let port = args.port.unwrap_or(config.server.port);
    info!(
        participants = store.participants().count()?,
        "participant store ready"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "start async runtime")?;
    runtime.block_on(roster_server::serve(store, &bind, port))?;
    Ok(())
}

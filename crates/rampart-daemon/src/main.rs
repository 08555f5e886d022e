// main.rs — rampartd entry point.
//
// Startup is fail-fast: config load and policy compilation both abort the
// process before the listener binds, so a running server always holds a
// fully compiled, self-consistent policy set.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rampart_config::Config;
use rampart_policy::{builtin_probes, builtin_producers, compile};

/// Rampart harvest server.
#[derive(Parser)]
#[command(name = "rampart-daemon", about = "Policy-driven harvest server")]
struct Cli {
    /// Configuration file to use.
    #[arg(long, default_value = "rampart.yaml")]
    config: PathBuf,

    /// Listen address, overriding the configuration file.
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("rampart_daemon=info".parse()?)
                .add_directive("rampart_policy=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config '{}'", cli.config.display()))?;
    let listen = cli.listen.unwrap_or_else(|| config.listen.clone());

    let policies = compile(&config.policies, &builtin_probes(), &builtin_producers())
        .context("compiling policies")?;
    tracing::info!(policies = policies.len(), "policies compiled");

    let app = rampart_daemon::router(policies);
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("binding '{}'", listen))?;
    tracing::info!(%listen, "serving harvest requests");

    axum::serve(listener, app).await?;
    Ok(())
}

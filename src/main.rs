use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use httpserve::plugin::IndexFile;
use httpserve::store::FsStore;
use httpserve::{ConnectionHandler, Dispatcher, PluginChain, Server, ServerConfig};

/// Minimal HTTP/1.0 static file server.
#[derive(Debug, Parser)]
#[command(name = "httpserve", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to serve (overrides the config file)
    #[arg(short, long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(root) = cli.root {
        config.root = root;
    }
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let mut plugins = PluginChain::new();
    if let Some(index) = config.index_file() {
        plugins = plugins.with(IndexFile::new(index));
    }
    info!(plugins = ?plugins, root = %config.root.display(), "starting");

    let dispatcher = Dispatcher::with_static_files(FsStore::new(&config.root));
    let handler = ConnectionHandler::new(Arc::new(plugins), Arc::new(dispatcher))
        .read_limits(config.read_limits())
        .read_timeout(config.read_timeout());

    let server = Server::bind(config.bind_addr()).await?;
    server.run(handler).await?;
    Ok(())
}

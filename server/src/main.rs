use anyhow::{Context, Result};
use clap::Parser;
use server::{build_app, ServerConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

/// Serve conjunctive search over a sonnet corpus.
///
/// `ADMIN_TOKEN` enables `POST /index/reload`; `CORS_ALLOW_ORIGIN` restricts
/// browser origins.
#[derive(Parser)]
#[command(name = "server")]
struct Args {
    /// Corpus JSON file or a directory of them, re-read on reload
    #[arg(long, default_value = "./data/shakespeare_sonnets.json")]
    corpus: String,
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = ServerConfig::from_env(&args.corpus);
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set, index reload disabled");
    }
    let app = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, corpus = %args.corpus, "serving sonnet search");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

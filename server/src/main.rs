use anyhow::Result;
use axum::Router;
use clap::Parser;
use docsearch::SearchEngine;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use server::build_app;
use server::preload::preload;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// JSON/JSONL file or directory to index at startup
    #[arg(long)]
    preload: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut engine = SearchEngine::default();
    if let Some(path) = &args.preload {
        preload(&mut engine, path).await?;
    }
    let app: Router = build_app(engine);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

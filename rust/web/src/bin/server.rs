//! Standalone statistics server
//!
//! Usage: cargo run -p montyhall_web --bin montyhall-web-server -- --database data/results.db

use clap::Parser;
use montyhall_web::server::DEFAULT_PORT;
use montyhall_web::{LogFormat, ServerConfig, WebServer};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "montyhall-web-server",
    about = "Live Monty Hall statistics over HTTP and server-sent events",
    version
)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// SQLite file for submitted results (in-memory when omitted)
    #[arg(long, env = "MONTYHALL_DB")]
    database: Option<PathBuf>,
    /// Only origin allowed to call the API cross-origin (any when omitted)
    #[arg(long, env = "MONTYHALL_FRONTEND_URL")]
    frontend_url: Option<String>,
    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    montyhall_web::init_logging(format)?;

    let mut config = ServerConfig::new(args.host, args.port);
    if let Some(path) = args.database {
        config = config.with_database(path);
    }
    if let Some(url) = args.frontend_url {
        config = config.with_frontend_url(url);
    }

    tracing::info!(
        host = config.host(),
        port = config.port(),
        database = ?config.database(),
        frontend_url = ?config.frontend_url(),
        "starting Monty Hall statistics server"
    );

    let server = WebServer::new(config)?;
    let handle = server.start().await?;
    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    handle.shutdown().await?;
    Ok(())
}

//! tinysql-server: a TCP front end for the tinysql engine.
//!
//! Accepts connections concurrently, but every statement executes
//! against one shared, mutex-guarded [`Executor`], preserving the
//! core's single-threaded-per-statement contract.

mod connection;
mod error;
mod response;

use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tinysql_core::Executor;

use crate::error::{Result, ServerError};

/// An in-memory SQL engine reachable over a null-byte framed TCP socket.
#[derive(Parser)]
#[command(name = "tinysql-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address and port to listen on.
    #[arg(short, long, env = "TINYSQL_LISTEN", default_value = "0.0.0.0:3003")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    let listener = tokio::net::TcpListener::bind(&cli.listen)
        .await
        .map_err(|source| ServerError::Bind {
            addr: cli.listen.clone(),
            source,
        })?;
    info!(addr = %cli.listen, "tinysql-server listening");

    let engine = Arc::new(Mutex::new(Executor::new()));

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!(error = %err, "failed to accept connection");
                continue;
            }
        };
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            connection::handle(stream, peer, engine).await;
        });
    }
}

//! Per-connection request/response loop.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use tinysql_core::Executor;

use crate::response::{encode_error, encode_outcome};

/// Serves one accepted connection until the peer disconnects.
///
/// Every statement read from the socket is executed against `engine`
/// while holding its lock, serializing execution across all
/// concurrently connected peers.
pub async fn handle(stream: TcpStream, peer: SocketAddr, engine: Arc<Mutex<Executor>>) {
    info!(%peer, "connection accepted");
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let bytes_read = match reader.read_until(0, &mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) => {
                warn!(%peer, error = %err, "connection read error");
                break;
            }
        };
        if buf.last() == Some(&0) {
            buf.pop();
        }
        if bytes_read == 0 {
            break;
        }

        let text = String::from_utf8_lossy(&buf);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let body = run_statement(text, &engine);
        debug!(%peer, response = %body, "sending response");

        let mut framed = body.into_bytes();
        framed.push(0);
        if let Err(err) = write_half.write_all(&framed).await {
            warn!(%peer, error = %err, "connection write error");
            break;
        }
    }
    info!(%peer, "connection closed");
}

fn run_statement(text: &str, engine: &Arc<Mutex<Executor>>) -> String {
    let result = tinysql_core::parse(text).and_then(|stmt| {
        let mut engine = engine.lock().expect("executor mutex poisoned");
        engine.execute(stmt)
    });

    let json = match result {
        Ok(outcome) => encode_outcome(&outcome),
        Err(err) => {
            warn!(error_type = err.error_type(), "statement failed");
            encode_error(&err)
        }
    };
    json.to_string()
}

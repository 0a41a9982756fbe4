//! Connection Handling Module
//!
//! Frames incoming bytes into newline-terminated request lines and writes
//! one reply line per request. Every complete line in the buffer is
//! processed in order; a trailing partial line stays buffered for the next
//! read.

use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::RwLock;
use tracing::trace;

use crate::cache::CachePool;
use crate::protocol::{Command, Reply};
use crate::server::dispatch::execute;

// == Limits ==
/// Sanity cap on a single request line. A line that grows past this is
/// answered with `Invalid command` and the connection is closed.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

const READ_CHUNK: usize = 8 * 1024;

// == Connection Loop ==
/// Serves one client until it disconnects, sends `close`, or misbehaves.
pub async fn handle_connection(
    mut stream: TcpStream,
    pool: Arc<RwLock<CachePool>>,
) -> std::io::Result<()> {
    let mut buffer: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            // Peer closed; any buffered partial line is dropped
            return Ok(());
        }
        buffer.extend_from_slice(&chunk[..n]);

        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = buffer.drain(..=pos).collect();
            if line_bytes.len() - 1 > MAX_LINE_LENGTH {
                stream.write_all(b"Invalid command\n").await?;
                return Ok(());
            }

            let line = String::from_utf8_lossy(&line_bytes[..line_bytes.len() - 1]);
            trace!("request line: {:?}", line.trim_end());

            let reply = match Command::parse(&line) {
                Ok(Command::Close) => {
                    stream.write_all(b"Closing connection\n").await?;
                    // Half-close: FIN on the write side, then stop serving
                    stream.shutdown().await?;
                    return Ok(());
                }
                Ok(command) => {
                    let mut pool = pool.write().await;
                    execute(command, &mut pool, Instant::now())
                }
                Err(err) => Reply::from(err),
            };

            let mut outgoing = reply.to_string();
            outgoing.push('\n');
            stream.write_all(outgoing.as_bytes()).await?;
        }

        if buffer.len() > MAX_LINE_LENGTH {
            stream.write_all(b"Invalid command\n").await?;
            return Ok(());
        }
    }
}

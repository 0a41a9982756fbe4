//! Server Module
//!
//! TCP accept loop feeding the per-connection line protocol. Every accepted
//! client runs in its own task; all tasks share the pool behind one lock.

pub mod connection;
pub mod dispatch;

pub use connection::{handle_connection, MAX_LINE_LENGTH};
pub use dispatch::execute;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::cache::CachePool;

// == Cache Server ==
/// A bound listener plus the pool it serves.
pub struct CacheServer {
    listener: TcpListener,
    pool: Arc<RwLock<CachePool>>,
}

impl CacheServer {
    /// Binds the listening socket.
    pub async fn bind(addr: SocketAddr, pool: Arc<RwLock<CachePool>>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, pool })
    }

    /// The locally bound address (useful when binding port 0 in tests).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the task is cancelled, spawning one task
    /// per client.
    pub async fn serve(self) -> io::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    debug!("accepted connection from {}", peer);
                    let pool = self.pool.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, pool).await {
                            debug!("connection from {} ended with error: {}", peer, e);
                        }
                    });
                }
                Err(e) => {
                    error!("accept failed: {}", e);
                }
            }
        }
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::proxy::session;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tracks concurrently open downstream connections and enforces
/// `config.max_connections`.
#[derive(Default)]
pub struct ConnectionCount(AtomicUsize);

impl ConnectionCount {
    pub fn current(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    fn decrement(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Decrements the shared connection count when a session ends, so the
/// accept loop's limit check stays accurate even on an early return.
struct CountGuard(Arc<ConnectionCount>);

impl Drop for CountGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Binds `config.listen` and runs the accept loop until it returns an
/// unrecoverable error. Each accepted connection dials `config.connection`
/// and hands the pair to [`session::run`].
pub async fn run(config: Arc<Config>) -> Result<()> {
    let listener = TcpListener::bind(config.listen).await.map_err(ProxyError::Io)?;
    info!(listen = %config.listen, upstream = %config.connection.hostname, "proxy listening");

    let connections = Arc::new(ConnectionCount::default());

    loop {
        let (downstream, peer_addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                warn!(%err, "failed to accept connection");
                continue;
            }
        };

        if let Some(max) = config.max_connections {
            if connections.current() >= max {
                warn!(%peer_addr, max, "connection limit reached, dropping");
                drop(downstream);
                continue;
            }
        }

        connections.increment();
        info!(%peer_addr, current = connections.current(), "accepted connection");

        let config = config.clone();
        let connections = connections.clone();
        tokio::spawn(async move {
            let _count_guard = CountGuard(connections);
            match connect_upstream(&config).await {
                Ok(upstream) => session::run(downstream, upstream, config).await,
                Err(err) => {
                    warn!(%peer_addr, %err, "failed to connect upstream, dropping client");
                }
            }
        });
    }
}

async fn connect_upstream(config: &Config) -> Result<TcpStream> {
    let target = format!("{}:{}", config.connection.hostname, config.connection.port);
    match timeout(CONNECT_TIMEOUT, TcpStream::connect(&target)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(err)) => Err(ProxyError::Io(err)),
        Err(_) => Err(ProxyError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("connect to {target} timed out"),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_count_tracks_increment_and_guard_drop() {
        let counter = Arc::new(ConnectionCount::default());
        counter.increment();
        counter.increment();
        assert_eq!(counter.current(), 2);
        {
            let _guard = CountGuard(counter.clone());
        }
        assert_eq!(counter.current(), 1);
    }
}

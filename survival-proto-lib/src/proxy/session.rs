use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info, warn};

use crate::buffer::ByteBuffer;
use crate::config::Config;
use crate::error::ProxyError;
use crate::packet::{is_local_downstream, Direction, Opcode, Packet};
use crate::prober::{self, ProbeResult};
use crate::{parser, serializer};

const READ_CHUNK: usize = 4096;

/// Ensures a session's teardown runs exactly once even though both
/// directions pump independently and either one can be the first to see
/// EOF, a malformed packet, or a local `Disconnect`.
pub struct DisconnectGuard {
    fired: AtomicBool,
    notify: Notify,
}

impl Default for DisconnectGuard {
    fn default() -> Self {
        DisconnectGuard { fired: AtomicBool::new(false), notify: Notify::new() }
    }
}

impl DisconnectGuard {
    /// Returns `true` the first time it is called for this session, and
    /// wakes any task waiting in [`Self::wait`]. Every later call returns
    /// `false`.
    pub fn fire(&self) -> bool {
        let already_fired = self.fired.swap(true, Ordering::SeqCst);
        if !already_fired {
            self.notify.notify_waiters();
        }
        !already_fired
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    pub async fn wait(&self) {
        // Register interest before checking the flag so a `fire()` that
        // lands between the check and the await can't be missed.
        let notified = self.notify.notified();
        if self.is_fired() {
            return;
        }
        notified.await;
    }
}

type SharedWriter = Arc<Mutex<OwnedWriteHalf>>;

/// Runs one proxied connection pair to completion. Spawns one pump per
/// direction and returns once both have stopped (peer close, I/O error,
/// or a malformed/local-disconnect packet on either side).
pub async fn run(downstream: TcpStream, upstream: TcpStream, config: Arc<Config>) {
    let (down_r, down_w) = downstream.into_split();
    let (up_r, up_w) = upstream.into_split();
    let down_w: SharedWriter = Arc::new(Mutex::new(down_w));
    let up_w: SharedWriter = Arc::new(Mutex::new(up_w));
    let guard = Arc::new(DisconnectGuard::default());

    let request_pump = tokio::spawn(pump_requests(
        down_r,
        up_w.clone(),
        down_w.clone(),
        config,
        guard.clone(),
    ));
    let response_pump = tokio::spawn(pump_responses(up_r, down_w.clone(), guard.clone()));

    let _ = tokio::join!(request_pump, response_pump);
    debug!("session torn down");
}

/// Client-to-server direction. Intercepts `Disconnect` and `ListPing`
/// locally instead of forwarding them upstream.
async fn pump_requests(
    mut reader: tokio::net::tcp::OwnedReadHalf,
    upstream_writer: SharedWriter,
    downstream_writer: SharedWriter,
    config: Arc<Config>,
    guard: Arc<DisconnectGuard>,
) {
    let mut input = ByteBuffer::new();
    let mut chunk = [0u8; READ_CHUNK];
    let mut write_buf = bytes::BytesMut::new();

    loop {
        if guard.is_fired() {
            return;
        }

        loop {
            match prober::probe(&input) {
                ProbeResult::Complete(_) => {}
                ProbeResult::NeedMore => break,
                ProbeResult::Malformed => {
                    warn!("malformed request packet, kicking connection");
                    guard.fire();
                    return;
                }
            }

            let packet = match parser::parse(&mut input, Direction::Request) {
                Ok(packet) => packet,
                Err(err) => {
                    warn!(%err, "failed to parse request packet, kicking connection");
                    guard.fire();
                    return;
                }
            };

            if is_local_downstream(packet.opcode) {
                if handle_local(&packet, &downstream_writer, &config, &guard).await.is_err() {
                    guard.fire();
                    return;
                }
                if guard.is_fired() {
                    return;
                }
                continue;
            }

            write_buf.clear();
            if let Err(err) = serializer::serialize(&packet, &mut write_buf) {
                warn!(%err, "failed to re-serialize request packet");
                guard.fire();
                return;
            }
            let mut writer = upstream_writer.lock().await;
            if writer.write_all(&write_buf).await.is_err() {
                guard.fire();
                return;
            }
        }

        let n = tokio::select! {
            res = reader.read(&mut chunk) => res,
            _ = guard.wait() => return,
        };
        match n {
            Ok(0) => {
                guard.fire();
                return;
            }
            Ok(n) => input.append(&chunk[..n]),
            Err(_) => {
                guard.fire();
                return;
            }
        }
    }
}

/// Server-to-client direction. Every packet is forwarded as-is; there is
/// no local interception on this side.
async fn pump_responses(
    mut reader: tokio::net::tcp::OwnedReadHalf,
    downstream_writer: SharedWriter,
    guard: Arc<DisconnectGuard>,
) {
    let mut input = ByteBuffer::new();
    let mut chunk = [0u8; READ_CHUNK];
    let mut write_buf = bytes::BytesMut::new();

    loop {
        if guard.is_fired() {
            return;
        }

        loop {
            match prober::probe(&input) {
                ProbeResult::Complete(_) => {}
                ProbeResult::NeedMore => break,
                ProbeResult::Malformed => {
                    warn!("malformed response packet, kicking connection");
                    guard.fire();
                    return;
                }
            }

            let packet = match parser::parse(&mut input, Direction::Response) {
                Ok(packet) => packet,
                Err(err) => {
                    warn!(%err, "failed to parse response packet, kicking connection");
                    guard.fire();
                    return;
                }
            };

            write_buf.clear();
            if let Err(err) = serializer::serialize(&packet, &mut write_buf) {
                warn!(%err, "failed to re-serialize response packet");
                guard.fire();
                return;
            }
            let mut writer = downstream_writer.lock().await;
            if writer.write_all(&write_buf).await.is_err() {
                guard.fire();
                return;
            }
        }

        let n = tokio::select! {
            res = reader.read(&mut chunk) => res,
            _ = guard.wait() => return,
        };
        match n {
            Ok(0) => {
                guard.fire();
                return;
            }
            Ok(n) => input.append(&chunk[..n]),
            Err(_) => {
                guard.fire();
                return;
            }
        }
    }
}

async fn handle_local(
    packet: &Packet,
    downstream_writer: &SharedWriter,
    config: &Config,
    guard: &DisconnectGuard,
) -> Result<(), ProxyError> {
    match packet.opcode {
        Opcode::Disconnect => {
            info!("client requested disconnect");
            guard.fire();
            Ok(())
        }
        Opcode::ListPing => {
            debug!("replying to list ping locally");
            let reply = Packet::new(
                Direction::Ping,
                Opcode::Disconnect,
                crate::packet::Body::Disconnect { message: config.ping_description.clone() },
            );
            let mut out = bytes::BytesMut::new();
            serializer::serialize(&reply, &mut out)?;
            downstream_writer.lock().await.write_all(&out).await?;
            guard.fire();
            Ok(())
        }
        other => {
            unreachable!("is_local_downstream admitted an unhandled opcode {other:?}")
        }
    }
}

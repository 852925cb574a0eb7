//! Reachability check for a single TCP port.
//!
//! Name resolution and a non-blocking connect share one deadline. Anything
//! that does not complete in time is simply "closed", never an error.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use socket2::Domain;
use socket2::Protocol;
use socket2::Socket;
use socket2::Type;
use tokio::net::TcpSocket;
use tokio::time::timeout;
use tracing::debug;
use tracing::instrument;

use crate::resolve::Resolver;

/// Checks whether a TCP port accepts connections.
#[derive(Debug, Clone, Default)]
pub struct TcpProber {
    resolver: Resolver,
}

impl TcpProber {
    #[must_use]
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Makes one connection attempt to `host:port`, giving up after
    /// `deadline`. The deadline covers resolving `host` too.
    ///
    /// Returns `false` for resolution failures, refusals, unreachable
    /// networks and timeouts alike.
    #[instrument(skip(self))]
    pub async fn probe(&self, host: &str, port: u16, deadline: Duration) -> bool {
        match timeout(deadline, self.connect(host, port)).await {
            Ok(Ok(addr)) => {
                debug!(%addr, "port open");
                true
            }
            Ok(Err(error)) => {
                debug!(?error, "port closed");
                false
            }
            Err(_elapsed) => {
                debug!("deadline elapsed before the port answered");
                false
            }
        }
    }

    /// Resolves `host`, then issues a non-blocking connect and waits for it
    /// to settle.
    ///
    /// Every socket created here is owned by a local and dropped on return,
    /// so the descriptor is closed on success, failure and cancellation.
    async fn connect(&self, host: &str, port: u16) -> Result<SocketAddr> {
        let addr = self.resolver.lookup(host, port).await?;

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
            .context("failed creating TCP socket")?;
        socket
            .set_nonblocking(true)
            .context("unable to set O_NONBLOCK")?;
        let socket = TcpSocket::from_std_stream(socket.into());

        let stream = socket
            .connect(addr)
            .await
            .with_context(|| format!("TCP connect to {addr} failed"))?;

        // SO_ERROR
        if let Some(error) = stream.take_error().context("unable to read socket error")? {
            return Err(error)
                .with_context(|| format!("TCP connect to {addr} completed with error"));
        }

        Ok(addr)
    }
}

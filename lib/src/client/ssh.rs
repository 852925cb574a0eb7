use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use russh::client::Handle;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use super::Client;
use super::ClientFactory;
use crate::resolve::Resolver;
use crate::target::Target;
use crate::wordlist::Credential;

/// Time allowed for each step of an attempt unless told otherwise.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(10);

// Factory --------------------------------------------------------------------

/// Factory for building SSH clients.
#[derive(Debug, Clone)]
pub struct SshClientFactory {
    resolver: Resolver,
    timeout: Duration,
}

impl SshClientFactory {
    /// `timeout` bounds resolving plus the TCP connect, the handshake, the
    /// password exchange and session inactivity individually.
    #[must_use]
    pub fn new(resolver: Resolver, timeout: Duration) -> Self {
        Self { resolver, timeout }
    }
}

impl Default for SshClientFactory {
    fn default() -> Self {
        Self::new(Resolver::new(), DEFAULT_AUTH_TIMEOUT)
    }
}

impl ClientFactory for SshClientFactory {
    fn client(&self, target: &Target) -> Box<dyn Client> {
        Box::new(SshClient::new(self.resolver.clone(), target, self.timeout))
    }
}

// Client ---------------------------------------------------------------------

/// SSH client.
pub struct SshClient {
    resolver: Resolver,
    target: Target,
    timeout: Duration,
    session: Option<Handle<SshClientHandler>>,
}

impl SshClient {
    #[must_use]
    pub fn new(resolver: Resolver, target: &Target, timeout: Duration) -> Self {
        Self {
            resolver,
            target: target.to_owned(),
            timeout,
            session: None,
        }
    }
}

#[async_trait]
impl Client for SshClient {
    async fn connect(&mut self) -> Result<()> {
        if self.session.is_some() {
            bail!("ssh session is already connected");
        }

        let resolver = &self.resolver;
        let target = &self.target;
        let stream = timeout(self.timeout, async {
            let addr = resolver.lookup(target.host(), target.port()).await?;
            TcpStream::connect(addr)
                .await
                .with_context(|| format!("TCP connect to {addr} failed"))
        })
        .await
        .context("TCP connect timed out")??;

        let config = Arc::new(russh::client::Config {
            inactivity_timeout: Some(self.timeout),
            ..Default::default()
        });
        let handler = SshClientHandler::default();

        let session = timeout(
            self.timeout,
            russh::client::connect_stream(config, stream, handler),
        )
        .await
        .context("ssh handshake timed out")?
        .context("ssh handshake failed")?;
        self.session = Some(session);

        Ok(())
    }

    async fn authenticate(&mut self, credential: &Credential) -> Result<bool> {
        let Some(ref mut session) = self.session else {
            bail!("no ssh session");
        };

        let result = timeout(
            self.timeout,
            session.authenticate_password(&credential.user, &credential.password),
        )
        .await
        .context("ssh authentication timed out")?
        .context("ssh authentication failed")?;

        Ok(result.success())
    }

    async fn disconnect(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            bail!("no ssh session");
        };
        session
            .disconnect(russh::Disconnect::ByApplication, "", "English")
            .await?;
        Ok(())
    }
}

// russh details --------------------------------------------------------------

#[derive(Debug, Default)]
struct SshClientHandler;

impl russh::client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }

    async fn auth_banner(
        &mut self,
        banner: &str,
        _session: &mut russh::client::Session,
    ) -> Result<(), Self::Error> {
        debug!(banner = banner.trim_end(), "ssh auth banner");
        Ok(())
    }
}

// Tests ----------------------------------------------------------------------

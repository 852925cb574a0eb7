//! SSH client capability used by the brute forcer.
//!
//! The brute forcer only sees these traits; the protocol itself lives behind
//! [`SshClient`].

mod ssh;

use anyhow::Result;
use async_trait::async_trait;

pub use self::ssh::SshClient;
pub use self::ssh::SshClientFactory;
use crate::target::Target;
use crate::wordlist::Credential;

/// One session against a target. Built fresh for every credential.
#[async_trait]
pub trait Client: Send {
    /// Opens the transport and performs the protocol handshake.
    async fn connect(&mut self) -> Result<()>;

    /// Attempts password authentication.
    ///
    /// `Ok(false)` is an explicit rejection by the server. Errors mean the
    /// exchange itself broke down.
    async fn authenticate(&mut self, credential: &Credential) -> Result<bool>;

    /// Tears the session down.
    async fn disconnect(&mut self) -> Result<()>;
}

/// Factory for building clients.
pub trait ClientFactory: Send + Sync {
    fn client(&self, target: &Target) -> Box<dyn Client>;
}

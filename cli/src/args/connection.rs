use std::net::SocketAddr;
use std::sync::Arc;

use clap::Args;
use sshcred::brute::BruteForcer;
use sshcred::client::SshClientFactory;
use sshcred::engine::Engine;
use sshcred::probe::TcpProber;
use sshcred::resolve::Resolver;
use sshcred::target::Target;
use sshcred::target::SSH_PORT;

const HEADING: Option<&str> = Some("Connection Options");

/// Arguments for reaching the target.
#[derive(Debug, Args, Clone)]
pub struct ConnectionArgs {
    /// Time to allow the reachability probe to complete.
    #[clap(long, env = "SSHCRED_TIMEOUT", default_value = "5s", help_heading = HEADING)]
    pub timeout: humantime::Duration,

    /// Time to allow each step of an authentication attempt (connect,
    /// handshake, password exchange).
    #[clap(long, env = "SSHCRED_AUTH_TIMEOUT", default_value = "10s", help_heading = HEADING)]
    pub auth_timeout: humantime::Duration,

    /// DNS server (`ip:port`) to resolve the host with, instead of the
    /// system config.
    #[clap(long, env = "SSHCRED_NAMESERVER", help_heading = HEADING)]
    pub nameserver: Option<SocketAddr>,
}

impl ConnectionArgs {
    pub fn target(&self, host: &str) -> Target {
        Target::builder()
            .host(host)
            .port(SSH_PORT)
            .timeout(self.timeout.into())
            .build()
    }

    pub fn engine(&self) -> Engine {
        let resolver = match self.nameserver {
            Some(nameserver) => Resolver::with_nameserver(nameserver),
            None => Resolver::new(),
        };
        let prober = TcpProber::new(resolver.clone());
        let client_factory = SshClientFactory::new(resolver, self.auth_timeout.into());

        Engine::builder()
            .prober(prober)
            .brute_forcer(BruteForcer::new(Arc::new(client_factory)))
            .build()
    }
}

use std::net::IpAddr;
use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;
use anyhow::Result;
use hickory_resolver::config::NameServerConfigGroup;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use tracing::warn;

/// Turns a host string into a socket address.
///
/// IP literals are used as-is. Anything else goes through the system DNS
/// configuration, including the hosts file.
#[derive(Debug, Clone)]
pub struct Resolver {
    dns: Option<TokioResolver>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Creates a resolver from the system DNS config.
    ///
    /// If the system config cannot be read, only IP literals will resolve.
    #[must_use]
    pub fn new() -> Self {
        let dns = match TokioResolver::builder_tokio() {
            Ok(builder) => Some(builder.build()),
            Err(error) => {
                warn!(?error, "system dns config unavailable, only ip literals will resolve");
                None
            }
        };
        Self { dns }
    }

    /// Creates a resolver that sends every query to `nameserver` over plain
    /// UDP/TCP, ignoring the system config.
    #[must_use]
    pub fn with_nameserver(nameserver: SocketAddr) -> Self {
        let servers =
            NameServerConfigGroup::from_ips_clear(&[nameserver.ip()], nameserver.port(), true);
        let config = ResolverConfig::from_parts(None, vec![], servers);
        let dns = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .build();
        Self { dns: Some(dns) }
    }

    /// Resolves `host` and pairs the first address found with `port`.
    ///
    /// # Errors
    ///
    /// - If `host` is not an IP literal and no DNS config is available
    /// - If the lookup fails or returns no addresses
    pub async fn lookup(&self, host: &str, port: u16) -> Result<SocketAddr> {
        if let Ok(ip) = IpAddr::from_str(host) {
            return Ok(SocketAddr::new(ip, port));
        }

        let dns = self.dns.as_ref().context("no dns config to resolve host")?;
        let ip = dns
            .lookup_ip(host)
            .await
            .with_context(|| format!("failed resolving {host}"))?
            .iter()
            .next()
            .with_context(|| format!("no addresses found for {host}"))?;

        Ok(SocketAddr::new(ip, port))
    }
}

use std::fmt;
use std::time::Duration;

use bon::Builder;

/// Port probed and authenticated against unless told otherwise.
pub const SSH_PORT: u16 = 22;

/// Time allowed for the reachability probe unless told otherwise.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Host being checked. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Target {
    /// IP literal or name to resolve.
    #[builder(into)]
    host: String,

    #[builder(default = SSH_PORT)]
    port: u16,

    /// Deadline for the reachability probe.
    #[builder(default = DEFAULT_PROBE_TIMEOUT)]
    timeout: Duration,
}

/// Accessors
impl Target {
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

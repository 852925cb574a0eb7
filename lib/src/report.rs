//! The single document a run produces.

use serde::Serialize;
use serde::Serializer;

use crate::wordlist::Credential;
use crate::Error;

/// Report id written when none was given or the given one was invalid.
pub const NO_REPORT_ID: i64 = -1;

/// Where the run ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Arguments rejected before any network activity.
    Invalid,
    /// Target known, probe not finished yet.
    Probing,
    /// Port did not accept a connection.
    Closed,
    /// Port accepted a connection, credentials not tried yet.
    Open,
    /// A credential authenticated.
    Found,
    /// Every credential was tried without success.
    Exhausted,
    /// The credential source could not be read.
    SourceError,
}

/// Outcome of a run, serialized once to stdout.
///
/// Each stage consumes the value and hands back a refined copy; nothing
/// mutates it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    #[serde(serialize_with = "report_id_or_sentinel")]
    report_id: Option<i64>,
    host: String,
    #[serde(skip)]
    status: Status,
    message: String,
    #[serde(serialize_with = "empty_if_none")]
    error: Option<String>,
    #[serde(serialize_with = "empty_if_none")]
    user: Option<String>,
    #[serde(serialize_with = "empty_if_none")]
    password: Option<String>,
}

/// Constructors
impl RunResult {
    /// Starts a result for a validated invocation.
    #[must_use]
    pub fn new(report_id: Option<i64>, host: impl Into<String>) -> Self {
        Self {
            report_id,
            host: host.into(),
            status: Status::Probing,
            message: String::new(),
            error: None,
            user: None,
            password: None,
        }
    }

    /// Result for an invocation rejected before probing.
    #[must_use]
    pub fn invalid(error: &Error) -> Self {
        Self {
            report_id: None,
            host: String::new(),
            status: Status::Invalid,
            message: error.message().to_owned(),
            error: Some(error.to_string()),
            user: None,
            password: None,
        }
    }
}

/// Transitions
impl RunResult {
    #[must_use]
    pub fn closed(self, port: u16) -> Self {
        Self {
            status: Status::Closed,
            message: format!("port {port} (ssh) is closed"),
            ..self
        }
    }

    #[must_use]
    pub fn open(self, port: u16) -> Self {
        Self {
            status: Status::Open,
            message: format!("port {port} (ssh) is open"),
            ..self
        }
    }

    #[must_use]
    pub fn found(self, credential: Credential) -> Self {
        Self {
            status: Status::Found,
            message: "ssh login succeeded".to_owned(),
            user: Some(credential.user),
            password: Some(credential.password),
            ..self
        }
    }

    #[must_use]
    pub fn exhausted(self) -> Self {
        Self {
            status: Status::Exhausted,
            message: "no valid password found".to_owned(),
            ..self
        }
    }

    /// Keeps the message from the previous stage and records the error.
    #[must_use]
    pub fn source_error(self, error: &Error) -> Self {
        Self {
            status: Status::SourceError,
            error: Some(error.to_string()),
            ..self
        }
    }
}

/// Accessors
impl RunResult {
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        let user = self.user.as_ref()?;
        let password = self.password.as_ref()?;
        Some(Credential::new(user, password))
    }

    /// Process exit status for this result.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self.status {
            Status::Invalid | Status::SourceError => 1,
            Status::Probing
            | Status::Closed
            | Status::Open
            | Status::Found
            | Status::Exhausted => 0,
        }
    }

    /// Renders the result as an indented JSON document.
    ///
    /// # Errors
    ///
    /// If serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn report_id_or_sentinel<S: Serializer>(id: &Option<i64>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(id.unwrap_or(NO_REPORT_ID))
}

fn empty_if_none<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.as_deref().unwrap_or_default())
}

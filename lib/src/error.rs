use camino::Utf8PathBuf;

/// Failures that end a run early and show up in its result.
///
/// Per-credential failures are not represented here, they are recovered
/// inside the brute force loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Wrong number of positional arguments, or an empty host.
    #[error("usage: [REPORT_ID] <HOST> <WORDLIST>")]
    Usage,

    /// Report id that is not a positive integer.
    #[error("reportId must be a positive integer, got {0:?}")]
    InvalidReportId(String),

    /// Credential source could not be opened.
    #[error("unable to open credentials file {path}: {source}")]
    WordlistOpen {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Credential source failed part way through.
    #[error("unable to read credentials file {path}: {source}")]
    WordlistRead {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Anything that prevents the run from being set up, such as a log file
    /// that cannot be created.
    #[error("{0:#}")]
    Setup(#[from] anyhow::Error),
}

impl Error {
    /// Human readable summary used as the result message when the run is
    /// rejected before probing.
    ///
    /// Wordlist errors only happen after the probe, and those results keep
    /// the probe's message instead (see [`RunResult::source_error`]). Their
    /// summary here is for logging.
    ///
    /// [`RunResult::source_error`]: crate::report::RunResult::source_error
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Error::InvalidReportId(_) => "invalid reportId argument",
            Error::WordlistOpen { .. } | Error::WordlistRead { .. } => {
                "unable to read credentials file"
            }
            Error::Usage | Error::Setup(_) => "invalid arguments",
        }
    }

    /// Whether the error means the credential source was unusable.
    #[must_use]
    pub fn is_wordlist(&self) -> bool {
        matches!(self, Error::WordlistOpen { .. } | Error::WordlistRead { .. })
    }
}

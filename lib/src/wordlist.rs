use std::fmt;

use async_stream::try_stream;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tracing::debug;

use crate::Error;

const DELIMITER: char = ':';

/// Username and password pair to try against the target.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub user: String,
    pub password: String,
}

impl Credential {
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Splits a `user:password` line on the first delimiter.
    ///
    /// Returns [`None`] if the line has no delimiter at all. Everything after
    /// the first delimiter is the password, including further delimiters.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let (user, password) = line.split_once(DELIMITER)?;
        Some(Self::new(user, password))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credential source backed by a text file, one `user:password` per line.
#[derive(Debug)]
pub struct Wordlist {
    path: Utf8PathBuf,
    file: File,
}

impl Wordlist {
    /// Opens the file so that access problems surface before any attempt is
    /// made.
    ///
    /// # Errors
    ///
    /// If the file cannot be opened.
    pub async fn open(path: &Utf8Path) -> Result<Self, Error> {
        let file = File::open(path).await.map_err(|source| Error::WordlistOpen {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self {
            path: path.to_owned(),
            file,
        })
    }

    /// Lazily yields credentials in file order.
    ///
    /// Lines without a delimiter are skipped. An I/O error while reading is
    /// yielded once and ends the stream.
    pub fn credentials(self) -> BoxStream<'static, Result<Credential, Error>> {
        let Self { path, file } = self;
        try_stream! {
            let mut lines = BufReader::new(file).lines();
            let mut line_no = 0_usize;
            let mut skipped = 0_usize;

            while let Some(line) = lines
                .next_line()
                .await
                .map_err(|source| Error::WordlistRead { path: path.clone(), source })?
            {
                line_no += 1;
                match Credential::parse_line(&line) {
                    Some(credential) => yield credential,
                    None => {
                        skipped += 1;
                        debug!(%path, line_no, "skipping line without delimiter");
                    }
                }
            }

            debug!(%path, lines = line_no, skipped, "wordlist exhausted");
        }
        .boxed()
    }
}

use camino::Utf8PathBuf;

use crate::Error;

/// Validated positional arguments: `[REPORT_ID] <HOST> <WORDLIST>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub report_id: Option<i64>,
    pub host: String,
    pub wordlist: Utf8PathBuf,
}

impl Invocation {
    /// Interprets two or three positionals. With three, the first must be a
    /// positive report id.
    ///
    /// # Errors
    ///
    /// - [`Error::Usage`] for any other argument count or an empty host
    /// - [`Error::InvalidReportId`] if the report id is not a positive integer
    pub fn from_positionals<S: AsRef<str>>(args: &[S]) -> Result<Self, Error> {
        let (report_id, host, wordlist) = match args {
            [host, wordlist] => (None, host.as_ref(), wordlist.as_ref()),
            [report_id, host, wordlist] => {
                let report_id = parse_report_id(report_id.as_ref())?;
                (Some(report_id), host.as_ref(), wordlist.as_ref())
            }
            _other => return Err(Error::Usage),
        };

        if host.trim().is_empty() || wordlist.is_empty() {
            return Err(Error::Usage);
        }

        Ok(Self {
            report_id,
            host: host.trim().to_owned(),
            wordlist: Utf8PathBuf::from(wordlist),
        })
    }
}

fn parse_report_id(s: &str) -> Result<i64, Error> {
    match s.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _invalid => Err(Error::InvalidReportId(s.to_owned())),
    }
}

use anyhow::Result;
use clap::Args;
use sshcred::publish::ReportPublisher;
use sshcred::publish::Url;

const HEADING: Option<&str> = Some("Report Options");

/// Arguments for sending the result to a reporting API as well.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Also POST the result document as JSON to this URL.
    #[clap(long, env = "SSHCRED_REPORT_URL", help_heading = HEADING)]
    pub report_url: Option<Url>,

    /// Time to allow the POST to complete.
    #[clap(long, env = "SSHCRED_REPORT_TIMEOUT", default_value = "10s", help_heading = HEADING)]
    pub report_timeout: humantime::Duration,
}

impl ReportArgs {
    /// Publisher for the configured URL, if any.
    pub fn publisher(&self) -> Result<Option<ReportPublisher>> {
        self.report_url
            .clone()
            .map(|url| ReportPublisher::new(url, self.report_timeout.into()))
            .transpose()
    }
}

use bon::Builder;
use camino::Utf8Path;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::brute::BruteForcer;
use crate::probe::TcpProber;
use crate::report::RunResult;
use crate::target::Target;
use crate::wordlist::Wordlist;

/// Runs the probe, then the brute force if the port is open.
#[derive(Builder)]
pub struct Engine {
    prober: TcpProber,
    brute_forcer: BruteForcer,
}

impl Engine {
    /// Drives a validated invocation to a terminal [`RunResult`].
    ///
    /// The wordlist is only opened once the target is known to be
    /// reachable.
    #[instrument(skip_all, fields(%target))]
    pub async fn run(
        &self,
        report_id: Option<i64>,
        target: &Target,
        wordlist: &Utf8Path,
    ) -> RunResult {
        let result = RunResult::new(report_id, target.host());

        let reachable = self
            .prober
            .probe(target.host(), target.port(), target.timeout())
            .await;
        if !reachable {
            info!("target unreachable");
            return result.closed(target.port());
        }
        let result = result.open(target.port());

        let wordlist = match Wordlist::open(wordlist).await {
            Ok(wordlist) => wordlist,
            Err(error) => {
                warn!(%error, summary = error.message(), "credential source unavailable");
                return result.source_error(&error);
            }
        };

        match self.brute_forcer.run(target, wordlist.credentials()).await {
            Ok(Some(credential)) => result.found(credential),
            Ok(None) => result.exhausted(),
            Err(error) => {
                warn!(%error, summary = error.message(), "credential source failed");
                result.source_error(&error)
            }
        }
    }
}

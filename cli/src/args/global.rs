use std::any::Any;
use std::fs::OpenOptions;
use std::io::IsTerminal;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Args;
use tracing::debug;
use tracing_appender::non_blocking;
use tracing_glog::Glog;
use tracing_glog::GlogFields;
use tracing_glog::LocalTime;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

const HEADING: Option<&str> = Some("Global Options");

/// Arguments that control logging. Logs never go to stdout.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Filter directive for stderr logs
    #[clap(long, env = "RUST_LOG", default_value = "error", help_heading = HEADING)]
    pub log_level: String,

    /// Also write logs to this file
    #[clap(long, env = "SSHCRED_LOG_FILE", help_heading = HEADING)]
    pub log_file: Option<Utf8PathBuf>,

    /// Filter directive for the log file
    #[clap(long, default_value = "sshcred=debug,sshcred_cli=debug", help_heading = HEADING)]
    pub file_level: String,
}

/// Guard holder for [`tracing`] things that need to live until the end of the
/// program.
#[derive(Debug, Default)]
pub struct TracingGuard {
    guards: Vec<Box<dyn Any>>,
}

impl GlobalArgs {
    /// Initializes all [`tracing`] config.
    pub fn init_tracing(&self) -> Result<TracingGuard> {
        let mut guard = TracingGuard::default();

        let indicatif_layer = IndicatifLayer::new();

        let stderr_filter = EnvFilter::builder().parse_lossy(&self.log_level);
        let stderr_writer = indicatif_layer.get_stderr_writer();
        let stderr_layer = tracing_subscriber::fmt::layer()
            .event_format(Glog::default().with_timer(LocalTime::default()))
            .fmt_fields(GlogFields::default())
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(stderr_writer)
            .with_filter(stderr_filter);

        let file_layer = match self.log_file {
            Some(ref log_file_path) => {
                let log_file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(log_file_path)
                    .with_context(|| format!("unable to create log file {log_file_path}"))?;
                let (file_writer, file_writer_guard) = non_blocking(log_file);
                guard.guards.push(Box::new(file_writer_guard));

                let file_filter = EnvFilter::builder().parse_lossy(&self.file_level);
                let layer = tracing_subscriber::fmt::layer()
                    .event_format(Glog::default().with_timer(LocalTime::default()))
                    .fmt_fields(GlogFields::default())
                    .with_ansi(false)
                    .with_writer(file_writer)
                    .with_filter(file_filter);
                Some(layer)
            }
            None => None,
        };

        let subscriber = Registry::default()
            .with(stderr_layer)
            .with(file_layer)
            .with(indicatif_layer);
        tracing::subscriber::set_global_default(subscriber)?;

        debug!("Initialized tracing");

        Ok(guard)
    }
}

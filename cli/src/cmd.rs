mod output;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use sshcred::invocation::Invocation;
use sshcred::report::RunResult;
use sshcred::Error;
use tracing::debug;
use tracing::warn;

use crate::args::ConnectionArgs;
use crate::args::GlobalArgs;
use crate::args::ReportArgs;

/// Probe a host for SSH and check credentials from a wordlist.
///
/// Prints a single JSON document on stdout describing the outcome.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// [REPORT_ID] HOST WORDLIST
    ///
    /// REPORT_ID is an optional positive integer echoed in the output,
    /// WORDLIST has one `user:password` pair per line.
    #[arg(value_name = "ARGS", allow_negative_numbers = true)]
    positionals: Vec<String>,

    #[command(flatten)]
    connection_args: ConnectionArgs,

    #[command(flatten)]
    report_args: ReportArgs,

    #[command(flatten)]
    global_args: GlobalArgs,
}

pub async fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return reject_cli(&error),
    };

    let _guard = match cli.global_args.init_tracing() {
        Ok(guard) => guard,
        Err(error) => return output::emit(&RunResult::invalid(&Error::Setup(error))),
    };

    let invocation = match validate(&cli) {
        Ok(invocation) => invocation,
        Err(result) => return output::emit(&result),
    };

    let publisher = match cli.report_args.publisher() {
        Ok(publisher) => publisher,
        Err(error) => return output::emit(&RunResult::invalid(&Error::Setup(error))),
    };

    let target = cli.connection_args.target(&invocation.host);
    let engine = cli.connection_args.engine();
    let result = engine
        .run(invocation.report_id, &target, &invocation.wordlist)
        .await;

    let code = output::emit(&result);
    if let Some(publisher) = publisher {
        if let Err(error) = publisher.publish(&result).await {
            warn!(?error, "failed publishing result");
        }
    }
    code
}

/// Checks the positionals, turning a rejection into its result document.
fn validate(cli: &Cli) -> Result<Invocation, RunResult> {
    Invocation::from_positionals(&cli.positionals).map_err(|error| {
        warn!(%error, "rejecting invocation");
        RunResult::invalid(&error)
    })
}

/// Help and version requests exit as clap intends; anything else is an
/// invalid invocation and still produces a result document.
fn reject_cli(error: &clap::Error) -> ExitCode {
    let Some(result) = rejection(error) else {
        error.exit()
    };
    if let Err(print_error) = error.print() {
        debug!(?print_error, "failed printing usage error");
    }
    output::emit(&result)
}

/// Result document for a command line clap refused, or [`None`] when clap
/// is only asked for help or version output.
fn rejection(error: &clap::Error) -> Option<RunResult> {
    match error.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _other => Some(RunResult::invalid(&Error::Usage)),
    }
}

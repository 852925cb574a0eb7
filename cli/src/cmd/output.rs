use std::process::ExitCode;

use sshcred::report::RunResult;
use tracing::error;

/// Writes the result document to stdout and maps it to an exit status.
pub fn emit(result: &RunResult) -> ExitCode {
    match result.to_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::from(result.exit_code())
        }
        Err(error) => {
            error!(?error, "failed serializing result");
            ExitCode::FAILURE
        }
    }
}

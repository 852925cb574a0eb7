mod args;
mod cmd;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    cmd::run().await
}

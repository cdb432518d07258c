//! Entry point for the `tourguide` command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use tourguide_cli::CliError;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Library crates log through the `log` facade; the subscriber's bridge
    // forwards those records.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match tourguide_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn report(err: &CliError) {
    eprintln!("tourguide: {err}");
}

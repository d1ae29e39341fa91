use awsop_cli::cli::Cli;
use awsop_cli::{commands, exit_code, logging, notes, EXIT_FAILURE};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.global.verbose, cli.global.log_format) {
        eprintln!("error: cannot set up logging: {:#}", e);
        return ExitCode::from(EXIT_FAILURE);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to build tokio runtime: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let result = runtime.block_on(commands::run(cli));
    match result {
        Ok(ref report) => {
            for note in notes(report) {
                eprintln!("{}", note);
            }
        }
        Err(ref e) => eprintln!("error: {:#}", e),
    }
    ExitCode::from(exit_code(&result))
}

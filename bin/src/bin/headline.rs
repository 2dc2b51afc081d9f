use clap::Parser;
use headline_bin::cli::Cli;
use headline_log::LogConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match headline_log::init(LogConfig {
        log_file_path: cli.log_file.clone(),
    }) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e}");
            None
        },
    };

    if let Err(e) = headline_bin::run(cli) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

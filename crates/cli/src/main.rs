use clap::Parser;
use comment_lister_cli::args::Args;
use comment_lister_cli::config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(comment_lister_cli::log_level(
            args.behavior.verbose,
            args.behavior.quiet,
        ))
        .parse_default_env()
        .init();

    let config = match Config::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match comment_lister_cli::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Application Error: {e}");
            ExitCode::FAILURE
        }
    }
}

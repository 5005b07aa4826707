// crates/cli/src/lib.rs
#![allow(clippy::multiple_crate_versions)]

pub mod args;
pub mod config;
pub mod error;
pub mod options;
pub mod parsers;
pub mod presentation;

use crate::config::Config;
use crate::error::Result;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `-v` / `-q` から既定のログレベルを決める
///
/// `RUST_LOG` が設定されていればそちらが優先されます。
#[must_use]
pub const fn log_level(verbose: u8, quiet: bool) -> log::LevelFilter {
    if quiet {
        return log::LevelFilter::Off;
    }
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// 走査してレポートを出力する
///
/// # Errors
/// Returns an error if the engine fails (strict mode) or the report cannot be written.
pub fn run(config: &Config) -> Result<()> {
    let result = comment_lister_engine::run(config)?;
    presentation::print_results(&result, config)
}

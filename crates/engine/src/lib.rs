// crates/engine/src/lib.rs
//! Ruby ソースツリーを走査してコメントを集めるエンジン
use rayon::iter::Either;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

pub mod config;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod options;
pub mod processor;
pub mod report;

use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::filesystem::WalkItem;
use crate::report::RunResult;

/// 走査側と処理側をつなぐチャネルの容量
const CHANNEL_CAPACITY: usize = 1024;

/// Run the comment extraction engine.
///
/// Returns a `RunResult` containing both successfully processed files
/// and any errors encountered during processing.
///
/// # Errors
///
/// In strict mode, returns the first file or walk error.
/// Otherwise only invalid walk configuration (e.g. a bad override glob) is fatal;
/// individual failures are collected in `RunResult::errors`.
/// With `config.git` set, an unopenable repository or unresolvable revision is fatal.
pub fn run(config: &Config) -> Result<RunResult> {
    let started = Instant::now();
    let result = match &config.git {
        Some(target) => git::run_revision(target, config)?,
        None => scan_roots(config)?,
    };
    Ok(finish(result, started))
}

fn scan_roots(config: &Config) -> Result<RunResult> {
    let (tx, rx) = crossbeam_channel::bounded::<WalkItem>(CHANNEL_CAPACITY);

    let walk_cfg = config.walk.clone();
    let filter_cfg = config.filter.clone();
    let walker = std::thread::spawn(move || {
        crate::filesystem::walk_parallel(&walk_cfg, &filter_cfg, &tx)
    });

    let matcher = config.filter.matcher();
    let iter = rx.into_iter().par_bridge();

    let result = if config.strict {
        // Strict mode: fail on first error
        let files = iter
            .map(|item| item.and_then(|entry| processor::process_file(entry, &matcher)))
            .collect::<Result<Vec<_>>>()?;
        RunResult {
            files,
            ..RunResult::default()
        }
    } else {
        let (files, errors): (Vec<_>, Vec<_>) = iter.partition_map(|item| {
            let outcome = match item {
                Ok(entry) => {
                    let path = entry.0.clone();
                    processor::process_file(entry, &matcher).map_err(|e| (path, e))
                }
                Err(e) => Err((PathBuf::from("<walk>"), e)),
            };
            match outcome {
                Ok(file) => Either::Left(file),
                Err((path, e)) => {
                    log::warn!("{}: {e}", path.display());
                    Either::Right((path, e))
                }
            }
        });
        RunResult {
            files,
            errors,
            ..RunResult::default()
        }
    };

    // 受信側が全件を取り出した後なので walker はすでに終了している
    match walker.join() {
        Ok(walk_result) => walk_result?,
        Err(_) => {
            return Err(EngineError::Config(
                "directory walker thread panicked".to_string(),
            ));
        }
    }

    Ok(result)
}

fn finish(mut result: RunResult, started: Instant) -> RunResult {
    result.sort();
    result.elapsed = started.elapsed();
    log::info!(
        "{} file(s), {} comment(s), {} error(s) in {:?}",
        result.files.len(),
        result.comment_count(),
        result.errors.len(),
        result.elapsed
    );
    result
}

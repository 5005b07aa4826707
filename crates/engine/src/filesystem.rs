// crates/engine/src/filesystem.rs
use crate::config::{FilterConfig, WalkOptions};
use crate::error::{EngineError, Result};
use comment_lister_core::RubyFileMatcher;
use crossbeam_channel::Sender;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::path::{Path, PathBuf};

/// 走査スレッドから処理側へ送る要素
pub type WalkItem = Result<(PathBuf, std::fs::Metadata)>;

/// パスのファイル名部分が Ruby ソースに該当するか
#[must_use]
pub fn matches_path(matcher: &RubyFileMatcher, path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| matcher.matches(&name.to_string_lossy()))
}

/// Parallel recursive directory walk.
///
/// Ruby ソースかつサイズ条件を満たすファイルだけを送ります。
/// 走査中のエラー（存在しないルートなど）も `Err` として同じチャネルに流します。
///
/// # Errors
/// Returns an error if the override globs are invalid.
pub fn walk_parallel(
    options: &WalkOptions,
    filters: &FilterConfig,
    tx: &Sender<WalkItem>,
) -> Result<()> {
    let Some((first, rest)) = options.roots.split_first() else {
        return Ok(());
    };

    let mut builder = WalkBuilder::new(first);
    for root in rest {
        builder.add(root);
    }

    builder
        .threads(options.threads)
        .hidden(!options.hidden)
        .git_ignore(options.git_ignore)
        .follow_links(options.follow_links)
        .max_depth(options.max_depth);

    // ignore crate only supports one Overrides instance per WalkBuilder.
    // Exclude patterns use the `!` prefix convention.
    if !options.override_include.is_empty() || !options.override_exclude.is_empty() {
        let mut ov_builder = OverrideBuilder::new(first);
        for ov in &options.override_include {
            ov_builder.add(ov)?;
        }
        for ov in &options.override_exclude {
            ov_builder.add(&format!("!{ov}"))?;
        }
        builder.overrides(ov_builder.build()?);
    }

    let matcher = filters.matcher();
    let walker = builder.build_parallel();
    walker.run(|| {
        let tx = tx.clone();
        let matcher = matcher.clone();
        let filters = filters.clone();
        Box::new(move |entry| {
            let item = match entry {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|ft| ft.is_file())
                        || !matches_path(&matcher, entry.path())
                    {
                        return ignore::WalkState::Continue;
                    }
                    match entry.metadata() {
                        Ok(meta) if filters.size_in_range(meta.len()) => {
                            Ok((entry.path().to_owned(), meta))
                        }
                        Ok(meta) => {
                            log::debug!(
                                "skipping {} ({} bytes, outside size range)",
                                entry.path().display(),
                                meta.len()
                            );
                            return ignore::WalkState::Continue;
                        }
                        Err(e) => Err(EngineError::Walk(e)),
                    }
                }
                Err(e) => Err(EngineError::Walk(e)),
            };
            if tx.send(item).is_err() {
                // 受信側が先に終了した（strict モードでの中断）
                return ignore::WalkState::Quit;
            }
            ignore::WalkState::Continue
        })
    });

    Ok(())
}

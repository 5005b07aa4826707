// crates/engine/src/git.rs
//! Git リビジョンのツリーからコメントを集める
//!
//! 作業ツリーではなくコミットのツリーに含まれる blob を読むため、
//! 未コミットの変更や `.gitignore` の設定は結果に影響しません。
use crate::config::{Config, FilterConfig, GitTarget};
use crate::error::Result;
use crate::processor::process_bytes;
use crate::report::{FileComments, RevisionInfo, RunResult};
use chrono::{DateTime, Utc};
use comment_lister_core::FileType;
use git2::{Commit, ObjectType, Oid, Repository, TreeWalkMode, TreeWalkResult};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// シンボリックリンクを表すツリーエントリのモード
const SYMLINK_MODE: i32 = 0o120_000;

/// ツリー上の Ruby ソース 1 件
struct BlobEntry {
    /// `/` 区切りのリポジトリ相対パス
    path: String,
    oid: Oid,
    file_type: FileType,
}

/// Scan the tree of a single revision.
///
/// # Errors
/// Returns [`crate::error::EngineError::Git`] if the repository cannot be opened
/// or the revision cannot be resolved to a commit. In strict mode an unreadable
/// blob is fatal as well.
pub fn run_revision(target: &GitTarget, config: &Config) -> Result<RunResult> {
    let repo = Repository::open(&target.git_dir)?;
    let commit = repo.revparse_single(&target.target)?.peel_to_commit()?;
    let revision = RevisionInfo {
        repository: repository_name(repo.path()),
        revision: target.target.clone(),
        object_id: commit.id().to_string(),
        commit_time: commit_time(&commit),
    };
    log::info!(
        "scanning {} at {} ({})",
        revision.repository,
        revision.revision,
        revision.object_id
    );

    let mut blobs = Vec::new();
    let mut errors = Vec::new();
    for entry in ruby_blobs(&commit, &config.filter)? {
        match read_blob(&repo, entry.oid, &config.filter) {
            Ok(Some(bytes)) => blobs.push((entry, bytes)),
            Ok(None) => {}
            Err(e) if !config.strict => {
                log::warn!("{}: {e}", entry.path);
                errors.push((PathBuf::from(&entry.path), e));
            }
            Err(e) => return Err(e),
        }
    }

    let modified = last_modified(&repo, &commit, blobs.iter().map(|(e, _)| e.path.as_str()))?;
    let files: Vec<FileComments> = blobs
        .into_par_iter()
        .map(|(entry, bytes)| {
            let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
            let mut file = process_bytes(PathBuf::from(&entry.path), entry.file_type, size, &bytes);
            file.object_id = Some(entry.oid.to_string());
            file.last_modified = modified.get(&entry.path).copied();
            file
        })
        .collect();

    Ok(RunResult {
        files,
        errors,
        revision: Some(revision),
        ..RunResult::default()
    })
}

/// `myApp/.git` または `myApp.git` 形式の短いリポジトリ名
#[must_use]
pub fn repository_name(git_dir: &Path) -> String {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let dir_name = name(git_dir);
    if dir_name == ".git" {
        let parent = git_dir.parent().map(name).unwrap_or_default();
        format!("{parent}/.git")
    } else {
        dir_name
    }
}

fn commit_time(commit: &Commit<'_>) -> DateTime<Utc> {
    DateTime::from_timestamp(commit.time().seconds(), 0).unwrap_or_default()
}

fn ruby_blobs(commit: &Commit<'_>, filter: &FilterConfig) -> Result<Vec<BlobEntry>> {
    let matcher = filter.matcher();
    let tree = commit.tree()?;
    let mut entries = Vec::new();

    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() != Some(ObjectType::Blob) || entry.filemode() == SYMLINK_MODE {
            return TreeWalkResult::Ok;
        }
        let Some(name) = entry.name() else {
            log::debug!("skipping non UTF-8 entry under '{root}'");
            return TreeWalkResult::Ok;
        };
        let file_type = matcher.file_type(name);
        if file_type.is_supported() {
            entries.push(BlobEntry {
                path: format!("{root}{name}"),
                oid: entry.id(),
                file_type,
            });
        }
        TreeWalkResult::Ok
    })?;

    log::debug!("{} Ruby blob(s) in {}", entries.len(), commit.id());
    Ok(entries)
}

/// サイズ条件から外れる blob は `None`
fn read_blob(repo: &Repository, oid: Oid, filter: &FilterConfig) -> Result<Option<Vec<u8>>> {
    let blob = repo.find_blob(oid)?;
    let size = u64::try_from(blob.size()).unwrap_or(u64::MAX);
    if !filter.size_in_range(size) {
        return Ok(None);
    }
    Ok(Some(blob.content().to_vec()))
}

/// 各パスを最後に変更したコミットの時刻
///
/// 第一親だけをたどり、各コミットを第一親（ルートコミットなら空ツリー）と比較します。
/// 全パスが見つかった時点で打ち切ります。
fn last_modified<'a>(
    repo: &Repository,
    head: &Commit<'_>,
    paths: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, DateTime<Utc>>> {
    let mut pending: HashSet<&str> = paths.collect();
    let mut found = HashMap::with_capacity(pending.len());

    let mut walk = repo.revwalk()?;
    walk.push(head.id())?;
    walk.simplify_first_parent()?;

    for oid in walk {
        if pending.is_empty() {
            break;
        }
        let commit = repo.find_commit(oid?)?;
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        let time = commit_time(&commit);
        for delta in diff.deltas() {
            let Some(path) = delta.new_file().path().and_then(Path::to_str) else {
                continue;
            };
            if pending.remove(path) {
                found.insert(path.to_string(), time);
            }
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigBuilder, FilterConfigBuilder, GitTargetBuilder};
    use crate::error::EngineError;
    use git2::{Signature, Time};
    use std::fs;
    use tempfile::TempDir;

    const FIRST: i64 = 1_600_000_000;
    const SECOND: i64 = 1_700_000_000;

    fn commit_files(repo: &Repository, files: &[(&str, &str)], time: i64) -> Oid {
        let workdir = repo.workdir().unwrap().to_path_buf();
        let mut index = repo.index().unwrap();
        for (path, content) in files {
            let full = workdir.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(&full, content).unwrap();
            index.add_path(Path::new(path)).unwrap();
        }
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::new("tester", "tester@example.com", &Time::new(time, 0)).unwrap();
        let parents: Vec<Commit<'_>> = repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, "update", &tree, &parent_refs)
            .unwrap()
    }

    /// 2 コミットのリポジトリ（`myApp/`）を作る
    fn sample_repo() -> (TempDir, Oid) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("myApp");
        fs::create_dir(&root).unwrap();
        let repo = Repository::init(&root).unwrap();
        commit_files(
            &repo,
            &[
                ("lib/a.rb", "# a\n"),
                ("b.rb", "x = 1 # b\n"),
                ("notes.txt", "# not ruby\n"),
            ],
            FIRST,
        );
        let head = commit_files(&repo, &[("b.rb", "x = 1 # b\n# more\n")], SECOND);
        (dir, head)
    }

    fn config_for(git_dir: PathBuf, target: &str) -> Config {
        let git = GitTargetBuilder::default()
            .git_dir(git_dir)
            .target(target)
            .build()
            .unwrap();
        ConfigBuilder::default().git(Some(git)).build().unwrap()
    }

    fn scan(config: &Config) -> Result<RunResult> {
        crate::run(config)
    }

    #[test]
    fn test_head_tree_is_scanned() {
        let (dir, head) = sample_repo();
        let root = dir.path().join("myApp");
        // 未コミットの変更は読まない
        fs::write(root.join("lib/a.rb"), "# uncommitted\n").unwrap();

        let result = scan(&config_for(root.join(".git"), "HEAD")).unwrap();

        assert!(result.errors.is_empty());
        let paths: Vec<_> = result.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, [PathBuf::from("b.rb"), PathBuf::from("lib/a.rb")]);
        assert_eq!(result.files[0].comment_count(), 2);
        assert_eq!(result.files[0].comments[0].column, 6);
        assert_eq!(result.files[1].comments[0].text, "# a\n");

        let revision = result.revision.unwrap();
        assert_eq!(revision.repository, "myApp/.git");
        assert_eq!(revision.revision, "HEAD");
        assert_eq!(revision.object_id, head.to_string());
        assert_eq!(revision.commit_time.timestamp(), SECOND);
    }

    #[test]
    fn test_blob_ids_and_last_modified() {
        let (dir, _) = sample_repo();
        let root = dir.path().join("myApp");
        let repo = Repository::open(&root).unwrap();
        let tree = repo.head().unwrap().peel_to_tree().unwrap();
        let a_id = tree.get_path(Path::new("lib/a.rb")).unwrap().id();

        let result = scan(&config_for(root.clone(), "HEAD")).unwrap();

        let a = &result.files[1];
        assert_eq!(a.object_id.as_deref(), Some(a_id.to_string().as_str()));
        assert_eq!(a.last_modified.map(|t| t.timestamp()), Some(FIRST));
        assert_eq!(result.files[0].last_modified.map(|t| t.timestamp()), Some(SECOND));
    }

    #[test]
    fn test_earlier_revision() {
        let (dir, _) = sample_repo();
        let result = scan(&config_for(dir.path().join("myApp"), "HEAD~1")).unwrap();
        assert_eq!(result.files[0].path, PathBuf::from("b.rb"));
        assert_eq!(result.files[0].comment_count(), 1);
        let revision = result.revision.unwrap();
        assert_eq!(revision.revision, "HEAD~1");
        assert_eq!(revision.commit_time.timestamp(), FIRST);
    }

    #[test]
    fn test_size_filter_applies_to_blobs() {
        let (dir, _) = sample_repo();
        let mut config = config_for(dir.path().join("myApp"), "HEAD");
        config.filter = FilterConfigBuilder::default()
            .max_size(Some(5))
            .build()
            .unwrap();
        let result = scan(&config).unwrap();
        let paths: Vec<_> = result.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, [PathBuf::from("lib/a.rb")]);
    }

    #[test]
    fn test_unknown_revision_is_git_error() {
        let (dir, _) = sample_repo();
        let err = scan(&config_for(dir.path().join("myApp"), "no-such-branch")).unwrap_err();
        assert!(matches!(err, EngineError::Git(_)));
    }

    #[test]
    fn test_missing_repository_is_git_error() {
        let dir = TempDir::new().unwrap();
        let err = scan(&config_for(dir.path().join("missing"), "HEAD")).unwrap_err();
        assert!(matches!(err, EngineError::Git(_)));
    }

    #[test]
    fn test_repository_name() {
        assert_eq!(repository_name(Path::new("/work/myApp/.git/")), "myApp/.git");
        assert_eq!(repository_name(Path::new("/srv/myApp.git")), "myApp.git");
    }
}

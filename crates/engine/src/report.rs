// crates/engine/src/report.rs
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use comment_lister_core::{CommentRecord, FileType};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// 1 ファイル分の抽出結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileComments {
    pub path: PathBuf,
    pub file_type: FileType,
    pub is_binary: bool,
    pub size: u64,
    pub comments: Vec<CommentRecord>,
    /// リビジョン走査時の blob の ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// リビジョン走査時、そのパスを最後に変更したコミットの時刻
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl FileComments {
    #[must_use]
    pub const fn new(path: PathBuf, file_type: FileType, size: u64) -> Self {
        Self {
            path,
            file_type,
            is_binary: false,
            size,
            comments: Vec::new(),
            object_id: None,
            last_modified: None,
        }
    }

    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

/// 走査したリビジョンの情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionInfo {
    /// `myApp/.git` または `myApp.git` 形式の短い名前
    pub repository: String,
    /// 指定されたリビジョン文字列（例: `HEAD`）
    pub revision: String,
    /// 解決したコミットの ID
    pub object_id: String,
    pub commit_time: DateTime<Utc>,
}

/// Result of a full run.
///
/// `files` と `errors` はどちらもパス順に並びます。
#[derive(Debug, Default)]
pub struct RunResult {
    pub files: Vec<FileComments>,
    pub errors: Vec<(PathBuf, EngineError)>,
    pub elapsed: Duration,
    /// リビジョン走査のときだけ設定される
    pub revision: Option<RevisionInfo>,
}

impl RunResult {
    /// 全ファイルのコメント数の合計
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.files.iter().map(FileComments::comment_count).sum()
    }

    pub(crate) fn sort(&mut self) {
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
        self.errors.sort_by(|a, b| a.0.cmp(&b.0));
    }
}

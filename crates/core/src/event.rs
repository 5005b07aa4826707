// crates/core/src/event.rs
//! 字句イベント定義
//!
//! 字句解析側で分類済みのコメント断片です。集約器はこの列だけを入力とし、
//! ソースコード本体は一切参照しません。

use alloc::string::String;
use serde::{Deserialize, Serialize};

/// コメント関連の字句イベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LexEvent {
    /// `#` 行コメント
    LineComment {
        text: String,
        line: usize,
        column: usize,
    },
    /// `=begin` 行
    BlockDocBegin {
        text: String,
        line: usize,
        column: usize,
    },
    /// 埋め込みドキュメントの本文行
    BlockDocBody { text: String, line: usize },
    /// `=end` 行
    BlockDocEnd { text: String, line: usize },
}

impl LexEvent {
    pub fn line_comment(text: impl Into<String>, line: usize, column: usize) -> Self {
        Self::LineComment {
            text: text.into(),
            line,
            column,
        }
    }

    pub fn block_begin(text: impl Into<String>, line: usize, column: usize) -> Self {
        Self::BlockDocBegin {
            text: text.into(),
            line,
            column,
        }
    }

    pub fn block_body(text: impl Into<String>, line: usize) -> Self {
        Self::BlockDocBody {
            text: text.into(),
            line,
        }
    }

    pub fn block_end(text: impl Into<String>, line: usize) -> Self {
        Self::BlockDocEnd {
            text: text.into(),
            line,
        }
    }

    /// イベントの行番号 (1-based)
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::LineComment { line, .. }
            | Self::BlockDocBegin { line, .. }
            | Self::BlockDocBody { line, .. }
            | Self::BlockDocEnd { line, .. } => *line,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::LineComment { text, .. }
            | Self::BlockDocBegin { text, .. }
            | Self::BlockDocBody { text, .. }
            | Self::BlockDocEnd { text, .. } => text,
        }
    }

    /// 埋め込みドキュメント系のイベントかどうか
    #[must_use]
    pub const fn is_block_doc(&self) -> bool {
        !matches!(self, Self::LineComment { .. })
    }
}

// crates/core/src/aggregator/line_merger.rs
//! 連続する行コメントの結合
//!
//! 直後の行かつ同じカラムで始まる `#` 行は一つのコメントとして扱います。
//! 空行や字下げの違いがあればブロックは分かれます。

use alloc::string::String;

use crate::comment::CommentRecord;

/// 行コメントの結合状態
#[derive(Debug, Default, Clone)]
pub struct LineMerger {
    pending: Option<CommentRecord>,
}

impl LineMerger {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// 結合中のレコードがあるか
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[cfg(test)]
    const fn pending(&self) -> Option<&CommentRecord> {
        self.pending.as_ref()
    }

    /// 指定位置の断片が現在のレコードに結合されるか
    #[must_use]
    pub fn accepts(&self, line: usize, column: usize) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| p.end_line + 1 == line && p.column == column)
    }

    /// 断片を1件取り込む
    ///
    /// 結合できなかった場合は、それまでのレコードを確定して返します。
    pub fn push(&mut self, text: String, line: usize, column: usize) -> Option<CommentRecord> {
        if self.accepts(line, column) {
            if let Some(pending) = self.pending.as_mut() {
                pending.extend(&text, line);
            }
            return None;
        }
        self.pending.replace(CommentRecord::new(text, line, column))
    }

    /// 結合中のレコードを確定する
    pub fn flush(&mut self) -> Option<CommentRecord> {
        self.pending.take()
    }
}

// crates/core/src/aggregator/block_doc.rs
//! 埋め込みドキュメント (`=begin` ～ `=end`) の状態機械
//!
//! `Idle` → `Open` → `Idle` の2状態です。不正な順序の入力でも
//! 本文を失わないことを優先します。

use alloc::string::String;

use crate::comment::CommentRecord;

/// 埋め込みドキュメントの状態
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum BlockDocState {
    /// ブロック外
    #[default]
    Idle,
    /// `=begin` 受信後、`=end` 待ち
    Open(CommentRecord),
}

impl BlockDocState {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// 開いているブロックへの可変参照
    pub fn open_mut(&mut self) -> Option<&mut CommentRecord> {
        match self {
            Self::Open(rec) => Some(rec),
            Self::Idle => None,
        }
    }

    /// `=begin` を受け取る
    ///
    /// 既に開いている場合は二重に開かず、本文の続きとして追記します。
    pub fn begin(&mut self, text: String, line: usize, column: usize) {
        match self {
            Self::Open(rec) => rec.extend(&text, line),
            Self::Idle => *self = Self::Open(CommentRecord::new(text, line, column)),
        }
    }

    /// 開いているブロックに本文を追記する
    ///
    /// 追記できた場合は `true`。ブロック外なら何もせず `false` を返します。
    pub fn append(&mut self, text: &str, line: usize) -> bool {
        match self.open_mut() {
            Some(rec) => {
                rec.extend(text, line);
                true
            }
            None => false,
        }
    }

    /// `=end` を受け取り、ブロックを確定する
    ///
    /// ブロック外の `=end` は無視されます。
    pub fn end(&mut self, text: &str, line: usize) -> Option<CommentRecord> {
        if !self.append(text, line) {
            return None;
        }
        self.take()
    }

    /// 状態を `Idle` に戻し、途中のレコードがあれば返す
    pub fn take(&mut self) -> Option<CommentRecord> {
        match core::mem::take(self) {
            Self::Open(rec) => Some(rec),
            Self::Idle => None,
        }
    }
}

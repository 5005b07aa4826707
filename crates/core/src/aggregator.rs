// crates/core/src/aggregator.rs
//! コメント集約器
//!
//! 分類済みの字句イベント列を受け取り、[`CommentRecord`] の列に畳み込みます。
//!
//! - 行コメントは [`LineMerger`] で隣接・同カラムのものを結合
//! - `=begin`/`=end` は [`BlockDocState`] で1レコードに組み立て
//! - どのような順序の入力でも失敗せず、本文を落としません
//!
//! 行コメントの結合中と埋め込みドキュメントのオープン中は同時に成立しません。
//! `=begin` / `=end` を受けた時点で結合中の行コメントは確定されます。
//!
//! # Example
//!
//! ```rust
//! use comment_lister_core::aggregator::aggregate;
//! use comment_lister_core::event::LexEvent;
//!
//! let records = aggregate([
//!     LexEvent::line_comment("# a\n", 1, 0),
//!     LexEvent::line_comment("# b\n", 2, 0),
//!     LexEvent::block_begin("=begin\n", 3, 0),
//!     LexEvent::block_end("=end\n", 4),
//! ]);
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].text, "# a\n# b\n");
//! ```

mod block_doc;
mod line_merger;


pub use block_doc::BlockDocState;
pub use line_merger::LineMerger;

use alloc::vec::Vec;

use crate::comment::CommentRecord;
use crate::event::LexEvent;

/// ブロック外で届いた本文行に割り当てるカラム
///
/// 埋め込みドキュメントの行は常に行頭から始まります。
pub const ORPHAN_BODY_COLUMN: usize = 0;

/// 1ファイル分のコメント集約器
#[derive(Debug, Default, Clone)]
pub struct CommentAggregator {
    lines: LineMerger,
    block: BlockDocState,
}

impl CommentAggregator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: LineMerger::new(),
            block: BlockDocState::Idle,
        }
    }

    /// イベントを1件処理する
    ///
    /// 1イベントで確定するレコードは高々1件です。
    pub fn push(&mut self, event: LexEvent) -> Option<CommentRecord> {
        match event {
            LexEvent::LineComment { text, line, column } => {
                // ブロック内の行コメントは文法上ありえないが、本文として保持する
                if self.block.append(&text, line) {
                    return None;
                }
                self.lines.push(text, line, column)
            }
            LexEvent::BlockDocBegin { text, line, column } => {
                let flushed = self.lines.flush();
                self.block.begin(text, line, column);
                flushed
            }
            LexEvent::BlockDocBody { text, line } => {
                if self.block.append(&text, line) {
                    return None;
                }
                self.lines.push(text, line, ORPHAN_BODY_COLUMN)
            }
            // 対応する `=begin` が無い `=end` は捨てるが、結合中の行コメントは確定する
            LexEvent::BlockDocEnd { text, line } => {
                self.block.end(&text, line).or_else(|| self.lines.flush())
            }
        }
    }

    /// ストリーム終端の処理
    ///
    /// 結合中の行コメント、または閉じられていないブロックをそのまま確定します。
    pub fn finish(&mut self) -> Option<CommentRecord> {
        debug_assert!(self.is_consistent());
        self.lines.flush().or_else(|| self.block.take())
    }

    /// 行コメントの結合とブロックのオープンが同時に起きていないか
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        !(self.lines.is_pending() && self.block.is_open())
    }

    /// 未確定のレコードを保持しているか
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.lines.is_pending() || self.block.is_open()
    }

    /// 埋め込みドキュメントの途中かどうか
    #[must_use]
    pub const fn is_in_block_doc(&self) -> bool {
        self.block.is_open()
    }

    /// 状態をリセット
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// イベント列をレコード列に変換するイテレータ
///
/// 終端前でも確定したレコードから順に返します。
#[derive(Debug, Clone)]
pub struct Comments<I> {
    events: I,
    aggregator: CommentAggregator,
    done: bool,
}

impl<I> Iterator for Comments<I>
where
    I: Iterator<Item = LexEvent>,
{
    type Item = CommentRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for event in self.events.by_ref() {
            if let Some(record) = self.aggregator.push(event) {
                return Some(record);
            }
        }
        self.done = true;
        self.aggregator.finish()
    }
}

/// ストリーミング変換
pub fn comments<I>(events: I) -> Comments<I::IntoIter>
where
    I: IntoIterator<Item = LexEvent>,
{
    Comments {
        events: events.into_iter(),
        aggregator: CommentAggregator::new(),
        done: false,
    }
}

/// イベント列全体をまとめて変換する
pub fn aggregate<I>(events: I) -> Vec<CommentRecord>
where
    I: IntoIterator<Item = LexEvent>,
{
    comments(events).collect()
}

#![no_std]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

//! Ruby ソースからコメントを抽出するコア
//!
//! 字句イベント源 ([`language::LineLexer`]) が分類したコメント断片を
//! [`aggregator::CommentAggregator`] が [`CommentRecord`] に畳み込みます。
//! このクレートは I/O を行いません。

extern crate alloc;

pub mod aggregator;
pub mod comment;
pub mod event;
pub mod language;
pub mod source;

pub use aggregator::{CommentAggregator, aggregate, comments};
pub use comment::CommentRecord;
pub use event::LexEvent;
pub use language::{FileType, LineLexer, RubyFileMatcher, RubyLexer};

use alloc::vec::Vec;

/// Ruby ソース文字列からコメントを抽出する
///
/// ```rust
/// let records = comment_lister_core::extract_comments("# a\n# b\nx = 1 # c\n");
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].text, "# a\n# b\n");
/// assert_eq!((records[1].start_line, records[1].column), (3, 6));
/// ```
#[must_use]
pub fn extract_comments(source: &str) -> Vec<CommentRecord> {
    aggregate(RubyLexer::new().events(source))
}

/// バイト列（BOM・UTF-16 対応）からコメントを抽出する
#[must_use]
pub fn extract_comments_from_bytes(bytes: &[u8]) -> Vec<CommentRecord> {
    extract_comments(&source::decode_source(bytes))
}

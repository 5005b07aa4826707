// crates/core/src/language/lexer_trait.rs
//! 行単位の字句イベント源トレイト
//!
//! 集約器から見た「外部の字句解析器」の境界です。実装は1行ずつ受け取り、
//! その行にコメント断片があれば [`LexEvent`] を1件返します。
//!
//! # Example
//!
//! ```rust
//! use comment_lister_core::event::LexEvent;
//! use comment_lister_core::language::LineLexer;
//!
//! struct HashOnly;
//!
//! impl LineLexer for HashOnly {
//!     fn lex_line(&mut self, line: &str, line_no: usize) -> Option<LexEvent> {
//!         let column = line.find('#')?;
//!         Some(LexEvent::line_comment(&line[column..], line_no, column))
//!     }
//! }
//!
//! let events: Vec<_> = HashOnly.events("a = 1 # one\nb = 2\n").collect();
//! assert_eq!(events, vec![LexEvent::line_comment("# one\n", 1, 6)]);
//! ```

use alloc::boxed::Box;
use core::iter::Enumerate;
use core::str::SplitInclusive;

use crate::event::LexEvent;

/// 行単位の字句イベント源
pub trait LineLexer: Send {
    /// 1行を処理する
    ///
    /// # Arguments
    ///
    /// * `line` - 処理対象の行（改行を含む。最終行のみ含まない場合がある）
    /// * `line_no` - 行番号 (1-based)
    fn lex_line(&mut self, line: &str, line_no: usize) -> Option<LexEvent>;

    /// 処理状態をリセット
    ///
    /// 新しいファイルの処理を開始する前に呼び出します。
    fn reset(&mut self) {
        // Default: no-op. Override if needed.
    }

    /// 文字列・ヒアドキュメント・埋め込みドキュメントなど、行をまたぐ文脈の中かどうか
    fn is_in_multiline_context(&self) -> bool {
        false
    }

    /// ソース全体をイベント列に変換するイテレータ
    fn events(self, source: &str) -> Events<'_, Self>
    where
        Self: Sized,
    {
        Events {
            lines: source.split_inclusive('\n').enumerate(),
            lexer: self,
        }
    }
}

impl LineLexer for Box<dyn LineLexer> {
    fn lex_line(&mut self, line: &str, line_no: usize) -> Option<LexEvent> {
        (**self).lex_line(line, line_no)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn is_in_multiline_context(&self) -> bool {
        (**self).is_in_multiline_context()
    }
}

/// [`LineLexer::events`] の戻り値
#[derive(Debug, Clone)]
pub struct Events<'a, L> {
    lines: Enumerate<SplitInclusive<'a, char>>,
    lexer: L,
}

impl<L: LineLexer> Iterator for Events<'_, L> {
    type Item = LexEvent;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            if let Some(event) = self.lexer.lex_line(line, idx + 1) {
                return Some(event);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Counting {
        seen: usize,
    }

    impl LineLexer for Counting {
        fn lex_line(&mut self, line: &str, line_no: usize) -> Option<LexEvent> {
            self.seen += 1;
            line.starts_with('#')
                .then(|| LexEvent::line_comment(line, line_no, 0))
        }

        fn reset(&mut self) {
            self.seen = 0;
        }
    }

    #[test]
    fn test_events_numbers_lines_from_one() {
        let events: Vec<_> = Counting::default().events("x\n# a\ny\n# b").collect();
        assert_eq!(
            events,
            [
                LexEvent::line_comment("# a\n", 2, 0),
                LexEvent::line_comment("# b", 4, 0),
            ]
        );
    }

    #[test]
    fn test_boxed_lexer_delegates() {
        let mut boxed: Box<dyn LineLexer> = Box::new(Counting::default());
        assert!(boxed.lex_line("# c\n", 1).is_some());
        assert!(boxed.lex_line("code\n", 2).is_none());
        assert!(!boxed.is_in_multiline_context());
        boxed.reset();
    }

    #[test]
    fn test_empty_source_has_no_events() {
        assert_eq!(Counting::default().events("").count(), 0);
    }
}

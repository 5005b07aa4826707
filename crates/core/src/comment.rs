// crates/core/src/comment.rs
//! コメントレコード定義
//!
//! 集約器が出力する最終単位です。一度出力されたレコードは変更されません。

use alloc::string::String;
use serde::{Deserialize, Serialize};

/// 抽出されたコメント1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// 結合済みのコメント本文（各断片の改行を含む）
    pub text: String,
    /// 開始行 (1-based)
    pub start_line: usize,
    /// 最後に結合された断片の行 (1-based)
    pub end_line: usize,
    /// 最初の行におけるコメント開始位置 (0-based)
    pub column: usize,
}

impl CommentRecord {
    /// 1行分の断片からレコードを開始する
    #[must_use]
    pub fn new(text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            text: text.into(),
            start_line: line,
            end_line: line,
            column,
        }
    }

    /// 断片を末尾に追加し、終了行を更新する
    ///
    /// 行番号が巻き戻る入力でも `end_line >= start_line` は維持します。
    pub fn extend(&mut self, text: &str, line: usize) {
        self.text.push_str(text);
        self.end_line = line.max(self.start_line);
    }

    /// 行数 (`end_line - start_line + 1`)
    #[must_use]
    pub const fn line_span(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_single_line() {
        let rec = CommentRecord::new("# hi\n", 4, 2);
        assert_eq!(rec.start_line, 4);
        assert_eq!(rec.end_line, 4);
        assert_eq!(rec.column, 2);
        assert_eq!(rec.line_span(), 1);
    }

    #[test]
    fn test_extend_appends_and_moves_end() {
        let mut rec = CommentRecord::new("# a\n", 1, 0);
        rec.extend("# b\n", 2);
        assert_eq!(rec.text, "# a\n# b\n");
        assert_eq!(rec.end_line, 2);
        assert_eq!(rec.line_span(), 2);
    }

    #[test]
    fn test_extend_never_moves_end_before_start() {
        let mut rec = CommentRecord::new("x", 10, 0);
        rec.extend("y", 3);
        assert_eq!(rec.end_line, 10);
        assert_eq!(rec.text, "xy");
    }

    #[test]
    fn test_line_span_of_hand_built_inverted_record() {
        let rec = CommentRecord {
            text: "# x\n".into(),
            start_line: 5,
            end_line: 2,
            column: 0,
        };
        assert_eq!(rec.line_span(), 1);
    }
}

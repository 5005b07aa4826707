// crates/core/src/language/heredoc_utils.rs
//! ヒアドキュメント処理ユーティリティ
//!
//! `<<EOF` の本文は開始行の次の行から始まり、終端識別子の行で終わります。
//! 1行に複数のヒアドキュメント (`foo(<<A, <<B)`) がある場合は宣言順に消化します。

use alloc::collections::VecDeque;
use alloc::string::String;

/// ヒアドキュメントのエントリ情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeredocEntry {
    /// 終了識別子 (例: "EOF", "SQL")
    pub identifier: String,
    /// 終端のインデントを許可するか (`<<-EOF`, `<<~EOF`)
    pub allow_indent: bool,
}

/// ヒアドキュメントの状態管理
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeredocContext {
    queue: VecDeque<HeredocEntry>,
}

impl HeredocContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// 本文待ち、または本文中のヒアドキュメントがあるか
    #[must_use]
    pub fn is_in_heredoc(&self) -> bool {
        !self.queue.is_empty()
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.queue.len()
    }

    /// 新しいヒアドキュメントを登録
    pub fn push(&mut self, identifier: String, allow_indent: bool) {
        self.queue.push_back(HeredocEntry {
            identifier,
            allow_indent,
        });
    }

    /// 現在の行が先頭のヒアドキュメントの終端かどうかを判定し、状態を更新する
    ///
    /// `line` は改行を含んでいても構いません。終了した場合は `true`。
    pub fn check_end(&mut self, line: &str) -> bool {
        let Some(entry) = self.queue.front() else {
            return false;
        };

        let body = line.trim_end_matches(['\n', '\r']);
        let is_end = if entry.allow_indent {
            body.trim() == entry.identifier
        } else {
            body == entry.identifier
        };

        if is_end {
            self.queue.pop_front();
        }
        is_end
    }

    /// 強制リセット
    pub fn reset(&mut self) {
        self.queue.clear();
    }
}

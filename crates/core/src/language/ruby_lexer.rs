// crates/core/src/language/ruby_lexer.rs
//! Ruby のコメント字句解析
//!
//! Ruby固有の対応:
//! - `#` 行コメント
//! - 埋め込みドキュメント: `=begin` ～ `=end` (行頭必須)
//! - ヒアドキュメント: `<<EOF`, `<<-EOF`, `<<~EOF`, `<<'EOF'`
//! - 文字列 (`'`, `"`, `` ` ``)、%記法 (`%q()`, `%w[]` 等)、正規表現 (`/.../`)、
//!   文字リテラル (`?#`) 内の `#` はコメントではない
//! - 式展開 (`#{...}`) の中はコード扱い
//! - `__END__` 以降はデータ領域
//!
//! 構文解析はしません。`/` や `%` が演算子かリテラル開始かは直前の字句から推測します。

use alloc::string::ToString;
use alloc::vec::Vec;
use regex::Regex;

use super::heredoc_utils::HeredocContext;
use super::lexer_trait::LineLexer;
use crate::event::LexEvent;

const HEREDOC_PATTERN: &str = r#"^<<([-~]?)(?:([A-Za-z_]\w*)|'([^'\n]+)'|"([^"\n]+)"|`([^`\n]+)`)"#;

/// 直後に式が来る語（この後の `/` や `%` はリテラル開始）
const OPERAND_WORDS: &[&str] = &[
    "and", "begin", "case", "do", "else", "elsif", "if", "in", "not", "or", "print", "puts",
    "raise", "return", "then", "unless", "until", "when", "while", "yield",
];

/// リテラルの区切り
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    /// 入れ子になる開き括弧 (`%q(` の `(` など)。同一文字で閉じる場合は `None`
    pub open: Option<char>,
    pub close: char,
    /// `#{}` を展開するか
    pub interpolates: bool,
    depth: usize,
}

impl Delimiter {
    #[must_use]
    pub const fn quote(quote: char) -> Self {
        Self {
            open: None,
            close: quote,
            interpolates: quote != '\'',
            depth: 0,
        }
    }

    /// %記法・正規表現の区切り文字から生成する
    #[must_use]
    pub const fn bracket(open: char, interpolates: bool) -> Self {
        let (open, close) = match open {
            '(' => (Some('('), ')'),
            '[' => (Some('['), ']'),
            '{' => (Some('{'), '}'),
            '<' => (Some('<'), '>'),
            other => (None, other),
        };
        Self {
            open,
            close,
            interpolates,
            depth: 0,
        }
    }
}

/// 行をまたいで保持するスコープ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RubyScope {
    /// `#{ ... }` 内（ネストした `{` の深さ）
    Interpolation(usize),
    /// 文字列・%記法・正規表現
    Literal(Delimiter),
}

/// Ruby字句解析器
#[derive(Clone, Debug)]
pub struct RubyLexer {
    in_embedded_doc: bool,
    at_data_section: bool,
    heredoc_ctx: HeredocContext,
    stack: Vec<RubyScope>,
    heredoc_re: Regex,
}

impl LineLexer for RubyLexer {
    fn lex_line(&mut self, line: &str, line_no: usize) -> Option<LexEvent> {
        self.process(line, line_no)
    }

    fn reset(&mut self) {
        self.in_embedded_doc = false;
        self.at_data_section = false;
        self.heredoc_ctx.reset();
        self.stack.clear();
    }

    fn is_in_multiline_context(&self) -> bool {
        self.in_embedded_doc || self.heredoc_ctx.is_in_heredoc() || !self.stack.is_empty()
    }
}

impl Default for RubyLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl RubyLexer {
    /// Creates a new `RubyLexer`.
    ///
    /// # Panics
    ///
    /// Panics if the internal regex pattern fails to compile (should never happen with hardcoded patterns).
    #[must_use]
    pub fn new() -> Self {
        Self {
            in_embedded_doc: false,
            at_data_section: false,
            heredoc_ctx: HeredocContext::default(),
            stack: Vec::new(),
            heredoc_re: Regex::new(HEREDOC_PATTERN).expect("heredoc pattern is valid"),
        }
    }

    /// 1行を処理し、コメント断片があれば返す
    pub fn process(&mut self, line: &str, line_no: usize) -> Option<LexEvent> {
        if self.at_data_section {
            return None;
        }

        // 1. ヒアドキュメント本文 (最優先)
        if self.heredoc_ctx.is_in_heredoc() {
            self.heredoc_ctx.check_end(line);
            return None;
        }

        // 2. 埋め込みドキュメント (=begin ... =end)
        if self.in_embedded_doc {
            if is_doc_marker(line, "=end") {
                self.in_embedded_doc = false;
                return Some(LexEvent::block_end(line, line_no));
            }
            return Some(LexEvent::block_body(line, line_no));
        }
        if self.stack.is_empty() {
            if is_doc_marker(line, "=begin") {
                self.in_embedded_doc = true;
                return Some(LexEvent::block_begin(line, line_no, 0));
            }
            if line.trim_end_matches(['\n', '\r']) == "__END__" {
                self.at_data_section = true;
                return None;
            }
        }

        // 3. スキャンループ
        self.scan(line, line_no)
    }

    fn scan(&mut self, line: &str, line_no: usize) -> Option<LexEvent> {
        let mut chars = line.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match self.stack.last_mut() {
                Some(RubyScope::Literal(delim)) => {
                    let delim = *delim;
                    if c == '\\' {
                        chars.next();
                    } else if delim.open == Some(c) {
                        self.bump_literal_depth(1);
                    } else if c == delim.close {
                        if delim.depth == 0 {
                            self.stack.pop();
                        } else {
                            self.bump_literal_depth(-1);
                        }
                    } else if delim.interpolates
                        && c == '#'
                        && chars.peek().is_some_and(|&(_, n)| n == '{')
                    {
                        chars.next();
                        self.stack.push(RubyScope::Interpolation(0));
                    }
                }
                Some(RubyScope::Interpolation(_)) | None => {
                    // Code mode
                    match c {
                        '#' => {
                            return Some(LexEvent::line_comment(&line[i..], line_no, i));
                        }
                        '\\' => {
                            chars.next();
                        }
                        '"' | '\'' | '`' => {
                            self.stack.push(RubyScope::Literal(Delimiter::quote(c)));
                        }
                        '{' => {
                            if let Some(RubyScope::Interpolation(depth)) = self.stack.last_mut() {
                                *depth += 1;
                            }
                        }
                        '}' => match self.stack.last_mut() {
                            Some(RubyScope::Interpolation(0)) => {
                                self.stack.pop();
                            }
                            Some(RubyScope::Interpolation(depth)) => *depth -= 1,
                            _ => {}
                        },
                        '$' => {
                            // $' $" $/ などの特殊変数
                            if chars.peek().is_some_and(|&(_, n)| !is_ident_char(n)) {
                                chars.next();
                            }
                        }
                        '?' => {
                            if is_char_literal(line, i)
                                && chars.next().is_some_and(|(_, n)| n == '\\')
                            {
                                chars.next();
                            }
                        }
                        '/' => {
                            // `x /= 2` は代入演算子
                            let op_assign =
                                line[i + 1..].starts_with('=') && follows_value(line, i);
                            if !op_assign && starts_operand(line, i) {
                                self.stack
                                    .push(RubyScope::Literal(Delimiter::bracket('/', true)));
                            }
                        }
                        '%' => {
                            if let Some((skip, delim)) = percent_literal(line, i) {
                                for _ in 0..skip {
                                    chars.next();
                                }
                                self.stack.push(RubyScope::Literal(delim));
                            }
                        }
                        '<' => {
                            if chars.peek().is_some_and(|&(_, n)| n == '<')
                                && starts_operand(line, i)
                                && !(quoted_heredoc(&line[i..]) && follows_value(line, i))
                                && let Some(skip) = self.push_heredoc(&line[i..])
                            {
                                // "<" は消費済み
                                for _ in 1..skip {
                                    chars.next();
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        // 行末: スコープは次の行へ持ち越す
        None
    }

    fn bump_literal_depth(&mut self, delta: isize) {
        if let Some(RubyScope::Literal(delim)) = self.stack.last_mut() {
            delim.depth = delim.depth.saturating_add_signed(delta);
        }
    }

    /// `<<ID` を登録し、消費した文字数を返す
    fn push_heredoc(&mut self, rest: &str) -> Option<usize> {
        let caps = self.heredoc_re.captures(rest)?;
        let allow_indent = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let ident = (2..=5).find_map(|n| caps.get(n))?.as_str().to_string();
        let matched = caps.get(0)?.as_str();
        self.heredoc_ctx.push(ident, allow_indent);
        Some(matched.chars().count())
    }

    #[cfg(test)]
    fn is_in_string_scope(&self) -> bool {
        matches!(self.stack.last(), Some(RubyScope::Literal(_)))
    }
}

/// `=begin` / `=end` 行か（行頭で、直後が空白か行末）
fn is_doc_marker(line: &str, marker: &str) -> bool {
    line.strip_prefix(marker)
        .is_some_and(|rest| rest.chars().next().is_none_or(char::is_whitespace))
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || !c.is_ascii()
}

/// 位置 `at` の記号がリテラル（正規表現・%記法・ヒアドキュメント・文字）の開始位置にあるか
///
/// 直前が値（識別子・数値・閉じ括弧・文字列終端）なら演算子とみなします。
/// ただし `foo /re/` のように「識別子 + 空白」の直後で、記号の後に空白が無い場合は
/// メソッド引数としてリテラル扱いにします。
fn starts_operand(line: &str, at: usize) -> bool {
    let before = &line[..at];
    let trimmed = before.trim_end();
    let Some(last) = trimmed.chars().next_back() else {
        return true;
    };

    if is_ident_char(last) {
        let word = last_word(trimmed);
        if OPERAND_WORDS.contains(&word) {
            return true;
        }
        if word.starts_with(|c: char| c.is_ascii_digit()) {
            return false;
        }
        let spaced_before = trimmed.len() < before.len();
        let tight_after = line[at..]
            .chars()
            .nth(1)
            .is_some_and(|c| !c.is_whitespace());
        return spaced_before && tight_after;
    }

    !matches!(last, ')' | ']' | '}' | '"' | '\'' | '`')
}

/// 末尾の識別子
fn last_word(trimmed: &str) -> &str {
    let word_start = trimmed
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_ident_char(c))
        .map_or(0, |(idx, c)| idx + c.len_utf8());
    &trimmed[word_start..]
}

/// 位置 `at` の直前（空白を除く）が値で終わっているか（キーワードは値ではない）
fn follows_value(line: &str, at: usize) -> bool {
    let trimmed = line[..at].trim_end();
    match trimmed.chars().next_back() {
        None => false,
        Some(c) if is_ident_char(c) => !OPERAND_WORDS.contains(&last_word(trimmed)),
        Some(c) => matches!(c, ')' | ']' | '}' | '"' | '\'' | '`'),
    }
}

/// `<<"ID"` のように識別子が引用符で囲まれているか
fn quoted_heredoc(rest: &str) -> bool {
    rest.strip_prefix("<<")
        .map(|r| r.strip_prefix(['-', '~']).unwrap_or(r))
        .is_some_and(|r| r.starts_with(['"', '\'', '`']))
}

/// `?a` 形式の文字リテラルか
fn is_char_literal(line: &str, at: usize) -> bool {
    let mut rest = line[at..].chars().skip(1);
    let Some(ch) = rest.next() else {
        return false;
    };
    if ch.is_whitespace() {
        return false;
    }
    let after = if ch == '\\' { rest.nth(1) } else { rest.next() };
    if after.is_some_and(is_ident_char) {
        return false;
    }
    starts_operand(line, at)
}

/// %記法の開始判定
///
/// リテラルであれば（`%` の後に読み飛ばす文字数, 区切り）を返します。
fn percent_literal(line: &str, at: usize) -> Option<(usize, Delimiter)> {
    if !starts_operand(line, at) {
        return None;
    }
    let mut rest = line[at..].chars().skip(1);
    let first = rest.next()?;
    let (kind, delim_char, skip) = if first.is_ascii_alphabetic() {
        (Some(first), rest.next()?, 2)
    } else {
        (None, first, 1)
    };

    match kind {
        Some(k) if !"qQwWiIrsx".contains(k) => return None,
        None if !matches!(delim_char, '(' | '[' | '{' | '<' | '|' | '!' | '/' | '^') => {
            return None;
        }
        _ => {}
    }
    if delim_char.is_alphanumeric() || delim_char.is_whitespace() {
        return None;
    }

    let interpolates = kind.is_none_or(|k| "QWIrx".contains(k));
    Some((skip, Delimiter::bracket(delim_char, interpolates)))
}

/// ソース全体を字句イベント列に変換する
#[must_use]
pub fn lex_source(source: &str) -> Vec<LexEvent> {
    RubyLexer::new().events(source).collect()
}

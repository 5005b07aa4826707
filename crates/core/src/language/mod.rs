// crates/core/src/language/mod.rs
//! 言語別の字句イベント源

pub mod file_kind;
pub mod heredoc_utils;
pub mod lexer_trait;
pub mod ruby_lexer;

pub use file_kind::{FileType, RubyFileMatcher};
pub use lexer_trait::{Events, LineLexer};
pub use ruby_lexer::{RubyLexer, lex_source};

use alloc::boxed::Box;

/// ファイル種別に応じた字句解析器を生成する
///
/// 対象外の種別には `None` を返します。
#[must_use]
pub fn get_lexer(file_type: FileType) -> Option<Box<dyn LineLexer>> {
    match file_type {
        FileType::Ruby => Some(Box::new(RubyLexer::new())),
        FileType::Unsupported => None,
    }
}

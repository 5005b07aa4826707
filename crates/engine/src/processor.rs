// crates/engine/src/processor.rs
use crate::error::{EngineError, Result};
use crate::report::FileComments;
use comment_lister_core::language::get_lexer;
use comment_lister_core::source::{decode_source, looks_binary};
use comment_lister_core::{FileType, LineLexer, RubyFileMatcher, aggregate};
use std::path::PathBuf;

/// Process a single file and return its comments.
///
/// ファイルごとに新しい字句解析器と集約器を使うため、呼び出し間で状態は共有しません。
///
/// # Errors
/// Returns [`EngineError::FileRead`] if the file cannot be read.
pub fn process_file(
    (path, meta): (PathBuf, std::fs::Metadata),
    matcher: &RubyFileMatcher,
) -> Result<FileComments> {
    let file_type = path
        .file_name()
        .map_or(FileType::Unsupported, |name| {
            matcher.file_type(&name.to_string_lossy())
        });

    let bytes = std::fs::read(&path).map_err(|e| EngineError::FileRead {
        path: path.clone(),
        source: e,
    })?;
    Ok(process_bytes(path, file_type, meta.len(), &bytes))
}

/// 読み込み済みのバイト列からコメントを抽出する
///
/// 作業ツリーのファイルとリビジョン中の blob のどちらもここを通ります。
pub fn process_bytes(path: PathBuf, file_type: FileType, size: u64, bytes: &[u8]) -> FileComments {
    let mut result = FileComments::new(path, file_type, size);

    if looks_binary(bytes) {
        log::warn!("skipping binary file {}", result.path.display());
        result.is_binary = true;
        return result;
    }

    let Some(lexer) = get_lexer(file_type) else {
        return result;
    };
    let source = decode_source(bytes);
    result.comments = aggregate(lexer.events(&source));

    log::debug!(
        "{}: {} comment(s)",
        result.path.display(),
        result.comment_count()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn process(file: &NamedTempFile) -> Result<FileComments> {
        let path = file.path().to_path_buf();
        let meta = std::fs::metadata(&path).unwrap();
        process_file((path, meta), &RubyFileMatcher::default())
    }

    fn ruby_file(content: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".rb").tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_comments_are_extracted() {
        let file = ruby_file(b"# one\n# two\nx = 1 # three\n=begin\ndoc\n=end\n");
        let result = process(&file).unwrap();
        assert_eq!(result.file_type, FileType::Ruby);
        assert!(!result.is_binary);
        assert_eq!(result.size, 42);
        assert_eq!(result.comment_count(), 3);
        assert_eq!(result.comments[0].text, "# one\n# two\n");
        assert_eq!(result.comments[1].column, 6);
        assert_eq!(result.comments[2].text, "=begin\ndoc\n=end\n");
        assert_eq!((result.comments[2].start_line, result.comments[2].end_line), (4, 6));
    }

    #[test]
    fn test_binary_file_is_flagged() {
        let file = ruby_file(b"# x\0\x01\x02");
        let result = process(&file).unwrap();
        assert!(result.is_binary);
        assert!(result.comments.is_empty());
    }

    #[test]
    fn test_utf8_bom_does_not_shift_column() {
        let file = ruby_file(b"\xEF\xBB\xBF# bom\n");
        let result = process(&file).unwrap();
        assert_eq!(result.comments[0].column, 0);
        assert_eq!(result.comments[0].text, "# bom\n");
    }

    #[test]
    fn test_unsupported_file_has_no_comments() {
        let mut file = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
        file.write_all(b"# python\n").unwrap();
        let result = process(&file).unwrap();
        assert_eq!(result.file_type, FileType::Unsupported);
        assert!(result.comments.is_empty());
    }

    #[test]
    fn test_bytes_without_file() {
        let result = process_bytes(
            PathBuf::from("lib/a.rb"),
            FileType::Ruby,
            11,
            b"# a\nx # b\n",
        );
        assert_eq!(result.size, 11);
        assert_eq!(result.comment_count(), 2);
        assert!(result.object_id.is_none());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let file = ruby_file(b"");
        let path = file.path().to_path_buf();
        let meta = std::fs::metadata(&path).unwrap();
        drop(file);
        let err = process_file((path.clone(), meta), &RubyFileMatcher::default()).unwrap_err();
        assert!(matches!(err, EngineError::FileRead { path: p, .. } if p == path));
    }
}

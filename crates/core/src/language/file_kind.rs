// crates/core/src/language/file_kind.rs
//! 対象ファイルの判定
//!
//! ファイル名（ディレクトリを除いた部分）から Ruby ソースかどうかを判定します。

use alloc::string::String;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// Ruby として扱う拡張子
const RUBY_EXTENSIONS: &[&str] = &["rb", "rbw", "rake", "gemspec", "ru"];

/// 拡張子を持たない Ruby の定番ファイル名
const RUBY_FILE_NAMES: &[&str] = &[
    "Rakefile",
    "Gemfile",
    "Guardfile",
    "Capfile",
    "Vagrantfile",
    "Podfile",
    "Brewfile",
];

/// ファイル種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    /// Ruby: # と =begin ～ =end 埋め込みドキュメント
    Ruby,
    /// 対象外
    Unsupported,
}

impl FileType {
    /// レポートに出力する種別名
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ruby => "RUBY",
            Self::Unsupported => "UNSUPPORTED",
        }
    }

    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Ruby)
    }
}

/// Ruby ファイル判定器
///
/// 既定の拡張子に加えて、設定で拡張子を追加できます。
#[derive(Debug, Clone, Default)]
pub struct RubyFileMatcher {
    extra_ext: HashSet<String>,
}

impl RubyFileMatcher {
    /// 追加の拡張子（先頭の `.` は無視、大文字小文字は区別しない）から生成する
    pub fn new<I, S>(extra_ext: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra_ext = extra_ext
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extra_ext }
    }

    /// ファイル名から種別を判定する
    ///
    /// `/` または `\` 区切りのパスが渡された場合は最後の要素だけを見ます。
    #[must_use]
    pub fn file_type(&self, file_name: &str) -> FileType {
        let name = file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(file_name);

        // macOS のリソースフォーク
        if name.starts_with("._") {
            return FileType::Unsupported;
        }
        if RUBY_FILE_NAMES.contains(&name) {
            return FileType::Ruby;
        }

        let Some((stem, ext)) = name.rsplit_once('.') else {
            return FileType::Unsupported;
        };
        if stem.is_empty() {
            return FileType::Unsupported;
        }
        let ext = ext.to_lowercase();
        if RUBY_EXTENSIONS.contains(&ext.as_str()) || self.extra_ext.contains(&ext) {
            FileType::Ruby
        } else {
            FileType::Unsupported
        }
    }

    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.file_type(file_name).is_supported()
    }
}

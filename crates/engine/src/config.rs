// crates/engine/src/config.rs
use crate::options::OutputFormat;
use comment_lister_core::RubyFileMatcher;
use derive_builder::Builder;
use std::path::PathBuf;

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct WalkOptions {
    #[builder(default)]
    pub roots: Vec<PathBuf>,
    #[builder(default = "1")]
    pub threads: usize,
    #[builder(default)]
    pub hidden: bool,
    #[builder(default = "true")]
    pub git_ignore: bool,
    #[builder(default)]
    pub max_depth: Option<usize>,
    #[builder(default)]
    pub follow_links: bool,
    #[builder(default)]
    pub override_include: Vec<String>,
    #[builder(default)]
    pub override_exclude: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            roots: vec![],
            threads: 1,
            hidden: false,
            git_ignore: true,
            max_depth: None,
            follow_links: false,
            override_include: vec![],
            override_exclude: vec![],
        }
    }
}

/// 対象ファイルの絞り込み
#[derive(Debug, Clone, Default, Builder)]
#[builder(setter(into))]
pub struct FilterConfig {
    /// 既定の Ruby 拡張子に加えて対象とする拡張子
    #[builder(default)]
    pub extra_ext: Vec<String>,
    #[builder(default)]
    pub min_size: Option<u64>,
    #[builder(default)]
    pub max_size: Option<u64>,
}

impl FilterConfig {
    #[must_use]
    pub fn matcher(&self) -> RubyFileMatcher {
        RubyFileMatcher::new(&self.extra_ext)
    }

    /// サイズ範囲に収まるか
    #[must_use]
    pub fn size_in_range(&self, size: u64) -> bool {
        self.min_size.is_none_or(|min| size >= min) && self.max_size.is_none_or(|max| size <= max)
    }
}

/// 作業ツリーの代わりに走査するリビジョン
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into))]
pub struct GitTarget {
    /// リポジトリ（`.git` ディレクトリまたは作業ツリー）
    pub git_dir: PathBuf,
    #[builder(default = "\"HEAD\".to_string()")]
    pub target: String,
}

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Config {
    #[builder(default)]
    pub walk: WalkOptions,
    #[builder(default)]
    pub filter: FilterConfig,

    #[builder(default = "OutputFormat::Json")]
    pub format: OutputFormat,
    #[builder(default)]
    pub output_path: Option<PathBuf>,

    #[builder(default)]
    pub strict: bool,

    /// 設定されていれば `walk.roots` ではなくこのリビジョンを走査する
    #[builder(default)]
    pub git: Option<GitTarget>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            walk: WalkOptions::default(),
            filter: FilterConfig::default(),
            format: OutputFormat::Json,
            output_path: None,
            strict: false,
            git: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_default() {
        let built = ConfigBuilder::default().build().unwrap();
        let default = Config::default();
        assert_eq!(built.format, default.format);
        assert_eq!(built.walk.threads, 1);
        assert!(built.walk.git_ignore);
        assert!(!built.strict);
        assert!(built.git.is_none());
    }

    #[test]
    fn test_git_target_defaults_to_head() {
        let target = GitTargetBuilder::default()
            .git_dir(PathBuf::from("repo/.git"))
            .build()
            .unwrap();
        assert_eq!(target.target, "HEAD");
    }

    #[test]
    fn test_size_range() {
        let filter = FilterConfigBuilder::default()
            .min_size(Some(10))
            .max_size(Some(100))
            .build()
            .unwrap();
        assert!(!filter.size_in_range(9));
        assert!(filter.size_in_range(10));
        assert!(filter.size_in_range(100));
        assert!(!filter.size_in_range(101));
        assert!(FilterConfig::default().size_in_range(0));
    }
}

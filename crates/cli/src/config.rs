// crates/cli/src/config.rs
use crate::args::Args;
use crate::error::AppError;
use crate::options;
pub use comment_lister_engine::config::{
    Config, ConfigBuilder, FilterConfig, FilterConfigBuilder, GitTarget, GitTargetBuilder,
    WalkOptions, WalkOptionsBuilder,
};
use comment_lister_engine::options as engine_options;
use std::path::PathBuf;

impl TryFrom<Args> for Config {
    type Error = AppError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let walk = walk_options_from_args(&args)?;
        let filter = filter_config_from_args(&args)?;
        let git = git_target_from_args(&args)?;
        let format: engine_options::OutputFormat = args.output.format.into();

        ConfigBuilder::default()
            .walk(walk)
            .filter(filter)
            .format(format)
            .output_path(args.output.output)
            .strict(args.behavior.strict)
            .git(git)
            .build()
            .map_err(|e| AppError::Config(e.to_string()))
    }
}

fn walk_options_from_args(args: &Args) -> Result<WalkOptions, AppError> {
    let scan = &args.scan;

    let roots = if args.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.paths.clone()
    };

    WalkOptionsBuilder::default()
        .roots(roots)
        .threads(scan.jobs.unwrap_or_else(num_cpus::get))
        .hidden(scan.hidden)
        .git_ignore(!scan.no_gitignore)
        .max_depth(scan.max_depth)
        .follow_links(scan.follow)
        .override_include(scan.override_include.clone())
        .override_exclude(scan.override_exclude.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

fn filter_config_from_args(args: &Args) -> Result<FilterConfig, AppError> {
    let opts = &args.filter;
    let min_size = opts.min_size.map(|s| s.0);
    let max_size = opts.max_size.map(|s| s.0);
    if let (Some(min), Some(max)) = (min_size, max_size)
        && min > max
    {
        return Err(AppError::Config(format!(
            "--min-size ({min}) is larger than --max-size ({max})"
        )));
    }

    FilterConfigBuilder::default()
        .extra_ext(opts.ext.clone())
        .min_size(min_size)
        .max_size(max_size)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

fn git_target_from_args(args: &Args) -> Result<Option<GitTarget>, AppError> {
    let Some(git_dir) = &args.git.git_dir else {
        return Ok(None);
    };
    let mut builder = GitTargetBuilder::default();
    builder.git_dir(git_dir.clone());
    if let Some(target) = &args.git.target {
        builder.target(target.clone());
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| AppError::Config(e.to_string()))
}

// From trait implementations for CLI -> Engine enum conversion

macro_rules! map_enum {
    ($from:ty, $to:ty, $($variant:ident),+ $(,)?) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self {
                match f {
                    $( <$from>::$variant => <$to>::$variant, )+
                }
            }
        }
    };
}

map_enum!(
    options::OutputFormat,
    engine_options::OutputFormat,
    Json,
    Jsonl,
    Yaml
);

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config_from(argv: &[&str]) -> Result<Config, AppError> {
        Config::try_from(Args::parse_from(argv.iter().copied()))
    }

    #[test]
    fn test_default_root_and_threads() {
        let config = config_from(&["comment_lister"]).unwrap();
        assert_eq!(config.walk.roots, [PathBuf::from(".")]);
        assert_eq!(config.walk.threads, num_cpus::get());
        assert!(config.walk.git_ignore);
        assert_eq!(config.format, engine_options::OutputFormat::Json);
        assert!(config.git.is_none());
    }

    #[test]
    fn test_git_target_defaults_to_head() {
        let config = config_from(&["comment_lister", "--git-dir", "repo"]).unwrap();
        let git = config.git.unwrap();
        assert_eq!(git.git_dir, PathBuf::from("repo"));
        assert_eq!(git.target, "HEAD");

        let config = config_from(&["comment_lister", "--git-dir", "repo", "--target", "main~2"]).unwrap();
        assert_eq!(config.git.unwrap().target, "main~2");
    }

    #[test]
    fn test_flags_are_carried_over() {
        let config = config_from(&[
            "comment_lister",
            "--format",
            "yaml",
            "--no-gitignore",
            "--hidden",
            "--jobs",
            "3",
            "--max-depth",
            "2",
            "--ext",
            "thor",
            "--strict",
            "--output",
            "out.yaml",
            "a",
            "b",
        ])
        .unwrap();
        assert_eq!(config.format, engine_options::OutputFormat::Yaml);
        assert!(!config.walk.git_ignore);
        assert!(config.walk.hidden);
        assert_eq!(config.walk.threads, 3);
        assert_eq!(config.walk.max_depth, Some(2));
        assert_eq!(config.filter.extra_ext, ["thor"]);
        assert!(config.strict);
        assert_eq!(config.output_path, Some(PathBuf::from("out.yaml")));
        assert_eq!(config.walk.roots, [PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn test_inverted_size_range_is_rejected() {
        let err = config_from(&["comment_lister", "--min-size", "2K", "--max-size", "1K"])
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}

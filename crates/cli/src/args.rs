// crates/cli/src/args.rs
use crate::options::OutputFormat;
use crate::parsers::{self, SizeArg};
use clap::{Args as ClapArgs, Parser, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "comment_lister",
    version,
    about = "Ruby ソースツリーからコメントを一覧化するツール"
)]
pub struct Args {
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub filter: FilterOptions,

    #[command(flatten)]
    pub scan: ScanOptions,

    #[command(flatten)]
    pub git: GitOptions,

    #[command(flatten)]
    pub behavior: BehaviorOptions,

    /// 対象パス（省略時はカレントディレクトリ）
    #[arg(value_hint = ValueHint::AnyPath, help_heading = "走査/入力")]
    pub paths: Vec<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct OutputOptions {
    /// 出力フォーマット
    #[arg(long, value_enum, default_value = "json", help_heading = "出力")]
    pub format: OutputFormat,

    /// 出力先ファイル
    #[arg(long, value_hint = ValueHint::FilePath, help_heading = "出力")]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct FilterOptions {
    /// Ruby として扱う拡張子を追加（例: thor,jbuilder）
    #[arg(long, value_delimiter = ',', help_heading = "フィルタ")]
    pub ext: Vec<String>,

    /// この大きさ未満のファイルを除外（例: 10K）
    #[arg(long, help_heading = "フィルタ")]
    pub min_size: Option<SizeArg>,

    /// この大きさを超えるファイルを除外（例: 2MiB）
    #[arg(long, help_heading = "フィルタ")]
    pub max_size: Option<SizeArg>,
}

#[derive(ClapArgs, Debug)]
pub struct ScanOptions {
    /// 隠しファイルも対象にする
    #[arg(long, help_heading = "走査/入力")]
    pub hidden: bool,

    /// .gitignore を無視する
    #[arg(long, help_heading = "走査/入力")]
    pub no_gitignore: bool,

    /// 走査する最大深さ
    #[arg(long, help_heading = "走査/入力")]
    pub max_depth: Option<usize>,

    /// シンボリックリンクをたどる
    #[arg(long, help_heading = "走査/入力")]
    pub follow: bool,

    /// 対象に含める glob
    #[arg(long, help_heading = "走査/入力")]
    pub override_include: Vec<String>,

    /// 対象から外す glob
    #[arg(long, help_heading = "走査/入力")]
    pub override_exclude: Vec<String>,

    /// 並列数（既定: CPU 数）
    #[arg(long, short = 'j', value_parser = parsers::parse_positive_usize, help_heading = "走査/入力")]
    pub jobs: Option<usize>,
}

#[derive(ClapArgs, Debug)]
pub struct GitOptions {
    /// 作業ツリーの代わりにこのリポジトリのリビジョンを走査する
    #[arg(long, value_hint = ValueHint::DirPath, conflicts_with = "paths", help_heading = "Git")]
    pub git_dir: Option<PathBuf>,

    /// 走査するリビジョン（既定: HEAD）
    #[arg(long, requires = "git_dir", help_heading = "Git")]
    pub target: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct BehaviorOptions {
    /// 最初のエラーで中断する
    #[arg(long, help_heading = "動作")]
    pub strict: bool,

    /// ログを詳しくする（-v: info, -vv: debug, -vvv: trace）
    #[arg(long, short = 'v', action = clap::ArgAction::Count, help_heading = "動作")]
    pub verbose: u8,

    /// ログを出さない
    #[arg(long, short = 'q', conflicts_with = "verbose", help_heading = "動作")]
    pub quiet: bool,
}

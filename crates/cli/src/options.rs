// crates/cli/src/options.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ファイルごとのコメントをまとめた JSON
    Json,
    /// 1 行 1 コメントの JSON Lines
    Jsonl,
    Yaml,
}

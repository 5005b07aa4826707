// crates/engine/src/options.rs
use serde::{Deserialize, Serialize};

/// レポートの出力形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// 1 つの JSON ドキュメント
    #[default]
    Json,
    /// 1 行 1 コメントの JSON Lines
    Jsonl,
    Yaml,
}

// crates/cli/src/presentation.rs
//! レポートの出力
//!
//! `json` はファイルパスをキーにした 1 つのドキュメント、`jsonl` は 1 行 1 コメント、
//! `yaml` はファイルごとの抽出結果の一覧です。
use crate::config::Config;
use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use comment_lister_core::CommentRecord;
use comment_lister_engine::options::OutputFormat;
use comment_lister_engine::report::{FileComments, RunResult};
use serde_json::{Map, Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};

/// 設定された出力先（`--output` または標準出力）へレポートを書き出す
///
/// # Errors
/// Returns an error if the output file cannot be created or writing fails.
pub fn print_results(result: &RunResult, config: &Config) -> Result<()> {
    match &config.output_path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_results(result, config.format, &mut out)?;
            out.flush()?;
        }
        None => {
            let mut out = std::io::stdout().lock();
            write_results(result, config.format, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}

/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_results<W: Write>(result: &RunResult, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(result, out),
        OutputFormat::Jsonl => write_jsonl(result, out),
        OutputFormat::Yaml => write_yaml(result, out),
    }
}

/// `2024-01-31T09:00:00Z` 形式
fn iso_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn comment_value(record: &CommentRecord) -> Value {
    json!({
        "Text": record.text,
        "Line": record.start_line,
        "EndLine": record.end_line,
        "CharPositionInLine": record.column,
    })
}

fn file_value(file: &FileComments) -> Value {
    let mut obj = Map::new();
    if let Some(id) = &file.object_id {
        obj.insert("ObjectId".to_string(), id.as_str().into());
    }
    if let Some(time) = &file.last_modified {
        obj.insert("LastModified".to_string(), iso_time(time).into());
    }
    obj.insert("FileType".to_string(), file.file_type.name().into());
    if file.is_binary {
        obj.insert("Binary".to_string(), true.into());
    }
    for (i, record) in file.comments.iter().enumerate() {
        obj.insert(i.to_string(), comment_value(record));
    }
    obj.insert("CommentCount".to_string(), file.comment_count().into());
    Value::Object(obj)
}

fn error_value(message: String) -> Value {
    json!({
        "Error": message,
        "CommentCount": 0,
    })
}

/// `json` 形式のドキュメントを組み立てる
///
/// リビジョン走査の結果には先頭にリポジトリとコミットの情報が付きます。
#[must_use]
pub fn json_document(result: &RunResult) -> Value {
    let mut files = Map::new();
    let mut file_types: Map<String, Value> = Map::new();

    for file in &result.files {
        files.insert(file.path.display().to_string(), file_value(file));
        let counter = file_types
            .entry(file.file_type.name())
            .or_insert_with(|| 0.into());
        *counter = (counter.as_u64().unwrap_or(0) + 1).into();
    }
    for (path, err) in &result.errors {
        let key = path.display().to_string();
        // 同じパス（走査エラーなど）が複数あればメッセージを連結する
        let message = match files.get(&key).and_then(|v| v.get("Error")).and_then(Value::as_str) {
            Some(prev) => format!("{prev}; {err}"),
            None => err.to_string(),
        };
        files.insert(key, error_value(message));
    }

    let elapsed_ms = u64::try_from(result.elapsed.as_millis()).unwrap_or(u64::MAX);
    let mut doc = Map::new();
    if let Some(rev) = &result.revision {
        doc.insert("Repository".to_string(), rev.repository.as_str().into());
        doc.insert("Revision".to_string(), rev.revision.as_str().into());
        doc.insert("ObjectId".to_string(), rev.object_id.as_str().into());
        doc.insert("CommitTime".to_string(), iso_time(&rev.commit_time).into());
    }
    doc.insert("Files".to_string(), Value::Object(files));
    doc.insert("FileTypes".to_string(), Value::Object(file_types));
    doc.insert("CommentCount".to_string(), result.comment_count().into());
    doc.insert("ElapsedTime".to_string(), elapsed_ms.into());
    Value::Object(doc)
}

fn write_json<W: Write>(result: &RunResult, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &json_document(result))?;
    writeln!(out)?;
    Ok(())
}

fn write_jsonl<W: Write>(result: &RunResult, out: &mut W) -> Result<()> {
    for file in &result.files {
        let path = file.path.display().to_string();
        for record in &file.comments {
            let line = json!({
                "type": "comment",
                "path": path,
                "text": record.text,
                "start_line": record.start_line,
                "end_line": record.end_line,
                "column": record.column,
            });
            serde_json::to_writer(&mut *out, &line)?;
            writeln!(out)?;
        }
    }

    let total = json!({
        "type": "total",
        "version": crate::VERSION,
        "files": result.files.len(),
        "comments": result.comment_count(),
    });
    serde_json::to_writer(&mut *out, &total)?;
    writeln!(out)?;
    Ok(())
}

fn write_yaml<W: Write>(result: &RunResult, out: &mut W) -> Result<()> {
    serde_yaml::to_writer(out, &result.files)?;
    Ok(())
}

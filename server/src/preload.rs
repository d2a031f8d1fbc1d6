//! Startup corpus loading from JSON / JSONL files.

use anyhow::Result;
use docsearch::{CustomFields, IndexOptions, SearchEngine};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    title: Option<String>,
    body: String,
    #[serde(default = "default_format")]
    format: String,
    #[serde(default)]
    custom_fields: CustomFields,
}
fn default_format() -> String { "text".into() }

/// Index every document found at `input` (a file or a directory of
/// `.json`/`.jsonl` files). Returns the number of documents indexed.
pub async fn preload(engine: &mut SearchEngine, input: &Path) -> Result<usize> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("preload path not found: {}", input.display());
    }

    let mut count = 0;
    for file in files {
        for doc in read_docs(&file)? {
            let opts = IndexOptions { id: Some(doc.id), name: doc.title, custom_fields: doc.custom_fields };
            engine.index_document(doc.body.as_bytes(), &doc.format, opts).await?;
            count += 1;
        }
        tracing::debug!(file = %file.display(), "preloaded file");
    }
    tracing::info!(count, input = %input.display(), "preload complete");
    Ok(count)
}

fn read_docs(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(File::open(file)?);
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut docs = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            docs.push(serde_json::from_str(&line)?);
        }
        return Ok(docs);
    }
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    Ok(match json {
        serde_json::Value::Array(arr) => arr.into_iter().map(serde_json::from_value).collect::<Result<_, _>>()?,
        obj @ serde_json::Value::Object(_) => vec![serde_json::from_value(obj)?],
        _ => vec![],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn loads_json_and_jsonl() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"id": "j1", "title": "Guide", "body": "rust guide"}]"#).unwrap();
        fs::write(dir.path().join("b.jsonl"), "{\"id\": \"l1\", \"body\": \"# Notes\\nmore rust\", \"format\": \"md\"}\n\n").unwrap();
        fs::write(dir.path().join("skip.txt"), "ignored").unwrap();

        let mut engine = SearchEngine::default();
        let count = preload(&mut engine, dir.path()).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(engine.get_document("j1").map(|d| d.name.as_str()), Some("Guide"));
        assert_eq!(engine.get_document("l1").map(|d| d.name.as_str()), Some("Notes"));
    }

    #[tokio::test]
    async fn missing_path_is_an_error() {
        let mut engine = SearchEngine::default();
        assert!(preload(&mut engine, Path::new("/definitely/not/here")).await.is_err());
    }
}

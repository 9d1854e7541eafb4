//! Raw sonnet records as served by PoetryDB, and their conversion into
//! [`Document`]s. File access lives here so the index itself stays pure.

use crate::{CorpusError, DocId, Document};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TITLE_PREFIX: &str = "Sonnet ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SonnetRecord {
    /// e.g. "Sonnet 18: Shall I compare thee to a summer's day?"
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub lines: Vec<String>,
    /// PoetryDB sends this as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linecount: Option<serde_json::Value>,
}

impl SonnetRecord {
    pub fn into_document(self) -> Result<Document, CorpusError> {
        let (id, title) = parse_title(&self.title)?;
        Ok(Document::new(id, title, self.lines))
    }
}

/// Split `"Sonnet 18: Shall I compare..."` into `(18, "Shall I compare...")`.
/// A title without `": "` keeps an empty label.
pub fn parse_title(full: &str) -> Result<(DocId, String), CorpusError> {
    let (head, title) = match full.split_once(": ") {
        Some((head, title)) => (head, title),
        None => (full, ""),
    };
    let id = head
        .replace(TITLE_PREFIX, "")
        .trim()
        .parse::<DocId>()
        .map_err(|_| CorpusError::MalformedTitle(full.to_string()))?;
    Ok((id, title.to_string()))
}

/// Accepts either an array of records or a single record object.
pub fn parse_records(json: &str) -> Result<Vec<SonnetRecord>, CorpusError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(CorpusError::from))
            .collect(),
        serde_json::Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        _ => Err(CorpusError::UnexpectedShape),
    }
}

pub fn into_documents(records: Vec<SonnetRecord>) -> Result<Vec<Document>, CorpusError> {
    records.into_iter().map(SonnetRecord::into_document).collect()
}

pub fn load_corpus(path: &Path) -> Result<Vec<SonnetRecord>, CorpusError> {
    let mut buf = String::new();
    BufReader::new(File::open(path)?).read_to_string(&mut buf)?;
    parse_records(&buf)
}

/// Write records as JSON indented by four spaces.
pub fn save_records(path: &Path, records: &[SonnetRecord]) -> Result<(), CorpusError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    records.serialize(&mut ser)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// `path` may be a single JSON file or a directory searched recursively for
/// `*.json` files, read in path order. A missing path is an error.
pub fn corpus_files(path: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    if !path.exists() {
        return Err(io::Error::new(io::ErrorKind::NotFound, format!("corpus not found: {}", path.display())).into());
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(io::Error::from)?;
        let p = entry.into_path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(p);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every record under `path` and convert it into a document.
/// Duplicate ids are left for the index build to reject.
pub fn load_documents(path: &Path) -> Result<Vec<Document>, CorpusError> {
    let mut docs = Vec::new();
    for file in corpus_files(path)? {
        let records = load_corpus(&file)?;
        tracing::debug!(file = %file.display(), records = records.len(), "loaded corpus file");
        docs.extend(into_documents(records)?);
    }
    Ok(docs)
}

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::DocId;

/// Separates the document id from its text on every corpus line.
pub const RECORD_SEPARATOR: char = '\t';

/// Normalized document text keyed by document id, iterated in ascending id order.
pub type Documents = BTreeMap<DocId, String>;

/// Load a tab-separated corpus (`<id>\t<text>` per line) from disk.
///
/// Text is lower-cased and trimmed as it is read. A single malformed line aborts
/// the whole load. When an id repeats, the later line replaces the earlier one.
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Documents> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IndexError::NotFound(path.to_path_buf()));
    }
    let f = File::open(path)?;
    let documents = parse_documents(BufReader::new(f))?;
    tracing::info!(path = %path.display(), num_docs = documents.len(), "loaded documents");
    Ok(documents)
}

/// Parse corpus records from any buffered reader.
pub fn parse_documents<R: BufRead>(reader: R) -> Result<Documents> {
    let mut documents = Documents::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let (id, text) = parse_record(&line, idx + 1)?;
        if documents.insert(id, text).is_some() {
            tracing::debug!(doc_id = id, line = idx + 1, "duplicate document id, keeping the later record");
        }
    }
    Ok(documents)
}

fn parse_record(line: &str, line_no: usize) -> Result<(DocId, String)> {
    let line = line.to_lowercase();
    let (id, text) = line.split_once(RECORD_SEPARATOR).ok_or_else(|| IndexError::MalformedRecord {
        line: line_no,
        reason: "missing tab separator between id and text".into(),
    })?;
    let id: DocId = id.trim().parse().map_err(|_| IndexError::MalformedRecord {
        line: line_no,
        reason: format!("document id {:?} is not a non-negative 64-bit integer", id.trim()),
    })?;
    Ok((id, text.trim().to_string()))
}

//! JSON persistence: `{"term": [doc_id, ...], ...}`.

use serde_json::Value;

use crate::error::Result;
use crate::index::InvertedIndex;

pub fn encode(index: &InvertedIndex) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(index)?)
}

/// Parses into an untyped value first so structural problems surface as
/// validation errors rather than generic deserialization failures.
pub fn decode(bytes: &[u8]) -> Result<InvertedIndex> {
    let value: Value = serde_json::from_slice(bytes)?;
    let index = InvertedIndex::from_json_value(&value)?;
    tracing::debug!(num_terms = index.len(), "decoded text index");
    Ok(index)
}

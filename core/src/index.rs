use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::persist::Codec;
use crate::tokenizer::normalize_term;
use crate::DocId;

/// Term -> postings, iterated in term order so dumps are reproducible.
pub type Mapping = BTreeMap<String, Vec<DocId>>;

/// Word to document-id mapping.
///
/// Postings are stored as sequences and may repeat an id when a term occurs
/// several times in one document. Equality and queries treat them as sets.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    data: Mapping,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a typed mapping. The types already rule out non-string keys and
    /// non-integer postings, so no runtime check is needed here.
    pub fn from_mapping(data: Mapping) -> Self {
        Self { data }
    }

    /// Build an index from an untrusted JSON value, checking its structure first.
    pub fn from_json_value(value: &Value) -> std::result::Result<Self, ValidationError> {
        Ok(Self { data: Self::validate(value)? })
    }

    /// Structural check for externally supplied mappings: the value must be an
    /// object whose values are arrays of non-negative integers.
    pub fn validate(value: &Value) -> std::result::Result<Mapping, ValidationError> {
        let obj = value.as_object().ok_or(ValidationError::NotAMapping { found: json_kind(value) })?;
        let mut data = Mapping::new();
        for (term, postings) in obj {
            let arr = postings.as_array().ok_or_else(|| ValidationError::PostingsNotAList {
                term: term.clone(),
                found: json_kind(postings),
            })?;
            let ids = arr
                .iter()
                .map(|v| {
                    v.as_u64()
                        .ok_or_else(|| ValidationError::InvalidPosting { term: term.clone(), value: v.to_string() })
                })
                .collect::<std::result::Result<Vec<DocId>, _>>()?;
            data.insert(term.clone(), ids);
        }
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw postings for an already normalized term; empty when the term is absent.
    pub fn postings(&self, term: &str) -> &[DocId] {
        self.data.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn mapping(&self) -> &Mapping {
        &self.data
    }

    pub fn into_mapping(self) -> Mapping {
        self.data
    }

    /// Ids of the documents that contain every term of the query.
    ///
    /// Terms are trimmed and lower-cased first. An empty index or an empty query
    /// yields an empty set, as does any term missing from the index.
    pub fn query<S: AsRef<str>>(&self, terms: &[S]) -> BTreeSet<DocId> {
        if self.data.is_empty() || terms.is_empty() {
            return BTreeSet::new();
        }
        let mut terms = terms.iter().map(|t| normalize_term(t.as_ref()));
        let mut result: BTreeSet<DocId> = match terms.next() {
            Some(first) => self.postings(&first).iter().copied().collect(),
            None => return BTreeSet::new(),
        };
        for term in terms {
            if result.is_empty() {
                break;
            }
            let docs: HashSet<DocId> = self.postings(&term).iter().copied().collect();
            result.retain(|id| docs.contains(id));
        }
        result
    }

    pub fn dump<P: AsRef<Path>>(&self, path: P, codec: Codec) -> Result<()> {
        codec.dump(self, path.as_ref())
    }

    pub fn load<P: AsRef<Path>>(path: P, codec: Codec) -> Result<Self> {
        codec.load(path.as_ref())
    }
}

impl PartialEq for InvertedIndex {
    fn eq(&self, other: &Self) -> bool {
        self.data.len() == other.data.len()
            && self.data.iter().all(|(term, postings)| {
                other
                    .data
                    .get(term)
                    .map_or(false, |theirs| as_set(postings) == as_set(theirs))
            })
    }
}

impl Eq for InvertedIndex {}

impl fmt::Display for InvertedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InvertedIndex: {:?}", self.data)
    }
}

fn as_set(postings: &[DocId]) -> HashSet<DocId> {
    postings.iter().copied().collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

use crate::document::Documents;
use crate::index::{InvertedIndex, Mapping};
use crate::tokenizer::tokenize;
use crate::DocId;

/// Accumulates postings document by document.
///
/// Ids are appended in the order documents are added, then in token order
/// within each document, so a term repeated in one document gets repeated
/// postings for it.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    mapping: Mapping,
    num_docs: usize,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text is expected to be normalized already (see [`crate::document::load_documents`]).
    pub fn add_document(&mut self, doc_id: DocId, text: &str) {
        for token in tokenize(text) {
            match self.mapping.get_mut(token) {
                Some(postings) => postings.push(doc_id),
                None => {
                    self.mapping.insert(token.to_string(), vec![doc_id]);
                }
            }
        }
        self.num_docs += 1;
    }

    pub fn build(self) -> InvertedIndex {
        tracing::info!(num_docs = self.num_docs, num_terms = self.mapping.len(), "built inverted index");
        InvertedIndex::from_mapping(self.mapping)
    }
}

/// Index every document of a loaded corpus in ascending id order.
pub fn build_inverted_index(documents: &Documents) -> InvertedIndex {
    let mut builder = IndexBuilder::new();
    for (&doc_id, text) in documents {
        builder.add_document(doc_id, text);
    }
    builder.build()
}

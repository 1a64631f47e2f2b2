use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::index::InvertedIndex;
use crate::DocId;

/// Read-mostly handle to the current index.
///
/// Indices are never mutated in place: a writer builds a fresh one and swaps it
/// in with [`SharedIndex::replace`], while readers keep querying whatever
/// snapshot they already hold.
///
/// ```
/// use inverted_index::{build_inverted_index, parse_documents, SharedIndex};
///
/// let docs = parse_documents("1\tfirst line\n".as_bytes()).unwrap();
/// let shared = SharedIndex::new(build_inverted_index(&docs));
/// let before = shared.snapshot();
///
/// let docs = parse_documents("2\tsecond line\n".as_bytes()).unwrap();
/// shared.replace(build_inverted_index(&docs));
///
/// assert_eq!(before.query(&["line"]).into_iter().collect::<Vec<_>>(), vec![1]);
/// assert_eq!(shared.query(&["line"]).into_iter().collect::<Vec<_>>(), vec![2]);
/// ```
#[derive(Debug, Default)]
pub struct SharedIndex {
    current: RwLock<Arc<InvertedIndex>>,
}

impl SharedIndex {
    pub fn new(index: InvertedIndex) -> Self {
        Self { current: RwLock::new(Arc::new(index)) }
    }

    pub fn snapshot(&self) -> Arc<InvertedIndex> {
        Arc::clone(&self.current.read())
    }

    /// Swap in a new index, returning the one it replaced.
    pub fn replace(&self, index: InvertedIndex) -> Arc<InvertedIndex> {
        let next = Arc::new(index);
        let mut current = self.current.write();
        std::mem::replace(&mut *current, next)
    }

    pub fn query<S: AsRef<str>>(&self, terms: &[S]) -> BTreeSet<DocId> {
        self.snapshot().query(terms)
    }
}

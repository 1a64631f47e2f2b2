pub mod builder;
pub mod document;
pub mod error;
pub mod index;
pub mod persist;
pub mod shared;
pub mod tokenizer;

pub type DocId = u64;

pub use builder::{build_inverted_index, IndexBuilder};
pub use document::{load_documents, parse_documents, Documents};
pub use error::{IndexError, Result, ValidationError};
pub use index::{InvertedIndex, Mapping};
pub use persist::{Codec, DEFAULT_INDEX_FILENAME};
pub use shared::SharedIndex;

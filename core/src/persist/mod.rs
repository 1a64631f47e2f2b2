//! On-disk persistence for [`InvertedIndex`].
//!
//! Two interchangeable formats sit behind [`Codec`]: a JSON object of term to
//! posting arrays ([`text`]) and a compact big-endian framing ([`binary`]).
//! Both encode fully in memory before anything is written, so a rejected
//! dump leaves no partial file behind.

pub mod binary;
pub mod text;

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use crate::error::{IndexError, Result};
use crate::index::InvertedIndex;

/// Default file name for a dumped index.
pub const DEFAULT_INDEX_FILENAME: &str = "inverted.index";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Text,
    Binary,
}

impl Codec {
    pub fn name(self) -> &'static str {
        match self {
            Codec::Text => "text",
            Codec::Binary => "binary",
        }
    }

    pub fn encode(self, index: &InvertedIndex) -> Result<Vec<u8>> {
        match self {
            Codec::Text => text::encode(index),
            Codec::Binary => binary::encode(index),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<InvertedIndex> {
        match self {
            Codec::Text => text::decode(bytes),
            Codec::Binary => binary::decode(bytes),
        }
    }

    pub fn dump(self, index: &InvertedIndex, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let bytes = self.encode(index)?;
        fs::write(path, &bytes)?;
        tracing::info!(path = %path.display(), codec = self.name(), num_terms = index.len(), bytes = bytes.len(), "dumped index");
        Ok(())
    }

    pub fn load(self, path: &Path) -> Result<InvertedIndex> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => IndexError::NotFound(path.to_path_buf()),
            _ => IndexError::Io(e),
        })?;
        let index = self.decode(&bytes)?;
        tracing::info!(path = %path.display(), codec = self.name(), num_terms = index.len(), "loaded index");
        Ok(index)
    }
}

impl FromStr for Codec {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "json" => Ok(Codec::Text),
            "binary" | "struct" => Ok(Codec::Binary),
            _ => Err(IndexError::UnsupportedCodec(s.to_string())),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bare file name targets the working directory and is always accepted.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(IndexError::DirectoryNotFound(path.to_path_buf()))
        }
        _ => Ok(()),
    }
}

//! Compact binary persistence. All integers are big-endian.
//!
//! ```text
//! i32  entry_count
//! entry_count times:
//!   u16  word_len
//!   [u8; word_len]  word (UTF-8)
//!   u16  posting_count
//!   posting_count times:
//!     i32  doc_id
//! ```

use crate::error::{IndexError, Result, ValidationError};
use crate::index::{InvertedIndex, Mapping};
use crate::DocId;

/// Longest word, in UTF-8 bytes, the format can frame.
pub const MAX_WORD_BYTES: usize = u16::MAX as usize;

/// Longest posting list the format can frame.
pub const MAX_POSTINGS: usize = u16::MAX as usize;

/// Largest document id that fits the signed 32-bit id field.
pub const MAX_DOC_ID: DocId = i32::MAX as DocId;

pub fn encode(index: &InvertedIndex) -> Result<Vec<u8>> {
    let mapping = index.mapping();
    let entry_count = i32::try_from(mapping.len())
        .map_err(|_| IndexError::SizeLimit(format!("{} entries exceed the 32-bit entry count", mapping.len())))?;

    let mut buf = Vec::new();
    buf.extend_from_slice(&entry_count.to_be_bytes());
    for (word, postings) in mapping {
        let word_len = u16::try_from(word.len()).map_err(|_| {
            IndexError::SizeLimit(format!("word of {} bytes exceeds {} bytes", word.len(), MAX_WORD_BYTES))
        })?;
        let posting_count = u16::try_from(postings.len()).map_err(|_| {
            IndexError::SizeLimit(format!(
                "word {:?} has {} postings, more than {}",
                word,
                postings.len(),
                MAX_POSTINGS
            ))
        })?;

        buf.extend_from_slice(&word_len.to_be_bytes());
        buf.extend_from_slice(word.as_bytes());
        buf.extend_from_slice(&posting_count.to_be_bytes());
        for &doc_id in postings {
            let doc_id = i32::try_from(doc_id).map_err(|_| {
                IndexError::SizeLimit(format!("document id {} exceeds {}", doc_id, MAX_DOC_ID))
            })?;
            buf.extend_from_slice(&doc_id.to_be_bytes());
        }
    }
    Ok(buf)
}

/// Decode a complete stream. Running out of bytes or leaving bytes unread is
/// reported as corruption; nothing partial is ever returned.
pub fn decode(bytes: &[u8]) -> Result<InvertedIndex> {
    let mut reader = FrameReader::new(bytes);
    let entry_count = reader.read_i32("entry count")?;
    if entry_count < 0 {
        return Err(IndexError::Corrupt(format!("negative entry count {}", entry_count)));
    }

    let mut data = Mapping::new();
    for _ in 0..entry_count {
        let word_len = reader.read_u16("word length")? as usize;
        let word = std::str::from_utf8(reader.take(word_len, "word")?)
            .map_err(|e| IndexError::Corrupt(format!("word at offset {} is not UTF-8: {}", reader.pos - word_len, e)))?
            .to_string();

        let posting_count = reader.read_u16("posting count")? as usize;
        let mut postings = Vec::with_capacity(posting_count);
        for _ in 0..posting_count {
            let raw = reader.read_i32("document id")?;
            let doc_id = DocId::try_from(raw)
                .map_err(|_| ValidationError::InvalidPosting { term: word.clone(), value: raw.to_string() })?;
            postings.push(doc_id);
        }
        // a repeated word replaces the earlier entry
        data.insert(word, postings);
    }

    if reader.remaining() > 0 {
        return Err(IndexError::Corrupt(format!(
            "{} trailing bytes after {} entries",
            reader.remaining(),
            entry_count
        )));
    }
    tracing::debug!(entries = entry_count, bytes = bytes.len(), "decoded binary index");
    Ok(InvertedIndex::from_mapping(data))
}

struct FrameReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(IndexError::Corrupt(format!(
                "unexpected end of data reading {} at offset {}: need {} bytes, {} left",
                what,
                self.pos,
                len,
                self.remaining()
            )));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_u16(&mut self, what: &str) -> Result<u16> {
        let mut raw = [0u8; 2];
        raw.copy_from_slice(self.take(2, what)?);
        Ok(u16::from_be_bytes(raw))
    }

    fn read_i32(&mut self, what: &str) -> Result<i32> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4, what)?);
        Ok(i32::from_be_bytes(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(entries: Vec<(&str, Vec<DocId>)>) -> InvertedIndex {
        InvertedIndex::from_mapping(entries.into_iter().map(|(w, ids)| (w.to_string(), ids)).collect())
    }

    #[test]
    fn encodes_documented_layout() {
        let bytes = encode(&index_of(vec![("ab", vec![1, 258])])).unwrap();
        assert_eq!(
            bytes,
            vec![
                0, 0, 0, 1, // entry_count
                0, 2, b'a', b'b', // word
                0, 2, // posting_count
                0, 0, 0, 1, 0, 0, 1, 2, // doc ids
            ]
        );
    }

    #[test]
    fn empty_index_is_just_a_count() {
        let bytes = encode(&InvertedIndex::new()).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn decodes_multibyte_words() {
        let index = index_of(vec![("привет", vec![3]), ("", vec![])]);
        assert_eq!(decode(&encode(&index).unwrap()).unwrap(), index);
    }

    #[test]
    fn every_truncation_is_corrupt() {
        let bytes = encode(&index_of(vec![("alpha", vec![1, 2]), ("beta", vec![])])).unwrap();
        for len in 0..bytes.len() {
            let err = decode(&bytes[..len]).unwrap_err();
            assert!(matches!(err, IndexError::Corrupt(_)), "len {len}: {err}");
        }
    }

    #[test]
    fn trailing_bytes_are_corrupt() {
        let mut bytes = encode(&index_of(vec![("a", vec![1])])).unwrap();
        bytes.push(0);
        assert!(matches!(decode(&bytes), Err(IndexError::Corrupt(_))));
    }

    #[test]
    fn entry_count_larger_than_content_is_corrupt() {
        let mut bytes = encode(&index_of(vec![("a", vec![1])])).unwrap();
        bytes[3] = 2;
        assert!(matches!(decode(&bytes), Err(IndexError::Corrupt(_))));
    }

    #[test]
    fn negative_entry_count_is_corrupt() {
        assert!(matches!(decode(&(-1i32).to_be_bytes()), Err(IndexError::Corrupt(_))));
    }

    #[test]
    fn invalid_utf8_word_is_corrupt() {
        let bytes = vec![0, 0, 0, 1, 0, 1, 0xff, 0, 0];
        assert!(matches!(decode(&bytes), Err(IndexError::Corrupt(_))));
    }

    #[test]
    fn negative_doc_id_is_structural() {
        let bytes = vec![0, 0, 0, 1, 0, 1, b'a', 0, 1, 0xff, 0xff, 0xff, 0xff];
        assert!(matches!(decode(&bytes), Err(IndexError::Structural(_))));
    }

    #[test]
    fn oversized_word_fails_fast() {
        let long = "x".repeat(MAX_WORD_BYTES + 1);
        let index = index_of(vec![(long.as_str(), vec![1])]);
        assert!(matches!(encode(&index), Err(IndexError::SizeLimit(_))));
    }

    #[test]
    fn oversized_posting_list_fails_fast() {
        let ids = vec![1; MAX_POSTINGS + 1];
        assert!(matches!(encode(&index_of(vec![("w", ids)])), Err(IndexError::SizeLimit(_))));
        let ids = vec![1; MAX_POSTINGS];
        assert!(encode(&index_of(vec![("w", ids)])).is_ok());
    }

    #[test]
    fn doc_id_beyond_i32_fails_fast() {
        assert!(matches!(encode(&index_of(vec![("w", vec![MAX_DOC_ID + 1])])), Err(IndexError::SizeLimit(_))));
        assert!(encode(&index_of(vec![("w", vec![MAX_DOC_ID])])).is_ok());
    }
}

use std::collections::HashMap;

use sha2::{Digest as _, Sha256};

/// Identity of one imported document: content digest plus the name it was loaded under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceKey {
    /// Hex SHA-256 of the document bytes.
    pub digest: String,
    /// Path or URI the bytes came from.
    pub file: String,
}

#[derive(Clone, Debug)]
struct LineTable {
    text: String,
    starts: Vec<usize>,
}

/// Provenance of every document imported during a run.
///
/// Documents are keyed by digest and name, so importing the same file twice
/// records it once. Error reporting uses the table to turn a needle (an include
/// name, a create target) back into `file:line`.
#[derive(Clone, Debug, Default)]
pub struct SourceLines {
    files: HashMap<SourceKey, LineTable>,
}

impl SourceLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `bytes` loaded from `file`. Returns the key and whether it was new.
    pub fn record(&mut self, file: &str, bytes: &[u8]) -> (SourceKey, bool) {
        let key = SourceKey {
            digest: content_digest(bytes),
            file: file.to_string(),
        };
        if self.files.contains_key(&key) {
            return (key, false);
        }

        let text = String::from_utf8_lossy(bytes).into_owned();
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        self.files.insert(key.clone(), LineTable { text, starts });
        (key, true)
    }

    /// 1-based line holding byte `offset`.
    pub fn line_for_offset(&self, key: &SourceKey, offset: usize) -> Option<usize> {
        let table = self.files.get(key)?;
        if offset > table.text.len() {
            return None;
        }
        Some(table.starts.partition_point(|&s| s <= offset))
    }

    /// 1-based line of the first occurrence of `needle`.
    pub fn line_of(&self, key: &SourceKey, needle: &str) -> Option<usize> {
        let table = self.files.get(key)?;
        let offset = table.text.find(needle)?;
        self.line_for_offset(key, offset)
    }

    /// `file:line` for the first occurrence of `needle`, or just the file.
    pub fn describe(&self, key: &SourceKey, needle: &str) -> String {
        match self.line_of(key, needle) {
            Some(line) => format!("{}:{line}", key.file),
            None => key.file.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Hex SHA-256 of `bytes`.
pub fn content_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/lines.rs"]
mod tests;

//! Staging area (index)
//!
//! The index is an ordered list of `(working path, blob id)` records
//! naming the files staged for the next commit. On disk each record is one
//! line, path and id separated by a NUL byte:
//!
//! ```text
//! testfolder1/letters.txt\0<40 hex chars>\n
//! ```
//!
//! A path may be staged at most once between commits; a successful commit
//! clears the whole file.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::RECORD_SEPARATOR;
use crate::error::OpError;
use anyhow::Context;
use derive_new::new;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// Working-tree path exactly as it was staged
    pub path: String,
    pub oid: ObjectId,
}

#[derive(Debug)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
    /// Staged records in append order
    entries: Vec<IndexEntry>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk. A missing file reads as an empty index.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read index file {}", self.path.display()))?;
        self.entries = Self::parse(&content)?;

        Ok(())
    }

    fn parse(content: &str) -> anyhow::Result<Vec<IndexEntry>> {
        content
            .split_terminator('\n')
            .map(|line| {
                let (path, id) = line
                    .split_once(RECORD_SEPARATOR)
                    .ok_or_else(|| OpError::Parse(format!("index line {line:?} has no separator")))?;

                Ok(IndexEntry::new(
                    path.to_string(),
                    ObjectId::try_parse(id.to_string())?,
                ))
            })
            .collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|entry| entry.path == path)
    }

    /// Stage a record. Staging the same path twice without an intervening
    /// commit is rejected.
    pub fn add(&mut self, entry: IndexEntry) -> anyhow::Result<()> {
        if self.contains(&entry.path) {
            return Err(OpError::DuplicateStage(entry.path).into());
        }

        self.entries.push(entry);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Persist the in-memory records, truncating the file.
    pub fn write_updates(&self) -> anyhow::Result<()> {
        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(&entry.path);
            content.push(RECORD_SEPARATOR);
            content.push_str(entry.oid.as_ref());
            content.push('\n');
        }

        std::fs::write(&self.path, content)
            .with_context(|| format!("Unable to write index file {}", self.path.display()))
    }
}

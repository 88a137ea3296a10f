//! Object identifier (SHA-1 digest)
//!
//! Object ids are 40-character lowercase hexadecimal strings. They name all
//! stored objects (blobs, trees, commits) as well as cached source versions
//! in the build driver.
//!
//! ## Storage
//!
//! An object with id `abc123...` lives at `<objects>/ab/c123...`.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::error::OpError;
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// A validated 40-character lowercase hex SHA-1 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id from a string.
    ///
    /// Rejects anything that is not exactly 40 lowercase hex characters.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        let valid_length = id.len() == OBJECT_ID_LENGTH;
        let valid_chars = id
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());

        if !valid_length || !valid_chars {
            return Err(OpError::BadDigestFormat(id).into());
        }

        Ok(Self(id))
    }

    /// Digest arbitrary bytes.
    ///
    /// This is the only producer of object ids; equal inputs always yield
    /// equal ids.
    pub fn hash(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);

        let digest = hasher.finalize();
        Self(format!("{digest:x}"))
    }

    /// Convert to the fan-out path used by the object store.
    ///
    /// Splits the digest as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters, for display.
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Blob object
//!
//! A blob is an immutable snapshot of one file's bytes. The stored form is
//! `blob <size>\0<content>` and the object id is the SHA-1 of exactly those
//! bytes, which keeps ids byte-compatible with `git hash-object`.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::OpError;
use bytes::Bytes;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Blob {
    /// Raw file content, without the storage header
    content: Bytes,
}

impl Blob {
    pub fn new(content: impl Into<Bytes>) -> Self {
        Blob {
            content: content.into(),
        }
    }

    /// Snapshot a file from the working directory.
    pub fn from_working_file(workspace: &Workspace, file_path: &Path) -> anyhow::Result<Self> {
        let content = workspace.read_file(file_path)?;
        Ok(Blob { content })
    }

    /// Load a blob back out of the object store, stripping the header.
    pub fn from_object_store(database: &Database, object_id: &ObjectId) -> anyhow::Result<Self> {
        let stored = database.load(object_id)?;

        let nul_position = stored
            .iter()
            .position(|&byte| byte == 0)
            .ok_or_else(|| OpError::Parse(format!("blob {object_id} has no header")))?;
        let header = std::str::from_utf8(&stored[..nul_position])
            .map_err(|_| OpError::Parse(format!("blob {object_id} header is not UTF-8")))?;

        let size: usize = header
            .strip_prefix("blob ")
            .and_then(|size| size.parse().ok())
            .ok_or_else(|| OpError::Parse(format!("blob {object_id} has a malformed header")))?;

        let content = stored.slice(nul_position + 1..);
        if content.len() != size {
            return Err(OpError::Parse(format!(
                "blob {object_id} header announces {size} bytes but {} are stored",
                content.len()
            ))
            .into());
        }

        Ok(Blob { content })
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Write the raw content back to the working directory.
    pub fn restore(&self, workspace: &Workspace, file_path: &Path) -> anyhow::Result<()> {
        workspace.write_file(file_path, &self.content)
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), self.content.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}

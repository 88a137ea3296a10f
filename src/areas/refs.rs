//! HEAD and TOPCOMMIT bookkeeping
//!
//! Two plain-text files under the repository directory:
//!
//! - `HEAD` holds the id of the currently checked-out commit, or nothing
//!   before the first commit
//! - `TOPCOMMIT` exists only while HEAD points away from the most recent
//!   commit (a detached historical checkout); it holds the id of that most
//!   recent commit so later operations can find their way back

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};

const HEAD_FILE: &str = "HEAD";
const TOP_COMMIT_FILE: &str = "TOPCOMMIT";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.git`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_FILE)
    }

    pub fn top_commit_path(&self) -> PathBuf {
        self.path.join(TOP_COMMIT_FILE)
    }

    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        Self::read_ref_file(&self.head_path())
    }

    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        Self::write_ref_file(&self.head_path(), oid)
    }

    pub fn read_top_commit(&self) -> anyhow::Result<Option<ObjectId>> {
        Self::read_ref_file(&self.top_commit_path())
    }

    pub fn update_top_commit(&self, oid: &ObjectId) -> anyhow::Result<()> {
        Self::write_ref_file(&self.top_commit_path(), oid)
    }

    /// Remove TOPCOMMIT; absence is tolerated.
    pub fn clear_top_commit(&self) -> anyhow::Result<()> {
        let path = self.top_commit_path();

        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Unable to remove {}", path.display()))?;
        }

        Ok(())
    }

    fn read_ref_file(path: &Path) -> anyhow::Result<Option<ObjectId>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read ref file {}", path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    fn write_ref_file(path: &Path, oid: &ObjectId) -> anyhow::Result<()> {
        std::fs::write(path, oid.as_ref())
            .with_context(|| format!("Unable to write ref file {}", path.display()))
    }
}

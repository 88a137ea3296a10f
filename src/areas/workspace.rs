//! Working-directory file system operations
//!
//! All reads and writes of versioned files go through the workspace, which
//! scopes every path to the repository root. File handles are opened and
//! closed within each call; no descriptor outlives an operation.

use anyhow::Context;
use bytes::Bytes;
use std::path::Path;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_file(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Unable to read file {}", full_path.display()))?;

        Ok(content.into())
    }

    /// Write `content` at `file_path`, creating missing parent directories.
    pub fn write_file(&self, file_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create parent directories for {}", full_path.display())
            })?;
        }

        std::fs::write(&full_path, content)
            .with_context(|| format!("Unable to write file {}", full_path.display()))
    }

    /// Remove a file; a missing file is not an error.
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Unable to remove file {}", full_path.display()))?;
        }

        Ok(())
    }

    pub fn make_dir(&self, dir_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(dir_path);

        if !full_path.exists() {
            std::fs::create_dir_all(&full_path)
                .with_context(|| format!("Unable to create directory {}", full_path.display()))?;
        }

        Ok(())
    }

    /// Remove a directory only when it exists and contains nothing.
    ///
    /// Directories still holding untracked files are left alone.
    pub fn remove_dir_if_empty(&self, dir_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(dir_path);

        if full_path.is_dir() && full_path.read_dir()?.next().is_none() {
            std::fs::remove_dir(&full_path)
                .with_context(|| format!("Unable to remove directory {}", full_path.display()))?;
        }

        Ok(())
    }
}

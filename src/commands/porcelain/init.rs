use crate::areas::repository::Repository;
use crate::error::OpError;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        let git_path = self.git_path();

        if git_path.exists() {
            return Err(OpError::AlreadyInitialized(self.path().to_path_buf()).into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create the objects directory")?;

        // an empty index and an empty HEAD mark a freshly initialized repo
        fs::write(self.index().path(), "").context("Failed to create the index file")?;
        fs::write(self.refs().head_path(), "").context("Failed to create the HEAD file")?;

        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            git_path.display()
        )?;

        Ok(())
    }
}

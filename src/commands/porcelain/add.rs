use crate::areas::index::IndexEntry;
use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::error::OpError;
use std::path::Path;

impl Repository {
    /// Snapshot one working-tree file and stage it for the next commit.
    pub fn add(&mut self, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let file_path = Path::new(path);
        if !self.workspace().is_file(file_path) {
            return Err(OpError::MissingPath(file_path.to_path_buf()).into());
        }

        let blob = Blob::from_working_file(self.workspace(), file_path)?;
        let blob_id = blob.object_id()?;
        self.database().store(&blob)?;

        let mut index = self.index();
        index.rehydrate()?;
        index.add(IndexEntry::new(path.to_string(), blob_id))?;
        index.write_updates()?;

        Ok(())
    }
}

//! Content-addressed object store
//!
//! Objects are filed under their SHA-1 id: the first two hex characters name
//! a fan-out directory, the remaining 38 the file. Content is stored
//! verbatim; because the path is derived from the content, a repeated store
//! of the same object is a no-op.

use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::OpError;
use anyhow::Context;
use bytes::Bytes;
use std::path::Path;

#[derive(Debug)]
pub struct Database {
    /// Path to the objects directory (typically `.git/objects`)
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Store an object under its own id.
    ///
    /// The fan-out directory is created on demand. An object that already
    /// exists is left untouched.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<()> {
        let object_path = self.path.join(object.object_path()?);

        if object_path.exists() {
            return Ok(());
        }

        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).context(format!(
            "Unable to create object directory {}",
            object_dir.display()
        ))?;

        // write to a temp name first, then rename into place
        let temp_path = object_dir.join("tmp-obj");
        std::fs::write(&temp_path, object.serialize()?).context(format!(
            "Unable to write object file {}",
            temp_path.display()
        ))?;
        std::fs::rename(&temp_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    /// Load the stored bytes of an object.
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        if !object_path.is_file() {
            return Err(OpError::UnknownObject(object_id.to_string()).into());
        }

        let content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Ok(content.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::object::Object;
    use pretty_assertions::assert_eq;

    #[test]
    fn store_then_load_round_trips_the_stored_bytes() -> anyhow::Result<()> {
        let dir = assert_fs::TempDir::new()?;
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let blob = Blob::new("ninety-nine bottles");
        let oid = blob.object_id()?;

        database.store(&blob)?;
        let loaded = database.load(&oid)?;
        assert_eq!(&loaded[..], &b"blob 19\0ninety-nine bottles"[..]);

        // storing again is a no-op
        database.store(&blob)?;
        assert_eq!(database.load(&oid)?, loaded);

        Ok(())
    }

    #[test]
    fn load_of_an_absent_object_fails() -> anyhow::Result<()> {
        let dir = assert_fs::TempDir::new()?;
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let missing = ObjectId::hash(b"nothing stored under this");
        assert!(database.load(&missing).is_err());

        Ok(())
    }
}

//! Core object traits
//!
//! Everything kept in the object store (blob, tree, commit) implements the
//! same small capability set: produce the bytes to be stored and the object
//! id those bytes are filed under.
//!
//! The id is the SHA-1 of the serialized form for blobs and commits; trees
//! override it because their id is computed over the recursive
//! `name || child-id` concatenation, not over the stored record.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use std::path::PathBuf;

/// Serialization to the stored byte form.
pub trait Packable {
    /// The exact bytes written into the object store.
    fn serialize(&self) -> Result<Bytes>;
}

/// Common operations over storable objects.
pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Compute the object id.
    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::hash(&self.serialize()?))
    }

    /// The fan-out path this object is stored under.
    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

//! Tree object
//!
//! A tree is one directory node of a snapshot: named sub-trees plus a list
//! of `(filename, blob-id)` leaves. Two byte forms exist and they are not
//! the same:
//!
//! - the **id preimage**: the concatenation, in iteration order, of
//!   `name || child-id` for every sub-tree and then every leaf; the tree id
//!   is the SHA-1 of that concatenation
//! - the **stored record**: one line per child, `kind\0id\0name\n` with
//!   `kind` being `tree` or `blob`, which is what the object store keeps
//!   and what [`Tree::from_object_store`] parses back
//!
//! Branches iterate in sorted key order by construction; leaves must be
//! sorted with [`Tree::sort`] before hashing or serializing to make the id
//! insertion-order independent. An empty tree serializes to zero bytes and
//! hashes the empty string.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::RECORD_SEPARATOR;
use crate::error::OpError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Sub-directories, keyed by single path segment
    branches: BTreeMap<String, Tree>,
    /// Files in this directory as `(name, blob id)` pairs
    leaves: Vec<(String, ObjectId)>,
}

impl Tree {
    /// Parse a stored tree record, loading sub-trees recursively.
    pub fn from_object_store(database: &Database, object_id: &ObjectId) -> anyhow::Result<Self> {
        let record = database.load(object_id)?;
        let record = std::str::from_utf8(&record)
            .map_err(|_| OpError::Parse(format!("tree {object_id} is not UTF-8")))?;

        let mut tree = Tree::default();

        for line in record.split_terminator('\n') {
            let mut fields = line.splitn(3, RECORD_SEPARATOR);
            let (kind, id, name) = match (fields.next(), fields.next(), fields.next()) {
                (Some(kind), Some(id), Some(name)) => (kind, id, name),
                _ => {
                    return Err(
                        OpError::Parse(format!("tree {object_id} has a malformed entry")).into(),
                    );
                }
            };

            let child_id = ObjectId::try_parse(id.to_string())?;
            match ObjectType::try_from(kind)? {
                ObjectType::Blob => tree.leaves.push((name.to_string(), child_id)),
                ObjectType::Tree => {
                    let branch = Tree::from_object_store(database, &child_id)?;
                    tree.branches.insert(name.to_string(), branch);
                }
                ObjectType::Commit => {
                    return Err(OpError::Parse(format!(
                        "tree {object_id} references a commit entry"
                    ))
                    .into());
                }
            }
        }

        Ok(tree)
    }

    /// Insert a blob at a slash-separated path, creating intermediate
    /// sub-trees as needed. A leaf already present under the same name is
    /// replaced rather than duplicated.
    pub fn add_blob(&mut self, path_within_tree: &str, blob_id: ObjectId) -> anyhow::Result<()> {
        match path_within_tree.split_once('/') {
            None => {
                Self::validate_entry_name(path_within_tree)?;

                match self
                    .leaves
                    .iter_mut()
                    .find(|(name, _)| name == path_within_tree)
                {
                    Some(leaf) => leaf.1 = blob_id,
                    None => self.leaves.push((path_within_tree.to_string(), blob_id)),
                }
            }
            Some((first_segment, remainder)) => {
                Self::validate_entry_name(first_segment)?;

                self.branches
                    .entry(first_segment.to_string())
                    .or_default()
                    .add_blob(remainder, blob_id)?;
            }
        }

        Ok(())
    }

    /// Sort leaves lexicographically, recursively.
    ///
    /// Branches need no sorting because their container iterates in key
    /// order already.
    pub fn sort(&mut self) {
        for branch in self.branches.values_mut() {
            branch.sort();
        }
        self.leaves.sort();
    }

    /// Store every sub-tree, children first, then this tree's record.
    pub fn write_all_to_object_store(&self, database: &Database) -> anyhow::Result<()> {
        for branch in self.branches.values() {
            branch.write_all_to_object_store(database)?;
        }

        database.store(self)
    }

    /// Remove every tracked file below `parent_dir`, depth first.
    ///
    /// A child directory left empty by the removal is deleted; directories
    /// still holding untracked files survive. Already-absent files are
    /// tolerated.
    pub fn remove_tracked(&self, workspace: &Workspace, parent_dir: &Path) -> anyhow::Result<()> {
        for (name, branch) in &self.branches {
            let child_dir = parent_dir.join(name);
            branch.remove_tracked(workspace, &child_dir)?;
            workspace.remove_dir_if_empty(&child_dir)?;
        }

        for (name, _) in &self.leaves {
            workspace.remove_file(&parent_dir.join(name))?;
        }

        Ok(())
    }

    /// Restore every tracked file below `parent_dir` from the object store.
    pub fn restore_tracked(
        &self,
        database: &Database,
        workspace: &Workspace,
        parent_dir: &Path,
    ) -> anyhow::Result<()> {
        for (name, branch) in &self.branches {
            let child_dir = parent_dir.join(name);
            workspace.make_dir(&child_dir)?;
            branch.restore_tracked(database, workspace, &child_dir)?;
        }

        for (name, blob_id) in &self.leaves {
            let blob = Blob::from_object_store(database, blob_id)
                .with_context(|| format!("Unable to load blob for {name}"))?;
            blob.restore(workspace, &parent_dir.join(name))?;
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.leaves.is_empty()
    }

    fn validate_entry_name(name: &str) -> anyhow::Result<()> {
        if name.is_empty() || name.contains(['\0', '\n']) {
            return Err(OpError::Parse(format!("invalid tree entry name {name:?}")).into());
        }

        Ok(())
    }

    fn id_preimage(&self) -> anyhow::Result<Vec<u8>> {
        let mut preimage = Vec::new();

        for (name, branch) in &self.branches {
            preimage.extend_from_slice(name.as_bytes());
            preimage.extend_from_slice(branch.object_id()?.as_ref().as_bytes());
        }
        for (name, blob_id) in &self.leaves {
            preimage.extend_from_slice(name.as_bytes());
            preimage.extend_from_slice(blob_id.as_ref().as_bytes());
        }

        Ok(preimage)
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut record = Vec::new();

        for (name, branch) in &self.branches {
            write!(
                record,
                "tree{sep}{id}{sep}{name}\n",
                sep = RECORD_SEPARATOR,
                id = branch.object_id()?
            )?;
        }
        for (name, blob_id) in &self.leaves {
            write!(
                record,
                "blob{sep}{id}{sep}{name}\n",
                sep = RECORD_SEPARATOR,
                id = blob_id
            )?;
        }

        Ok(Bytes::from(record))
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    /// The tree id hashes the recursive `name || child-id` concatenation,
    /// not the stored record.
    fn object_id(&self) -> anyhow::Result<ObjectId> {
        Ok(ObjectId::hash(&self.id_preimage()?))
    }
}

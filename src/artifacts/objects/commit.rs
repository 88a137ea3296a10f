//! Commit object
//!
//! A commit names one root tree, at most one parent commit, an author, a
//! message and the wall-clock time it was created. The stored form is the
//! formatted text itself and the commit id is the SHA-1 of that text:
//!
//! ```text
//! tree <id>
//! parent <id or empty>
//! author <author>
//! time <timestamp>
//!
//! <message>
//! ```

use crate::areas::database::Database;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::error::OpError;
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Root tree of the snapshot
    tree_oid: ObjectId,
    /// Parent commit, empty for the initial commit
    parent: Option<ObjectId>,
    author: String,
    message: String,
    /// Creation time, kept as the formatted string it was stored with
    time: String,
}

impl Commit {
    /// Create a commit stamped with the current local time.
    pub fn new(
        tree_oid: ObjectId,
        author: String,
        message: String,
        parent: Option<ObjectId>,
    ) -> Self {
        Commit {
            tree_oid,
            parent,
            author,
            message,
            time: chrono::Local::now().to_rfc2822(),
        }
    }

    /// Parse a stored commit record.
    ///
    /// The root tree is not loaded here; use [`Commit::root_tree`] when the
    /// snapshot itself is needed.
    pub fn from_object_store(database: &Database, object_id: &ObjectId) -> anyhow::Result<Self> {
        let content = database.load(object_id)?;
        let content = std::str::from_utf8(&content)
            .map_err(|_| OpError::Parse(format!("commit {object_id} is not UTF-8")))?;

        let mut lines = content.lines();
        let malformed = |what: &str| OpError::Parse(format!("commit {object_id} {what}"));

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| malformed("is missing its tree line"))?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let parent = lines
            .next()
            .and_then(|line| line.strip_prefix("parent "))
            .ok_or_else(|| malformed("is missing its parent line"))?;
        let parent = match parent {
            "" => None,
            id => Some(ObjectId::try_parse(id.to_string())?),
        };

        let author = lines
            .next()
            .and_then(|line| line.strip_prefix("author "))
            .ok_or_else(|| malformed("is missing its author line"))?
            .to_string();

        let time = lines
            .next()
            .and_then(|line| line.strip_prefix("time "))
            .ok_or_else(|| malformed("is missing its time line"))?
            .to_string();

        // the blank separator line, absent only for an empty message
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");

        Ok(Commit {
            tree_oid,
            parent,
            author,
            message,
            time,
        })
    }

    /// Load this commit's root tree from the object store.
    pub fn root_tree(&self, database: &Database) -> anyhow::Result<Tree> {
        Tree::from_object_store(database, &self.tree_oid)
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message, for short-form display.
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn time(&self) -> &str {
        &self.time
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let parent = self.parent.as_ref().map(AsRef::as_ref).unwrap_or("");
        let record = format!(
            "tree {}\nparent {}\nauthor {}\ntime {}\n\n{}",
            self.tree_oid, parent, self.author, self.time, self.message
        );

        Ok(Bytes::from(record.into_bytes()))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn some_tree_oid() -> ObjectId {
        ObjectId::hash(b"a tree")
    }

    #[test]
    fn round_trips_through_the_object_store() -> anyhow::Result<()> {
        let dir = assert_fs::TempDir::new()?;
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let commit = Commit::new(
            some_tree_oid(),
            "The Author".to_string(),
            "The Message".to_string(),
            None,
        );
        database.store(&commit)?;

        let reloaded = Commit::from_object_store(&database, &commit.object_id()?)?;
        assert_eq!(reloaded, commit);
        assert_eq!(reloaded.parent(), None);
        assert!(!reloaded.time().is_empty());
        Ok(())
    }

    #[test]
    fn round_trips_a_parent_and_a_multiline_message() -> anyhow::Result<()> {
        let dir = assert_fs::TempDir::new()?;
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let parent = ObjectId::hash(b"the parent commit");
        let commit = Commit::new(
            some_tree_oid(),
            "The Author".to_string(),
            "subject\n\nbody with details".to_string(),
            Some(parent.clone()),
        );
        database.store(&commit)?;

        let reloaded = Commit::from_object_store(&database, &commit.object_id()?)?;
        assert_eq!(reloaded.parent(), Some(&parent));
        assert_eq!(reloaded.message(), "subject\n\nbody with details");
        assert_eq!(reloaded.short_message(), "subject");
        assert_eq!(reloaded.tree_oid(), &some_tree_oid());
        Ok(())
    }

    #[test]
    fn serialized_field_order_is_fixed() -> anyhow::Result<()> {
        let commit = Commit::new(
            some_tree_oid(),
            "The Author".to_string(),
            "The Message".to_string(),
            None,
        );

        let record = commit.serialize()?;
        let record = std::str::from_utf8(&record)?.to_string();
        let mut lines = record.lines();

        assert!(lines.next().unwrap().starts_with("tree "));
        assert_eq!(lines.next().unwrap(), "parent ");
        assert_eq!(lines.next().unwrap(), "author The Author");
        assert!(lines.next().unwrap().starts_with("time "));
        assert_eq!(lines.next().unwrap(), "");
        assert_eq!(lines.next().unwrap(), "The Message");
        Ok(())
    }
}

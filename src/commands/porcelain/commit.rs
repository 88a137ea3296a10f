use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use crate::error::OpError;
use std::io::Write;

impl Repository {
    /// Turn the staged records into a tree + commit pair.
    ///
    /// The new snapshot starts from the parent commit's root tree (an empty
    /// tree for the initial commit) and layers every staged record on top,
    /// so files committed earlier stay tracked without being restaged.
    pub fn commit(&mut self, message: &str, author: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        // a detached historical checkout locks out new commits
        if let Some(top_commit) = self.refs().read_top_commit()? {
            return Err(OpError::DetachedHead(top_commit.to_string()).into());
        }

        let mut index = self.index();
        index.rehydrate()?;
        if index.is_empty() {
            return Err(OpError::EmptyIndex.into());
        }

        let parent = self.refs().read_head()?;
        let mut root = match &parent {
            Some(parent_id) => Commit::from_object_store(self.database(), parent_id)?
                .root_tree(self.database())?,
            None => Tree::default(),
        };

        for entry in index.entries() {
            root.add_blob(&entry.path, entry.oid.clone())?;
        }
        root.sort();
        root.write_all_to_object_store(self.database())?;

        let commit = Commit::new(
            root.object_id()?,
            author.to_string(),
            message.to_string(),
            parent,
        );
        self.database().store(&commit)?;
        let commit_id = commit.object_id()?;

        index.clear();
        index.write_updates()?;
        self.refs().update_head(&commit_id)?;

        writeln!(
            self.writer(),
            "[{}] {}",
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}

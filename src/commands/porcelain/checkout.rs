use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::OpError;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Swap the working tree from the HEAD snapshot to `target`.
    ///
    /// The current commit's tracked files are removed first and the target's
    /// restored second; untracked files and the staging index are left
    /// untouched. A file present in both snapshots is therefore deleted and
    /// rewritten rather than preserved in place.
    pub fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let target_id = ObjectId::try_parse(target.to_string())?;

        let head = self.refs().read_head()?.ok_or(OpError::EmptyHead)?;
        if !self.database().contains(&target_id) {
            return Err(OpError::UnknownObject(target_id.to_string()).into());
        }

        let current_commit = Commit::from_object_store(self.database(), &head)?;
        let target_commit = Commit::from_object_store(self.database(), &target_id)?;

        current_commit
            .root_tree(self.database())?
            .remove_tracked(self.workspace(), Path::new(""))?;
        target_commit
            .root_tree(self.database())?
            .restore_tracked(self.database(), self.workspace(), Path::new(""))?;

        self.refs().update_head(&target_id)?;

        // The most recent commit is whatever TOPCOMMIT already recorded, or
        // the HEAD we just moved away from. Landing back on it ends the
        // detour; landing anywhere else records it.
        let latest = self.refs().read_top_commit()?.unwrap_or(head);
        if latest == target_id {
            self.refs().clear_top_commit()?;
        } else {
            self.refs().update_top_commit(&latest)?;
        }

        writeln!(
            self.writer(),
            "HEAD is now at {} {}",
            target_id.to_short_oid(),
            target_commit.short_message()
        )?;

        Ok(())
    }
}

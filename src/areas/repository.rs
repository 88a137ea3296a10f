//! Repository abstraction and coordination
//!
//! The `Repository` type is the facade the commands are implemented on. It
//! wires together the lower-level components (database, index, workspace,
//! refs) and owns the output writer so command output can be captured in
//! tests.
//!
//! Everything is single-threaded and synchronous; the only shared resource
//! is the file system and the design assumes exclusive access for the
//! duration of one command.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::error::OpError;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Repository directory name
const GIT_DIR: &str = ".git";

/// Object database directory name
const DATABASE_DIR: &str = "objects";

/// Index file name
const INDEX_FILE: &str = "index";

pub struct Repository {
    /// Repository root path
    path: Box<Path>,
    /// Output writer (stdout, or a buffer in tests)
    writer: RefCell<Box<dyn std::io::Write>>,
    /// Staging area
    index: RefCell<Index>,
    /// Object database
    database: Database,
    /// Working directory
    workspace: Workspace,
    /// HEAD / TOPCOMMIT manager
    refs: Refs,
}

impl Repository {
    pub fn new(path: PathBuf, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path.canonicalize()?;

        let index = Index::new(path.join(GIT_DIR).join(INDEX_FILE).into_boxed_path());
        let database = Database::new(path.join(GIT_DIR).join(DATABASE_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(path.join(GIT_DIR).into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(GIT_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn is_initialized(&self) -> bool {
        self.git_path().is_dir()
    }

    pub(crate) fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(OpError::NotInitialized.into());
        }

        Ok(())
    }
}

//! Removal of build products
//!
//! Deletes the executable named by the persisted project record and the
//! whole intermediate folder. Both are tolerated missing so that `clean`
//! after `clean` still succeeds.

use crate::build::cache::{BuildCache, CACHE_DIR};
use anyhow::Context;
use std::path::Path;

pub fn clean(working_dir: &Path) -> anyhow::Result<()> {
    let cache_root = working_dir.join(CACHE_DIR);

    if let Some(executable) = BuildCache::recorded_executable(&cache_root)? {
        let executable = if executable.is_absolute() {
            executable
        } else {
            working_dir.join(executable)
        };

        if executable.is_file() {
            std::fs::remove_file(&executable).with_context(|| {
                format!("Unable to remove executable {}", executable.display())
            })?;
        }
    }

    if cache_root.is_dir() {
        std::fs::remove_dir_all(&cache_root).with_context(|| {
            format!("Unable to remove intermediate folder {}", cache_root.display())
        })?;
    }

    Ok(())
}

//! Persistent build caches
//!
//! Two files under the intermediate folder `.buildus_cache/`:
//!
//! - `compile.cache`: one line per compiled translation unit,
//!   `object_path\0source_path\0source_sha1\n`; a unit whose current source
//!   digest matches its entry is skipped on the next run
//! - `project.cache`: a single line `executable_path\0config_sha1` used by
//!   the link decision engine
//!
//! A missing cache file reads as empty state, never as an error.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::RECORD_SEPARATOR;
use crate::build::config::{BuildConfig, CompileUnit};
use crate::error::OpError;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Intermediate folder, created next to the config file
pub const CACHE_DIR: &str = ".buildus_cache";
/// Extension of produced object files
pub const OBJECT_EXTENSION: &str = "o";

const COMPILE_CACHE_FILE: &str = "compile.cache";
const PROJECT_CACHE_FILE: &str = "project.cache";

/// One compiled unit: where its object landed, where its source lives, and
/// the source digest at the last successful compile.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct CacheEntry {
    pub object_path: String,
    pub source_path: String,
    pub source_digest: ObjectId,
}

#[derive(Debug)]
pub struct BuildCache {
    /// The intermediate folder (`<config dir>/.buildus_cache`)
    root: PathBuf,
    entries: Vec<CacheEntry>,
}

impl BuildCache {
    /// Open the cache for a project, creating the intermediate folder and
    /// loading `compile.cache` when it exists.
    pub fn open(config_root: &Path) -> anyhow::Result<Self> {
        let root = config_root.join(CACHE_DIR);

        if !root.exists() {
            std::fs::create_dir_all(&root).with_context(|| {
                format!("Unable to create intermediate folder {}", root.display())
            })?;
        }

        let mut cache = BuildCache {
            root,
            entries: Vec::new(),
        };
        cache.load()?;

        Ok(cache)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative object name for a unit (`<output>.o`).
    pub fn object_name(unit: &CompileUnit) -> String {
        format!("{}.{}", unit.output, OBJECT_EXTENSION)
    }

    /// Absolute path the unit's object file is written to.
    pub fn object_file(&self, unit: &CompileUnit) -> PathBuf {
        self.root.join(Self::object_name(unit))
    }

    fn compile_cache_path(&self) -> PathBuf {
        self.root.join(COMPILE_CACHE_FILE)
    }

    fn project_cache_path(&self) -> PathBuf {
        self.root.join(PROJECT_CACHE_FILE)
    }

    fn load(&mut self) -> anyhow::Result<()> {
        let path = self.compile_cache_path();
        if !path.is_file() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Unable to read {}", path.display()))?;
        self.entries = Self::parse(&content)?;

        Ok(())
    }

    fn parse(content: &str) -> anyhow::Result<Vec<CacheEntry>> {
        content
            .split_terminator('\n')
            .map(|line| {
                let mut fields = line.splitn(3, RECORD_SEPARATOR);
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(object), Some(source), Some(digest)) => Ok(CacheEntry::new(
                        object.to_string(),
                        source.to_string(),
                        ObjectId::try_parse(digest.to_string())?,
                    )),
                    _ => Err(
                        OpError::Parse(format!("cache line {line:?} has missing fields")).into(),
                    ),
                }
            })
            .collect()
    }

    fn render(&self) -> String {
        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(&entry.object_path);
            content.push(RECORD_SEPARATOR);
            content.push_str(&entry.source_path);
            content.push(RECORD_SEPARATOR);
            content.push_str(entry.source_digest.as_ref());
            content.push('\n');
        }
        content
    }

    /// Persist the compile cache.
    pub fn write(&self) -> anyhow::Result<()> {
        let path = self.compile_cache_path();
        std::fs::write(&path, self.render())
            .with_context(|| format!("Unable to write {}", path.display()))
    }

    /// The subset of the config's compile list that actually needs the
    /// compiler: units whose source digest is absent from the cache or
    /// differs from the recorded one.
    pub fn minimal_recompile_set(
        &self,
        config: &BuildConfig,
    ) -> anyhow::Result<Vec<CompileUnit>> {
        let mut to_compile = Vec::new();

        for unit in config.compile_units() {
            let source_path = config.source_path(unit);
            let source = std::fs::read(&source_path)
                .with_context(|| format!("Unable to read source {}", source_path.display()))?;
            let source_digest = ObjectId::hash(&source);

            let cached = self.entries.iter().any(|entry| {
                entry.object_path == Self::object_name(unit)
                    && entry.source_path == unit.source
                    && entry.source_digest == source_digest
            });

            if !cached {
                to_compile.push(unit.clone());
            }
        }

        Ok(to_compile)
    }

    /// Record a successful compile, replacing any stale entry for the unit.
    pub fn record_compiled(&mut self, unit: &CompileUnit, source_digest: ObjectId) {
        let object_path = Self::object_name(unit);

        match self.entries.iter_mut().find(|entry| {
            entry.object_path == object_path && entry.source_path == unit.source
        }) {
            Some(entry) => entry.source_digest = source_digest,
            None => self
                .entries
                .push(CacheEntry::new(object_path, unit.source.clone(), source_digest)),
        }
    }

    /// Decide whether the executable must be relinked: true when the stored
    /// executable path differs from the configured one, the stored config
    /// digest differs from the current one, the executable is missing, or no
    /// project record exists yet.
    pub fn must_relink(&self, config: &BuildConfig) -> anyhow::Result<bool> {
        let path = self.project_cache_path();
        if !path.is_file() {
            return Ok(true);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Unable to read {}", path.display()))?;
        let (stored_executable, stored_digest) = content
            .trim_end_matches('\n')
            .split_once(RECORD_SEPARATOR)
            .ok_or_else(|| OpError::Parse("project cache record has no separator".to_string()))?;

        let executable = config.executable_path();
        let path_changed = stored_executable != executable.display().to_string();
        let digest_changed = stored_digest != config.digest().as_ref();
        let executable_deleted = !executable.is_file();

        Ok(path_changed || digest_changed || executable_deleted)
    }

    /// Write the project record the next `must_relink` will compare against.
    pub fn write_project_cache(&self, config: &BuildConfig) -> anyhow::Result<()> {
        let path = self.project_cache_path();
        let record = format!(
            "{}{}{}",
            config.executable_path().display(),
            RECORD_SEPARATOR,
            config.digest()
        );

        std::fs::write(&path, record)
            .with_context(|| format!("Unable to write {}", path.display()))
    }

    /// The executable path recorded in `project.cache`, if any.
    ///
    /// Used by `clean`, which must work without a parsed config.
    pub fn recorded_executable(cache_root: &Path) -> anyhow::Result<Option<PathBuf>> {
        let path = cache_root.join(PROJECT_CACHE_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Unable to read {}", path.display()))?;

        Ok(content
            .split(RECORD_SEPARATOR)
            .next()
            .filter(|executable| !executable.is_empty())
            .map(PathBuf::from))
    }

    #[cfg(test)]
    fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = "\
project: app
compile:
  - a: src/a.c
  - b: src/b.c
";

    fn config_in(dir: &assert_fs::TempDir) -> BuildConfig {
        dir.child("src/a.c").write_str("int a;\n").unwrap();
        dir.child("src/b.c").write_str("int b;\n").unwrap();
        BuildConfig::from_text(dir.path().to_path_buf(), CONFIG).unwrap()
    }

    #[test]
    fn compile_cache_round_trips_through_disk() -> anyhow::Result<()> {
        let dir = assert_fs::TempDir::new()?;
        let config = config_in(&dir);

        let mut cache = BuildCache::open(config.root())?;
        cache.record_compiled(
            &config.compile_units()[0],
            ObjectId::hash(b"first version"),
        );
        cache.write()?;

        let reloaded = BuildCache::open(config.root())?;
        assert_eq!(reloaded.entries(), cache.entries());
        Ok(())
    }

    #[test]
    fn unchanged_sources_drop_out_of_the_recompile_set() -> anyhow::Result<()> {
        let dir = assert_fs::TempDir::new()?;
        let config = config_in(&dir);

        let mut cache = BuildCache::open(config.root())?;
        assert_eq!(cache.minimal_recompile_set(&config)?.len(), 2);

        for unit in config.compile_units() {
            let digest = ObjectId::hash(&std::fs::read(config.source_path(unit))?);
            cache.record_compiled(unit, digest);
        }
        assert!(cache.minimal_recompile_set(&config)?.is_empty());

        // touching one source brings exactly that unit back
        dir.child("src/a.c").write_str("int a = 1;\n")?;
        let stale = cache.minimal_recompile_set(&config)?;
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].source, "src/a.c");
        Ok(())
    }

    #[test]
    fn must_relink_follows_the_project_record() -> anyhow::Result<()> {
        let dir = assert_fs::TempDir::new()?;
        let config = config_in(&dir);
        let cache = BuildCache::open(config.root())?;

        // no record yet
        assert!(cache.must_relink(&config)?);

        dir.child("app").write_str("\u{7f}ELF")?;
        cache.write_project_cache(&config)?;
        assert!(!cache.must_relink(&config)?);

        // a vanished executable forces a relink
        std::fs::remove_file(dir.path().join("app"))?;
        assert!(cache.must_relink(&config)?);

        // so does a changed config digest
        dir.child("app").write_str("\u{7f}ELF")?;
        let changed =
            BuildConfig::from_text(dir.path().to_path_buf(), "project: app\ncompile:\n  - a: src/a.c\n")?;
        assert!(cache.must_relink(&changed)?);
        Ok(())
    }

    #[test]
    fn recorded_executable_reads_the_project_record() -> anyhow::Result<()> {
        let dir = assert_fs::TempDir::new()?;
        let config = config_in(&dir);
        let cache = BuildCache::open(config.root())?;

        assert_eq!(BuildCache::recorded_executable(cache.root())?, None);

        cache.write_project_cache(&config)?;
        assert_eq!(
            BuildCache::recorded_executable(cache.root())?,
            Some(dir.path().join("app"))
        );
        Ok(())
    }
}

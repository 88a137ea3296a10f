//! Declarative project description
//!
//! A `.buildus` file is YAML:
//!
//! ```yaml
//! project: app
//! compile:
//!   - main: src/main.cpp
//!   - util: src/util.cpp
//! deps_library:
//!   vars: ["-L/opt/lib"]
//!   libs: ["/opt/lib/libfoo.a"]
//! deps_include:
//!   vars: ["include"]
//! ```
//!
//! Every source path is relative to the config file's directory, as is the
//! produced executable (named after the project). A canonical text
//! rendering of the parsed description is hashed into the **config
//! digest**, which the link decision engine compares across runs.

use crate::artifacts::objects::object_id::ObjectId;
use crate::error::OpError;
use anyhow::Context;
use derive_new::new;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Mandatory extension of the config file
pub const CONFIG_EXTENSION: &str = "buildus";

#[derive(Debug, Deserialize)]
struct RawConfig {
    project: String,
    #[serde(default)]
    compile: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    deps_library: RawLibraries,
    #[serde(default)]
    deps_include: RawIncludes,
}

#[derive(Debug, Default, Deserialize)]
struct RawLibraries {
    #[serde(default)]
    vars: Vec<String>,
    #[serde(default)]
    libs: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawIncludes {
    #[serde(default)]
    vars: Vec<String>,
}

/// One translation unit: an output name and a source path.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct CompileUnit {
    pub output: String,
    pub source: String,
}

#[derive(Debug)]
pub struct BuildConfig {
    /// Directory the config file lives in; all paths are relative to it
    root: PathBuf,
    project: String,
    compile: Vec<CompileUnit>,
    library_vars: Vec<String>,
    libraries: Vec<String>,
    include_vars: Vec<String>,
}

impl BuildConfig {
    pub fn from_file(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.is_file() {
            return Err(OpError::MissingPath(config_path.to_path_buf()).into());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Unable to read config file {}", config_path.display()))?;
        let root = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();

        Self::from_text(root, &content)
    }

    /// Parse a config from text; the file system is only consulted to check
    /// that the listed sources exist under `root`.
    pub fn from_text(root: PathBuf, content: &str) -> anyhow::Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(content)
            .map_err(|err| OpError::Parse(format!("invalid config: {err}")))?;

        let compile = raw
            .compile
            .into_iter()
            .flat_map(|unit| unit.into_iter())
            .map(|(output, source)| CompileUnit::new(output, source))
            .collect();

        let config = BuildConfig {
            root,
            project: raw.project,
            compile,
            library_vars: raw.deps_library.vars,
            libraries: raw.deps_library.libs,
            include_vars: raw.deps_include.vars,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.project.trim().is_empty() {
            return Err(OpError::Parse("config names no project".to_string()).into());
        }
        if self.compile.is_empty() {
            return Err(OpError::Parse("config compiles no files".to_string()).into());
        }

        for unit in &self.compile {
            let source = self.source_path(unit);
            if !source.is_file() {
                return Err(OpError::MissingPath(source).into());
            }
        }

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn compile_units(&self) -> &[CompileUnit] {
        &self.compile
    }

    pub fn library_vars(&self) -> &[String] {
        &self.library_vars
    }

    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    pub fn include_vars(&self) -> &[String] {
        &self.include_vars
    }

    pub fn source_path(&self, unit: &CompileUnit) -> PathBuf {
        self.root.join(&unit.source)
    }

    /// The executable lands next to the config file, named after the project.
    pub fn executable_path(&self) -> PathBuf {
        self.root.join(&self.project)
    }

    /// Deterministic rendering of the parsed description.
    ///
    /// Field order is fixed so that equal configs always render to equal
    /// text; the digest of this rendering decides whether a relink is due.
    pub fn canonical_contents(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "project: {}", self.project);
        let _ = writeln!(out, "compile:");
        for unit in &self.compile {
            let _ = writeln!(out, " - {}: {}", unit.output, unit.source);
        }

        if !self.library_vars.is_empty() || !self.libraries.is_empty() {
            let _ = writeln!(out, "deps_library:");
            if !self.library_vars.is_empty() {
                let _ = writeln!(out, " vars:");
                for var in &self.library_vars {
                    let _ = writeln!(out, "  {var}");
                }
            }
            if !self.libraries.is_empty() {
                let _ = writeln!(out, " libs:");
                for lib in &self.libraries {
                    let _ = writeln!(out, " - {lib}");
                }
            }
        }

        if !self.include_vars.is_empty() {
            let _ = writeln!(out, "deps_include:");
            let _ = writeln!(out, " vars:");
            for var in &self.include_vars {
                let _ = writeln!(out, "  {var}");
            }
        }

        out
    }

    pub fn digest(&self) -> ObjectId {
        ObjectId::hash(self.canonical_contents().as_bytes())
    }
}

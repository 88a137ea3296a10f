//! Compiler driver
//!
//! Consumes a [`BuildConfig`], consults the [`BuildCache`] for the minimal
//! recompile set, invokes the external compiler synchronously on each stale
//! unit, and decides whether the executable must be relinked.
//!
//! Correctness rules:
//!
//! - a unit whose source changed is never skipped
//! - nothing is relinked when no unit was recompiled and the project record
//!   still matches
//! - cache updates for units that compiled successfully are flushed even
//!   when a later unit fails
//! - a link failure leaves the compile cache intact and writes no project
//!   record

use crate::artifacts::objects::object_id::ObjectId;
use crate::build::cache::BuildCache;
use crate::build::config::BuildConfig;
use crate::error::OpError;
use anyhow::Context;
use std::process::Command;

/// Compiler used when the environment names none
pub const DEFAULT_COMPILER: &str = "g++";
/// Environment variable overriding the compiler command
pub const COMPILER_ENV: &str = "BUILDUS_CC";

pub struct CompilerDriver {
    config: BuildConfig,
    cache: BuildCache,
    compiler: String,
}

impl CompilerDriver {
    pub fn new(config: BuildConfig) -> anyhow::Result<Self> {
        let compiler =
            std::env::var(COMPILER_ENV).unwrap_or_else(|_| DEFAULT_COMPILER.to_string());
        Self::with_compiler(config, compiler)
    }

    pub fn with_compiler(config: BuildConfig, compiler: String) -> anyhow::Result<Self> {
        let cache = BuildCache::open(config.root())?;

        Ok(CompilerDriver {
            config,
            cache,
            compiler,
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Compile every stale unit; returns how many were compiled.
    pub fn compile(&mut self) -> anyhow::Result<usize> {
        let to_compile = self.cache.minimal_recompile_set(&self.config)?;

        for unit in &to_compile {
            let source_path = self.config.source_path(unit);
            let object_path = self.cache.object_file(unit);

            println!("Compiling: {}", unit.source);

            if let Some(object_dir) = object_path.parent() {
                std::fs::create_dir_all(object_dir).with_context(|| {
                    format!("Unable to create object directory {}", object_dir.display())
                })?;
            }

            let mut command = Command::new(&self.compiler);
            command.arg("-c").arg(&source_path);
            for include in self.config.include_vars() {
                command.arg(format!("-I{include}"));
            }
            command.arg("-o").arg(&object_path);

            let output = command
                .output()
                .with_context(|| format!("Unable to spawn compiler {}", self.compiler))?;
            if !output.status.success() {
                // keep what already compiled before surfacing the failure
                self.cache.write()?;
                return Err(OpError::CompileFailed {
                    source_path,
                    output: Self::combined_output(&output),
                }
                .into());
            }

            let source = std::fs::read(&source_path)
                .with_context(|| format!("Unable to read source {}", source_path.display()))?;
            self.cache.record_compiled(unit, ObjectId::hash(&source));
        }

        self.cache.write()?;

        Ok(to_compile.len())
    }

    /// Link the executable when something material changed; returns whether
    /// a link actually happened.
    pub fn link(&mut self, compiled: usize) -> anyhow::Result<bool> {
        if compiled == 0 && !self.cache.must_relink(&self.config)? {
            return Ok(false);
        }

        let executable = self.config.executable_path();
        println!("Linking: {}", executable.display());

        let mut command = Command::new(&self.compiler);
        for unit in self.config.compile_units() {
            command.arg(self.cache.object_file(unit));
        }
        for var in self.config.library_vars() {
            command.arg(var);
        }
        for library in self.config.libraries() {
            command.arg(library);
        }
        command.arg("-o").arg(&executable);

        let output = command
            .output()
            .with_context(|| format!("Unable to spawn linker {}", self.compiler))?;
        if !output.status.success() {
            return Err(OpError::LinkFailed {
                executable,
                output: Self::combined_output(&output),
            }
            .into());
        }

        self.cache.write_project_cache(&self.config)?;

        Ok(true)
    }

    /// The whole build: minimal compile step, then the link decision.
    pub fn build(&mut self) -> anyhow::Result<()> {
        let compiled = self.compile()?;
        self.link(compiled)?;

        Ok(())
    }

    fn combined_output(output: &std::process::Output) -> String {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        combined.trim_end().to_string()
    }
}

//! Incremental C/C++ build driver
//!
//! - `config`: the declarative `.buildus` project description (YAML)
//! - `cache`: the persistent compile and project caches
//! - `driver`: minimal recompilation and the link decision engine
//! - `clean`: removal of the intermediate folder and the executable

pub mod cache;
pub mod clean;
pub mod config;
pub mod driver;

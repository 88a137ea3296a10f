//! Two educational systems tools sharing one substrate:
//!
//! - `gitus`: a miniature source-control engine built around a
//!   content-addressed object store (`init`, `add`, `commit`, `checkout`)
//! - `buildus`: a miniature incremental C/C++ build driver with a
//!   hash-based compilation cache and a link decision engine
//!
//! The library is split the same way a repository is:
//!
//! - `areas`: repository building blocks (database, index, refs, workspace)
//! - `artifacts`: the object model (blob, tree, commit) and its wire formats
//! - `commands`: user-facing repository operations
//! - `build`: the build driver (config, cache, compiler driver, clean)

pub mod areas;
pub mod artifacts;
pub mod build;
pub mod commands;
pub mod error;

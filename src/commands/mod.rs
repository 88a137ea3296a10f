//! Repository command implementations
//!
//! Each user-facing operation lives in its own file as an `impl Repository`
//! block, composing the areas and artifacts into a complete workflow.

pub mod porcelain;

//! Data structures shared by the repository operations
//!
//! - `objects`: the object model (blob, tree, commit) and its wire formats

pub mod objects;

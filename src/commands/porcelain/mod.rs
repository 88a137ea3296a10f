//! User-facing source-control commands
//!
//! - `init`: create the repository layout
//! - `add`: snapshot a file into the object store and stage it
//! - `commit`: turn the staged records into a tree + commit pair
//! - `checkout`: swap the working tree between two committed snapshots

pub mod add;
pub mod checkout;
pub mod commit;
pub mod init;

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

pub const OBJECT_ID_LENGTH: usize = 40;

/// Field separator inside a stored tree record and inside index/cache lines.
pub const RECORD_SEPARATOR: char = '\0';

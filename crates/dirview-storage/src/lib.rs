//! # dirview-storage
//!
//! Confines client-supplied paths to a single root directory and reads
//! directory listings from it.

pub mod error;
pub mod listing;
pub mod resolver;

pub use error::PathError;
pub use listing::{EntryType, FileInfo, read_listing};
pub use resolver::{MAX_PATH_LEN, SecurePathResolver};

//! portsync store - reading and writing state documents on disk
//!
//! Documents are read whole and written with temp→rename, so a target file
//! is either the old content or the new content, never a partial write.

pub mod atomic;
pub mod document;
pub mod errors;

pub use atomic::atomic_write;
pub use document::{load_document, load_inventory_file, write_document};
pub use errors::Result;

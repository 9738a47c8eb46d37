//! Content-addressed storage for uploaded photos.
//!
//! Photo bytes are stored once per unique content; database rows reference
//! them by SHA-256 hash. Files are only ever added, never overwritten.

mod error;
mod hash;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use hash::ContentHash;
pub use traits::{BlobStore, BoxReader};

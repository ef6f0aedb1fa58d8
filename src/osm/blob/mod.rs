//! The Blob iterator and item definitions

pub mod decompress;
pub mod item;
pub mod iterator;

#[doc(inline)]
pub use decompress::{Compression, decompress};
#[doc(inline)]
pub use item::{BlobItem, BlobKind};
#[doc(inline)]
pub use iterator::BlobIterator;

/// Size of the big-endian length prefix ahead of every `BlobHeader`.
pub const HEADER_LEN_SIZE: usize = 4;

/// Upper bound on an encoded `BlobHeader`.
pub const MAX_BLOB_HEADER_SIZE: usize = 64 * 1024;

/// Upper bound on both the framed and the uncompressed size of a blob.
pub const MAX_BLOB_SIZE: usize = 32 * 1024 * 1024;

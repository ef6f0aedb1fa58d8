use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("not an osm.pbf file: {0}")]
    NotAPbfFile(String),

    #[error("reader has been closed")]
    HandleClosed,

    #[error("input truncated while reading {context}: expected {expected} bytes, found {found}")]
    TruncatedInput {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{context} declares {size} bytes, exceeding the {limit} byte limit")]
    OversizedBlob {
        context: &'static str,
        size: i64,
        limit: usize,
    },

    #[error("malformed varint")]
    MalformedVarint,

    #[error("field {field} has unexpected wire type {wire_type}")]
    UnexpectedWireType { field: u32, wire_type: u8 },

    #[error("malformed message: {0}")]
    MalformedMessage(&'static str),

    #[error("could not decode envelope message: {0}")]
    ProtoDecode(#[from] prost::DecodeError),

    #[error("unsupported blob compression: {0}")]
    UnsupportedCompression(String),

    #[error("could not decompress blob: {0}")]
    DecompressionError(#[source] io::Error),

    #[error("blob declares {declared} uncompressed bytes, but decoded to {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("string table index {index} is out of range for a table of {len} entries")]
    IndexOutOfRange { index: u64, len: usize },

    #[error("dense node columns differ in length: ids={ids}, lats={lats}, lons={lons}")]
    ArrayLengthMismatch { ids: usize, lats: usize, lons: usize },

    #[error("unknown blob kind: {0}")]
    UnknownBlobKind(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Whether the failure came from inflating a single blob, after which
    /// the frame boundary is still trustworthy and the next blob may be read.
    pub fn is_decompression(&self) -> bool {
        matches!(
            self,
            CodecError::DecompressionError(_)
                | CodecError::SizeMismatch { .. }
                | CodecError::UnsupportedCompression(_)
        )
    }
}

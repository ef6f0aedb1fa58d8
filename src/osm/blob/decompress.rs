//! Inflates the contents of a `Blob`.

use std::io::Read;

use bytes::{Buf, Bytes};
use flate2::read::ZlibDecoder;
use strum::Display;

use super::MAX_BLOB_SIZE;
use crate::error::{CodecError, Result};
use crate::osm::model::Blob;
use crate::osm::model::blob::Data;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Compression {
    #[strum(serialize = "raw")]
    None,
    Zlib,
    Lzma,
    Bzip2,
    Lz4,
    Zstd,
}

impl From<&Data> for Compression {
    fn from(value: &Data) -> Self {
        match value {
            Data::Raw(_) => Compression::None,
            Data::ZlibData(_) => Compression::Zlib,
            Data::LzmaData(_) => Compression::Lzma,
            Data::ObsoleteBzip2Data(_) => Compression::Bzip2,
            Data::Lz4Data(_) => Compression::Lz4,
            Data::ZstdData(_) => Compression::Zstd,
        }
    }
}

/// Returns the uncompressed contents of `blob`. The result always has the
/// length the blob declares; raw blobs without a declared size are taken
/// as they are.
pub fn decompress(blob: Blob) -> Result<Bytes> {
    let declared = blob
        .raw_size
        .map(usize::try_from)
        .transpose()
        .map_err(|_| CodecError::MalformedMessage("negative raw size"))?;

    if let Some(size) = declared.filter(|size| *size > MAX_BLOB_SIZE) {
        return Err(CodecError::OversizedBlob {
            context: "uncompressed blob",
            size: size as i64,
            limit: MAX_BLOB_SIZE,
        });
    }

    match blob.data {
        Some(Data::Raw(raw)) => match declared {
            Some(size) if size != raw.len() => Err(CodecError::SizeMismatch {
                declared: size,
                actual: raw.len(),
            }),
            _ => Ok(raw),
        },
        // Compressed payloads must carry their uncompressed size.
        Some(Data::ZlibData(data)) => zlib_decode(data, declared.unwrap_or_default()),
        Some(other) => Err(CodecError::UnsupportedCompression(
            Compression::from(&other).to_string(),
        )),
        None => Err(CodecError::UnsupportedCompression("empty".to_string())),
    }
}

#[inline]
fn zlib_decode(data: Bytes, raw_size: usize) -> Result<Bytes> {
    let mut decoded = Vec::with_capacity(raw_size);

    // One byte past the declared size is enough to notice an overrun.
    ZlibDecoder::new(data.reader())
        .take(raw_size as u64 + 1)
        .read_to_end(&mut decoded)
        .map_err(CodecError::DecompressionError)?;

    if decoded.len() != raw_size {
        return Err(CodecError::SizeMismatch {
            declared: raw_size,
            actual: decoded.len(),
        });
    }

    Ok(Bytes::from(decoded))
}

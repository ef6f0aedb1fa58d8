//! Describes the `BlobItem`, a single framed unit of the file, still in its
//! encoded (and usually compressed) form.

use std::str::FromStr;

use bytes::Bytes;
use prost::Message;
use strum::EnumString;

use super::decompress::decompress;
use crate::error::Result;
use crate::osm::model::{Blob, BlobHeader};

/// The `type` of a `BlobHeader`.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum BlobKind {
    #[strum(serialize = "OSMHeader")]
    Header,
    #[strum(serialize = "OSMData")]
    Data,
    #[strum(default)]
    Unknown(String),
}

impl BlobKind {
    /// Reads a `BlobHeader` type. Unrecognised types become
    /// [`BlobKind::Unknown`], so this never fails.
    pub fn parse(value: &str) -> Self {
        BlobKind::from_str(value).unwrap_or_else(|_| BlobKind::Unknown(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            BlobKind::Header => "OSMHeader",
            BlobKind::Data => "OSMData",
            BlobKind::Unknown(kind) => kind.as_str(),
        }
    }
}


#[derive(Debug, Clone)]
pub struct BlobItem {
    /// Position of the blob in the file, starting at zero
    pub index: usize,
    /// Byte offset of the payload within the source
    pub offset: u64,
    pub header: BlobHeader,
    pub kind: BlobKind,
    pub(crate) data: Bytes,
}

impl BlobItem {
    #[inline]
    pub(crate) fn new(index: usize, offset: u64, header: BlobHeader, data: Bytes) -> Self {
        BlobItem {
            index,
            offset,
            kind: BlobKind::parse(&header.r#type),
            header,
            data,
        }
    }

    /// The encoded `Blob` message, exactly as framed.
    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    pub fn blob(&self) -> Result<Blob> {
        Ok(Blob::decode(self.data.clone())?)
    }

    /// Decodes the `Blob` message and inflates its contents.
    pub fn decompress(&self) -> Result<Bytes> {
        decompress(self.blob()?)
    }
}

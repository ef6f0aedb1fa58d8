//! A block item, used to decode a `BlobItem` into a `BlockItem`,
//! providing distinction for header and primitive blocks.

use bytes::Bytes;
use prost::Message;

use super::header::FileHeader;
use super::primitive::PrimitiveBlock;
use crate::error::{CodecError, Result};
use crate::osm::blob::{BlobItem, BlobKind};
use crate::osm::model::HeaderBlock;

/// The decompressed contents of an `OSMData` blob. Decoding borrows from
/// it, so the item must outlive any [`PrimitiveBlock`] read from it.
#[derive(Debug, Clone)]
pub struct PrimitiveData {
    pub index: usize,
    data: Bytes,
}

impl PrimitiveData {
    #[inline]
    pub fn decode(&self) -> Result<PrimitiveBlock<'_>> {
        PrimitiveBlock::decode(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum BlockItem {
    HeaderBlock(FileHeader),
    PrimitiveBlock(PrimitiveData),
}

impl BlockItem {
    pub fn from_blob_item(blob: &BlobItem) -> Result<Self> {
        match &blob.kind {
            BlobKind::Header => {
                let header = FileHeader::from(HeaderBlock::decode(blob.decompress()?)?);
                header.report_unsupported();
                Ok(BlockItem::HeaderBlock(header))
            }
            BlobKind::Data => Ok(BlockItem::PrimitiveBlock(PrimitiveData {
                index: blob.index,
                data: blob.decompress()?,
            })),
            BlobKind::Unknown(kind) => Err(CodecError::UnknownBlobKind(kind.clone())),
        }
    }

    pub fn r#type(&self) -> &str {
        match self {
            BlockItem::HeaderBlock(_) => "HeaderBlock",
            BlockItem::PrimitiveBlock(_) => "PrimitiveBlock",
        }
    }
}

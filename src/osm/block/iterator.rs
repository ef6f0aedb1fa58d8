//! Iterates over `BlockItem`s in the file

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::warn;

use super::item::BlockItem;
use crate::error::{CodecError, Result};
use crate::osm::blob::BlobIterator;

/// Decompresses each blob of the source in turn. Blobs of an unknown kind
/// are logged and skipped.
pub struct BlockIterator<R> {
    blobs: BlobIterator<R>,
}

impl BlockIterator<BufReader<File>> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(BlockIterator {
            blobs: BlobIterator::from_path(path)?,
        })
    }
}

impl<R: Read> BlockIterator<R> {
    pub fn new(reader: R) -> Self {
        BlockIterator {
            blobs: BlobIterator::new(reader),
        }
    }
}

impl<R: Read> Iterator for BlockIterator<R> {
    type Item = Result<BlockItem>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let blob = match self.blobs.next()? {
                Ok(blob) => blob,
                Err(err) => return Some(Err(err)),
            };

            match BlockItem::from_blob_item(&blob) {
                Err(CodecError::UnknownBlobKind(kind)) => {
                    warn!("Skipping blob {} of unknown kind {kind:?}", blob.index);
                }
                block => return Some(block),
            }
        }
    }
}

//! Streams the nodes of an `.osm.pbf` file which match a [`Query`].
//!
//! ```rust,no_run
//! use routers_pbf::{ExtractOptions, PbfReader, Query};
//!
//! let mut reader = PbfReader::open("district-of-columbia.osm.pbf")?;
//! let query = Query::parse(["amenity=cafe"])?;
//!
//! for node in reader.extract(query, ExtractOptions::default().with_limit(10))? {
//!     let node = node?;
//!     println!("{}: {:?}", node.id, node.tags.get("name"));
//! }
//!
//! reader.close();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod iterator;
pub mod options;

#[doc(inline)]
pub use iterator::Extraction;
#[doc(inline)]
pub use options::{ErrorPolicy, ExtractOptions};

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek};
use std::path::Path;

use log::{debug, warn};

use crate::error::{CodecError, Result};
use crate::osm::blob::{BlobIterator, BlobKind};
use crate::osm::block::{BlockItem, BlockIterator, FileHeader};
use crate::query::Query;

/// An open `.osm.pbf` source.
///
/// Every extraction rewinds the source, so repeated extractions over the
/// same reader yield the same sequence. The source is released by
/// [`PbfReader::close`] or when the reader is dropped.
#[derive(Debug)]
pub struct PbfReader<R> {
    source: Option<R>,
    header: Option<FileHeader>,
}

impl PbfReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => CodecError::FileNotFound(path.to_path_buf()),
            _ => CodecError::Io(err),
        })?;

        debug!("Opened {}", path.display());
        PbfReader::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> PbfReader<R> {
    /// Wraps `source`, checking that it starts with a readable frame.
    pub fn from_reader(mut source: R) -> Result<Self> {
        let header = Self::probe(&mut source)?;
        Ok(PbfReader {
            source: Some(source),
            header,
        })
    }

    /// Reads frames up to the first `OSMHeader` or `OSMData`. A leading
    /// `OSMHeader` is decoded, while a leading `OSMData` is accepted since
    /// some writers omit the header. Frames of other kinds are skipped.
    fn probe(source: &mut R) -> Result<Option<FileHeader>> {
        source.rewind()?;

        let mut blobs = BlobIterator::new(&mut *source);
        let first = loop {
            let blob = match blobs.next() {
                None if blobs.index() == 0 => {
                    return Err(CodecError::NotAPbfFile("input is empty".to_string()));
                }
                None => {
                    return Err(CodecError::NotAPbfFile(
                        "no OSMHeader or OSMData blob".to_string(),
                    ));
                }
                Some(Err(CodecError::Io(err))) => return Err(CodecError::Io(err)),
                Some(Err(err)) => return Err(CodecError::NotAPbfFile(err.to_string())),
                Some(Ok(blob)) => blob,
            };

            match &blob.kind {
                BlobKind::Unknown(kind) => {
                    warn!("Skipping leading blob {} of unknown kind {kind:?}", blob.index)
                }
                _ => break blob,
            }
        };

        let header = match &first.kind {
            BlobKind::Header => match BlockItem::from_blob_item(&first)? {
                BlockItem::HeaderBlock(header) => Some(header),
                BlockItem::PrimitiveBlock(_) => None,
            },
            _ => {
                warn!("File does not begin with an OSMHeader blob, reading data directly");
                None
            }
        };

        source.rewind()?;
        Ok(header)
    }

    /// The decoded `OSMHeader`, when the file has one.
    pub fn header(&self) -> Option<&FileHeader> {
        self.header.as_ref()
    }

    /// Starts a new pass over the file, yielding nodes matching `query`.
    pub fn extract(&mut self, query: Query, options: ExtractOptions) -> Result<Extraction<'_, R>> {
        if options.require_header && self.header.is_none() {
            return Err(CodecError::NotAPbfFile(
                "missing OSMHeader block".to_string(),
            ));
        }

        let source = self.source.as_mut().ok_or(CodecError::HandleClosed)?;
        source.rewind()?;

        Ok(Extraction::new(source, query, options))
    }

    /// Shorthand for [`PbfReader::extract`] with only a limit.
    pub fn iterate(&mut self, query: Query, limit: Option<usize>) -> Result<Extraction<'_, R>> {
        self.extract(query, ExtractOptions::default().with_limit(limit))
    }

    /// Starts a new pass over the file, yielding whole blocks.
    pub fn blocks(&mut self) -> Result<BlockIterator<&mut R>> {
        let source = self.source.as_mut().ok_or(CodecError::HandleClosed)?;
        source.rewind()?;

        Ok(BlockIterator::new(source))
    }

    /// Releases the source. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!("Closed reader");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }
}

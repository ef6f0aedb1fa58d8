//! The file blob iterator

use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;

use bytes::Bytes;
use log::trace;
use prost::Message;

use super::item::BlobItem;
use super::{HEADER_LEN_SIZE, MAX_BLOB_HEADER_SIZE, MAX_BLOB_SIZE};
use crate::error::{CodecError, Result};
use crate::osm::model::BlobHeader;

/// Reads `[header length][BlobHeader][Blob]` frames from a byte source,
/// one frame per step. Payloads are returned as framed, without being
/// decompressed.
///
/// A framing failure is yielded once and ends the iteration, since no
/// later length prefix can be trusted.
pub struct BlobIterator<R> {
    reader: R,
    index: usize,
    offset: u64,
    finished: bool,
}

impl BlobIterator<BufReader<File>> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(BlobIterator::new(BufReader::new(file)))
    }
}

impl<R: Read> BlobIterator<R> {
    pub fn new(reader: R) -> Self {
        BlobIterator {
            reader,
            index: 0,
            offset: 0,
            finished: false,
        }
    }

    /// Number of blobs read so far
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_blob(&mut self) -> Result<Option<BlobItem>> {
        let mut header_len_buffer = [0_u8; HEADER_LEN_SIZE];
        match read_fully(&mut self.reader, &mut header_len_buffer)? {
            0 => return Ok(None),
            HEADER_LEN_SIZE => {}
            found => {
                return Err(CodecError::TruncatedInput {
                    context: "blob header length",
                    expected: HEADER_LEN_SIZE,
                    found,
                });
            }
        }
        self.offset += HEADER_LEN_SIZE as u64;

        // Translate to u32 (Big Endian)
        let blob_header_length = u32::from_be_bytes(header_len_buffer) as usize;
        if blob_header_length > MAX_BLOB_HEADER_SIZE {
            return Err(CodecError::OversizedBlob {
                context: "blob header",
                size: blob_header_length as i64,
                limit: MAX_BLOB_HEADER_SIZE,
            });
        }

        let blob_header_buffer = read_sized(&mut self.reader, blob_header_length, "blob header")?;
        self.offset += blob_header_length as u64;

        let header = BlobHeader::decode(blob_header_buffer.as_slice())?;
        let datasize = usize::try_from(header.datasize)
            .map_err(|_| CodecError::MalformedMessage("negative blob datasize"))?;

        if datasize > MAX_BLOB_SIZE {
            return Err(CodecError::OversizedBlob {
                context: "blob",
                size: header.datasize as i64,
                limit: MAX_BLOB_SIZE,
            });
        }

        let start = self.offset;
        let data = read_sized(&mut self.reader, datasize, "blob payload")?;
        self.offset += datasize as u64;

        trace!(
            "Read blob {}: {} ({} bytes at offset {})",
            self.index, header.r#type, datasize, start
        );

        let blob = BlobItem::new(self.index, start, header, Bytes::from(data));
        self.index += 1;

        Ok(Some(blob))
    }
}

impl<R: Read> Iterator for BlobIterator<R> {
    type Item = Result<BlobItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let blob = self.read_blob().transpose();
        if !matches!(blob, Some(Ok(_))) {
            self.finished = true;
        }

        blob
    }
}

/// Fills `buf` from `reader`, returning fewer bytes only at end of input.
fn read_fully(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}

fn read_sized(reader: &mut impl Read, len: usize, context: &'static str) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len);
    reader.take(len as u64).read_to_end(&mut buf)?;

    if buf.len() < len {
        return Err(CodecError::TruncatedInput {
            context,
            expected: len,
            found: buf.len(),
        });
    }

    Ok(buf)
}

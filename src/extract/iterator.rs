//! The extraction state machine

use std::collections::VecDeque;
use std::io::Read;

use log::{debug, trace, warn};

use super::options::{ErrorPolicy, ExtractOptions};
use crate::error::Result;
use crate::osm::blob::{BlobItem, BlobIterator, BlobKind};
use crate::osm::block::PrimitiveBlock;
use crate::osm::element::Node;
use crate::query::Query;

enum State {
    Start,
    ReadingBlob,
    DecodingBlock(BlobItem),
    EmittingNodes(VecDeque<Node>),
    Done,
}

/// Lazily yields the nodes of a file which satisfy a [`Query`].
///
/// Blobs are read one at a time, and each decoded block is dropped before
/// the next blob is read. Within a block, matching is eager: every node is
/// decoded and filtered (up to the remaining limit) before the block's first
/// match is yielded. A node which fails to decode therefore ends the
/// sequence before any match from its block is seen. Once the configured
/// limit is reached, no further input is read. The first error ends the
/// sequence.
pub struct Extraction<'a, R> {
    blobs: BlobIterator<&'a mut R>,
    query: Query,
    options: ExtractOptions,
    state: State,
    matched: usize,
}

impl<'a, R: Read> Extraction<'a, R> {
    pub(crate) fn new(source: &'a mut R, query: Query, options: ExtractOptions) -> Self {
        Extraction {
            blobs: BlobIterator::new(source),
            query,
            options,
            state: State::Start,
            matched: 0,
        }
    }

    /// Number of matches yielded so far
    pub fn matched(&self) -> usize {
        self.matched
    }

    /// Number of blobs read so far
    pub fn blobs_read(&self) -> usize {
        self.blobs.index()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.options
            .limit
            .map_or(usize::MAX, |limit| limit.saturating_sub(self.matched))
    }

    /// Decodes a blob into the matching nodes it holds, keeping no more
    /// than the remaining limit allows.
    fn decode(&self, blob: &BlobItem) -> Result<VecDeque<Node>> {
        match &blob.kind {
            BlobKind::Data => {}
            BlobKind::Header => {
                trace!("Skipping header blob {}", blob.index);
                return Ok(VecDeque::new());
            }
            BlobKind::Unknown(kind) => {
                warn!("Skipping blob {} of unknown kind {kind:?}", blob.index);
                return Ok(VecDeque::new());
            }
        }

        let data = blob.decompress()?;
        let block = PrimitiveBlock::decode(&data)?;

        #[cfg(feature = "tracing")]
        if !block.coordinates.is_default() {
            tracing::debug!(
                "BlockHasOffset! +Lon={}, +Lat={}, Granularity={}",
                block.coordinates.lon_offset,
                block.coordinates.lat_offset,
                block.coordinates.granularity
            );
        }

        let remaining = self.remaining();
        let mut matches = VecDeque::new();

        for element in block.elements() {
            for node in element?.nodes(&block)? {
                let node = node?;
                if !self.query.matches(&node) {
                    continue;
                }

                matches.push_back(node);
                if matches.len() >= remaining {
                    return Ok(matches);
                }
            }
        }

        Ok(matches)
    }
}

impl<R: Read> Iterator for Extraction<'_, R> {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Any path which does not assign a new state leaves `Done`.
            match std::mem::replace(&mut self.state, State::Done) {
                State::Start => {
                    debug!("Extracting nodes matching [{}]", self.query);
                    self.state = State::ReadingBlob;
                }
                State::ReadingBlob => {
                    if self.remaining() == 0 {
                        return None;
                    }

                    match self.blobs.next() {
                        Some(Ok(blob)) => self.state = State::DecodingBlock(blob),
                        Some(Err(err)) => return Some(Err(err)),
                        None => {
                            debug!(
                                "Extraction finished: {} matches in {} blobs",
                                self.matched,
                                self.blobs.index()
                            );
                            return None;
                        }
                    }
                }
                State::DecodingBlock(blob) => match self.decode(&blob) {
                    Ok(nodes) => self.state = State::EmittingNodes(nodes),
                    Err(err)
                        if err.is_decompression()
                            && self.options.on_decompression_error == ErrorPolicy::Skip =>
                    {
                        warn!("Skipping blob {}: {err}", blob.index);
                        self.state = State::ReadingBlob;
                    }
                    Err(err) => return Some(Err(err)),
                },
                State::EmittingNodes(mut nodes) => match nodes.pop_front() {
                    Some(node) => {
                        self.matched += 1;
                        if self.remaining() > 0 {
                            self.state = State::EmittingNodes(nodes);
                        } else {
                            debug!("Reached limit of {} matches", self.matched);
                        }

                        return Some(Ok(node));
                    }
                    None => self.state = State::ReadingBlob,
                },
                State::Done => return None,
            }
        }
    }
}

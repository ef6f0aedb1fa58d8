//! Columnar, delta-coded node groups.

use std::collections::HashMap;

use super::variants::{Node, Tags};
use crate::error::{CodecError, Result};
use crate::osm::block::{Coordinates, StringTable};
use crate::osm::wire::{Deltas, Fields, Packed};

const DENSE_ID: u32 = 1;
const DENSE_LAT: u32 = 8;
const DENSE_LON: u32 = 9;
const DENSE_KEYS_VALS: u32 = 10;

/// Ends the tags of one node in the shared key/value stream
const TAG_SENTINEL: u64 = 0;

/// A `DenseNodes` message, holding parallel delta-coded columns for the
/// id, latitude and longitude of each node, and a shared key/value index
/// stream where each node's pairs end with a zero.
///
/// Each column keeps every occurrence of its field, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenseNodes<'a> {
    ids: Vec<&'a [u8]>,
    lats: Vec<&'a [u8]>,
    lons: Vec<&'a [u8]>,
    keys_vals: Option<Vec<&'a [u8]>>,
}

impl<'a> DenseNodes<'a> {
    pub fn decode(buf: &'a [u8]) -> Result<Self> {
        let mut dense = DenseNodes::default();

        for field in Fields::new(buf) {
            let field = field?;
            match field.number {
                DENSE_ID => dense.ids.push(field.bytes()?),
                DENSE_LAT => dense.lats.push(field.bytes()?),
                DENSE_LON => dense.lons.push(field.bytes()?),
                DENSE_KEYS_VALS => dense
                    .keys_vals
                    .get_or_insert_with(Vec::new)
                    .push(field.bytes()?),
                // denseinfo carries changeset metadata
                _ => {}
            }
        }

        Ok(dense)
    }

    /// Number of nodes in the group
    pub fn len(&self) -> usize {
        Deltas::from_segments(self.ids.clone()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.iter().all(|segment| segment.is_empty())
    }

    /// Walks the group, reconstructing one [`Node`] per position.
    pub fn iter<'b>(
        &self,
        table: &'b StringTable<'a>,
        coordinates: Coordinates,
    ) -> Result<DenseNodeIter<'a, 'b>> {
        let (ids, lats, lons) = (
            Deltas::from_segments(self.ids.clone()),
            Deltas::from_segments(self.lats.clone()),
            Deltas::from_segments(self.lons.clone()),
        );

        if ids.len() != lats.len() || ids.len() != lons.len() {
            return Err(CodecError::ArrayLengthMismatch {
                ids: ids.len(),
                lats: lats.len(),
                lons: lons.len(),
            });
        }

        Ok(DenseNodeIter {
            ids,
            lats,
            lons,
            keys_vals: self.keys_vals.clone().map(Packed::from_segments),
            table,
            coordinates,
            finished: false,
        })
    }
}

pub struct DenseNodeIter<'a, 'b> {
    ids: Deltas<'a>,
    lats: Deltas<'a>,
    lons: Deltas<'a>,
    keys_vals: Option<Packed<'a>>,
    table: &'b StringTable<'a>,
    coordinates: Coordinates,
    finished: bool,
}

impl DenseNodeIter<'_, '_> {
    fn next_node(&mut self, id: Result<i64>) -> Result<Node> {
        let id = id?;
        let lat = self
            .lats
            .next()
            .ok_or(CodecError::MalformedMessage("latitude column ended early"))??;
        let lon = self
            .lons
            .next()
            .ok_or(CodecError::MalformedMessage("longitude column ended early"))??;

        Ok(Node::new(
            id,
            self.coordinates.point(lat, lon),
            self.next_tags()?,
        ))
    }

    /// Consumes pairs from the shared stream up to the next sentinel. Once
    /// the stream is exhausted, remaining nodes are untagged.
    fn next_tags(&mut self) -> Result<Tags> {
        let Some(stream) = self.keys_vals.as_mut() else {
            return Ok(Tags::default());
        };

        let mut tags = HashMap::new();
        while let Some(key) = stream.next() {
            let key = key?;
            if key == TAG_SENTINEL {
                break;
            }

            let value = stream
                .next()
                .ok_or(CodecError::MalformedMessage("tag key without a value"))??;

            tags.insert(self.table.resolve(key)?, self.table.resolve(value)?);
        }

        Ok(Tags::new(tags))
    }
}

impl Iterator for DenseNodeIter<'_, '_> {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let id = self.ids.next()?;
        let node = self.next_node(id);
        if node.is_err() {
            self.finished = true;
        }

        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }

        (0, Some(self.ids.len()))
    }
}

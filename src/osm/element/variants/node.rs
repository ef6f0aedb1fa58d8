//! Describes a simplification of an `osm::Node`. Stripping it
//! of the context information required for changelogs, and utilising
//! only the identifier, position and tags.

use geo::Point;

use super::common::Tags;
use crate::error::{CodecError, Result};
use crate::osm::block::{Coordinates, StringTable};
use crate::osm::element::dense::{DenseNodeIter, DenseNodes};
use crate::osm::wire::{Fields, Packed, zigzag};

const NODE_ID: u32 = 1;
const NODE_KEYS: u32 = 2;
const NODE_VALS: u32 = 3;
const NODE_LAT: u32 = 8;
const NODE_LON: u32 = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    /// `x` is longitude, `y` is latitude, both in degrees
    pub position: Point,
    pub tags: Tags,
}

impl Node {
    pub const fn new(id: i64, position: Point, tags: Tags) -> Self {
        Node { id, position, tags }
    }

    /// Returns the identifier for the node
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn lat(&self) -> f64 {
        self.position.y()
    }

    pub fn lon(&self) -> f64 {
        self.position.x()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Takes a dense node group and extracts `Node`s as an iterator,
    /// resolving tags through the block's string table.
    ///
    /// ```rust,ignore
    /// let block = PrimitiveBlock::decode(&data)?;
    /// for element in block.elements() {
    ///     if let Element::DenseNodes(dense) = element? {
    ///         for node in Node::from_dense(dense, &block.stringtable, block.coordinates)? {
    ///             println!("Node: {}", node?.id);
    ///         }
    ///     }
    /// }
    /// ```
    #[inline]
    pub fn from_dense<'a, 'b>(
        dense: DenseNodes<'a>,
        table: &'b StringTable<'a>,
        coordinates: Coordinates,
    ) -> Result<DenseNodeIter<'a, 'b>> {
        dense.iter(table, coordinates)
    }

    /// Decodes a single, non-dense `Node` message. Values are absolute.
    pub fn from_plain(buf: &[u8], table: &StringTable, coordinates: Coordinates) -> Result<Self> {
        let mut id = 0;
        let (mut lat, mut lon) = (0, 0);
        let (mut keys, mut vals) = (Vec::new(), Vec::new());

        for field in Fields::new(buf) {
            let field = field?;
            match field.number {
                NODE_ID => id = zigzag(field.varint()?),
                NODE_KEYS => keys.push(field.bytes()?),
                NODE_VALS => vals.push(field.bytes()?),
                NODE_LAT => lat = zigzag(field.varint()?),
                NODE_LON => lon = zigzag(field.varint()?),
                // info and unknown fields
                _ => {}
            }
        }

        let (keys, vals) = (Packed::from_segments(keys), Packed::from_segments(vals));
        if keys.len() != vals.len() {
            return Err(CodecError::MalformedMessage(
                "node keys and values differ in length",
            ));
        }

        let pairs = keys
            .zip(vals)
            .map(|(k, v)| Ok((k?, v?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Node::new(
            id,
            coordinates.point(lat, lon),
            Tags::from_block(pairs.into_iter(), table)?,
        ))
    }
}

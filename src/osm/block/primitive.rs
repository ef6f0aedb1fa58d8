//! Decodes a `PrimitiveBlock` message in place, borrowing its strings and
//! entity groups from the decompressed blob.

use itertools::Itertools;
use log::debug;

use super::{DEFAULT_GRANULARITY, NANODEGREE};
use crate::error::{CodecError, Result};
use crate::osm::element::{Element, TagString};
use crate::osm::wire::Fields;

const BLOCK_STRINGTABLE: u32 = 1;
const BLOCK_PRIMITIVEGROUP: u32 = 2;
const BLOCK_GRANULARITY: u32 = 17;
const BLOCK_LAT_OFFSET: u32 = 19;
const BLOCK_LON_OFFSET: u32 = 20;

const STRINGTABLE_ENTRY: u32 = 1;

/// Block-local pool of strings, referenced by index from entities.
/// Index zero is reserved and holds the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable<'a> {
    entries: Vec<&'a [u8]>,
}

impl<'a> StringTable<'a> {
    pub fn decode(buf: &'a [u8]) -> Result<Self> {
        let entries = Fields::new(buf)
            .filter_ok(|field| field.number == STRINGTABLE_ENTRY)
            .map(|field| field.and_then(|field| field.bytes()))
            .collect::<Result<Vec<_>>>()?;

        Ok(StringTable { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, index: u64) -> Result<&'a [u8]> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i))
            .copied()
            .ok_or(CodecError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// Recovers the string at `index`, replacing invalid UTF-8.
    #[inline]
    pub fn resolve(&self, index: u64) -> Result<TagString> {
        let bytes = self.get(index)?;
        Ok(TagString::from(String::from_utf8_lossy(bytes).into_owned()))
    }
}

/// Fixed-point to degree conversion for a block.
///
/// `degrees = 1e-9 * (offset + granularity * stored)`, with offsets
/// given in nanodegrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinates {
    pub granularity: i64,
    pub lat_offset: i64,
    pub lon_offset: i64,
}

impl Default for Coordinates {
    fn default() -> Self {
        Coordinates {
            granularity: DEFAULT_GRANULARITY,
            lat_offset: 0,
            lon_offset: 0,
        }
    }
}

impl Coordinates {
    #[inline]
    pub fn lat(&self, stored: i64) -> f64 {
        NANODEGREE * (self.lat_offset as f64 + self.granularity as f64 * stored as f64)
    }

    #[inline]
    pub fn lon(&self, stored: i64) -> f64 {
        NANODEGREE * (self.lon_offset as f64 + self.granularity as f64 * stored as f64)
    }

    #[inline]
    pub fn point(&self, lat: i64, lon: i64) -> geo::Point {
        geo::Point::new(self.lon(lon), self.lat(lat))
    }

    pub fn is_default(&self) -> bool {
        *self == Coordinates::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrimitiveBlock<'a> {
    pub stringtable: StringTable<'a>,
    pub coordinates: Coordinates,
    groups: Vec<&'a [u8]>,
}

impl<'a> PrimitiveBlock<'a> {
    /// Reads the block fields. Entity groups are only located here and are
    /// decoded lazily by [`PrimitiveBlock::elements`], since the scaling
    /// fields are encoded after them.
    pub fn decode(buf: &'a [u8]) -> Result<Self> {
        let mut block = PrimitiveBlock::default();

        for field in Fields::new(buf) {
            let field = field?;
            match field.number {
                BLOCK_STRINGTABLE => block.stringtable = StringTable::decode(field.bytes()?)?,
                BLOCK_PRIMITIVEGROUP => block.groups.push(field.bytes()?),
                // int32 on the wire, sign-extended to ten bytes when negative
                BLOCK_GRANULARITY => block.coordinates.granularity = field.varint()? as i32 as i64,
                BLOCK_LAT_OFFSET => block.coordinates.lat_offset = field.varint()? as i64,
                BLOCK_LON_OFFSET => block.coordinates.lon_offset = field.varint()? as i64,
                // date_granularity and anything newer
                _ => {}
            }
        }

        debug!(
            "Decoded block: {} strings, {} groups, granularity={}, +lat={}, +lon={}",
            block.stringtable.len(),
            block.groups.len(),
            block.coordinates.granularity,
            block.coordinates.lat_offset,
            block.coordinates.lon_offset,
        );

        Ok(block)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The entity groups of the block, in encoded order.
    pub fn elements(&self) -> impl Iterator<Item = Result<Element<'a>>> + '_ {
        self.groups
            .iter()
            .copied()
            .map(Element::from_group)
            .flatten_ok()
    }
}

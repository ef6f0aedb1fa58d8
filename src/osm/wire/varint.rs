//! Varint, zigzag and running-delta decoding.

use std::vec;

use bytes::Buf;

use crate::error::{CodecError, Result};

/// A `u64` never needs more than ten base-128 groups.
const MAX_VARINT_LEN: usize = 10;

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7f;

/// Decodes an unsigned little-endian base-128 varint, advancing `buf`
/// past it.
#[inline]
pub fn decode_varint(buf: &mut impl Buf) -> Result<u64> {
    let mut value = 0_u64;

    for index in 0..MAX_VARINT_LEN {
        if !buf.has_remaining() {
            return Err(CodecError::MalformedVarint);
        }

        let byte = buf.get_u8();

        // The tenth group only has room for the final bit of a u64.
        if index == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(CodecError::MalformedVarint);
        }

        value |= u64::from(byte & PAYLOAD) << (index * 7);
        if byte & CONTINUATION == 0 {
            return Ok(value);
        }
    }

    Err(CodecError::MalformedVarint)
}

/// Decodes a varint which must fit in 32 bits.
#[inline]
pub fn decode_varint_u32(buf: &mut impl Buf) -> Result<u32> {
    u32::try_from(decode_varint(buf)?).map_err(|_| CodecError::MalformedVarint)
}

/// Maps a zigzag-encoded value back onto the signed range.
#[inline]
pub const fn zigzag(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

#[inline]
pub fn decode_zigzag(buf: &mut impl Buf) -> Result<i64> {
    decode_varint(buf).map(zigzag)
}

/// Running sum over a delta-coded column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeltaAccumulator {
    total: i64,
}

impl DeltaAccumulator {
    /// Adds `delta` to the stored total and returns the new absolute value.
    #[inline]
    pub fn advance(&mut self, delta: i64) -> i64 {
        self.total = self.total.wrapping_add(delta);
        self.total
    }

    #[inline]
    pub const fn total(&self) -> i64 {
        self.total
    }
}

/// A packed repeated varint field. Encoders may split one packed field
/// over several occurrences, which read as their concatenation.
#[derive(Debug, Clone)]
pub struct Packed<'a> {
    buf: &'a [u8],
    segments: vec::IntoIter<&'a [u8]>,
}

/// Number of varints in `buf`, counted by terminating bytes.
#[inline]
fn terminators(buf: &[u8]) -> usize {
    buf.iter().filter(|byte| *byte & CONTINUATION == 0).count()
}

impl<'a> Packed<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Packed::from_segments(vec![buf])
    }

    /// Reads each occurrence of a split field in turn.
    pub fn from_segments(segments: Vec<&'a [u8]>) -> Self {
        Packed {
            buf: &[],
            segments: segments.into_iter(),
        }
    }

    /// Number of complete varints remaining.
    pub fn len(&self) -> usize {
        let rest = self.segments.as_slice().iter().map(|s| terminators(s));
        terminators(self.buf) + rest.sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty() && self.segments.as_slice().iter().all(|s| s.is_empty())
    }
}

impl Iterator for Packed<'_> {
    type Item = Result<u64>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.buf.is_empty() {
            self.buf = self.segments.next()?;
        }

        let value = decode_varint(&mut self.buf);
        if value.is_err() {
            self.buf = &[];
            self.segments = Vec::new().into_iter();
        }

        Some(value)
    }
}

/// A packed repeated `sint` field.
#[derive(Debug, Clone)]
pub struct PackedSint<'a>(Packed<'a>);

impl<'a> PackedSint<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        PackedSint(Packed::new(buf))
    }

    pub fn from_segments(segments: Vec<&'a [u8]>) -> Self {
        PackedSint(Packed::from_segments(segments))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Iterator for PackedSint<'_> {
    type Item = Result<i64>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|value| value.map(zigzag))
    }
}

/// A packed `sint` column whose entries are deltas from the previous entry,
/// yielding the absolute values. The running sum carries across segments.
#[derive(Debug, Clone)]
pub struct Deltas<'a> {
    column: PackedSint<'a>,
    accumulator: DeltaAccumulator,
}

impl<'a> Deltas<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Deltas::from_segments(vec![buf])
    }

    pub fn from_segments(segments: Vec<&'a [u8]>) -> Self {
        Deltas {
            column: PackedSint::from_segments(segments),
            accumulator: DeltaAccumulator::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }
}

impl Iterator for Deltas<'_> {
    type Item = Result<i64>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let delta = self.column.next()?;
        Some(delta.map(|delta| self.accumulator.advance(delta)))
    }
}

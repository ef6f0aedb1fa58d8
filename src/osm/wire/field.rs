//! Tagged field iteration over an encoded message.

use bytes::Buf;

use super::varint::decode_varint;
use crate::error::{CodecError, Result};

const WIRE_VARINT: u64 = 0;
const WIRE_FIXED64: u64 = 1;
const WIRE_LEN: u64 = 2;
const WIRE_FIXED32: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireValue<'a> {
    Varint(u64),
    Fixed64(u64),
    Bytes(&'a [u8]),
    Fixed32(u32),
}

impl WireValue<'_> {
    pub const fn wire_type(&self) -> u8 {
        match self {
            WireValue::Varint(_) => WIRE_VARINT as u8,
            WireValue::Fixed64(_) => WIRE_FIXED64 as u8,
            WireValue::Bytes(_) => WIRE_LEN as u8,
            WireValue::Fixed32(_) => WIRE_FIXED32 as u8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub number: u32,
    pub value: WireValue<'a>,
}

impl<'a> Field<'a> {
    /// The payload of a length-delimited field.
    #[inline]
    pub fn bytes(&self) -> Result<&'a [u8]> {
        match self.value {
            WireValue::Bytes(bytes) => Ok(bytes),
            other => Err(self.unexpected(other)),
        }
    }

    #[inline]
    pub fn varint(&self) -> Result<u64> {
        match self.value {
            WireValue::Varint(value) => Ok(value),
            other => Err(self.unexpected(other)),
        }
    }

    fn unexpected(&self, value: WireValue) -> CodecError {
        CodecError::UnexpectedWireType {
            field: self.number,
            wire_type: value.wire_type(),
        }
    }
}

/// Walks the fields of one message in encoded order. Fields the caller does
/// not recognise are consumed whole, so skipping them is a matter of
/// ignoring the yielded value.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    buf: &'a [u8],
}

impl<'a> Fields<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Fields { buf }
    }

    fn read(&mut self) -> Result<Field<'a>> {
        let key = decode_varint(&mut self.buf)?;
        let number = u32::try_from(key >> 3).map_err(|_| CodecError::MalformedVarint)?;

        if number == 0 {
            return Err(CodecError::MalformedMessage("field number zero"));
        }

        let value = match key & 0x07 {
            WIRE_VARINT => WireValue::Varint(decode_varint(&mut self.buf)?),
            WIRE_FIXED64 => {
                self.require(8, "fixed64 field")?;
                WireValue::Fixed64(self.buf.get_u64_le())
            }
            WIRE_LEN => {
                let len = decode_varint(&mut self.buf)?;
                let len = usize::try_from(len).map_err(|_| CodecError::MalformedVarint)?;
                self.require(len, "length-delimited field")?;

                let (payload, rest) = self.buf.split_at(len);
                self.buf = rest;
                WireValue::Bytes(payload)
            }
            WIRE_FIXED32 => {
                self.require(4, "fixed32 field")?;
                WireValue::Fixed32(self.buf.get_u32_le())
            }
            other => {
                return Err(CodecError::UnexpectedWireType {
                    field: number,
                    wire_type: other as u8,
                });
            }
        };

        Ok(Field { number, value })
    }

    #[inline]
    fn require(&self, expected: usize, context: &'static str) -> Result<()> {
        if self.buf.len() < expected {
            return Err(CodecError::TruncatedInput {
                context,
                expected,
                found: self.buf.len(),
            });
        }

        Ok(())
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = Result<Field<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buf.is_empty() {
            return None;
        }

        let field = self.read();
        if field.is_err() {
            self.buf = &[];
        }

        Some(field)
    }
}

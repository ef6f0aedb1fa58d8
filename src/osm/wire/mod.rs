//! Protocol buffer wire primitives.
//!
//! The primitive block is decoded by hand rather than through generated
//! messages, so that strings and packed columns can be borrowed straight
//! out of the decompressed blob and walked lazily.

pub mod field;
pub mod varint;

#[doc(inline)]
pub use field::{Field, Fields, WireValue};
#[doc(inline)]
pub use varint::{
    DeltaAccumulator, Deltas, Packed, PackedSint, decode_varint, decode_varint_u32,
    decode_zigzag, zigzag,
};

//! OpenStreetMap `.osm.pbf` decoding.
//!
//! The file is a sequence of frames, `[u32 header length][BlobHeader][Blob]`.
//! Each layer here peels one level of that structure:
//!
//! - [`blob`] reads frames and inflates their payloads,
//! - [`block`] decodes the header block and primitive blocks,
//! - [`element`] splits primitive groups and reconstructs nodes,
//! - [`wire`] holds the protocol buffer primitives underneath.
//!
//! See the wiki for the format: https://wiki.openstreetmap.org/wiki/PBF_Format

// Exposed modules
pub mod blob;
pub mod block;
pub mod element;
pub mod model;
pub mod wire;

// Hidden modules
#[cfg(test)]
pub(crate) mod test;

// Inlined structs
#[doc(inline)]
pub use blob::{BlobItem, BlobIterator, BlobKind};
#[doc(inline)]
pub use block::{BlockItem, BlockIterator, Coordinates, FileHeader, PrimitiveBlock, StringTable};
#[doc(inline)]
pub use element::{DenseNodes, Element, Node};

//! The Block iterator and item definitions

pub mod header;
pub mod item;
pub mod iterator;
pub mod primitive;

#[doc(inline)]
pub use header::FileHeader;
#[doc(inline)]
pub use item::{BlockItem, PrimitiveData};
#[doc(inline)]
pub use iterator::BlockIterator;
#[doc(inline)]
pub use primitive::{Coordinates, PrimitiveBlock, StringTable};

// Default Scaling Factor: https://wiki.openstreetmap.org/wiki/PBF_Format
pub const DEFAULT_GRANULARITY: i64 = 100;

/// Coordinates are stored relative to nanodegrees
pub const NANODEGREE: f64 = 1e-9;

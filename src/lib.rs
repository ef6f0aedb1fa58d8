#![doc = include_str!("../README.md")]

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;
#[cfg_attr(feature = "mimalloc", global_allocator)]
#[cfg(feature = "mimalloc")]
static GLOBAL: MiMalloc = MiMalloc;

pub mod error;
pub mod extract;
pub mod osm;
pub mod query;

#[doc(inline)]
pub use error::{CodecError, Result};
#[doc(inline)]
pub use extract::{ErrorPolicy, ExtractOptions, Extraction, PbfReader};
#[doc(inline)]
pub use osm::element::{Node, TagString, Tags};
#[doc(inline)]
pub use query::{Matched, Predicate, Query};

//! Entity groups and the nodes decoded from them

pub mod dense;
pub mod item;
#[doc(hidden)]
pub mod variants;

#[doc(inline)]
pub use dense::{DenseNodeIter, DenseNodes};
#[doc(inline)]
pub use item::Element;
#[doc(inline)]
pub use variants::Node;

pub use variants::common::*;

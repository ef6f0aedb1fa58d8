//! Processed element variants

pub mod common;
pub mod node;

pub use common::*;
pub use node::*;

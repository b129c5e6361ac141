//! Transformation module.
//!
//! - Convert: millions to billions, rounded
//! - Pipeline: the full extract → transform → load → query run

pub mod convert;
pub mod pipeline;

pub use convert::{convert, convert_record, millions_to_billions, round_to};
pub use pipeline::*;

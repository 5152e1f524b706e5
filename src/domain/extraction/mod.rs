//! Multi-strategy price extraction

pub mod extractor;
pub mod meta;
pub mod numeric;
pub mod selectors;
pub mod structured;

pub use extractor::{guard_supported, host_of, PriceExtractor};

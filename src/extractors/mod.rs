// src/extractors/mod.rs
pub mod date;
pub mod dedup;
pub mod path;
pub mod record;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use dedup::OrderedUniqueMapping;
#[allow(unused_imports)]
pub use record::{extract, extract_from_str, ExtractedRecord};

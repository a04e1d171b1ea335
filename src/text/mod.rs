pub mod normalize;
pub mod splitter;

pub use normalize::{normalize_pages, truncate_chars};
pub use splitter::RecursiveSplitter;

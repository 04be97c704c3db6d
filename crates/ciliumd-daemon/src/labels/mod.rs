//! Label set identifiers.

pub mod allocator;

pub use allocator::{InMemoryLabelAllocator, LabelAllocator};

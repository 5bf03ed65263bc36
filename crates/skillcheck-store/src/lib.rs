//! skillcheck-store — implementations of the core's `RecordStore` seam.
//!
//! Two collaborators are provided: [`MemoryStore`] for tests and embedded
//! use, and [`JsonStore`] for simple file-backed persistence under a data
//! directory.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

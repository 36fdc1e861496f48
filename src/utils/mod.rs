//! Utilities shared across the crate.
//!
//! - [`fs`] - Path normalization, chunked file reading and atomic writes

pub mod fs;

pub use fs::{absolutize, atomic_write, normalize_path, open_chunked};

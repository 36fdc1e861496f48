//! Path resolution for import directives.
//!
//! - [`path`] - [`PathResolver`] turns a directive argument into a canonical
//!   dependency path, optionally inferring a missing extension
//! - [`stack`] - [`ResolveStack`] tracks what one pass has already inlined

pub mod path;
pub mod stack;

pub use path::{PathResolver, canonicalize};
pub use stack::ResolveStack;

//! Static file serving
//!
//! Maps request targets onto files beneath a single document root and turns
//! the outcome into one of the four responses the server knows.

pub mod handler;
pub mod resolver;

pub use handler::StaticFileHandler;
pub use resolver::{PathResolver, ResolvedTarget};

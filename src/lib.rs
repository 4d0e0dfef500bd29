//! Docroot - minimal static file server
//!
//! Serves files from one document root over a small subset of HTTP/1.1.

pub mod config;
pub mod http;
pub mod server;
pub mod static_files;

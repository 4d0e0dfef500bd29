//! HTTP protocol implementation.
//!
//! A deliberately small subset of HTTP/1.1: one request per connection, only
//! the request line is interpreted, and responses are either a bare status
//! line or a 200 with `Content-Type`, `Content-Length` and the file bytes.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine
//! - **`parser`**: Extracts method and target from the request line
//! - **`request`**: Parsed request representation
//! - **`response`**: Status codes and response representation
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read up to buffer_size bytes
//!        └──────┬──────┘
//!               │ Request line parsed (malformed → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve target, pick status
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

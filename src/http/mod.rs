//! HTTP protocol implementation.
//!
//! This module implements a one-request-per-connection HTTP/1.1 static file server.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The per-connection handler implementing the request-response state machine
//! - **`parser`**: Extracts method, target and protocol from the request line
//! - **`request`**: Bounded request-line tokens and the HTTP method enum
//! - **`path`**: Maps request targets under the document root and refuses traversal
//! - **`mime`**: MIME type detection based on file extensions
//! - **`static_files`**: Chooses between the requested file and the error documents
//! - **`response`**: Status codes, response heads and outcomes
//! - **`writer`**: Serializes heads, streams bodies in chunks and half-closes the socket
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read until the request line is complete
//!        └──────┬──────┘
//!               │ Request line parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Method check, traversal check, path mapping
//!        └──────┬───────────┘
//!               │ Reply chosen
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Head, then the file in chunks
//!        └──────┬───────────┘
//!               │ Body sent
//!               ▼
//!        ┌──────────────────┐
//!        │    Closing       │ ← Write half-close, short pause
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```
//!
//! There is no keep-alive: the end of a successful body is signalled by the close.

pub mod connection;
pub mod mime;
pub mod parser;
pub mod path;
pub mod request;
pub mod response;
pub mod static_files;
pub mod writer;

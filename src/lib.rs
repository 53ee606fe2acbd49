//! docserve - static file HTTP server
//!
//! Core library for request handling, file streaming and the accept loop.

pub mod config;
pub mod http;
pub mod server;

//! HTTP response helpers.
//!
//! The server core never parses requests; the raw request text is opaque to
//! it. This module covers only the response side:
//!
//! - **`response`**: composes a framed response from a file or from bytes
//! - **`mime`**: MIME type lookup by file extension
//! - **`writer`**: writes a composed response to the client

pub mod mime;
pub mod response;
pub mod writer;

use std::fs;
use std::path::Path;

use crate::error::ServerError;

use super::mime;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Composes a complete response from a file on disk.
///
/// The status line is given without the version prefix (`"200 OK"`). The
/// MIME type comes from the file extension; unknown extensions are served as
/// `application/octet-stream`. The returned buffer is fully self-contained:
/// status line, `Content-Length`, `Content-Type`, blank line, body.
pub fn from_file(status_line: &str, path: impl AsRef<Path>) -> Result<Vec<u8>, ServerError> {
    let path = path.as_ref();
    let body = fs::read(path).map_err(|e| ServerError::FileOpen {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(compose(status_line, mime::from_path(path), &body))
}

/// Composes the same framing around in-memory bytes.
pub fn from_bytes(status_line: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
    compose(status_line, content_type, body)
}

fn compose(status_line: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
    let header = format!(
        "{HTTP_VERSION} {status_line}\r\nContent-Length: {}\r\nContent-Type: {content_type}\r\n\r\n",
        body.len()
    );

    let mut response = Vec::with_capacity(header.len() + body.len());
    response.extend_from_slice(header.as_bytes());
    response.extend_from_slice(body);
    response
}

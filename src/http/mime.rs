//! MIME type lookup by file extension.

use std::path::Path;

/// Fallback for unknown or absent extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Maps a path's extension to a `Content-Type` value.
pub fn from_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return OCTET_STREAM;
    };

    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=UTF-8",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=UTF-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(from_path(Path::new("index.html")), "text/html; charset=UTF-8");
        assert_eq!(from_path(Path::new("a/b/style.css")), "text/css");
        assert_eq!(from_path(Path::new("logo.PNG")), "image/png");
    }

    #[test]
    fn unknown_or_missing_extension_is_octet_stream() {
        assert_eq!(from_path(Path::new("archive.tar.zst")), OCTET_STREAM);
        assert_eq!(from_path(Path::new("Makefile")), OCTET_STREAM);
    }
}

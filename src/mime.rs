//! Suffix → `Content-Type` lookup for static files.
//!
//! A pure function with no state and no I/O of its own; consulted only by
//! the static-file branch of the request handler.

use std::path::Path;

/// Resolves the MIME type for a path by its suffix, falling back to
/// `application/octet-stream` for anything unrecognized.
pub fn for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("html") | Some("htm") => "text/html",
        Some("txt") => "text/plain",
        Some("css") => "text/css",
        Some("gif") => "image/gif",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn known_suffixes_map_correctly() {
        assert_eq!(for_path(&PathBuf::from("home.html")), "text/html");
        assert_eq!(for_path(&PathBuf::from("logo.GIF")), "image/gif");
        assert_eq!(for_path(&PathBuf::from("photo.jpeg")), "image/jpeg");
        assert_eq!(for_path(&PathBuf::from("notes.txt")), "text/plain");
    }

    #[test]
    fn unknown_suffix_falls_back_to_octet_stream() {
        assert_eq!(
            for_path(&PathBuf::from("script.cgi")),
            "application/octet-stream"
        );
        assert_eq!(
            for_path(&PathBuf::from("no_extension")),
            "application/octet-stream"
        );
    }
}

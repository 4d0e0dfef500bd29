//! MIME type detection from file extensions.

use std::path::Path;

/// Type reported for unknown or missing extensions.
pub const DEFAULT_MIME_TYPE: &str = "text/html";

/// Returns the MIME type for `path` based on its extension.
///
/// # Examples
/// ```
/// use docroot::http::mime::mime_type;
/// assert_eq!(mime_type("www/base.css"), "text/css");
/// assert_eq!(mime_type("www/logo.PNG"), "image/png");
/// assert_eq!(mime_type("www/README"), "text/html");
/// ```
pub fn mime_type(path: impl AsRef<Path>) -> &'static str {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        // Text
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("xml") => "application/xml",

        // Scripts
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",

        // Audio / video
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Archives and documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("tar") => "application/x-tar",

        _ => DEFAULT_MIME_TYPE,
    }
}

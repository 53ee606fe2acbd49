//! Content-type lookup by file extension.

/// Content type used for anything the table does not know.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type that gets an HTML error page when the file is missing.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// Extension to content-type mapping. Lookups are exact and case-sensitive.
pub const MIME_TABLE: &[(&str, &str)] = &[
    ("html", HTML_CONTENT_TYPE),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("json", "application/json"),
    ("txt", "text/plain"),
    ("pdf", "application/pdf"),
];

/// Returns the content type for `path`, based on the text after its last `.`.
///
/// The whole string is searched, so a dot in a directory name counts too
/// (`./web/v1.2/readme` has the extension `2/readme` and maps to the default).
///
/// # Example
///
/// ```
/// # use docserve::http::mime::content_type;
/// assert_eq!(content_type("web/index.html"), "text/html");
/// assert_eq!(content_type("web/INDEX.HTML"), "application/octet-stream");
/// assert_eq!(content_type("web/Makefile"), "application/octet-stream");
/// ```
pub fn content_type(path: &str) -> &'static str {
    let Some((_, ext)) = path.rsplit_once('.') else {
        return DEFAULT_CONTENT_TYPE;
    };

    MIME_TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

pub fn is_html(path: &str) -> bool {
    content_type(path) == HTML_CONTENT_TYPE
}

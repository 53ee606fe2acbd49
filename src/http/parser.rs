use crate::http::request::RawRequest;

/// Upper bound on the bytes read for a request line.
pub const MAX_REQUEST_BYTES: usize = 2047;

/// Parses the request line at the start of `buf`.
///
/// Never fails: missing tokens are left empty and long tokens are truncated.
/// Anything after the first line (headers, body) is ignored.
pub fn parse_request_line(buf: &[u8]) -> RawRequest {
    let text = String::from_utf8_lossy(buf);
    let line = text.lines().next().unwrap_or("");

    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");
    let protocol = parts.next().unwrap_or("");

    RawRequest::new(method, target, protocol)
}

/// Whether `buf` already holds a full request line.
pub fn has_line_end(buf: &[u8]) -> bool {
    buf.contains(&b'\n')
}

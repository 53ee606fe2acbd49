use tokio::fs::File;

/// HTTP status codes the server emits.
///
/// - `Ok` (200): file found and streamed
/// - `BadRequest` (400): method other than GET
/// - `Forbidden` (403): target tried to leave the document root
/// - `NotFound` (404): nothing servable at the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// Fixed documents served in place of a requested file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPage {
    /// HTML resource that does not exist
    NotFound,
    /// Method other than GET
    BadRequest,
    /// Traversal attempt
    AccessDenied,
}

impl ErrorPage {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorPage::NotFound => StatusCode::NotFound,
            ErrorPage::BadRequest => StatusCode::BadRequest,
            ErrorPage::AccessDenied => StatusCode::Forbidden,
        }
    }
}

/// What the streamer decided to send for one request.
#[derive(Debug)]
pub enum ResponseOutcome {
    /// File opened; stream it with this content type.
    Success {
        content_type: &'static str,
        file: File,
    },
    NotFound,
    BadMethod,
    Forbidden,
}

/// Status line and headers of a response. The body is streamed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in the order they are written
    pub headers: Vec<(String, String)>,
}

/// Builder for constructing response heads in a fluent style.
///
/// Unlike a buffered response, nothing adds `Content-Length` automatically: a
/// streamed body ends when the connection is closed.
///
/// # Example
///
/// ```
/// # use docserve::http::response::{ResponseBuilder, StatusCode};
/// let head = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/css")
///     .build();
/// assert_eq!(head.header("Content-Type"), Some("text/css"));
/// assert_eq!(head.header("Content-Length"), None);
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
}

impl ResponseBuilder {
    /// Creates a new builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Adds a header, replacing an earlier value with the same name.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    pub fn build(self) -> ResponseHead {
        ResponseHead {
            status: self.status,
            headers: self.headers,
        }
    }
}

impl ResponseHead {
    /// Head for a streamed document: status plus `Content-Type`.
    pub fn document(status: StatusCode, content_type: &str) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", content_type)
            .build()
    }

    /// Head for a response with no body at all.
    pub fn bare(status: StatusCode) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Length", "0")
            .build()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

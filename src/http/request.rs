/// HTTP request methods.
///
/// Only GET is served. Every other method, known or not, is answered with the
/// bad-request page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
}

/// Longest method token kept, in bytes.
pub const MAX_METHOD_LEN: usize = 15;
/// Longest request target kept, in bytes.
pub const MAX_TARGET_LEN: usize = 255;
/// Longest protocol token kept, in bytes.
pub const MAX_PROTOCOL_LEN: usize = 31;

/// The three tokens of a request line, as received.
///
/// Each token is truncated to its `MAX_*_LEN` bound. Missing tokens are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest {
    /// Method token, e.g. "GET"
    pub method: String,
    /// Request target, e.g. "/index.html"
    pub target: String,
    /// Protocol token, e.g. "HTTP/1.1"
    pub protocol: String,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive, typically uppercase)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string matches a known method, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }
}

impl RawRequest {
    /// Builds a request from raw tokens, applying the length bounds.
    pub fn new(method: &str, target: &str, protocol: &str) -> Self {
        Self {
            method: bounded(method, MAX_METHOD_LEN),
            target: bounded(target, MAX_TARGET_LEN),
            protocol: bounded(protocol, MAX_PROTOCOL_LEN),
        }
    }

    /// The method, if the token names one.
    pub fn method(&self) -> Option<Method> {
        Method::from_str(&self.method)
    }

    /// Whether this request may be served. Empty or unknown methods are not GET.
    pub fn is_get(&self) -> bool {
        self.method() == Some(Method::GET)
    }
}

/// Copies at most `max` bytes of `token`, cut back to a character boundary.
fn bounded(token: &str, max: usize) -> String {
    if token.len() <= max {
        return token.to_string();
    }

    let mut end = max;
    while !token.is_char_boundary(end) {
        end -= 1;
    }
    token[..end].to_string()
}

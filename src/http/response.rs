/// The four statuses this server ever answers with.
///
/// Each variant is bound to a fixed HTTP/1.1 status line, so every response
/// starts with exactly one of these lines:
/// - `Ok` (200): file content follows
/// - `MovedPermanently` (301): directory requested without a trailing slash
/// - `NotFound` (404): nothing servable at the target
/// - `MethodNotAllowed` (405): any method other than `GET`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::MovedPermanently => 301,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }

    /// Returns the complete status line, CRLF included.
    ///
    /// # Example
    ///
    /// ```
    /// # use docroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::MovedPermanently.status_line(), "HTTP/1.1 301 Moved Permanently\r\n");
    /// ```
    pub fn status_line(&self) -> &'static str {
        match self {
            StatusCode::Ok => "HTTP/1.1 200 OK\r\n",
            StatusCode::MovedPermanently => "HTTP/1.1 301 Moved Permanently\r\n",
            StatusCode::NotFound => "HTTP/1.1 404 Not Found\r\n",
            StatusCode::MethodNotAllowed => "HTTP/1.1 405 Method Not Allowed\r\n",
        }
    }
}

/// A complete HTTP response ready to be sent to a client.
///
/// A response without a body is "status only": it serializes to the status
/// line alone, with no headers and no blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in the order they are written
    pub headers: Vec<(String, String)>,
    /// Response body, if any
    pub body: Option<Vec<u8>>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use docroot::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/css")
///     .body(b"body {}".to_vec())
///     .build();
/// assert_eq!(response.header("Content-Length"), Some("7"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends a header. Headers are written in the order they were added.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the final Response.
    ///
    /// When a body is present, Content-Length is appended from its byte length
    /// unless a header of that name was already added.
    pub fn build(mut self) -> Response {
        if let Some(body) = &self.body {
            let has_length = self
                .headers
                .iter()
                .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"));
            if !has_length {
                self.headers
                    .push(("Content-Length".to_string(), body.len().to_string()));
            }
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// A 200 OK response carrying file content.
    pub fn content(mime_type: &str, body: Vec<u8>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", mime_type)
            .body(body)
            .build()
    }

    /// A response consisting of the status line only.
    pub fn status_only(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    pub fn moved_permanently() -> Self {
        Self::status_only(StatusCode::MovedPermanently)
    }

    pub fn not_found() -> Self {
        Self::status_only(StatusCode::NotFound)
    }

    pub fn method_not_allowed() -> Self {
        Self::status_only(StatusCode::MethodNotAllowed)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

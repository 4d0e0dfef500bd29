use crate::http::request::{Method, Request};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The request line has fewer than two tokens.
    #[error("malformed request line")]
    Malformed,
    /// The request line is not valid UTF-8.
    #[error("request line is not valid UTF-8")]
    InvalidEncoding,
    /// Nothing but whitespace was received.
    #[error("empty request")]
    Incomplete,
}

/// Parses the request line at the start of `buf`.
///
/// Only the first line is decoded; anything after it (headers, body, or a
/// truncated tail) is ignored. The line is split on ASCII whitespace: method,
/// target, then an optional version.
pub fn parse_request_line(buf: &[u8]) -> Result<Request, ParseError> {
    // Blank lines ahead of the request line are tolerated.
    let start = buf
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .ok_or(ParseError::Incomplete)?;
    let buf = &buf[start..];

    let line_end = buf.iter().position(|&b| b == b'\n').unwrap_or(buf.len());
    let line = std::str::from_utf8(&buf[..line_end]).map_err(|_| ParseError::InvalidEncoding)?;

    let mut parts = line.split_ascii_whitespace();

    let method = parts.next().ok_or(ParseError::Malformed)?;
    let target = parts.next().ok_or(ParseError::Malformed)?;

    let mut request = Request::new(Method::from_token(method), target);
    if let Some(version) = parts.next() {
        request = request.with_version(version);
    }

    Ok(request)
}

/// Offset of the line feed ending the last header line, if the blank line
/// terminating the header block has arrived. Accepts CRLF and bare LF.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    (0..buf.len()).find(|&i| {
        let rest = &buf[i + 1..];
        buf[i] == b'\n' && (rest.starts_with(b"\n") || rest.starts_with(b"\r\n"))
    })
}

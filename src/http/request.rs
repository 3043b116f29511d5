//! Request-line and header parsing.
//!
//! Reads exactly one request line plus headers terminated by a blank line,
//! per the handler's collaborator contract. Header *values* are not
//! meaningful to this server (no keep-alive, no request bodies of
//! consequence) so they are consumed off the wire and discarded; only the
//! method, target, and version are retained.

use std::io::BufRead;

use memchr::memchr;

use crate::errors::HandlerError;
use crate::http::types::{Method, Version};

/// A parsed request line: method, target (path + optional query), version.
#[derive(Debug, Clone)]
pub struct RequestLine {
    pub method: Method,
    /// The path component, without the leading `?query`.
    pub path: Vec<u8>,
    /// The raw query string, without the leading `?`, if present.
    pub query: Option<Vec<u8>>,
    pub version: Version,
}

/// Reads and parses one request (request line + headers) from `reader`.
pub fn parse(reader: &mut impl BufRead) -> Result<RequestLine, HandlerError> {
    let line = read_line(reader)?;
    let request_line = parse_request_line(&line)?;
    consume_headers(reader)?;
    Ok(request_line)
}

/// Reads a single `\r\n`- or `\n`-terminated line, with the terminator
/// stripped. Returns a malformed-request error on EOF before any line.
fn read_line(reader: &mut impl BufRead) -> Result<Vec<u8>, HandlerError> {
    let mut buf = Vec::new();
    let n = reader.read_until(b'\n', &mut buf)?;
    if n == 0 {
        return Err(HandlerError::MalformedRequest);
    }
    while buf.last() == Some(&b'\n') || buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(buf)
}

/// Reads and discards headers until a blank line (or EOF, tolerated as the
/// end of a header-less request).
fn consume_headers(reader: &mut impl BufRead) -> Result<(), HandlerError> {
    loop {
        let mut buf = Vec::new();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(());
        }
        while buf.last() == Some(&b'\n') || buf.last() == Some(&b'\r') {
            buf.pop();
        }
        if buf.is_empty() {
            return Ok(());
        }
    }
}

fn parse_request_line(line: &[u8]) -> Result<RequestLine, HandlerError> {
    let (method, method_len) = Method::from_bytes(line)?;
    let rest = &line[method_len..];

    let target_end = memchr(b' ', rest).ok_or(HandlerError::MalformedRequest)?;
    let target = &rest[..target_end];

    let version_bytes = &rest[target_end + 1..];
    let version = Version::from_bytes(version_bytes)?;

    let (path, query) = match memchr(b'?', target) {
        Some(idx) => (target[..idx].to_vec(), Some(target[idx + 1..].to_vec())),
        None => (target.to_vec(), None),
    };

    Ok(RequestLine {
        method,
        path,
        query,
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn parses_simple_get() {
        let raw = b"GET /home.html HTTP/1.0\r\nHost: x\r\n\r\n";
        let mut reader = BufReader::new(&raw[..]);
        let req = parse(&mut reader).unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, b"/home.html");
        assert!(req.query.is_none());
        assert_eq!(req.version, Version::Http10);
    }

    #[test]
    fn splits_query_string() {
        let raw = b"GET /output.cgi?value=1&sleep=1 HTTP/1.0\r\n\r\n";
        let mut reader = BufReader::new(&raw[..]);
        let req = parse(&mut reader).unwrap();
        assert_eq!(req.path, b"/output.cgi");
        assert_eq!(req.query.unwrap(), b"value=1&sleep=1");
    }

    #[test]
    fn tolerates_bare_lf() {
        let raw = b"GET / HTTP/1.0\n\n";
        let mut reader = BufReader::new(&raw[..]);
        let req = parse(&mut reader).unwrap();
        assert_eq!(req.path, b"/");
    }

    #[test]
    fn post_has_no_query_requirement() {
        let raw = b"POST /anything HTTP/1.0\r\n\r\n";
        let mut reader = BufReader::new(&raw[..]);
        let req = parse(&mut reader).unwrap();
        assert_eq!(req.method, Method::Post);
    }

    #[test]
    fn rejects_unknown_method() {
        let raw = b"HELLO /x HTTP/1.0\r\n\r\n";
        let mut reader = BufReader::new(&raw[..]);
        assert!(parse(&mut reader).is_err());
    }

    #[test]
    fn rejects_missing_version() {
        let raw = b"GET /x\r\n\r\n";
        let mut reader = BufReader::new(&raw[..]);
        assert!(parse(&mut reader).is_err());
    }

    #[test]
    fn empty_connection_is_malformed() {
        let raw = b"";
        let mut reader = BufReader::new(&raw[..]);
        assert!(parse(&mut reader).is_err());
    }
}

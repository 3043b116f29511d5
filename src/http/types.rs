//! Core HTTP protocol types used by the request/response path.

use crate::errors::HandlerError;

/// HTTP request methods recognized by the server.
///
/// Anything outside this set is rejected with [`HandlerError::UnknownMethod`]
/// before it ever reaches the handler's classification logic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET` — serve a static file or run a dynamic (CGI) handler.
    Get,
    /// `POST` — return the in-memory request log.
    Post,
}

impl Method {
    /// Parses the method token at the start of a request line.
    ///
    /// Returns the method and the byte length of the token (including the
    /// trailing space), so the caller can advance past it.
    pub(crate) fn from_bytes(src: &[u8]) -> Result<(Self, usize), HandlerError> {
        match src {
            [b'G', b'E', b'T', b' ', ..] => Ok((Method::Get, 4)),
            [b'P', b'O', b'S', b'T', b' ', ..] => Ok((Method::Post, 5)),
            _ => Err(HandlerError::UnknownMethod),
        }
    }
}

/// HTTP protocol version on the wire.
///
/// Only `HTTP/1.0` is served; `HTTP/1.1` request lines are accepted for
/// compatibility with clients that default to it, but the response is
/// always written as `HTTP/1.0` with `Connection: close` semantics (no
/// keep-alive, no chunked transfer — see the crate's Non-goals).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// `HTTP/1.0` — [RFC 1945](https://tools.ietf.org/html/rfc1945).
    Http10,
    /// `HTTP/1.1` request line, served as 1.0 (no keep-alive).
    Http11,
}

impl Version {
    pub(crate) fn from_bytes(src: &[u8]) -> Result<Self, HandlerError> {
        match src {
            b"HTTP/1.0" => Ok(Self::Http10),
            b"HTTP/1.1" => Ok(Self::Http11),
            _ => Err(HandlerError::UnknownMethod),
        }
    }
}

macro_rules! status_codes {
    ($($name:ident = ($num:expr, $reason:expr);)+) => {
        /// HTTP status codes this server is able to emit.
        ///
        /// Deliberately narrow: the spec this server implements only ever
        /// produces these three (see `Status codes used` in the external
        /// interface section).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum StatusCode {
            $(#[doc = concat!($num, " ", $reason)] $name,)+
        }

        impl StatusCode {
            /// Renders the status line, e.g. `b"HTTP/1.0 200 OK\r\n"`.
            pub(crate) fn status_line(self) -> &'static [u8] {
                match self {
                    $(Self::$name => concat!("HTTP/1.0 ", $num, " ", $reason, "\r\n").as_bytes(),)+
                }
            }

            /// The numeric code, for log lines and tests.
            pub fn as_u16(self) -> u16 {
                match self {
                    $(Self::$name => $num,)+
                }
            }
        }
    };
}

status_codes! {
    Ok = (200, "OK");
    NotFound = (404, "Not Found");
    NotImplemented = (501, "Not Implemented");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get_and_post() {
        assert_eq!(Method::from_bytes(b"GET /x HTTP/1.0").unwrap(), (Method::Get, 4));
        assert_eq!(Method::from_bytes(b"POST / HTTP/1.0").unwrap(), (Method::Post, 5));
    }

    #[test]
    fn rejects_unknown_method() {
        assert!(Method::from_bytes(b"HELLO /x HTTP/1.0").is_err());
    }

    #[test]
    fn status_line_has_no_double_crlf() {
        let line = StatusCode::NotFound.status_line();
        assert_eq!(line, b"HTTP/1.0 404 Not Found\r\n");
    }
}

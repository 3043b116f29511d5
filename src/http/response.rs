//! Response serialization: status line, content headers, the statistics
//! block, and the body — in that order, for every response this server
//! emits (§4.4: the stats block is attached to error responses too, which
//! is how the 404/501 test scenarios observe `Stat-Thread-Count`).

use std::io::{self, Write};

use crate::http::types::StatusCode;

/// Writes one complete HTTP/1.0 response.
///
/// `stats_block` is the exact, already-rendered `Stat-*` header bytes
/// (see [`crate::stats::StatsRecord::header_block`]) including its
/// trailing blank line — the same bytes that get appended to the request
/// log for 2xx responses.
pub fn write(
    writer: &mut impl Write,
    status: StatusCode,
    content_type: &str,
    body: &[u8],
    stats_block: &[u8],
) -> io::Result<()> {
    writer.write_all(status.status_line())?;
    write!(writer, "Content-Type: {content_type}\r\n")?;
    write!(writer, "Content-Length: {}\r\n", body.len())?;
    writer.write_all(stats_block)?;
    writer.write_all(body)?;
    writer.flush()
}

/// Short, human-readable HTML body for an error response.
pub fn error_body(status: StatusCode) -> Vec<u8> {
    let (title, detail) = match status {
        StatusCode::NotFound => (
            "404 Not Found",
            "The requested path does not resolve to a readable file.",
        ),
        StatusCode::NotImplemented => (
            "501 Not Implemented",
            "The request method is not supported by this server.",
        ),
        StatusCode::Ok => unreachable!("error_body is only called for error statuses"),
    };
    format!("<html><head><title>{title}</title></head><body><h1>{title}</h1><p>{detail}</p></body></html>")
        .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_headers_then_stats_then_body() {
        let mut out = Vec::new();
        write(&mut out, StatusCode::Ok, "text/plain", b"hi", b"Stat-Thread-Id:: 0\r\n\r\n").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Content-Length: 2\r\n"));
        assert!(text.contains("Stat-Thread-Id:: 0\r\n\r\n"));
        assert!(text.ends_with("hi"));
    }

    #[test]
    fn error_bodies_mention_the_status() {
        assert!(String::from_utf8(error_body(StatusCode::NotFound))
            .unwrap()
            .contains("404"));
        assert!(String::from_utf8(error_body(StatusCode::NotImplemented))
            .unwrap()
            .contains("501"));
    }
}

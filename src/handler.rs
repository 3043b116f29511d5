//! The request handler: classifies a parsed request, resolves it against
//! the document root, and assembles the response bytes a worker writes
//! back to the socket.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cgi;
use crate::clock::Arrival;
use crate::errors::HandlerError;
use crate::http::request::RequestLine;
use crate::http::types::{Method, StatusCode};
use crate::http::response;
use crate::log::RequestLog;
use crate::mime;
use crate::stats::{Kind, WorkerCounters};

/// Resolves requests against a single fixed document root (the server's
/// working directory at startup — see the design's note on matching the
/// reference harness's launch convention).
pub struct Handler {
    doc_root: PathBuf,
}

impl Handler {
    pub fn new(doc_root: PathBuf) -> Self {
        Self { doc_root }
    }

    /// Classifies and serves one request, bumping `counters` on success and
    /// appending to `log` for non-`POST` 2xx responses. Returns the full
    /// byte buffer of the response (status line through body) ready to
    /// write to the connection.
    ///
    /// `parsed` carries the outcome of parsing the request line/headers;
    /// a parse failure short-circuits straight to its mapped error status
    /// without ever reaching classification. `dispatch` is the queue-wait
    /// duration, captured by the caller immediately after dequeuing the
    /// connection — not recomputed here, since by the time this method
    /// runs the handler (and, for a dynamic request, the CGI child) may
    /// already have taken an arbitrary amount of time.
    pub fn dispatch(
        &self,
        parsed: Result<RequestLine, HandlerError>,
        counters: &mut WorkerCounters,
        log: &RequestLog,
        arrival: Arrival,
        dispatch: Duration,
    ) -> Vec<u8> {
        counters.begin_request();

        let outcome = parsed.and_then(|req| self.serve(&req, log));

        // The kind counter is bumped here, before the snapshot below, so
        // that e.g. `Stat-Thread-Static` is inclusive of the current
        // request just like `Stat-Thread-Count` is.
        let (status, content_type, body, kind) = match outcome {
            Ok((content_type, body, kind)) => {
                counters.record_success(kind);
                (StatusCode::Ok, content_type, body, Some(kind))
            }
            Err(err) => (err.status(), "text/html".to_string(), response::error_body(err.status()), None),
        };

        let record = counters.snapshot(arrival, dispatch);
        let stats_block = record.header_block();

        let mut out = Vec::with_capacity(body.len() + 256);
        response::write(&mut out, status, &content_type, &body, &stats_block)
            .expect("writing to an in-memory Vec<u8> cannot fail");

        if let Some(kind) = kind {
            if kind != Kind::Post {
                log.append(&stats_block);
            }
        }

        out
    }

    /// Runs the classification rules for an already-parsed request.
    fn serve(&self, req: &RequestLine, log: &RequestLog) -> Result<(String, Vec<u8>, Kind), HandlerError> {
        match req.method {
            Method::Post => Ok(("text/plain".to_string(), log.snapshot(), Kind::Post)),
            Method::Get => self.serve_get(req),
        }
    }

    fn serve_get(&self, req: &RequestLine) -> Result<(String, Vec<u8>, Kind), HandlerError> {
        let path = resolve_path(&self.doc_root, &req.path)?;

        let metadata = fs::metadata(&path).map_err(|_| HandlerError::NotFound)?;
        if !metadata.is_file() {
            return Err(HandlerError::NotFound);
        }

        if is_executable(&metadata) {
            let output = cgi::run(&path, req.method, req.query.as_deref())?;
            let content_type = output.content_type.unwrap_or_else(|| "text/html".to_string());
            Ok((content_type, output.body, Kind::Dynamic))
        } else {
            let body = fs::read(&path).map_err(|_| HandlerError::NotFound)?;
            let content_type = mime::for_path(&path).to_string();
            Ok((content_type, body, Kind::Static))
        }
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    metadata.permissions().mode() & 0o111 != 0
}

/// Resolves a request path against `doc_root`, rejecting any `..` segment
/// before the filesystem is ever touched (directory-traversal guard).
fn resolve_path(doc_root: &Path, raw: &[u8]) -> Result<PathBuf, HandlerError> {
    let raw = simdutf8::compat::from_utf8(raw).map_err(|_| HandlerError::NotFound)?;

    let mut resolved = doc_root.to_path_buf();
    for segment in raw.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            return Err(HandlerError::NotFound);
        }
        resolved.push(segment);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_rejects_parent_segments() {
        let root = Path::new("/srv/www");
        assert!(resolve_path(root, b"/../etc/passwd").is_err());
        assert!(resolve_path(root, b"/a/../../etc/passwd").is_err());
    }

    #[test]
    fn resolve_joins_simple_paths() {
        let root = Path::new("/srv/www");
        assert_eq!(resolve_path(root, b"/home.html").unwrap(), root.join("home.html"));
        assert_eq!(resolve_path(root, b"/").unwrap(), root.to_path_buf());
    }

    #[test]
    fn unknown_path_yields_404() {
        let handler = Handler::new(PathBuf::from("/nonexistent/doc/root/for/tests"));
        let req = RequestLine {
            method: Method::Get,
            path: b"/nope.html".to_vec(),
            query: None,
            version: crate::http::types::Version::Http10,
        };
        assert!(matches!(handler.serve_get(&req), Err(HandlerError::NotFound)));
    }
}

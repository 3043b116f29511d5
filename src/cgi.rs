//! CGI invocation: spawn the dynamic handler, capture stdout, reap the child.

use std::path::Path;
use std::process::Command;

use memchr::memmem;

use crate::errors::HandlerError;
use crate::http::types::Method;

/// The captured output of one CGI invocation.
pub struct CgiOutput {
    /// `Content-Type` the script itself emitted, if any.
    pub content_type: Option<String>,
    /// The response body: everything after the script's own header block,
    /// or the entirety of stdout if it emitted no headers at all.
    pub body: Vec<u8>,
}

/// Runs `path` as a CGI script and captures its output.
///
/// Sets the minimal CGI/1.1 environment a script like the reference
/// harness's `output.cgi` expects (`REQUEST_METHOD`, `QUERY_STRING`), waits
/// for the child to exit (so it is always reaped — no zombies), and treats
/// a spawn/exec failure as [`HandlerError::CgiExecFailed`]. A non-zero exit
/// of a successfully-execed child is not an error at this layer: whatever
/// bytes it wrote to stdout become the body.
pub fn run(path: &Path, method: Method, query: Option<&[u8]>) -> Result<CgiOutput, HandlerError> {
    let method_str = match method {
        Method::Get => "GET",
        Method::Post => "POST",
    };
    let query_str = query.map(String::from_utf8_lossy).unwrap_or_default();

    let output = Command::new(path)
        .env("REQUEST_METHOD", method_str)
        .env("QUERY_STRING", query_str.as_ref())
        .output()
        .map_err(HandlerError::CgiExecFailed)?;

    Ok(split_cgi_output(output.stdout))
}

/// Splits a CGI script's stdout into an optional self-declared
/// `Content-Type` and the body that follows the blank line separating the
/// script's own headers from its body. Scripts that emit no header block
/// at all (the common case for this server's test fixtures) get their
/// entire stdout treated as the body.
fn split_cgi_output(stdout: Vec<u8>) -> CgiOutput {
    let Some(blank_line) = memmem::find(&stdout, b"\r\n\r\n").or_else(|| memmem::find(&stdout, b"\n\n"))
    else {
        return CgiOutput {
            content_type: None,
            body: stdout,
        };
    };

    let (header_block, rest) = stdout.split_at(blank_line);
    let separator_len = if rest.starts_with(b"\r\n\r\n") { 4 } else { 2 };
    let body = rest[separator_len..].to_vec();

    let content_type = String::from_utf8_lossy(header_block)
        .lines()
        .find_map(|line| line.strip_prefix("Content-Type:").map(|v| v.trim().to_string()));

    match content_type {
        Some(ct) => CgiOutput {
            content_type: Some(ct),
            body,
        },
        None => CgiOutput {
            content_type: None,
            body: stdout,
        },
    }
}

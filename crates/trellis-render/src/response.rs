//! The response sink the dispatchers write into.
//!
//! [`ResponseWriter`] is the seam between this crate and whatever HTTP stack
//! hosts the handlers. An implementation records headers, emits the status
//! line once, and accepts body bytes through [`std::io::Write`].
//!
//! [`ResponseRecorder`] is an in-memory implementation for tests and for
//! adapters that need the full response before handing it to a framework.

use std::io::{self, Write};

/// Name of the content type header.
pub const CONTENT_TYPE: &str = "Content-Type";

/// MIME type for markup responses.
pub const CONTENT_HTML: &str = "text/html";

/// MIME type for JSON responses.
pub const CONTENT_JSON: &str = "application/json";

/// MIME type for XML responses.
pub const CONTENT_XML: &str = "application/xml";

/// MIME type for YAML responses.
pub const CONTENT_YAML: &str = "application/yaml";

/// MIME type for plain text responses.
pub const CONTENT_TEXT: &str = "text/plain";

/// Builds a `Content-Type` value such as `text/html; charset=UTF-8`.
pub fn content_type(mime: &str, charset: &str) -> String {
    format!("{}; charset={}", mime, charset)
}

/// An HTTP response under construction.
///
/// Headers must be set before [`write_status`](Self::write_status); body
/// bytes go through the [`Write`] supertrait afterwards.
pub trait ResponseWriter: Write {
    /// Sets a header, replacing any previous value with the same name.
    fn set_header(&mut self, name: &str, value: &str);

    /// Writes the status line.
    fn write_status(&mut self, status: u16);
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn set_header(&mut self, name: &str, value: &str) {
        (**self).set_header(name, value)
    }

    fn write_status(&mut self, status: u16) {
        (**self).write_status(status)
    }
}

/// Records everything written to it.
///
/// The status defaults to `200` until [`write_status`](ResponseWriter::write_status)
/// is called, matching a server that sends `200 OK` for a response whose
/// handler only wrote a body. Header lookups ignore ASCII case.
#[derive(Debug, Clone)]
pub struct ResponseRecorder {
    status: u16,
    status_written: bool,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Default for ResponseRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self {
            status: 200,
            status_written: false,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether a status line was explicitly written.
    pub fn status_written(&self) -> bool {
        self.status_written
    }

    /// Returns the value of the header `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body decoded as UTF-8, with invalid sequences replaced.
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// True when neither headers, status nor body have been written.
    pub fn is_untouched(&self) -> bool {
        !self.status_written && self.headers.is_empty() && self.body.is_empty()
    }
}

impl ResponseWriter for ResponseRecorder {
    fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    fn write_status(&mut self, status: u16) {
        // Only the first status line reaches the client.
        if !self.status_written {
            self.status = status;
            self.status_written = true;
        }
    }
}

impl Write for ResponseRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type() {
        assert_eq!(
            content_type(CONTENT_HTML, "UTF-8"),
            "text/html; charset=UTF-8"
        );
    }

    #[test]
    fn test_recorder_defaults() {
        let rec = ResponseRecorder::new();
        assert_eq!(rec.status(), 200);
        assert!(!rec.status_written());
        assert!(rec.is_untouched());
    }

    #[test]
    fn test_recorder_header_case_insensitive() {
        let mut rec = ResponseRecorder::new();
        rec.set_header("Content-Type", "text/plain");
        rec.set_header("content-type", "text/html");

        assert_eq!(rec.headers().len(), 1);
        assert_eq!(rec.header("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(rec.header("X-Missing"), None);
    }

    #[test]
    fn test_recorder_first_status_wins() {
        let mut rec = ResponseRecorder::new();
        rec.write_status(404);
        rec.write_status(500);
        assert_eq!(rec.status(), 404);
    }

    #[test]
    fn test_recorder_body() {
        let mut rec = ResponseRecorder::new();
        rec.write_all(b"Hello ").unwrap();
        rec.write_all(b"world!").unwrap();
        assert_eq!(rec.body(), b"Hello world!");
        assert_eq!(rec.body_string(), "Hello world!");
        assert!(!rec.is_untouched());
    }

    #[test]
    fn test_writer_through_mut_ref() {
        fn respond<W: ResponseWriter>(mut w: W) {
            w.set_header(CONTENT_TYPE, CONTENT_TEXT);
            w.write_status(201);
        }

        let mut rec = ResponseRecorder::new();
        respond(&mut rec);
        assert_eq!(rec.status(), 201);
        assert_eq!(rec.header(CONTENT_TYPE), Some("text/plain"));
    }
}

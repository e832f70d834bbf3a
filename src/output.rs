//! Output sinks for the serialized document.
//!
//! A sink accepts the final text and delivers it to its destination. Any
//! delivery failure is fatal for the run: the caller reports the diagnostic
//! and exits non-zero.

use crate::error::{Error, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for the serialized document text.
pub trait OutputSink {
    fn deliver(&self, text: &str) -> Result<()>;
}

/// Writes the document to standard output.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn deliver(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}

/// Writes the document to a file, creating parent directories as needed.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl OutputSink for FileSink {
    fn deliver(&self, text: &str) -> Result<()> {
        debug!("Writing document to file: {}", self.path.display());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, text)?;

        info!(
            "Wrote {} bytes to {}",
            text.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Delivers the document to a remote endpoint with an HTTP PUT, form-encoded
/// as `swagger=<urlencoded text>` with optional custom headers.
#[derive(Debug)]
pub struct HttpSink {
    url: String,
    headers: Vec<(String, String)>,
}

impl HttpSink {
    /// Builds a sink from a URL and raw `name=value` header strings.
    ///
    /// # Errors
    ///
    /// A header without exactly one `=` separator is rejected.
    pub fn new(url: String, raw_headers: &[String]) -> Result<Self> {
        let mut headers = Vec::new();
        for raw in raw_headers {
            let (name, value) = raw.split_once('=').ok_or_else(|| {
                Error::OutputError(format!(
                    "invalid header '{}': expected name=value",
                    raw
                ))
            })?;
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
        Ok(Self { url, headers })
    }
}

impl OutputSink for HttpSink {
    fn deliver(&self, text: &str) -> Result<()> {
        info!("Delivering document to {}", self.url);

        let mut request = ureq::put(&self.url)
            .set("Content-Type", "application/x-www-form-urlencoded")
            .set("Accept", "application/json");
        for (name, value) in &self.headers {
            request = request.set(name, value);
        }

        let payload = format!("swagger={}", form_urlencode(text));
        let response = request
            .send_string(&payload)
            .map_err(|e| Error::OutputError(format!("PUT {} failed: {}", self.url, e)))?;

        debug!("Endpoint answered HTTP {}", response.status());
        Ok(())
    }
}

/// Percent-encodes a string for use as a form value.
fn form_urlencode(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Writes string content to a file path directly.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    FileSink::new(path.to_path_buf()).deliver(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_sink_writes_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("swagger.json");

        FileSink::new(file_path.clone()).deliver("{}").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{}");
    }

    #[test]
    fn test_file_sink_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("docs").join("api").join("swagger.json");

        FileSink::new(file_path.clone()).deliver("{}").unwrap();

        assert!(file_path.exists());
    }

    #[test]
    fn test_file_sink_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("swagger.json");

        write_to_file("old", &file_path).unwrap();
        write_to_file("new", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
    }

    #[test]
    fn test_http_sink_rejects_malformed_header() {
        let err = HttpSink::new(
            "http://localhost/api".to_string(),
            &["not-a-header".to_string()],
        )
        .unwrap_err();

        assert!(err.to_string().contains("not-a-header"));
    }

    #[test]
    fn test_http_sink_parses_headers() {
        let sink = HttpSink::new(
            "http://localhost/api".to_string(),
            &["X-Token = abc".to_string(), "X-Env=prod".to_string()],
        )
        .unwrap();

        assert_eq!(
            sink.headers,
            vec![
                ("X-Token".to_string(), "abc".to_string()),
                ("X-Env".to_string(), "prod".to_string())
            ]
        );
    }

    #[test]
    fn test_form_urlencode() {
        assert_eq!(form_urlencode("abc-123"), "abc-123");
        assert_eq!(form_urlencode("a b"), "a+b");
        assert_eq!(form_urlencode("{\"a\":1}"), "%7B%22a%22%3A1%7D");
    }
}

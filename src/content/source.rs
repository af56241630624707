//! Where post files come from

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a post file could not be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{name} returned status {status}")]
    Status { name: String, status: u16 },
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("request for {name} failed: {source}")]
    Http {
        name: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Fetch the raw text of a post file by its logical name
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<String, FetchError>;
}

/// Reads post files from a local directory
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PostSource for DirSource {
    async fn fetch(&self, name: &str) -> Result<String, FetchError> {
        let path = self.root.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(name.to_string()))
            }
            Err(source) => Err(FetchError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}

/// Fetches post files over HTTP relative to a base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Full URL for a post file
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_start_matches('/'))
    }
}

#[async_trait]
impl PostSource for HttpSource {
    async fn fetch(&self, name: &str) -> Result<String, FetchError> {
        let http_err = |source| FetchError::Http {
            name: name.to_string(),
            source,
        };

        let response = self
            .client
            .get(self.url_for(name))
            .send()
            .await
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(http_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_dir_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.md"), "---\ntitle: Hi\n---\nBody").unwrap();

        let source = DirSource::new(dir.path());
        let text = source.fetch("hello.md").await.unwrap();
        assert!(text.contains("title: Hi"));
    }

    #[tokio::test]
    async fn test_dir_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path());
        let err = source.fetch("nope.md").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(ref name) if name == "nope.md"));
    }

    #[test]
    fn test_http_url_for() {
        let source = HttpSource::new("https://example.com/posts/");
        assert_eq!(
            source.url_for("testing.md"),
            "https://example.com/posts/testing.md"
        );
    }
}

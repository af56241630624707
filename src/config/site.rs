//! Blog configuration (_blog.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::excerpt::DEFAULT_EXCERPT_LENGTH;

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub language: String,

    // Posts
    pub posts_dir: String,
    /// Fetch posts from this base URL instead of `posts_dir`
    pub posts_url: Option<String>,
    /// Post files to load, in order. Empty means every `.md` in `posts_dir`.
    pub files: Vec<String>,
    pub excerpt_length: usize,

    // Display
    pub date_format: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Server
    #[serde(default)]
    pub server: ServerConfig,

    // Preferences
    pub prefs_file: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            subtitle: String::new(),
            language: "en".to_string(),

            posts_dir: "posts".to_string(),
            posts_url: None,
            files: Vec::new(),
            excerpt_length: DEFAULT_EXCERPT_LENGTH,

            date_format: "DD MMMM YYYY".to_string(),
            highlight: HighlightConfig::default(),

            server: ServerConfig::default(),

            prefs_file: ".blogdeck/prefs.json".to_string(),
            extra: HashMap::new(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: BlogConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
    pub public_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 4000,
            public_dir: "public".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.posts_dir, "posts");
        assert_eq!(config.excerpt_length, 150);
        assert!(config.files.is_empty());
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Kaca Blog
files:
  - tips-merawat-galon.md
  - testing.md
excerpt_length: 80
highlight:
  line_number: false
server:
  port: 8080
comments: disqus
"#;
        let config: BlogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Kaca Blog");
        assert_eq!(config.files, vec!["tips-merawat-galon.md", "testing.md"]);
        assert_eq!(config.excerpt_length, 80);
        assert!(!config.highlight.line_number);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "127.0.0.1");
        assert!(config.extra.contains_key("comments"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_blog.yml");
        fs::write(&path, "posts_url: https://example.com/posts\n").unwrap();
        let config = BlogConfig::load(&path).unwrap();
        assert_eq!(config.posts_url.as_deref(), Some("https://example.com/posts"));
    }
}

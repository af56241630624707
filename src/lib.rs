//! blogdeck: a markdown blog viewer
//!
//! Posts are markdown files with a small `key: value` front-matter block.
//! They are loaded into a [`store::PostStore`], searched with a plain
//! substring filter, and navigated with a hash router (`#/<post-id>`).
//! Terminal and HTTP front-ends sit on top of the same state machine.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod prefs;
pub mod router;
pub mod server;
pub mod store;
pub mod view;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::loader::discover_files;
use content::{DirSource, HttpSource, MarkdownRenderer, Post, PostLoader, PostSource};
use prefs::PreferenceFile;
use store::PostStore;

/// Config file looked up in the base directory
pub const CONFIG_FILE: &str = "_blog.yml";

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Blog configuration
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding post files
    pub posts_dir: PathBuf,
    /// Preference file
    pub prefs_path: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::BlogConfig::load(&config_path)?
        } else {
            config::BlogConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog instance with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::BlogConfig) -> Self {
        let posts_dir = base_dir.join(&config.posts_dir);
        let prefs_path = base_dir.join(&config.prefs_file);
        Self {
            config,
            base_dir,
            posts_dir,
            prefs_path,
        }
    }

    /// Where post files are fetched from
    pub fn source(&self) -> Box<dyn PostSource> {
        match &self.config.posts_url {
            Some(url) => Box::new(HttpSource::new(url)),
            None => Box::new(DirSource::new(&self.posts_dir)),
        }
    }

    /// The post files to load, in load order
    pub fn filenames(&self) -> Vec<String> {
        if !self.config.files.is_empty() {
            return self.config.files.clone();
        }
        if self.config.posts_url.is_some() {
            tracing::warn!("posts_url is set but no files are listed");
            return Vec::new();
        }
        discover_files(&self.posts_dir)
    }

    /// Load every post, newest first
    pub async fn load_posts(&self) -> Vec<Post> {
        let source = self.source();
        let filenames = self.filenames();
        PostLoader::new(source.as_ref())
            .with_excerpt_length(self.config.excerpt_length)
            .load(&filenames)
            .await
    }

    /// Load posts into a fresh store
    pub async fn load_store(&self) -> PostStore {
        PostStore::new(self.load_posts().await)
    }

    /// Markdown renderer configured for this blog
    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::with_options(
            &self.config.highlight.theme,
            self.config.highlight.line_number,
        )
    }

    /// Open the preference file
    pub fn preferences(&self) -> PreferenceFile {
        PreferenceFile::open(&self.prefs_path)
    }
}

//! Content loader - turns a list of post files into posts

use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

use super::excerpt::DEFAULT_EXCERPT_LENGTH;
use super::post::{derive_id, sort_by_date_desc};
use super::source::{FetchError, PostSource};
use super::{FrontMatter, Post};

lazy_static! {
    static ref DOCUMENT: Regex =
        Regex::new(r"(?s)\A-{3,}[ \t]*\r?\n(?:(.*?)\r?\n)??-{3,}[ \t]*(?:\r?\n(.*))?\z").unwrap();
}

/// Why a single post file was skipped
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no front-matter found in {0}")]
    MissingFrontMatter(String),
    #[error("post id `{id}` from {name} is already taken")]
    DuplicateId { id: String, name: String },
}

/// Split a post document into its front-matter block and markdown body.
///
/// The document must open with a line of three or more dashes and contain a
/// closing dash line; everything after that line is the body.
pub fn split_document(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let caps = DOCUMENT.captures(text)?;
    let front_matter = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str());
    Some((front_matter, body))
}

/// Loads posts from a [`PostSource`], one file at a time
pub struct PostLoader<'a, S: PostSource + ?Sized> {
    source: &'a S,
    excerpt_length: usize,
    today: NaiveDate,
}

impl<'a, S: PostSource + ?Sized> PostLoader<'a, S> {
    /// Create a loader that dates undated posts with the current local date
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            today: Local::now().date_naive(),
        }
    }

    pub fn with_excerpt_length(mut self, excerpt_length: usize) -> Self {
        self.excerpt_length = excerpt_length;
        self
    }

    /// Override the date given to posts without one
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Load every file in `filenames`, newest post first.
    ///
    /// Files that cannot be fetched or parsed are skipped with a warning, so
    /// the result may be empty but is never an error.
    pub async fn load<N: AsRef<str>>(&self, filenames: &[N]) -> Vec<Post> {
        let mut posts = Vec::with_capacity(filenames.len());
        let mut seen = HashSet::new();

        for name in filenames {
            let name = name.as_ref();
            match self.load_post(name, &seen).await {
                Ok(post) => {
                    tracing::debug!("Loaded {} as #/{}", name, post.id);
                    seen.insert(post.id.clone());
                    posts.push(post);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", name, e);
                }
            }
        }

        sort_by_date_desc(&mut posts);

        tracing::info!("Loaded {} of {} posts", posts.len(), filenames.len());
        posts
    }

    async fn load_post(&self, name: &str, seen: &HashSet<String>) -> Result<Post, LoadError> {
        let text = self.source.fetch(name).await?;
        let post = parse_post(&text, name, self.today, self.excerpt_length)?;
        if seen.contains(&post.id) {
            return Err(LoadError::DuplicateId {
                id: post.id,
                name: name.to_string(),
            });
        }
        Ok(post)
    }
}

/// Parse a single post document
pub fn parse_post(
    text: &str,
    filename: &str,
    today: NaiveDate,
    excerpt_length: usize,
) -> Result<Post, LoadError> {
    let normalized = text.replace("\r\n", "\n");
    let (front_matter, body) = split_document(&normalized)
        .ok_or_else(|| LoadError::MissingFrontMatter(filename.to_string()))?;

    Ok(Post::from_parts(
        derive_id(filename),
        FrontMatter::parse(front_matter),
        body,
        today,
        excerpt_length,
    ))
}

/// List markdown files directly inside `dir`, sorted by name
pub fn discover_files(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut names: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_markdown_file(e.path()))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();

    names.sort();
    names
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}

//! Post model

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::excerpt::generate_excerpt;
use super::FrontMatter;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// A blog post, built once at load time and never modified afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Stable identifier derived from the filename
    pub id: String,

    /// Post title
    pub title: String,

    /// Short plain-text summary
    pub excerpt: String,

    /// Publication date as written (ISO `YYYY-MM-DD` when defaulted)
    pub date: String,

    /// Post tags
    pub tags: Vec<String>,

    /// Post category
    pub category: String,

    /// Author name
    pub author: String,

    /// Markdown body, trimmed
    pub content: String,

    /// Every front-matter field, including ones the viewer does not use
    #[serde(skip_serializing_if = "FrontMatter::is_empty")]
    pub front_matter: FrontMatter,
}

impl Post {
    /// Build a post from parsed front-matter and the raw markdown body.
    ///
    /// Defaults:
    ///
    /// | field      | when absent or malformed       |
    /// |------------|--------------------------------|
    /// | `title`    | `"Untitled"`                   |
    /// | `excerpt`  | generated from the body        |
    /// | `date`     | `today`                        |
    /// | `tags`     | empty                          |
    /// | `category` | `"Uncategorized"`              |
    /// | `author`   | `"Anonymous"`                  |
    pub fn from_parts(
        id: String,
        front_matter: FrontMatter,
        body: &str,
        today: NaiveDate,
        excerpt_length: usize,
    ) -> Self {
        let text_or = |key: &str, default: &str| {
            front_matter
                .text(key)
                .map(str::to_string)
                .unwrap_or_else(|| default.to_string())
        };

        let title = text_or("title", DEFAULT_TITLE);
        let category = text_or("category", DEFAULT_CATEGORY);
        let author = text_or("author", DEFAULT_AUTHOR);
        let date = front_matter
            .text("date")
            .map(str::to_string)
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
        let excerpt = front_matter
            .text("excerpt")
            .map(str::to_string)
            .unwrap_or_else(|| generate_excerpt(body, excerpt_length));
        let tags = front_matter
            .list("tags")
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        Self {
            id,
            title,
            excerpt,
            date,
            tags,
            category,
            author,
            content: body.trim().to_string(),
            front_matter,
        }
    }

    /// The publication date as a timestamp, if it can be parsed
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_date_string(&self.date)
    }

    /// Location hash that addresses this post
    pub fn hash(&self) -> String {
        format!("#/{}", self.id)
    }
}

/// Derive a post id from its filename: drop the `.md` suffix, replace
/// anything outside `[a-zA-Z0-9]` with `-`, then lowercase.
pub fn derive_id(filename: &str) -> String {
    let stem = filename.strip_suffix(".md").unwrap_or(filename);
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Sort posts newest first. Equal or unparsable dates keep their relative
/// order; unparsable dates sort after every dated post.
pub fn sort_by_date_desc(posts: &mut [Post]) {
    posts.sort_by_cached_key(|post| std::cmp::Reverse(post.timestamp()));
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset, compared in UTC
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    fn post(id: &str, date: &str) -> Post {
        let fm = FrontMatter::parse(&format!("date: {}", date));
        Post::from_parts(id.to_string(), fm, "", today(), 150)
    }

    #[test]
    fn test_derive_id() {
        assert_eq!(derive_id("tips-merawat-galon.md"), "tips-merawat-galon");
        assert_eq!(derive_id("CSS Grid_vs.Flexbox.md"), "css-grid-vs-flexbox");
        assert_eq!(derive_id("notes.markdown"), "notes-markdown");
        assert_eq!(derive_id("café.md"), "caf-");
    }

    #[test]
    fn test_defaults_applied() {
        let post = Post::from_parts(
            "empty".to_string(),
            FrontMatter::default(),
            "\n  Body text.  \n",
            today(),
            150,
        );
        assert_eq!(post.title, DEFAULT_TITLE);
        assert_eq!(post.category, DEFAULT_CATEGORY);
        assert_eq!(post.author, DEFAULT_AUTHOR);
        assert_eq!(post.date, "2024-05-17");
        assert!(post.tags.is_empty());
        assert_eq!(post.excerpt, "Body text.");
        assert_eq!(post.content, "Body text.");
    }

    #[test]
    fn test_fields_from_front_matter() {
        let fm = FrontMatter::parse(
            "title: Belajar JS\nexcerpt: Ringkas\ndate: 2024-01-01\ntags: [js, web]\ncategory: Tech\nauthor: Sari",
        );
        let post = Post::from_parts("belajar".to_string(), fm, "Body", today(), 150);
        assert_eq!(post.title, "Belajar JS");
        assert_eq!(post.excerpt, "Ringkas");
        assert_eq!(post.date, "2024-01-01");
        assert_eq!(post.tags, vec!["js", "web"]);
        assert_eq!(post.category, "Tech");
        assert_eq!(post.author, "Sari");
    }

    #[test]
    fn test_scalar_tags_are_malformed() {
        let fm = FrontMatter::parse("tags: rust\ntitle: [not, a, title]");
        let post = Post::from_parts("x".to_string(), fm, "", today(), 150);
        assert!(post.tags.is_empty());
        assert_eq!(post.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut posts = vec![post("a", "2024-01-01"), post("b", "2024-02-01")];
        sort_by_date_desc(&mut posts);
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut posts = vec![
            post("first", "2024-03-01"),
            post("newer", "2024-04-01"),
            post("second", "2024-03-01"),
            post("third", "2024-03-01"),
        ];
        sort_by_date_desc(&mut posts);
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "first", "second", "third"]);
    }

    #[test]
    fn test_unparsable_dates_sort_last() {
        let mut posts = vec![post("bad", "someday"), post("good", "2020-01-01")];
        sort_by_date_desc(&mut posts);
        assert_eq!(posts[0].id, "good");
        assert_eq!(posts[1].id, "bad");
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date_string("2024-01-15").is_some());
        assert!(parse_date_string("2024/01/15 10:30:00").is_some());
        assert!(parse_date_string("2024-01-15T10:30:00+07:00").is_some());
        assert!(parse_date_string("January 2024").is_none());
    }

    #[test]
    fn test_hash() {
        assert_eq!(post("hello", "2024-01-01").hash(), "#/hello");
    }
}

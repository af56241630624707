//! List blog content

use anyhow::Result;
use std::collections::HashMap;
use std::io::Write;

use crate::store::PostStore;
use crate::view::{HomeView, ViewBuilder};
use crate::Blog;

/// List posts, tags or categories, optionally narrowed by a search query
pub async fn run(blog: &Blog, content_type: &str, query: Option<&str>) -> Result<()> {
    let mut store = blog.load_store().await;
    if let Some(query) = query {
        store.filter(query);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match content_type {
        "post" | "posts" => {
            let renderer = blog.renderer();
            let views = ViewBuilder::new(&renderer, &blog.config.date_format);
            print_home(&mut out, &views.home(&store))?;
        }
        "tag" | "tags" => {
            let tags = count_by(&store, |post| post.tags.clone());
            print_counts(&mut out, "Tags", &tags)?;
        }
        "category" | "categories" => {
            let categories = count_by(&store, |post| vec![post.category.clone()]);
            print_counts(&mut out, "Categories", &categories)?;
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category",
                content_type
            );
        }
    }

    Ok(())
}

/// Print the listing page
pub fn print_home<W: Write>(out: &mut W, home: &HomeView) -> Result<()> {
    if !home.query.is_empty() {
        writeln!(out, "Search: {}", home.query)?;
    }
    writeln!(out, "Posts ({}):", home.post_count)?;

    if home.no_results {
        writeln!(out, "  No posts found.")?;
        return Ok(());
    }

    for card in &home.cards {
        writeln!(out, "  {} - {} [{}]", card.date, card.title, card.href)?;
        if !card.tags.is_empty() {
            writeln!(out, "      tags: {}", card.tags.join(", "))?;
        }
        writeln!(out, "      by {} in {}", card.author, card.category)?;
        if !card.excerpt.is_empty() {
            writeln!(out, "      {}", card.excerpt.replace('\n', " "))?;
        }
    }
    Ok(())
}

/// Count matching posts per key, most used first, ties by name
fn count_by<F>(store: &PostStore, keys: F) -> Vec<(String, usize)>
where
    F: Fn(&crate::content::Post) -> Vec<String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for post in store.filtered() {
        for key in keys(post) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn print_counts<W: Write>(out: &mut W, label: &str, counts: &[(String, usize)]) -> Result<()> {
    writeln!(out, "{} ({}):", label, counts.len())?;
    for (name, count) in counts {
        writeln!(out, "  {} ({})", name, count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FrontMatter, MarkdownRenderer, Post};
    use chrono::NaiveDate;

    fn store() -> PostStore {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let make = |id: &str, fm: &str| {
            Post::from_parts(id.to_string(), FrontMatter::parse(fm), "Body.", today, 150)
        };
        PostStore::new(vec![
            make("a", "title: A\ntags: [web, css]\ncategory: Programming"),
            make("b", "title: B\ntags: [web]\ncategory: Programming"),
            make("c", "title: C\ncategory: Lifestyle"),
        ])
    }

    #[test]
    fn test_count_tags() {
        let counts = count_by(&store(), |p| p.tags.clone());
        assert_eq!(
            counts,
            vec![("web".to_string(), 2), ("css".to_string(), 1)]
        );
    }

    #[test]
    fn test_count_respects_filter() {
        let mut store = store();
        store.filter("lifestyle");
        let counts = count_by(&store, |p| vec![p.category.clone()]);
        assert_eq!(counts, vec![("Lifestyle".to_string(), 1)]);
    }

    #[test]
    fn test_print_home() {
        let renderer = MarkdownRenderer::new();
        let views = ViewBuilder::new(&renderer, "YYYY-MM-DD");
        let mut out = Vec::new();
        print_home(&mut out, &views.home(&store())).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Posts (3):"));
        assert!(text.contains("2024-01-01 - A [#/a]"));
        assert!(text.contains("tags: web, css"));
    }

    #[test]
    fn test_print_home_empty() {
        let renderer = MarkdownRenderer::new();
        let views = ViewBuilder::new(&renderer, "YYYY-MM-DD");
        let mut out = Vec::new();
        print_home(&mut out, &views.home(&PostStore::default())).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No posts found."));
    }
}

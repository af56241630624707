//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::derive_id;
use crate::Blog;

/// Front-matter fields for a new post
#[derive(Debug, Default, Clone)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub category: Option<&'a str>,
    pub author: Option<&'a str>,
    pub tags: &'a [String],
}

/// Write a new post file into the posts directory and return its path.
///
/// Values that the front-matter format cannot carry are refused: a bracketed
/// scalar would read back as a list, and a tag holding `,` would split.
pub fn create_post(blog: &Blog, post: &NewPost<'_>) -> Result<PathBuf> {
    check_fields(post)?;

    let slug = slug::slugify(post.title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", post.title);
    }

    fs::create_dir_all(&blog.posts_dir)?;

    let filename = format!("{}.md", slug);
    let file_path = blog.posts_dir.join(&filename);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, scaffold(post, chrono::Local::now().date_naive()))?;
    tracing::info!("Created {:?} (#/{})", file_path, derive_id(&filename));

    if !blog.config.files.is_empty() {
        println!(
            "Add {} to `files` in {} to load it.",
            filename,
            crate::CONFIG_FILE
        );
    }

    Ok(file_path)
}

fn check_fields(post: &NewPost<'_>) -> Result<()> {
    let scalars = [
        ("title", Some(post.title)),
        ("category", post.category),
        ("author", post.author),
    ];
    for (field, value) in scalars {
        let Some(value) = value else { continue };
        let value = value.trim();
        if value.contains('\n') || (value.starts_with('[') && value.ends_with(']')) {
            anyhow::bail!("{} {:?} cannot be stored in front-matter", field, value);
        }
    }

    if let Some(tag) = post
        .tags
        .iter()
        .find(|tag| tag.contains([',', '[', ']', '\n']))
    {
        anyhow::bail!("tag {:?} cannot contain `,`, `[`, `]` or a newline", tag);
    }

    Ok(())
}

fn scaffold(post: &NewPost<'_>, today: chrono::NaiveDate) -> String {
    let mut content = String::from("---\n");
    content.push_str(&format!("title: {}\n", post.title));
    content.push_str(&format!("date: {}\n", today.format("%Y-%m-%d")));
    content.push_str(&format!("tags: [{}]\n", post.tags.join(", ")));
    if let Some(category) = post.category {
        content.push_str(&format!("category: {}\n", category));
    }
    if let Some(author) = post.author {
        content.push_str(&format!("author: {}\n", author));
    }
    content.push_str("---\n\n");
    content
}

/// Run the new command
pub fn run(blog: &Blog, post: &NewPost<'_>) -> Result<()> {
    let path = create_post(blog, post)?;
    println!("Created: {:?}", path);
    Ok(())
}

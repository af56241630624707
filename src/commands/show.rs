//! Show a single post

use anyhow::Result;
use std::io::Write;

use crate::content::Post;
use crate::router::{NavEvent, Route, Router};
use crate::view::{ArticleView, ViewBuilder};
use crate::Blog;

/// Print a post's metadata and body. `target` is a post id or a `#/<id>` hash.
pub async fn run(blog: &Blog, target: &str, raw: bool) -> Result<()> {
    let store = blog.load_store().await;

    let hash = if target.starts_with('#') {
        target.to_string()
    } else {
        format!("#/{}", target)
    };

    let mut router = Router::new();
    router.handle(NavEvent::HashChanged(hash), &store);

    let post = match router.route() {
        Route::PostDetail(id) => store.get(id),
        Route::Home => None,
    };
    let Some(post) = post else {
        anyhow::bail!("No post found for {:?}", target);
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if raw {
        print_raw(&mut out, post)?;
    } else {
        let renderer = blog.renderer();
        let views = ViewBuilder::new(&renderer, &blog.config.date_format);
        print_article(&mut out, &views.article(post))?;
    }

    Ok(())
}

/// Print article metadata followed by its rendered HTML
pub fn print_article<W: Write>(out: &mut W, article: &ArticleView) -> Result<()> {
    writeln!(out, "{}", article.title)?;
    writeln!(
        out,
        "{} | {} | {}",
        article.date, article.author, article.category
    )?;
    if !article.tags.is_empty() {
        writeln!(out, "tags: {}", article.tags.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", article.html.trim_end())?;
    Ok(())
}

/// Print the post as markdown with its front-matter fields
pub fn print_raw<W: Write>(out: &mut W, post: &Post) -> Result<()> {
    writeln!(out, "{}", post.title)?;
    writeln!(out, "{} | {} | {}", post.date, post.author, post.category)?;
    if !post.tags.is_empty() {
        writeln!(out, "tags: {}", post.tags.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", post.content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FrontMatter, MarkdownRenderer};
    use chrono::NaiveDate;

    fn post() -> Post {
        Post::from_parts(
            "grid".to_string(),
            FrontMatter::parse("title: Grid\ndate: 2024-03-02\nauthor: Budi\ntags: [css]"),
            "Use **grid**.",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            150,
        )
    }

    #[test]
    fn test_print_article() {
        let renderer = MarkdownRenderer::new();
        let views = ViewBuilder::new(&renderer, "YYYY-MM-DD");
        let mut out = Vec::new();
        print_article(&mut out, &views.article(&post())).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Grid\n2024-03-02 | Budi | Uncategorized\ntags: css\n"));
        assert!(text.contains("<strong>grid</strong>"));
    }

    #[test]
    fn test_print_raw() {
        let mut out = Vec::new();
        print_raw(&mut out, &post()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("Use **grid**.\n"));
    }
}

//! View models: what an adapter needs to draw the current state

use serde::Serialize;

use crate::content::{MarkdownRenderer, Post};
use crate::helpers::display_date;
use crate::router::Route;
use crate::store::{filter_posts, normalize_query, PostStore};

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCard {
    pub id: String,
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// The listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeView {
    pub query: String,
    pub post_count: usize,
    pub no_results: bool,
    pub cards: Vec<PostCard>,
}

/// A single post with its rendered body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleView {
    pub id: String,
    pub title: String,
    pub date: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Page {
    Home(HomeView),
    Post(ArticleView),
}

/// Everything needed to draw one screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub dark_mode: bool,
    #[serde(flatten)]
    pub page: Page,
}

/// Projects store and route state into view models
pub struct ViewBuilder<'a> {
    renderer: &'a MarkdownRenderer,
    date_format: &'a str,
}

impl<'a> ViewBuilder<'a> {
    pub fn new(renderer: &'a MarkdownRenderer, date_format: &'a str) -> Self {
        Self {
            renderer,
            date_format,
        }
    }

    /// The page for `route`. Home lists the posts matching `query`; a post
    /// route whose post is gone shows the listing too.
    pub fn page(&self, store: &PostStore, route: &Route, query: &str) -> Page {
        match route {
            Route::PostDetail(id) => match store.get(id) {
                Some(post) => Page::Post(self.article(post)),
                None => Page::Home(self.listing(filter_posts(store.posts(), query), query)),
            },
            Route::Home => Page::Home(self.listing(filter_posts(store.posts(), query), query)),
        }
    }

    /// The listing for the store's current query
    pub fn home(&self, store: &PostStore) -> HomeView {
        self.listing(store.filtered(), store.query())
    }

    /// A listing of already-filtered posts
    pub fn listing<'p, I>(&self, posts: I, query: &str) -> HomeView
    where
        I: IntoIterator<Item = &'p Post>,
    {
        let cards: Vec<PostCard> = posts.into_iter().map(|p| self.card(p)).collect();
        HomeView {
            query: normalize_query(query),
            post_count: cards.len(),
            no_results: cards.is_empty(),
            cards,
        }
    }

    pub fn card(&self, post: &Post) -> PostCard {
        PostCard {
            id: post.id.clone(),
            href: post.hash(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            date: display_date(&post.date, self.date_format),
            author: post.author.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
        }
    }

    /// Render a post. This is the only place markdown is converted to HTML.
    pub fn article(&self, post: &Post) -> ArticleView {
        ArticleView {
            id: post.id.clone(),
            title: post.title.clone(),
            date: display_date(&post.date, self.date_format),
            author: post.author.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
            html: self.renderer.render(&post.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;
    use chrono::NaiveDate;

    fn store() -> PostStore {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let make = |id: &str, fm: &str, body: &str| {
            Post::from_parts(id.to_string(), FrontMatter::parse(fm), body, today, 150)
        };
        PostStore::new(vec![
            make("grid", "title: Grid\ndate: 2024-02-01\ntags: [css]", "**Grid** layout."),
            make("galon", "title: Galon\ndate: someday", "Cuci galon."),
        ])
    }

    #[test]
    fn test_home_view() {
        let renderer = MarkdownRenderer::new();
        let builder = ViewBuilder::new(&renderer, "YYYY-MM-DD");
        let Page::Home(home) = builder.page(&store(), &Route::Home, "") else {
            panic!("expected home page");
        };
        assert_eq!(home.post_count, 2);
        assert!(!home.no_results);
        assert_eq!(home.cards[0].href, "#/grid");
        assert_eq!(home.cards[0].date, "2024-02-01");
        assert_eq!(home.cards[0].excerpt, "Grid layout.");
        assert_eq!(home.cards[1].date, "someday");
    }

    #[test]
    fn test_home_view_no_results() {
        let renderer = MarkdownRenderer::new();
        let builder = ViewBuilder::new(&renderer, "YYYY-MM-DD");
        let mut store = store();
        store.filter("kubernetes");
        let home = builder.home(&store);
        assert!(home.no_results);
        assert_eq!(home.post_count, 0);
        assert_eq!(home.query, "kubernetes");
    }

    #[test]
    fn test_article_view() {
        let renderer = MarkdownRenderer::new();
        let builder = ViewBuilder::new(&renderer, "DD MMMM YYYY");
        let page = builder.page(&store(), &Route::PostDetail("grid".into()), "");

        let Page::Post(article) = page else {
            panic!("expected post page");
        };
        assert_eq!(article.title, "Grid");
        assert_eq!(article.date, "01 February 2024");
        assert_eq!(article.tags, vec!["css"]);
        assert!(article.html.contains("<strong>Grid</strong>"));
    }

    #[test]
    fn test_missing_post_shows_home() {
        let renderer = MarkdownRenderer::new();
        let builder = ViewBuilder::new(&renderer, "YYYY-MM-DD");
        let page = builder.page(&store(), &Route::PostDetail("gone".into()), "Grid");
        let Page::Home(home) = page else {
            panic!("expected home page");
        };
        assert_eq!(home.query, "grid");
        assert_eq!(home.post_count, 1);
    }

    #[test]
    fn test_view_model_json_shape() {
        let renderer = MarkdownRenderer::new();
        let builder = ViewBuilder::new(&renderer, "YYYY-MM-DD");
        let view = ViewModel {
            dark_mode: false,
            page: builder.page(&store(), &Route::Home, ""),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["view"], "home");
        assert_eq!(json["dark_mode"], false);
        assert_eq!(json["cards"][0]["id"], "grid");
    }
}

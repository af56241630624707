//! Post store and search filtering

use crate::content::Post;

/// Lowercase and trim a search query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether `post` matches an already-normalized, non-empty query.
///
/// Any of title, excerpt, content, category, author or a single tag
/// containing the query is a match.
pub fn matches(post: &Post, query: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(query);

    contains(&post.title)
        || contains(&post.excerpt)
        || contains(&post.content)
        || post.tags.iter().any(|tag| contains(tag))
        || contains(&post.category)
        || contains(&post.author)
}

/// Filter `posts` by `query`, keeping their relative order
pub fn filter_posts<'a, I>(posts: I, query: &str) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let query = normalize_query(query);
    if query.is_empty() {
        return posts.into_iter().collect();
    }
    posts
        .into_iter()
        .filter(|post| matches(post, &query))
        .collect()
}

/// All loaded posts plus the subset matching the current search query
#[derive(Debug, Clone, Default)]
pub struct PostStore {
    posts: Vec<Post>,
    query: String,
    /// Indices into `posts`, ascending
    filtered: Vec<usize>,
}

impl PostStore {
    /// Build a store from posts that are already sorted
    pub fn new(posts: Vec<Post>) -> Self {
        let filtered = (0..posts.len()).collect();
        Self {
            posts,
            query: String::new(),
            filtered,
        }
    }

    /// Replace every post, keeping the current query applied
    pub fn replace(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.refilter();
    }

    /// Apply a search query. The full post list is always the input, never
    /// the previous result.
    pub fn filter(&mut self, query: &str) {
        self.query = normalize_query(query);
        self.refilter();
    }

    fn refilter(&mut self) {
        let query = &self.query;
        self.filtered = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, post)| query.is_empty() || matches(post, query))
            .map(|(i, _)| i)
            .collect();
    }

    /// Every post, newest first
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Posts matching the current query, in store order
    pub fn filtered(&self) -> impl Iterator<Item = &Post> + '_ {
        self.filtered.iter().map(move |&i| &self.posts[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// The normalized current query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Find a post by id
    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

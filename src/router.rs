//! Hash router
//!
//! The router is a small state machine over two views: the post listing
//! (`Home`) and a single post (`PostDetail`). It owns a mirror of the
//! location hash and never touches the outside world directly; every
//! transition returns the [`Effect`]s an adapter (terminal, browser, HTTP
//! handler) must apply.
//!
//! Writing the hash makes the host fire a hash-change event. The router only
//! asks for a hash write when the new value differs from the one it already
//! holds, so feeding that event back in settles on the same state instead of
//! looping.

use serde::Serialize;

use crate::store::PostStore;

const POST_PREFIX: &str = "#/";

/// The active view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "id", rename_all = "snake_case")]
pub enum Route {
    #[default]
    Home,
    PostDetail(String),
}

impl Route {
    /// The hash that addresses this route
    pub fn hash(&self) -> String {
        match self {
            Route::Home => String::new(),
            Route::PostDetail(id) => format!("{}{}", POST_PREFIX, id),
        }
    }

    /// Resolve a hash against the store without side effects
    pub fn resolve(hash: &str, store: &PostStore) -> Self {
        match post_id(hash) {
            Some(id) if store.contains(id) => Route::PostDetail(id.to_string()),
            _ => Route::Home,
        }
    }
}

/// Extract the post id from a `#/<id>` hash
pub fn post_id(hash: &str) -> Option<&str> {
    hash.strip_prefix(POST_PREFIX)
}

/// Something that happened to the location or the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// The host reported a new location hash
    HashChanged(String),
    /// A post card was activated
    OpenPost(String),
    /// Back button, escape key, or any other request for the listing
    GoHome,
}

/// Work for the adapter after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write this value to the location hash
    SetHash(String),
    /// Empty the location hash
    ClearHash,
    ShowHome,
    ShowPost(String),
    ScrollToTop,
}

/// Router state: the active route plus the last known location hash
#[derive(Debug, Clone, Default)]
pub struct Router {
    route: Route,
    hash: String,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The location hash as the router last saw or wrote it
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Apply one navigation event
    pub fn handle(&mut self, event: NavEvent, store: &PostStore) -> Vec<Effect> {
        let effects = match event {
            NavEvent::HashChanged(hash) => self.hash_changed(hash, store),
            NavEvent::OpenPost(id) => self.open_post(&id, store),
            NavEvent::GoHome => self.go_home(),
        };
        tracing::debug!("Route is now {:?} (hash {:?})", self.route, self.hash);
        effects
    }

    fn hash_changed(&mut self, hash: String, store: &PostStore) -> Vec<Effect> {
        self.hash = hash;
        match Route::resolve(&self.hash, store) {
            Route::PostDetail(id) => self.enter_post(id),
            Route::Home => {
                if let Some(id) = post_id(&self.hash) {
                    tracing::debug!("No post with id {:?}, going home", id);
                }
                self.go_home()
            }
        }
    }

    fn open_post(&mut self, id: &str, store: &PostStore) -> Vec<Effect> {
        if !store.contains(id) {
            tracing::debug!("Cannot open unknown post {:?}", id);
            return self.go_home();
        }

        let mut effects = Vec::new();
        let target = Route::PostDetail(id.to_string()).hash();
        if self.hash != target {
            self.hash = target.clone();
            effects.push(Effect::SetHash(target));
        }
        effects.extend(self.enter_post(id.to_string()));
        effects
    }

    fn go_home(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.hash.is_empty() {
            self.hash.clear();
            effects.push(Effect::ClearHash);
        }
        self.route = Route::Home;
        effects.push(Effect::ShowHome);
        effects.push(Effect::ScrollToTop);
        effects
    }

    fn enter_post(&mut self, id: String) -> Vec<Effect> {
        self.route = Route::PostDetail(id.clone());
        vec![Effect::ShowPost(id), Effect::ScrollToTop]
    }
}

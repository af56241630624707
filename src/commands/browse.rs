//! Interactive terminal browser
//!
//! Each input line is one navigation event. The session keeps a simulated
//! location hash: when the router asks for a hash write, the new hash is fed
//! back as a hash-change event, the way a browser would report it.

use anyhow::Result;
use std::io::{BufRead, IsTerminal, Write};

use super::list::print_home;
use super::show::print_raw;
use crate::prefs::PreferenceFile;
use crate::router::{Effect, NavEvent, Route, Router};
use crate::store::PostStore;
use crate::view::ViewBuilder;
use crate::Blog;

const HELP: &str = "\
Commands:
  open <id>       open a post
  hash [#/<id>]   set the location hash
  home | back     return to the listing
  search [text]   filter posts (empty clears)
  list            redraw the current view
  dark            toggle dark mode
  help            show this help
  quit            leave";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Hash(String),
    Home,
    Search(String),
    List,
    Dark,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; `None` for anything unrecognized
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "open" | "o" if !rest.is_empty() => Some(Command::Open(rest.to_string())),
            "hash" => Some(Command::Hash(rest.to_string())),
            "home" | "back" | "esc" => Some(Command::Home),
            "search" | "s" | "/" => Some(Command::Search(rest.to_string())),
            "list" | "ls" => Some(Command::List),
            "dark" => Some(Command::Dark),
            "help" | "?" => Some(Command::Help),
            "quit" | "exit" | "q" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Store, router and preferences for one browsing session
pub struct Session<'a> {
    store: PostStore,
    router: Router,
    prefs: PreferenceFile,
    views: ViewBuilder<'a>,
    clear_screen: bool,
}

impl<'a> Session<'a> {
    pub fn new(store: PostStore, prefs: PreferenceFile, views: ViewBuilder<'a>) -> Self {
        Self {
            store,
            router: Router::new(),
            prefs,
            views,
            clear_screen: false,
        }
    }

    /// Clear the terminal when a view scrolls to the top
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    pub fn route(&self) -> &Route {
        self.router.route()
    }

    pub fn hash(&self) -> &str {
        self.router.hash()
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    /// Resolve the starting hash and draw the first view
    pub fn start<W: Write>(&mut self, initial_hash: &str, out: &mut W) -> Result<()> {
        self.navigate(NavEvent::HashChanged(initial_hash.to_string()), out)
    }

    /// Handle one navigation event, including the hash-change it may cause
    pub fn navigate<W: Write>(&mut self, event: NavEvent, out: &mut W) -> Result<()> {
        let mut effects = self.router.handle(event, &self.store);

        if let Some(hash) = written_hash(&effects) {
            effects = self
                .router
                .handle(NavEvent::HashChanged(hash), &self.store);
            if written_hash(&effects).is_some() {
                tracing::warn!("Hash change wrote the hash again; not following");
            }
        }

        self.apply(&effects, out)
    }

    /// Run one command. Returns `false` when the session should end.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<bool> {
        match command {
            Command::Open(id) => self.navigate(NavEvent::OpenPost(id), out)?,
            Command::Hash(hash) => self.navigate(NavEvent::HashChanged(hash), out)?,
            Command::Home => self.navigate(NavEvent::GoHome, out)?,
            Command::Search(query) => {
                self.store.filter(&query);
                match self.router.route() {
                    Route::Home => print_home(out, &self.views.home(&self.store))?,
                    Route::PostDetail(_) => writeln!(
                        out,
                        "{} posts match; `home` to see them",
                        self.store.filtered_len()
                    )?,
                }
            }
            Command::List => self.redraw(out)?,
            Command::Dark => {
                let enabled = self.prefs.toggle_dark_mode()?;
                writeln!(out, "Dark mode: {}", if enabled { "on" } else { "off" })?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn redraw<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.router.route() {
            Route::Home => self.apply(&[Effect::ShowHome], out),
            Route::PostDetail(id) => self.apply(&[Effect::ShowPost(id.clone())], out),
        }
    }

    fn apply<W: Write>(&self, effects: &[Effect], out: &mut W) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::ScrollToTop if self.clear_screen => write!(out, "\x1b[2J\x1b[H")?,
                Effect::ShowHome => print_home(out, &self.views.home(&self.store))?,
                Effect::ShowPost(id) => {
                    if let Some(post) = self.store.get(id) {
                        print_raw(out, post)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn prompt(&self) -> String {
        let theme = if self.prefs.dark_mode() { "dark" } else { "light" };
        format!("[{}] blogdeck {}> ", theme, self.router.hash())
    }
}

/// The hash an effect list asks to write, if any
fn written_hash(effects: &[Effect]) -> Option<String> {
    effects.iter().find_map(|effect| match effect {
        Effect::SetHash(hash) => Some(hash.clone()),
        Effect::ClearHash => Some(String::new()),
        _ => None,
    })
}

/// Drive a session from `input` until it ends
pub fn run_session<R: BufRead, W: Write>(
    session: &mut Session<'_>,
    input: R,
    out: &mut W,
) -> Result<()> {
    write!(out, "{}", session.prompt())?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            match Command::parse(&line) {
                Some(command) => {
                    if !session.execute(command, out)? {
                        break;
                    }
                }
                None => writeln!(out, "Unknown command: {} (try `help`)", line.trim())?,
            }
        }
        write!(out, "{}", session.prompt())?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

/// Start an interactive session on stdin/stdout
pub async fn run(blog: &Blog, initial_hash: &str) -> Result<()> {
    let store = blog.load_store().await;
    let renderer = blog.renderer();
    let views = ViewBuilder::new(&renderer, &blog.config.date_format);

    let stdout = std::io::stdout();
    let clear_screen = stdout.is_terminal();
    let mut out = stdout.lock();

    let mut session =
        Session::new(store, blog.preferences(), views).with_clear_screen(clear_screen);
    session.start(initial_hash, &mut out)?;
    run_session(&mut session, std::io::stdin().lock(), &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FrontMatter, MarkdownRenderer, Post};
    use chrono::NaiveDate;

    fn store() -> PostStore {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let make = |id: &str, fm: &str| {
            Post::from_parts(id.to_string(), FrontMatter::parse(fm), "Body text.", today, 150)
        };
        PostStore::new(vec![
            make("galon", "title: Tips Merawat Galon\ndate: 2024-02-01"),
            make("grid", "title: CSS Grid\ndate: 2024-01-01\ntags: [css]"),
        ])
    }

    fn session<'a>(views: ViewBuilder<'a>, dir: &tempfile::TempDir) -> Session<'a> {
        let prefs = PreferenceFile::open(dir.path().join("prefs.json"));
        Session::new(store(), prefs, views)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("open grid"), Some(Command::Open("grid".into())));
        assert_eq!(Command::parse("open"), None);
        assert_eq!(Command::parse("hash"), Some(Command::Hash(String::new())));
        assert_eq!(Command::parse(" back "), Some(Command::Home));
        assert_eq!(
            Command::parse("search  css grid "),
            Some(Command::Search("css grid".into()))
        );
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("dance"), None);
    }

    #[test]
    fn test_open_settles_on_post() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = MarkdownRenderer::new();
        let mut session = session(ViewBuilder::new(&renderer, "YYYY-MM-DD"), &dir);
        let mut out = Vec::new();

        session.start("", &mut out).unwrap();
        session.execute(Command::Open("grid".into()), &mut out).unwrap();

        assert_eq!(session.route(), &Route::PostDetail("grid".into()));
        assert_eq!(session.hash(), "#/grid");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("CSS Grid\n2024-01-01"));
    }

    #[test]
    fn test_unknown_hash_goes_home() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = MarkdownRenderer::new();
        let mut session = session(ViewBuilder::new(&renderer, "YYYY-MM-DD"), &dir);
        let mut out = Vec::new();

        session.start("#/missing-id", &mut out).unwrap();
        assert_eq!(session.route(), &Route::Home);
        assert_eq!(session.hash(), "");
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Posts (2):").count(), 1);
    }

    #[test]
    fn test_search_then_home() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = MarkdownRenderer::new();
        let mut session = session(ViewBuilder::new(&renderer, "YYYY-MM-DD"), &dir);
        let mut out = Vec::new();

        session.start("#/galon", &mut out).unwrap();
        session.execute(Command::Search("css".into()), &mut out).unwrap();
        assert_eq!(session.store().filtered_len(), 1);
        session.execute(Command::Home, &mut out).unwrap();

        assert_eq!(session.route(), &Route::Home);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1 posts match"));
        assert!(text.contains("Search: css\nPosts (1):"));
    }

    #[test]
    fn test_run_session_script() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = MarkdownRenderer::new();
        let mut session = session(ViewBuilder::new(&renderer, "YYYY-MM-DD"), &dir);
        let mut out = Vec::new();

        let script = "open galon\nbogus\ndark\nquit\nopen grid\n";
        run_session(&mut session, script.as_bytes(), &mut out).unwrap();

        assert_eq!(session.route(), &Route::PostDetail("galon".into()));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Unknown command: bogus"));
        assert!(text.contains("Dark mode: on"));
        assert!(text.contains("[dark] blogdeck #/galon> "));
    }
}

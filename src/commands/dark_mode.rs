//! Read or change the dark-mode preference

use anyhow::Result;

use crate::Blog;

/// What to do with the preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DarkModeAction {
    On,
    Off,
    Toggle,
}

/// Apply `action` (or just report the current value) and return the result
pub fn run(blog: &Blog, action: Option<DarkModeAction>) -> Result<bool> {
    let mut prefs = blog.preferences();

    let enabled = match action {
        None => prefs.dark_mode(),
        Some(DarkModeAction::On) => {
            prefs.set_dark_mode(true)?;
            true
        }
        Some(DarkModeAction::Off) => {
            prefs.set_dark_mode(false)?;
            false
        }
        Some(DarkModeAction::Toggle) => prefs.toggle_dark_mode()?,
    };

    println!("Dark mode: {}", if enabled { "on" } else { "off" });
    Ok(enabled)
}

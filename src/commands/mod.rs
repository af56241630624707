//! CLI commands

pub mod browse;
pub mod dark_mode;
pub mod list;
pub mod new;
pub mod show;

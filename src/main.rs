//! CLI entry point for blogdeck

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogdeck::commands::dark_mode::DarkModeAction;
use blogdeck::commands::new::NewPost;

#[derive(Parser)]
#[command(name = "blogdeck")]
#[command(version)]
#[command(about = "Browse and search a directory of markdown blog posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts, tags or categories
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, tag, category)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only list posts matching this search text
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show a single post by id or `#/<id>` hash
    Show {
        target: String,

        /// Print the markdown body instead of rendered HTML
        #[arg(long)]
        raw: bool,
    },

    /// Browse posts interactively
    #[command(alias = "b")]
    Browse {
        /// Location hash to start at
        #[arg(long, default_value = "")]
        hash: String,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        #[arg(short = 'C', long)]
        category: Option<String>,

        #[arg(short, long)]
        author: Option<String>,

        /// Tags, repeat or comma separate
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Show or change the dark mode preference
    DarkMode {
        action: Option<DarkModeAction>,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port in the config)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip in the config)
        #[arg(short, long)]
        ip: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Reload posts when files change
        #[arg(short, long)]
        watch: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogdeck=debug,info"
    } else {
        "blogdeck=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { r#type, query } => {
            let blog = blogdeck::Blog::new(&base_dir)?;
            blogdeck::commands::list::run(&blog, &r#type, query.as_deref()).await?;
        }

        Commands::Show { target, raw } => {
            let blog = blogdeck::Blog::new(&base_dir)?;
            blogdeck::commands::show::run(&blog, &target, raw).await?;
        }

        Commands::Browse { hash } => {
            let blog = blogdeck::Blog::new(&base_dir)?;
            blogdeck::commands::browse::run(&blog, &hash).await?;
        }

        Commands::New {
            title,
            category,
            author,
            tags,
        } => {
            let blog = blogdeck::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let tags: Vec<String> = tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            let post = NewPost {
                title: &title,
                category: category.as_deref(),
                author: author.as_deref(),
                tags: &tags,
            };
            blogdeck::commands::new::run(&blog, &post)?;
        }

        Commands::DarkMode { action } => {
            let blog = blogdeck::Blog::new(&base_dir)?;
            blogdeck::commands::dark_mode::run(&blog, action)?;
        }

        Commands::Server {
            port,
            ip,
            open,
            watch,
        } => {
            let blog = blogdeck::Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            blogdeck::server::start(&blog, &ip, port, watch, open).await?;
        }

        Commands::Version => {
            println!("blogdeck version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

//! CLI entry point for folio-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio-blog")]
#[command(version)]
#[command(about = "Read, search and serve the posts of a portfolio blog", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
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
    /// List published posts
    #[command(alias = "ls")]
    List {
        /// Only show posts matching this search
        #[arg(short, long, default_value = "")]
        query: String,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single post
    Show {
        /// Slug of the post
        slug: String,

        /// Print the post as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tags with post counts
    Tags,

    /// Serve the blog over HTTP
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the configured address)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_blog=debug,info"
    } else {
        "folio_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { query, json } => {
            let blog = folio_blog::Blog::new(&base_dir)?;
            folio_blog::commands::list::run(&blog, &query, json).await?;
        }

        Commands::Show { slug, json } => {
            let blog = folio_blog::Blog::new(&base_dir)?;
            folio_blog::commands::show::run(&blog, &slug, json).await?;
        }

        Commands::Tags => {
            let blog = folio_blog::Blog::new(&base_dir)?;
            folio_blog::commands::list::tags(&blog).await?;
        }

        Commands::Serve { port, ip } => {
            let blog = folio_blog::Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_blog::server::start(&blog, &ip, port).await?;
        }

        Commands::Version => {
            println!("folio-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

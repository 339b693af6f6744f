use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use service::{config::Config, logging::Logger};
use unsplash_api::endpoints::PageParams;
use unsplash_api::endpoints::RandomPhotoQuery;
use unsplash_api::models::{Photo, User};
use unsplash_api::{Pageable, Session};

mod consent;

use consent::TerminalConsent;

#[derive(Parser)]
#[command(name = "unsplasher", author, version)]
#[command(about = "Command-line client for the Unsplash API")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authorize this application and persist the access token
    Login,
    /// Forget the persisted access token
    Logout,
    /// List photos
    Photos {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Show random photos
    Random {
        /// Number of photos, between 1 and 30
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Show the authenticated user's profile (needs the read_user scope)
    Me,
    /// Search photos
    Search { query: String },
    /// Create a private collection (needs the write_collections scope)
    CreateCollection { title: String },
    /// List the first page of photos, then follow its `next` link
    NextPhotos {
        #[arg(long)]
        per_page: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    service::config::load_env();
    let cli = Cli::parse();
    Logger::init_logger(&cli.config).context("Failed to start logger")?;

    let session = service::init_session(&cli.config)
        .await
        .context("Failed to set up the Unsplash session")?;

    if let Err(e) = run(&session, cli.command).await {
        error!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Login => {
            if session.credentials().is_none() {
                anyhow::bail!("No application id configured. Set UNSPLASH_APPLICATION_ID.");
            }
            let consent = TerminalConsent::stdin();
            session
                .authenticate(&consent)
                .await
                .context("Login failed")?;
            info!("Logged in with scopes: {}", scope_list(session));
        }
        Command::Logout => {
            session.sign_out().await.context("Failed to sign out")?;
            info!("Signed out");
        }
        Command::Photos { page, per_page } => {
            let photos = session
                .photos()
                .list(PageParams::new(page, per_page), None, false)
                .await
                .context("Failed to list photos")?;
            print_photos(&photos);
        }
        Command::Random { count } => {
            let photos = session
                .photos()
                .random(&RandomPhotoQuery::default(), count)
                .await
                .context("Failed to fetch random photos")?;
            print_photos(&photos);
        }
        Command::Me => {
            let user = session
                .current_user()
                .profile()
                .await
                .context("Failed to fetch profile")?;
            print_user(&user);
        }
        Command::Search { query } => {
            let results = session
                .search()
                .photos(&query, PageParams::default(), &[], None)
                .await
                .with_context(|| format!("Search for \"{}\" failed", query))?;
            println!(
                "{} results on {} pages",
                results.total, results.total_pages
            );
            print_photos(&results.results);
        }
        Command::CreateCollection { title } => {
            let collection = session
                .collections()
                .create(&title, None, Some(true))
                .await
                .context("Failed to create collection")?;
            println!("Created collection {} ({})", collection.title, collection.id);
        }
        Command::NextPhotos { per_page } => {
            let photos = session.photos();
            photos
                .list(PageParams::new(None, per_page), None, false)
                .await
                .context("Failed to list photos")?;
            let next = photos.next().await.context("Failed to follow next page")?;
            print_photos(&next);
        }
    }

    print_rate_limit(session);
    Ok(())
}

fn scope_list(session: &Session) -> String {
    session
        .scopes()
        .iter()
        .map(|scope| scope.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_photos(photos: &[Photo]) {
    for photo in photos {
        let author = photo
            .user
            .as_ref()
            .map(|user| user.username.as_str())
            .unwrap_or("unknown");
        let url = photo
            .urls
            .as_ref()
            .map(|urls| urls.regular.as_str())
            .unwrap_or("");
        println!(
            "{}  by {}  {}  {}",
            photo.id,
            author,
            photo.description.as_deref().unwrap_or("-"),
            url
        );
    }
}

fn print_user(user: &User) {
    println!("{} ({})", user.username, user.id);
    if let Some(name) = &user.name {
        println!("name:        {}", name);
    }
    if let Some(bio) = &user.bio {
        println!("bio:         {}", bio);
    }
    if let Some(total) = user.total_photos {
        println!("photos:      {}", total);
    }
    if let Some(total) = user.total_collections {
        println!("collections: {}", total);
    }
}

fn print_rate_limit(session: &Session) {
    let rate_limit = session.rate_limit();
    if let (Some(remaining), Some(limit)) = (rate_limit.remaining, rate_limit.limit) {
        info!("Rate limit: {}/{} requests remaining", remaining, limit);
    }
}

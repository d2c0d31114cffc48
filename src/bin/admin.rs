//! Operator CLI for linkhop.
//!
//! Manages links and inspects click statistics directly against the
//! database, without going through HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Create a link with a generated token
//! cargo run --bin admin -- link create https://example.com/landing
//!
//! # Create a link with a chosen token
//! cargo run --bin admin -- link create https://example.com/sale --token spring-sale
//!
//! # Show, deactivate, reactivate
//! cargo run --bin admin -- link show spring-sale
//! cargo run --bin admin -- link deactivate spring-sale
//! cargo run --bin admin -- link activate spring-sale
//!
//! # Click statistics
//! cargo run --bin admin -- stats spring-sale
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! Reads the same environment as the server (see `linkhop::config`). When
//! Redis is configured, state changes also evict the cached mapping.

use linkhop::application::services::{LinkService, StatsService};
use linkhop::config::{self, Config};
use linkhop::domain::entities::{LinkState, LinkStatistics, ShortLink};
use linkhop::domain::repositories::{LinkRepository, StatsRepository};
use linkhop::infrastructure::cache::{CacheService, NullCache, RedisCache};
use linkhop::infrastructure::persistence::{PgLinkRepository, PgStatsRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkhop.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show click statistics for a link
    Stats {
        /// Link token
        token: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Create a new active link
    Create {
        /// Destination URL (http or https)
        url: String,

        /// Custom token (generated if omitted)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Show a link
    Show { token: String },

    /// Make a link resolvable again
    Activate { token: String },

    /// Stop a link from resolving
    Deactivate {
        token: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &config, pool).await?,
        Commands::Stats { token } => handle_stats(&token, pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_link_action(action: LinkAction, config: &Config, pool: PgPool) -> Result<()> {
    let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let cache = connect_cache(config).await;
    let service = LinkService::new(links, cache);

    match action {
        LinkAction::Create { url, token } => {
            let link = service.create_link(&url, token.as_deref()).await?;
            println!("{}", "✨ Link created".green().bold());
            print_link(&link);
        }
        LinkAction::Show { token } => {
            let link = service.get_link(&token).await?;
            print_link(&link);
        }
        LinkAction::Activate { token } => {
            service.set_state(&token, LinkState::Active).await?;
            println!("{} {}", "✓ Activated".green(), token.cyan());
        }
        LinkAction::Deactivate { token, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Deactivate '{token}'? It will stop redirecting."))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "Cancelled".yellow());
                    return Ok(());
                }
            }

            service.set_state(&token, LinkState::Inactive).await?;
            println!("{} {}", "✓ Deactivated".yellow(), token.cyan());
        }
    }

    Ok(())
}

/// Redis when configured and reachable, otherwise nothing to invalidate.
async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    if let Some(url) = &config.redis_url {
        match RedisCache::connect(url, config.cache_ttl_seconds).await {
            Ok(redis) => return Arc::new(redis),
            Err(e) => eprintln!(
                "{} {} (cached entries expire on their own)",
                "⚠️ ".yellow(),
                e
            ),
        }
    }
    Arc::new(NullCache::new())
}

fn print_link(link: &ShortLink) {
    let state = match link.state {
        LinkState::Active => link.state.to_string().green(),
        LinkState::Inactive => link.state.to_string().red(),
    };

    println!("  Token:       {}", link.token.cyan().bold());
    println!("  Destination: {}", link.destination);
    println!("  State:       {}", state);
    println!("  Clicks:      {}", link.click_count);
    println!(
        "  Created:     {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Updated:     {}",
        link.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

async fn handle_stats(token: &str, pool: PgPool) -> Result<()> {
    let repository: Arc<dyn StatsRepository> = Arc::new(PgStatsRepository::new(Arc::new(pool)));
    let stats = StatsService::new(repository)
        .get_link_statistics(token)
        .await?;

    print_stats(&stats);
    Ok(())
}

fn print_stats(stats: &LinkStatistics) {
    const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

    println!("{}", format!("📊 Statistics for {}", stats.token).bright_blue().bold());
    println!("  Total clicks: {}", stats.total.to_string().bright_white().bold());

    println!();
    println!("{}", "By device:".bright_white());
    if stats.devices.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for entry in &stats.devices {
        println!("  {:<8} {}", entry.device.to_string(), entry.clicks);
    }

    println!();
    println!("{}", "By weekday (UTC):".bright_white());
    for (index, name) in WEEKDAYS.iter().enumerate() {
        println!("  {:<8} {}", name, stats.clicks_on_weekday(index as i16));
    }

    println!();
    println!("{}", "By day (UTC):".bright_white());
    if stats.daily.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for entry in &stats.daily {
        println!("  {}  {}", entry.day, entry.clicks);
    }
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await
                .context("Database query failed")?;

            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("{}", "✓ Database connection OK".green().bold());
            println!("  Server: {}", version.dimmed());
            println!("  Links:  {}", links);
        }
        DbAction::Migrate => {
            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;
            println!("{}", "✓ Migrations applied".green().bold());
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use secrecy::SecretString;
use std::path::PathBuf;
use tokio::sync::mpsc;

use newsdesk::api::{ApiClient, ListQuery};
use newsdesk::app::{App, AppEvent};
use newsdesk::config::Config;
use newsdesk::store::Store;
use newsdesk::tree::{self, ArticleCounts, CategoryTree};
use newsdesk::ui;

#[derive(Parser, Debug)]
#[command(name = "newsdesk", about = "Terminal admin console for a news CMS backend")]
struct Args {
    /// Config file (default: ~/.config/newsdesk/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and environment
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Bearer token, overrides config and environment
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Username to log in with (password comes from the config file)
    #[arg(long)]
    username: Option<String>,

    /// Print the category tree with article counts and exit
    #[arg(long)]
    tree: bool,

    /// Print dashboard statistics and exit
    #[arg(long)]
    stats: bool,

    /// Print the most recent crawl log entries and exit
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "20")]
    crawl_logs: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never land on the alternate screen
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env();
    if let Some(url) = args.base_url {
        config.base_url = url;
    }
    if let Some(token) = args.token {
        config.api_token = Some(token);
    }
    if let Some(username) = args.username {
        config.username = Some(username);
    }

    let api = ApiClient::new(&config.base_url, config.request_timeout())
        .with_context(|| format!("Invalid base URL '{}'", config.base_url))?;
    let store = Store::new(api.clone(), config.bulk_page_size);

    if let Some(token) = config.api_token.clone() {
        api.set_token(Some(SecretString::from(token)));
        if let Err(e) = store.auth.fetch_me().await {
            tracing::warn!(error = %e, "Token did not resolve to a user");
        }
    } else if let Some((username, password)) = config.credentials() {
        store
            .auth
            .login(username, password)
            .await
            .context("Login failed")?;
    }

    if args.tree {
        return print_tree(&store).await;
    }
    if args.stats {
        return print_stats(&api).await;
    }
    if let Some(limit) = args.crawl_logs {
        return print_crawl_logs(&store, limit).await;
    }

    let mut app = App::new(store, config.page_size);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}

async fn print_tree(store: &Store) -> Result<()> {
    let categories = store
        .categories
        .list(&ListQuery::default())
        .await
        .context("Failed to load categories")?;
    let tree = CategoryTree::build(&categories);

    let mut counts = ArticleCounts::default();
    let mut fetches = tree::fetch_counts(store.categories.api().clone(), tree.slugs());
    while let Some((slug, result)) = fetches.next().await {
        counts.apply(slug, result);
    }

    print!("{}", tree::outline(&tree, &counts));
    Ok(())
}

async fn print_stats(api: &ApiClient) -> Result<()> {
    let stats = api
        .dashboard_stats()
        .await
        .context("Failed to load dashboard statistics")?;
    println!("Posts:            {}", stats.total_posts);
    println!("Categories:       {}", stats.total_categories);
    println!("Sources:          {}", stats.total_sources);
    println!("Users today:      {}", stats.today_users);
    println!("Users (7 days):   {}", stats.total_users_7d);
    Ok(())
}

async fn print_crawl_logs(store: &Store, limit: u32) -> Result<()> {
    let query = ListQuery {
        page: Some(0),
        size: Some(limit.max(1)),
        ..ListQuery::default()
    };
    let logs = store
        .crawl_logs
        .list(&query)
        .await
        .context("Failed to load crawl logs")?;

    for log in logs {
        let started = log
            .started_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let source = log.source.as_ref().map(|s| s.name.as_str()).unwrap_or("-");
        println!(
            "{:>6}  {}  {:<8} {:<8} found={} inserted={}  {}{}",
            log.id,
            started,
            format!("{:?}", log.crawl_type),
            format!("{:?}", log.status),
            log.total_found.unwrap_or(0),
            log.total_inserted.unwrap_or(0),
            source,
            log.error_message
                .as_deref()
                .map(|m| format!("  ({})", m))
                .unwrap_or_default(),
        );
    }
    Ok(())
}

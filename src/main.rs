use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use greenroom::config::Config;
use greenroom::db::{self, queries, AppState};
use greenroom::handlers;
use greenroom::models::{CreateBlogPost, CreateEpisode, CreatePoll};

#[derive(Parser, Debug)]
#[command(name = "greenroom", about = "Companion-site backend", version)]
struct Cli {
    /// Insert demo data (episode, live poll, blog post) on startup.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenroom=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = db::create_pool(&config.database_path)?;
    {
        let conn = pool.get()?;
        db::init_db(&conn)?;
    }
    tracing::info!(path = %config.database_path, "Database ready");

    if cli.seed {
        let mut conn = pool.get()?;
        seed_demo_data(&mut conn)?;
    }

    if config.stripe.is_none() {
        tracing::warn!("Stripe not configured; checkout and webhook endpoints are disabled");
    }
    if config.catalog.is_none() {
        tracing::warn!("Catalog not configured; shop product endpoints are disabled");
    }
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set; admin surface is disabled");
    }

    let state = AppState {
        db: pool,
        base_url: config.base_url.clone(),
        site_url: config.site_url.clone(),
        admin_token: config.admin_token.clone(),
        stripe: config.stripe.clone(),
        catalog: config.catalog.clone(),
    };

    let app = handlers::app(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!(addr = %config.addr(), "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown handler");
        return;
    }
    tracing::info!("Shutting down");
}

/// Dev convenience: a locked premiere with a live poll and one blog post.
/// Safe to re-run; duplicate inserts are skipped.
fn seed_demo_data(conn: &mut rusqlite::Connection) -> anyhow::Result<()> {
    use greenroom::models::{AccessLevel, EpisodeStatus, PollStatus, Visibility};

    if queries::get_episode_by_external_id(conn, "S01E01")?.is_some() {
        tracing::info!("Demo data already present; skipping seed");
        return Ok(());
    }

    let episode = queries::create_episode(
        conn,
        &CreateEpisode {
            external_id: "S01E01".to_string(),
            title: "The Cold Open".to_string(),
            description: Some("Series premiere.".to_string()),
            runtime_minutes: Some(42),
            genres: vec!["drama".to_string(), "mystery".to_string()],
            tags: vec!["premiere".to_string()],
            visibility: Visibility::Locked,
            access_level: AccessLevel::Free,
            passphrase: Some("greenroom".to_string()),
            video_url: None,
            thumbnail_url: None,
            status: EpisodeStatus::Published,
        },
    )?;

    queries::create_poll(
        conn,
        &CreatePoll {
            episode_id: episode.id.clone(),
            title: "Who is behind the door?".to_string(),
            description: None,
            status: Some(PollStatus::Live),
            duration_days: None,
            options: vec![
                "The producer".to_string(),
                "The understudy".to_string(),
                "Nobody".to_string(),
            ],
        },
    )?;

    queries::create_blog_post(
        conn,
        &CreateBlogPost {
            slug: "welcome".to_string(),
            title: "Welcome to the Greenroom".to_string(),
            excerpt: Some("What this site is for.".to_string()),
            body: Some("Premieres, polls, and the occasional secret drop.".to_string()),
            cover_image_url: None,
            published_at: None,
        },
    )?;

    tracing::info!(episode_id = %episode.id, "Demo data seeded");
    Ok(())
}

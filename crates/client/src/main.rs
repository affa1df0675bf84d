use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use monynha_client::config::{facet_query_from_lookup, ClientConfig};
use monynha_client::orchestrator::{Orchestrator, RefreshOutcome};
use monynha_client::session::Session;
use monynha_client::store::PgVideoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monynha_client=debug,monynha_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(threshold = %config.vote_threshold, "Configuration loaded");

    let pool = monynha_db::create_pool(&config.database_url, config.max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    monynha_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    monynha_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let store = PgVideoStore::new(pool, config.vote_threshold);
    let orchestrator = Orchestrator::new(Arc::new(store), config.vote_threshold);

    orchestrator
        .set_query(facet_query_from_lookup(|key| std::env::var(key).ok()))
        .await;

    // Signing in refreshes on its own.
    let outcome = match config.session_user {
        Some(user_id) => orchestrator.set_session(Session::signed_in(user_id)).await,
        None => orchestrator.refresh().await,
    };
    if let RefreshOutcome::Applied { failed_sections } = outcome {
        if !failed_sections.is_empty() {
            tracing::warn!(?failed_sections, "Some sections failed to load");
        }
    }

    for video in orchestrator.approved_view().await {
        tracing::info!(
            id = %video.id,
            title = %video.title,
            platform = %video.platform,
            embed_url = %video.embed_url,
            highlighted = video.is_highlighted(),
            "Approved"
        );
    }

    for pending in orchestrator.pending_view().await {
        tracing::info!(
            id = %pending.record.id,
            title = %pending.record.title,
            votes = pending.progress.displayed_votes(),
            threshold = pending.progress.threshold,
            percent = pending.progress.progress_percent,
            voted = pending.has_voted,
            "Pending"
        );
    }

    Ok(())
}

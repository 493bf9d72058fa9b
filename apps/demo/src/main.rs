//! Demo Entry Point
//!
//! Walks the session and content layers end to end, against either the
//! in-memory adapters (the default) or PostgreSQL when `DATABASE_URL`
//! is set. The auth service is always played by the in-memory gateway
//! so sign-up, revocation, and sign-out can be driven locally.
//!
//! The remote store owns its schema, so nothing here runs migrations.
//! Uses `anyhow` for startup errors; application-level errors are the
//! typed errors of the library crates.

use std::env;
use std::sync::Arc;

use content::{ContentService, ContentStore, PostDraft, PostFilter, PostPatch};
use content::{MemoryContentStore, PgContentStore};
use session::{Email, ProfilePatch, ProfileStore, ResolverConfig, SessionState, SessionStore};
use session::{
    ErrorKind, MemoryAuthGateway, MemoryProfileStore, OptionExt, PgProfileStore, ResultExt,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EMAIL: &str = "alice@example.com";
const PASSWORD: &str = "correct horse battery staple";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo=info,session=info,content=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Adapter selection: PostgreSQL when configured, in-memory otherwise
    match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await
                .map_app_err(ErrorKind::ServiceUnavailable, "Could not reach the database")?;
            tracing::info!("Connected to database");

            run_walkthrough(
                Arc::new(PgProfileStore::new(pool.clone())),
                Arc::new(PgContentStore::new(pool)),
            )
            .await
        }
        Err(_) => {
            tracing::info!("DATABASE_URL not set, using in-memory stores");
            run_walkthrough(
                Arc::new(MemoryProfileStore::new()),
                Arc::new(MemoryContentStore::new()),
            )
            .await
        }
    }
}

/// One end-to-end pass: bootstrap, sign-up, profile update, posting,
/// commenting, upvote toggling, revocation, and sign-out.
async fn run_walkthrough<P, C>(profiles: Arc<P>, content_store: Arc<C>) -> anyhow::Result<()>
where
    P: ProfileStore + Send + Sync + 'static,
    C: ContentStore + Send + Sync + 'static,
{
    let gateway = Arc::new(MemoryAuthGateway::new());
    let session = SessionStore::connect(Arc::clone(&gateway), profiles, ResolverConfig::default());
    let content = ContentService::new(content_store);

    // Bootstrap settles to Anonymous: nobody is signed in yet.
    let state = session.settled().await;
    tracing::info!(authenticated = state.is_authenticated(), "Session settled");

    // Sign up, then wait for the gateway event to land.
    let email = Email::new(EMAIL)?;
    session.sign_up_with_password(&email, PASSWORD).await?;
    let mut changes = session.watch();
    changes.wait_for(SessionState::is_authenticated).await?;

    let user = session
        .current_user()
        .ok_or_app_err(ErrorKind::Unauthorized, "Session vanished right after sign-up")?;
    tracing::info!(username = %user.username(), "Signed up");

    // Fill in the profile.
    session
        .update_profile(ProfilePatch {
            biography: Some("Keeps the coffee machine alive".to_string()),
            ..ProfilePatch::default()
        })
        .await?;

    let author = *user.id();

    // Publish a couple of posts.
    let first = content
        .create_post(
            PostDraft::new("Community board kickoff")
                .with_content("Say hello and introduce yourself."),
            &author,
        )
        .await?;
    let second = content
        .create_post(PostDraft::new("Reading list for the weekend"), &author)
        .await?;

    content
        .add_comment(first.id, "Hello from the walkthrough!", &author)
        .await?;

    // Toggle the upvote on, off, and on again; the store reports the
    // authoritative count each time.
    let outcome = content.toggle_upvote(second.id, &author).await?;
    tracing::info!(
        upvoted = outcome.upvoted,
        upvotes = outcome.upvotes,
        "First toggle"
    );
    let outcome = content.toggle_upvote(second.id, &author).await?;
    tracing::info!(
        upvoted = outcome.upvoted,
        upvotes = outcome.upvotes,
        "Second toggle undoes the first"
    );
    content.toggle_upvote(second.id, &author).await?;

    // Listings: newest first, then by score, annotated for the viewer.
    let newest = content
        .list_posts(&PostFilter::newest(), Some(&author))
        .await?;
    for post in &newest {
        tracing::info!(
            title = %post.title,
            upvotes = post.upvotes,
            has_upvoted = post.has_upvoted,
            "Listed"
        );
    }
    let popular = content
        .list_posts(&PostFilter::popular(), Some(&author))
        .await?;
    if let Some(top) = popular.first() {
        tracing::info!(title = %top.title, upvotes = top.upvotes, "Top post");
    }

    // Single-post view joins the comments.
    let detail = content.get_post(first.id, Some(&author)).await?;
    tracing::info!(
        title = %detail.post.title,
        comments = detail.comments.len(),
        "Post detail"
    );

    // Amend the first post.
    content
        .update_post(
            first.id,
            PostPatch {
                title: Some("Community board kickoff (week 2)".to_string()),
                ..PostPatch::default()
            },
        )
        .await?;

    // Server-side revocation pushes the session back to Anonymous.
    gateway.revoke_session();
    changes.wait_for(|state| !state.is_authenticated()).await?;
    tracing::info!("Session revoked by the auth service");

    // Sign back in, then leave cleanly.
    session.sign_in_with_password(&email, PASSWORD).await?;
    changes.wait_for(SessionState::is_authenticated).await?;
    session.sign_out().await;
    tracing::info!(
        authenticated = session.current().is_authenticated(),
        "Walkthrough finished"
    );

    session.shutdown();
    Ok(())
}

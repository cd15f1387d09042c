//! HTTP server for the listing and post views

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::BlogConfig;
use crate::helpers::{html, listing_url, url_for};
use crate::repository::{PostRepository, RepoError};
use crate::view::{ListingSnapshot, PostView};
use crate::Blog;

/// Server state
pub struct ServerState {
    pub config: BlogConfig,
    pub repo: PostRepository,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

impl SearchParams {
    fn query(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }
}

/// Build the router for the blog routes
pub fn router(state: Arc<ServerState>) -> Router {
    let blog_dir = state.config.blog_dir.trim_matches('/').to_string();
    let listing = url_for(&state.config, &blog_dir);
    let post = url_for(&state.config, &format!("{}/:slug", blog_dir));
    let api_posts = url_for(&state.config, "api/posts");
    let api_post = url_for(&state.config, "api/posts/:slug");

    Router::new()
        .route(&url_for(&state.config, ""), get(index_handler))
        .route(&listing, get(listing_handler))
        .route(&post, get(post_handler))
        .route(&api_posts, get(api_listing_handler))
        .route(&api_post, get(api_post_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let repo = blog.repository().await?;
    let state = Arc::new(ServerState {
        config: blog.config.clone(),
        repo,
    });
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!(
        "Blog running at http://{}:{}{}",
        ip,
        port,
        listing_url(&blog.config, None)
    );
    println!("Press Ctrl+C to stop.");
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// HTTP status for a repository failure
pub fn status_for(err: &RepoError) -> StatusCode {
    match err {
        RepoError::NotFound { .. } => StatusCode::NOT_FOUND,
        RepoError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_page(config: &BlogConfig, err: &RepoError) -> Response {
    let page = match err {
        RepoError::NotFound { .. } => html::render_not_found(config),
        RepoError::Fetch(e) => {
            tracing::error!("Failed to fetch posts: {}", e);
            html::render_error(config)
        }
    };
    (status_for(err), Html(page)).into_response()
}

fn error_json(err: &RepoError) -> Response {
    if let RepoError::Fetch(e) = err {
        tracing::error!("Failed to fetch posts: {}", e);
    }
    let body = serde_json::json!({ "error": err.to_string() });
    (status_for(err), Json(body)).into_response()
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Redirect {
    Redirect::temporary(&listing_url(&state.config, None))
}

async fn listing_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match ListingSnapshot::fetch(&state.repo).await {
        Ok(snapshot) => {
            let view = snapshot.view(&state.config, params.query());
            Html(html::render_listing(&state.config, &view)).into_response()
        }
        Err(e) => error_page(&state.config, &e),
    }
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    match PostView::fetch(&state.repo, &state.config, &slug).await {
        Ok(view) => Html(html::render_post(&state.config, &view)).into_response(),
        Err(e) => error_page(&state.config, &e),
    }
}

async fn api_listing_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match ListingSnapshot::fetch(&state.repo).await {
        Ok(snapshot) => Json(snapshot.view(&state.config, params.query())).into_response(),
        Err(e) => error_json(&e),
    }
}

async fn api_post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    match PostView::fetch(&state.repo, &state.config, &slug).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_json(&e),
    }
}

//! Eco Agent BD dashboard
//!
//! Six pages behind a sidebar, rendered server-side with HTMX fragments and
//! inline SVG charts.
//!
//! - **Weather**: current conditions, trend charts, simulated emission map
//! - **Calculator / Breakdown**: the emission estimator with two presentations
//! - **Search / Assistant**: instant answers and local-LLM advice with speech
//! - **Tasks & Rewards**: per-cookie daily tasks and a once-a-day quiz

pub mod charts;
pub mod handlers;
pub mod map;
pub mod routes;
pub mod state;
pub mod templates;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        .route("/", get(handlers::index))
        .route("/weather", get(handlers::weather_page))
        .route("/calculator", get(handlers::calculator_page))
        .route("/breakdown", get(handlers::breakdown_page))
        .route("/search", get(handlers::search_page))
        .route("/assistant", get(handlers::assistant_page))
        .route("/tasks", get(handlers::tasks_page))
        .route("/static/style.css", get(handlers::style_css));

    // HTMX partials
    let partials = Router::new()
        .route("/htmx/weather", get(handlers::weather_panel))
        .route("/htmx/calculator", post(handlers::calculator_submit))
        .route("/htmx/breakdown", post(handlers::breakdown_submit))
        .route("/htmx/search", post(handlers::search_submit))
        .route("/htmx/assistant", post(handlers::assistant_submit))
        .route("/htmx/tasks/complete", post(handlers::task_complete))
        .route("/htmx/tasks/add", post(handlers::task_add))
        .route("/htmx/quiz", post(handlers::quiz_submit))
        .route("/audio/:id", get(handlers::audio));

    let api = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/estimate", post(handlers::api_estimate))
        .route("/api/breakdown", post(handlers::api_breakdown));

    Router::new()
        .merge(pages)
        .merge(partials)
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CookieManagerLayer::new()),
        )
        .with_state(state)
}

/// Start the web server
pub async fn serve(state: Arc<AppState>, addr: &str) -> std::io::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Eco Agent BD listening on http://{}", addr);

    axum::serve(listener, app).await
}

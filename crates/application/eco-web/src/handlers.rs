//! Route handlers for the dashboard

use axum::{
    extract::{Form, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use eco_core::{find_city, Activity, ActivityUsage, Rounding};
use eco_ollama::OllamaError;
use eco_search::SearchError;
use eco_session::{quiz, QuizQuestion, SessionError, TaskList};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::map;
use crate::routes::Page;
use crate::state::AppState;
use crate::templates::{self, Notice};

/// Cookie holding the session id
pub const SESSION_COOKIE: &str = "eco_session";

/// Upper bound on the LLM probe inside the health check
const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

// ============== Helpers ==============

/// Session id from the cookie, issuing a fresh one when absent or invalid
pub fn session_id(cookies: &Cookies) -> Uuid {
    if let Some(id) = cookies
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
    {
        return id;
    }

    let id = Uuid::new_v4();
    let mut cookie = Cookie::new(SESSION_COOKIE, id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookies.add(cookie);
    tracing::debug!(%id, "issued session cookie");
    id
}

/// Usage from form fields named by [`Activity::field`]. Missing or
/// unparsable values fall back to the dashboard default; everything is then
/// clamped into range.
pub fn usage_from_form(form: &HashMap<String, String>) -> ActivityUsage {
    let mut usage = ActivityUsage::dashboard_defaults();
    for activity in Activity::ALL {
        if let Some(value) = form
            .get(activity.field())
            .and_then(|v| v.trim().parse::<f64>().ok())
        {
            usage.set(activity, value);
        }
    }
    usage.clamped()
}

fn last_updated() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn page(page: Page, body: &str) -> Html<String> {
    Html(templates::page_html(page, body, &last_updated()))
}

// ============== Page Handlers ==============

/// Index redirects to the first page
pub async fn index() -> impl IntoResponse {
    Redirect::to(Page::Weather.path())
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
    pub seed: Option<u64>,
}

pub async fn weather_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> impl IntoResponse {
    let city = query
        .city
        .unwrap_or_else(|| eco_core::default_city().name.to_string());
    let content = weather_content(&state, &city, query.seed).await;
    page(
        Page::Weather,
        &templates::weather_body_html(&city, query.seed, &content),
    )
}

/// Report fragment for the selected city
pub async fn weather_panel(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> impl IntoResponse {
    let city = query
        .city
        .unwrap_or_else(|| eco_core::default_city().name.to_string());
    Html(weather_content(&state, &city, query.seed).await)
}

async fn weather_content(state: &AppState, city: &str, seed: Option<u64>) -> String {
    let city = match find_city(city) {
        Ok(city) => city,
        Err(e) => return templates::weather_error_html(&e.to_string()),
    };

    match state.weather.fetch(city.name).await {
        Ok(report) => {
            let points = map::simulate(&mut map::rng_for(seed));
            templates::weather_report_html(&report, &points)
        }
        Err(e) => {
            tracing::warn!(city = city.name, "weather unavailable: {}", e);
            templates::weather_error_html(&e.to_string())
        }
    }
}

pub async fn calculator_page() -> impl IntoResponse {
    page(
        Page::Calculator,
        &templates::calculator_body_html(&ActivityUsage::dashboard_defaults()),
    )
}

/// Calculate emissions from the submitted inputs
pub async fn calculator_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let usage = usage_from_form(&form);
    let result = state.estimator.estimate_rounded(&usage, Rounding::CALCULATOR);
    tracing::debug!(monthly_tons = result.monthly_tons, "calculated emissions");
    Html(templates::calculator_result_html(&result))
}

pub async fn breakdown_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let usage = ActivityUsage::dashboard_defaults();
    let initial = templates::breakdown_result_html(&state.estimator.breakdown_table(&usage));
    page(
        Page::Breakdown,
        &templates::breakdown_body_html(&usage, &initial),
    )
}

pub async fn breakdown_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let table = state.estimator.breakdown_table(&usage_from_form(&form));
    Html(templates::breakdown_result_html(&table))
}

pub async fn search_page() -> impl IntoResponse {
    page(Page::Search, &templates::search_body_html())
}

#[derive(Debug, Deserialize)]
pub struct SearchInput {
    #[serde(default)]
    pub query: String,
}

pub async fn search_submit(
    State(state): State<Arc<AppState>>,
    Form(input): Form<SearchInput>,
) -> impl IntoResponse {
    let html = match state.search.search(&input.query).await {
        Ok(outcome) => templates::search_result_html(&outcome),
        Err(SearchError::EmptyQuery) => {
            Notice::Warning("❗ Please enter a search term.".into()).html()
        }
        Err(e) => {
            tracing::warn!("search failed: {}", e);
            Notice::Error(format!("🚫 Search error: {}", e)).html()
        }
    };
    Html(html)
}

pub async fn assistant_page() -> impl IntoResponse {
    page(Page::Assistant, &templates::assistant_body_html())
}

#[derive(Debug, Deserialize)]
pub struct AskInput {
    #[serde(default)]
    pub question: String,
}

/// Ask the advisor, then voice the reply
pub async fn assistant_submit(
    State(state): State<Arc<AppState>>,
    Form(input): Form<AskInput>,
) -> impl IntoResponse {
    let advice = match state.advisor.advise(&input.question).await {
        Ok(advice) => advice,
        Err(e @ OllamaError::EmptyQuestion) => return Html(Notice::Warning(e.to_string()).html()),
        Err(e @ OllamaError::EmptyReply) => {
            return Html(Notice::Warning(format!("⚠️ {}", e)).html())
        }
        Err(e) => {
            tracing::warn!(provider = state.advisor.name(), "advice failed: {}", e);
            return Html(Notice::Error(format!("❌ {}", e)).html());
        }
    };

    let audio = match state.speech.synthesize(&advice.text).await {
        Ok(clip) => Ok(state.stash_clip(clip).await),
        Err(e) => {
            tracing::warn!("speech failed: {}", e);
            Err(e.to_string())
        }
    };

    Html(templates::advice_html(&advice, audio))
}

/// Serve a clip once, then forget it
pub async fn audio(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    let Some(clip) = state.take_clip(id).await else {
        return (StatusCode::NOT_FOUND, "Audio clip not found").into_response();
    };

    match clip.take().await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "audio/mpeg")], bytes).into_response(),
        Err(e) => {
            tracing::warn!(%id, "audio clip unreadable: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Audio error: {}", e)).into_response()
        }
    }
}

// ============== Tasks & Rewards ==============

#[derive(Debug, Deserialize)]
pub struct TasksQuery {
    pub seed: Option<u64>,
}

fn quiz_order(seed: Option<u64>) -> Vec<&'static QuizQuestion> {
    match seed {
        Some(seed) => quiz::shuffled_seeded(seed),
        None => quiz::shuffled(&mut rand::thread_rng()),
    }
}

/// Render the tasks panel for a session after `action` has run
async fn tasks_panel<F>(state: &AppState, id: Uuid, seed: Option<u64>, action: F) -> String
where
    F: FnOnce(&mut eco_session::SessionContext) -> Option<Notice>,
{
    let today = state.today();
    let (ctx, notice) = state
        .sessions
        .update(id, today, |ctx| {
            let notice = action(ctx);
            (ctx.clone(), notice)
        })
        .await;
    let questions = quiz_order(seed);
    templates::tasks_panel_html(&ctx, ctx.quiz_available(today), &questions, notice.as_ref())
}

pub async fn tasks_page(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Query(query): Query<TasksQuery>,
) -> impl IntoResponse {
    let id = session_id(&cookies);
    let panel = tasks_panel(&state, id, query.seed, |_| None).await;
    page(Page::Tasks, &templates::tasks_body_html(&panel))
}

#[derive(Debug, Deserialize)]
pub struct CompleteInput {
    pub list: String,
    pub index: usize,
}

pub async fn task_complete(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(input): Form<CompleteInput>,
) -> impl IntoResponse {
    let id = session_id(&cookies);
    let list = match input.list.as_str() {
        "custom" => TaskList::Custom,
        _ => TaskList::Daily,
    };
    let panel = tasks_panel(&state, id, None, |ctx| {
        match ctx.complete_task(list, input.index) {
            Ok(true) => Some(Notice::Success("🌱 Task completed! +1 point".into())),
            Ok(false) => None,
            Err(e) => Some(Notice::Warning(e.to_string())),
        }
    })
    .await;
    Html(panel)
}

#[derive(Debug, Deserialize)]
pub struct NewTaskInput {
    #[serde(default)]
    pub task: String,
}

pub async fn task_add(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(input): Form<NewTaskInput>,
) -> impl IntoResponse {
    let id = session_id(&cookies);
    let panel = tasks_panel(&state, id, None, |ctx| {
        if ctx.add_custom_task(&input.task) {
            None
        } else {
            Some(Notice::Warning("Please enter a task.".into()))
        }
    })
    .await;
    Html(panel)
}

/// Answers arrive as `q<id>=<option>`
fn quiz_answers(form: &HashMap<String, String>) -> HashMap<usize, String> {
    form.iter()
        .filter_map(|(k, v)| {
            let id = k.strip_prefix('q')?.parse().ok()?;
            Some((id, v.clone()))
        })
        .collect()
}

pub async fn quiz_submit(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let id = session_id(&cookies);
    let today = state.today();
    let answers = quiz_answers(&form);
    let panel = tasks_panel(&state, id, None, |ctx| match ctx.submit_quiz(&answers, today) {
        Ok(score) => {
            tracing::info!(%id, score, "quiz submitted");
            Some(Notice::Success(format!(
                "🎉 You scored {} points in today's quiz!",
                score
            )))
        }
        Err(e @ SessionError::QuizAlreadyTaken { .. }) => Some(Notice::Info(e.to_string())),
        Err(e) => Some(Notice::Warning(e.to_string())),
    })
    .await;
    Html(panel)
}

// ============== API Handlers ==============

/// Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let llm = match tokio::time::timeout(HEALTH_PROBE_TIMEOUT, state.advisor.health_check()).await
    {
        Ok(status) => serde_json::to_value(status).unwrap_or_default(),
        Err(_) => serde_json::json!({ "status": "unavailable", "detail": "probe timed out" }),
    };

    Json(serde_json::json!({
        "status": "healthy",
        "service": "eco-web",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
        "sessions": state.sessions.len().await,
        "llm": {
            "provider": state.advisor.name(),
            "model": state.advisor.model(),
            "health": llm
        }
    }))
}

/// Rounded estimate for a JSON usage body; omitted fields count as zero
pub async fn api_estimate(
    State(state): State<Arc<AppState>>,
    Json(usage): Json<ActivityUsage>,
) -> impl IntoResponse {
    let usage = usage.clamped();
    Json(serde_json::json!({
        "usage": usage,
        "result": state.estimator.estimate_rounded(&usage, Rounding::CALCULATOR),
    }))
}

/// Breakdown table and pie shares for a JSON usage body
pub async fn api_breakdown(
    State(state): State<Arc<AppState>>,
    Json(usage): Json<ActivityUsage>,
) -> impl IntoResponse {
    let table = state.estimator.breakdown_table(&usage.clamped());
    let pie = table.pie_shares();
    Json(serde_json::json!({
        "table": table,
        "pie": pie,
    }))
}

/// CSS stylesheet
pub async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], templates::STYLE_CSS)
}

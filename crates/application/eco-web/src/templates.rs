//! HTML templates for the Eco Agent BD dashboard
//!
//! Uses HTMX for server-driven reactivity without JavaScript frameworks.
//! Every page is a sidebar layout around one content area; forms post to
//! `/htmx/*` routes and swap the returned fragment in place.

use eco_core::{Activity, ActivityUsage, BreakdownTable, EmissionResult, CITIES};
use eco_ollama::Advice;
use eco_search::SearchOutcome;
use eco_session::{EcoTask, QuizQuestion, SessionContext, TaskList};
use eco_weather::WeatherReport;
use uuid::Uuid;

use crate::charts;
use crate::map::{self, MapPoint};
use crate::routes::Page;

/// CSS styles
pub const STYLE_CSS: &str = r#"
:root {
    --bg-primary: #f6f8f4;
    --bg-secondary: #ffffff;
    --bg-tertiary: #eef3ec;
    --accent: #2e7d32;
    --accent-dim: #1b5e20;
    --text-primary: #1f2a1f;
    --text-secondary: #667166;
    --border: #d5dfd3;
    --danger: #c62828;
    --warning: #ef8f00;
    --success: #2e7d32;
    --info: #1565c0;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: 'Inter', 'Segoe UI', sans-serif;
    background: var(--bg-primary);
    color: var(--text-primary);
    min-height: 100vh;
    line-height: 1.6;
}

.app {
    display: grid;
    grid-template-columns: 260px 1fr;
    grid-template-rows: 1fr 40px;
    min-height: 100vh;
}

/* Sidebar */
.sidebar {
    background: var(--bg-secondary);
    border-right: 1px solid var(--border);
    padding: 20px 12px;
}

.logo {
    font-size: 1.4em;
    font-weight: bold;
    color: var(--accent);
    margin-bottom: 20px;
    padding: 0 8px;
}

.nav-item {
    display: block;
    color: var(--text-secondary);
    text-decoration: none;
    padding: 8px 12px;
    border-radius: 6px;
    margin-bottom: 4px;
    transition: all 0.2s;
}

.nav-item:hover, .nav-item.active {
    color: var(--accent);
    background: var(--bg-tertiary);
}

/* Main */
.main {
    padding: 24px 32px 64px;
    max-width: 1100px;
}

.main h1 {
    margin-bottom: 16px;
}

.main h2 {
    margin: 24px 0 8px;
    font-size: 1.2em;
}

.columns {
    display: grid;
    grid-template-columns: 1fr 1fr;
    gap: 12px 32px;
}

.field label {
    display: block;
    font-size: 0.9em;
    color: var(--text-secondary);
}

.field input, .text-input, select, textarea {
    width: 100%;
    background: var(--bg-secondary);
    border: 1px solid var(--border);
    border-radius: 6px;
    padding: 8px 12px;
    font-family: inherit;
    font-size: 1em;
}

textarea {
    min-height: 100px;
}

button {
    background: var(--accent);
    color: #fff;
    border: none;
    border-radius: 6px;
    padding: 8px 20px;
    font-weight: bold;
    cursor: pointer;
    margin-top: 12px;
}

button:hover {
    background: var(--accent-dim);
}

button.small {
    padding: 2px 10px;
    margin: 0;
    font-size: 0.85em;
}

/* Notices */
.notice {
    padding: 10px 14px;
    border-radius: 6px;
    margin: 12px 0;
    border-left: 4px solid;
}

.notice.success { background: rgba(46, 125, 50, 0.1); border-color: var(--success); }
.notice.info { background: rgba(21, 101, 192, 0.1); border-color: var(--info); }
.notice.warning { background: rgba(239, 143, 0, 0.12); border-color: var(--warning); }
.notice.error { background: rgba(198, 40, 40, 0.1); border-color: var(--danger); }

pre.detail {
    font-size: 0.85em;
    color: var(--text-secondary);
    white-space: pre-wrap;
}

.muted {
    color: var(--text-secondary);
}

/* Charts */
.chart {
    background: var(--bg-secondary);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 12px;
    margin: 12px 0;
}

.chart figcaption {
    font-weight: bold;
    margin-bottom: 8px;
}

.chart.pie {
    display: flex;
    gap: 24px;
    align-items: center;
}

.chart.pie svg {
    width: 240px;
}

.axis {
    stroke: var(--text-secondary);
    stroke-width: 1;
}

.axis-label {
    font-size: 11px;
    fill: var(--text-secondary);
}

.legend {
    list-style: none;
    font-size: 0.9em;
}

.swatch {
    display: inline-block;
    width: 12px;
    height: 12px;
    border-radius: 2px;
    margin-right: 6px;
}

.emission-map {
    width: 100%;
    max-width: 480px;
    border: 1px solid var(--border);
    border-radius: 8px;
}

.map-bg {
    fill: #e3ece8;
}

/* Tables */
table {
    border-collapse: collapse;
    width: 100%;
    margin: 12px 0;
}

th, td {
    text-align: left;
    padding: 6px 10px;
    border-bottom: 1px solid var(--border);
}

th {
    background: var(--bg-tertiary);
}

td.num {
    text-align: right;
    font-variant-numeric: tabular-nums;
}

/* Tasks */
.task {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 6px 0;
    border-bottom: 1px solid var(--border);
}

.task.done span {
    text-decoration: line-through;
    color: var(--text-secondary);
}

.quiz-question {
    margin: 12px 0;
}

.quiz-question label {
    display: block;
    margin-left: 12px;
}

details {
    margin: 8px 0;
    background: var(--bg-secondary);
    border: 1px solid var(--border);
    border-radius: 6px;
    padding: 8px 12px;
}

.htmx-indicator {
    display: none;
    color: var(--text-secondary);
}

.htmx-request .htmx-indicator, .htmx-request.htmx-indicator {
    display: inline;
}

/* Footer */
.footer {
    grid-column: 1 / -1;
    background: var(--bg-secondary);
    border-top: 1px solid var(--border);
    display: flex;
    align-items: center;
    justify-content: center;
    font-size: 0.85em;
    color: var(--text-secondary);
}
"#;

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Inline status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn html(&self) -> String {
        let (class, text) = match self {
            Notice::Success(t) => ("success", t),
            Notice::Info(t) => ("info", t),
            Notice::Warning(t) => ("warning", t),
            Notice::Error(t) => ("error", t),
        };
        format!("<div class=\"notice {}\">{}</div>", class, html_escape(text))
    }
}

// ============== Layout ==============

/// Full page: sidebar navigation, content, footer
pub fn page_html(page: Page, body: &str, updated: &str) -> String {
    let nav: String = Page::ALL
        .iter()
        .map(|p| {
            let active = if *p == page { " active" } else { "" };
            format!(
                "<a class=\"nav-item{}\" href=\"{}\">{}</a>",
                active,
                p.path(),
                p.label()
            )
        })
        .collect();

    format!(
"<!DOCTYPE html>
<html lang=\"en\">
<head>
    <meta charset=\"UTF-8\">
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
    <title>Eco Agent BD 🌿 - {label}</title>
    <link rel=\"stylesheet\" href=\"/static/style.css\">
    <script src=\"https://unpkg.com/htmx.org@1.9.10\"></script>
</head>
<body>
    <div class=\"app\">
        <aside class=\"sidebar\">
            <div class=\"logo\">🌿 Eco Agent BD</div>
            <nav>{nav}</nav>
        </aside>
        <main class=\"main\">
            <h1>{title}</h1>
            {body}
        </main>
        <footer class=\"footer\">
            <span>🌿 Eco Agent BD | 🕒 Last updated: {updated}</span>
        </footer>
    </div>
</body>
</html>",
        label = page.label(),
        nav = nav,
        title = page.title(),
        body = body,
        updated = html_escape(updated),
    )
}

// ============== Weather ==============

/// City selector plus the report area
pub fn weather_body_html(selected: &str, seed: Option<u64>, content: &str) -> String {
    let options: String = CITIES
        .iter()
        .map(|c| {
            let sel = if c.name.eq_ignore_ascii_case(selected) { " selected" } else { "" };
            let name = html_escape(c.name);
            format!("<option value=\"{}\"{}>{}</option>", name, sel, name)
        })
        .collect();
    let seed_input = seed
        .map(|s| format!("<input type=\"hidden\" name=\"seed\" value=\"{}\">", s))
        .unwrap_or_default();

    format!(
        "<form hx-get=\"/htmx/weather\" hx-target=\"#weather-content\" hx-trigger=\"change\" hx-indicator=\"#weather-loading\">
            <div class=\"field\">
                <label for=\"city\">Select a city for trend analysis:</label>
                <select id=\"city\" name=\"city\">{}</select>
            </div>
            {}
        </form>
        <span id=\"weather-loading\" class=\"htmx-indicator\">Loading weather...</span>
        <div id=\"weather-content\">{}</div>",
        options, seed_input, content
    )
}

/// Current conditions, trend charts and the emission map
pub fn weather_report_html(report: &WeatherReport, points: &[MapPoint]) -> String {
    let temps: Vec<(String, f64)> = report
        .trend
        .iter()
        .map(|p| (p.date.clone(), p.temperature))
        .collect();
    let humidity: Vec<(String, f64)> = report
        .trend
        .iter()
        .map(|p| (p.date.clone(), p.humidity))
        .collect();

    format!(
        "{}
        <h2>📈 Historical Temperature Trend</h2>
        {}
        <h2>💧 Historical Humidity Trend</h2>
        {}
        <h2>🗺️ Estimated Carbon Emission by City (Map View)</h2>
        {}",
        Notice::Success(format!("📍 {}", report.summary())).html(),
        charts::line_chart(
            &format!("{} Temperature Trend", report.city),
            &temps,
            "°C",
            "#e53935"
        ),
        charts::line_chart(
            &format!("{} Humidity Trend", report.city),
            &humidity,
            "%",
            "#1e88e5"
        ),
        map::render_svg(points)
    )
}

/// Shown instead of the report when the lookup fails
pub fn weather_error_html(detail: &str) -> String {
    format!(
        "{}<pre class=\"detail\">{}</pre>",
        Notice::Warning("⚠️ Weather data not available.".into()).html(),
        html_escape(detail)
    )
}

// ============== Calculator & Breakdown ==============

/// Number inputs for every activity, two columns
fn usage_inputs_html(usage: &ActivityUsage) -> String {
    let field = |a: Activity| {
        let range = a.input_range();
        let step = if a == Activity::Diet { "1" } else { "any" };
        format!(
            "<div class=\"field\">
                <label for=\"{name}\">{label}</label>
                <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\">
            </div>",
            name = a.field(),
            label = a.label(),
            min = range.min,
            max = range.max,
            step = step,
            value = usage.get(a)
        )
    };

    let (left, right) = Activity::ALL.split_at(6);
    format!(
        "<div class=\"columns\"><div>{}</div><div>{}</div></div>",
        left.iter().map(|a| field(*a)).collect::<String>(),
        right.iter().map(|a| field(*a)).collect::<String>()
    )
}

pub fn calculator_body_html(usage: &ActivityUsage) -> String {
    format!(
        "<form hx-post=\"/htmx/calculator\" hx-target=\"#calculator-result\">
            {}
            <button type=\"submit\">Calculate Emissions</button>
        </form>
        <div id=\"calculator-result\"></div>
        <h2>🌱 Tips to Reduce Emissions</h2>
        <details>
            <summary>💡 Smart Tips</summary>
            <ul>
                <li>🚶 Walk, cycle, or carpool for daily travel.</li>
                <li>💡 Use energy-efficient appliances.</li>
                <li>🍽️ Reduce food waste and try plant-based diets.</li>
                <li>🚿 Reduce water waste (shorter showers, fix leaks).</li>
                <li>🌍 Fly less and use alternatives when possible.</li>
            </ul>
        </details>
        <details>
            <summary>📈 Track Your Progress</summary>
            <ul>
                <li>📒 Keep a personal log of your monthly emissions.</li>
                <li>🏆 Set targets (e.g., reduce by 5% every month).</li>
                <li>📉 Measure reduction by comparing breakdowns.</li>
            </ul>
        </details>",
        usage_inputs_html(usage)
    )
}

/// Totals and the monthly breakdown list; expects an already rounded result
pub fn calculator_result_html(result: &EmissionResult) -> String {
    let rows: String = result
        .breakdown_rows()
        .iter()
        .map(|(a, tons)| format!("<li><strong>{}</strong>: {}</li>", a.name(), tons))
        .collect();

    format!(
        "<div class=\"notice success\">
            📆 <strong>Daily Emissions</strong>: {} tons<br>
            📅 <strong>Monthly Emissions</strong>: {} tons<br>
            📊 <strong>Yearly Emissions</strong>: {} tons
        </div>
        <h2>📌 Breakdown (Monthly Estimate in tons)</h2>
        <ul class=\"breakdown\">{}</ul>",
        result.daily_tons, result.monthly_tons, result.yearly_tons, rows
    )
}

pub fn breakdown_body_html(usage: &ActivityUsage, initial: &str) -> String {
    format!(
        "<p>Input your values to see the <strong>Daily, Monthly, and Yearly CO₂ emission</strong> summary:</p>
        <form hx-post=\"/htmx/breakdown\" hx-target=\"#breakdown-result\" hx-trigger=\"change, submit\">
            {}
            <button type=\"submit\">Update</button>
        </form>
        <div id=\"breakdown-result\">{}</div>",
        usage_inputs_html(usage),
        initial
    )
}

/// Summary, pie, grouped bars and the detailed table
pub fn breakdown_result_html(table: &BreakdownTable) -> String {
    let rows: String = table
        .rows
        .iter()
        .map(|r| {
            format!(
                "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                r.source.name(),
                r.daily_tons,
                r.monthly_tons,
                r.yearly_tons
            )
        })
        .collect();

    format!(
        "<div class=\"notice success\">
            🌍 <strong>Your Estimated Emissions</strong><br>
            🗓️ Daily: <code>{} tons CO₂</code><br>
            📆 Monthly: <code>{} tons CO₂</code><br>
            📅 Yearly: <code>{} tons CO₂</code>
        </div>
        <h2>📊 Monthly Emission Composition</h2>
        {}
        <h2>📊 Emission Comparison</h2>
        {}
        <details>
            <summary>📋 Detailed Emission Breakdown Table (tons)</summary>
            <table>
                <thead><tr><th>Source</th><th>Daily (tons)</th><th>Monthly (tons)</th><th>Yearly (tons)</th></tr></thead>
                <tbody>{}</tbody>
            </table>
        </details>",
        table.total_daily_tons,
        table.total_monthly_tons,
        table.total_yearly_tons,
        charts::pie_chart(&table.pie_shares()),
        charts::grouped_bar_chart(&table.rows),
        rows
    )
}

// ============== Search ==============

pub fn search_body_html() -> String {
    "<form hx-post=\"/htmx/search\" hx-target=\"#search-result\" hx-indicator=\"#search-loading\">
        <div class=\"field\">
            <label for=\"query\">Search eco-friendly topics:</label>
            <input class=\"text-input\" type=\"text\" id=\"query\" name=\"query\" autocomplete=\"off\">
        </div>
        <button type=\"submit\">Search DuckDuckGo</button>
        <span id=\"search-loading\" class=\"htmx-indicator\">Searching...</span>
    </form>
    <div id=\"search-result\"></div>"
        .to_string()
}

pub fn search_result_html(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Summary { text } => {
            format!("<p>🔹 <strong>Summary</strong>: {}</p>", html_escape(text))
        }
        SearchOutcome::Related { links } => {
            let items: String = links
                .iter()
                .map(|l| {
                    if is_web_link(&l.url) {
                        format!(
                            "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></li>",
                            html_escape(&l.url),
                            html_escape(&l.text)
                        )
                    } else {
                        format!("<li>{}</li>", html_escape(&l.text))
                    }
                })
                .collect();
            format!("<p>🔗 <strong>Related Links:</strong></p><ul>{}</ul>", items)
        }
        SearchOutcome::NoResults => {
            Notice::Info("📭 No relevant information found for your query.".into()).html()
        }
    }
}

/// Only http(s) URLs become clickable
fn is_web_link(raw: &str) -> bool {
    url::Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

// ============== Assistant ==============

pub fn assistant_body_html() -> String {
    "<form hx-post=\"/htmx/assistant\" hx-target=\"#assistant-result\" hx-indicator=\"#assistant-loading\">
        <div class=\"field\">
            <label for=\"question\">Ask something about eco-friendly practices, climate, Bangladesh policies, etc.</label>
            <textarea id=\"question\" name=\"question\"></textarea>
        </div>
        <button type=\"submit\">Get AI Answer</button>
        <span id=\"assistant-loading\" class=\"htmx-indicator\">Thinking...</span>
    </form>
    <div id=\"assistant-result\"></div>"
        .to_string()
}

/// Reply text, then either a player for the clip or the audio error
pub fn advice_html(advice: &Advice, audio: Result<Uuid, String>) -> String {
    let player = match audio {
        Ok(id) => format!(
            "<audio controls autoplay src=\"/audio/{}\" type=\"audio/mpeg\"></audio>",
            id
        ),
        Err(e) => Notice::Error(format!("Audio error: {}", e)).html(),
    };
    format!(
        "<p><strong>AI says:</strong> {}</p>
        <p class=\"muted\">{} · {} ms</p>
        {}",
        html_escape(&advice.text),
        html_escape(&advice.model),
        advice.latency_ms,
        player
    )
}

// ============== Tasks & Rewards ==============

fn task_row_html(list: TaskList, index: usize, task: &EcoTask) -> String {
    let list_name = match list {
        TaskList::Daily => "daily",
        TaskList::Custom => "custom",
    };
    let action = if task.done {
        "<span class=\"muted\">✔ Done</span>".to_string()
    } else {
        format!(
            "<form hx-post=\"/htmx/tasks/complete\" hx-target=\"#tasks-panel\">
                <input type=\"hidden\" name=\"list\" value=\"{}\">
                <input type=\"hidden\" name=\"index\" value=\"{}\">
                <button class=\"small\" type=\"submit\">Done</button>
            </form>",
            list_name, index
        )
    };
    format!(
        "<div class=\"task{}\"><span>{}</span>{}</div>",
        if task.done { " done" } else { "" },
        html_escape(&task.task),
        action
    )
}

fn quiz_html(questions: &[&QuizQuestion]) -> String {
    let items: String = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let options: String = q
                .options
                .iter()
                .enumerate()
                .map(|(j, opt)| {
                    format!(
                        "<label><input type=\"radio\" name=\"q{}\" value=\"{}\"{}> {}</label>",
                        q.id,
                        html_escape(opt),
                        if j == 0 { " checked" } else { "" },
                        html_escape(opt)
                    )
                })
                .collect();
            format!(
                "<div class=\"quiz-question\"><p><strong>Q{}. {}</strong></p>{}</div>",
                i + 1,
                html_escape(q.question),
                options
            )
        })
        .collect();

    format!(
        "<form hx-post=\"/htmx/quiz\" hx-target=\"#tasks-panel\">{}<button type=\"submit\">Submit Quiz</button></form>",
        items
    )
}

/// Everything below the heading; swapped as a whole after each action
pub fn tasks_panel_html(
    ctx: &SessionContext,
    quiz_open: bool,
    questions: &[&QuizQuestion],
    notice: Option<&Notice>,
) -> String {
    let daily: String = ctx
        .daily_tasks
        .iter()
        .enumerate()
        .map(|(i, t)| task_row_html(TaskList::Daily, i, t))
        .collect();
    let custom: String = if ctx.custom_tasks.is_empty() {
        "<p class=\"muted\">No custom tasks yet.</p>".to_string()
    } else {
        ctx.custom_tasks
            .iter()
            .enumerate()
            .map(|(i, t)| task_row_html(TaskList::Custom, i, t))
            .collect()
    };
    let quiz = if quiz_open {
        quiz_html(questions)
    } else {
        Notice::Info(format!(
            "✅ You already completed today's quiz. You earned: {} points.",
            ctx.quiz_score
        ))
        .html()
    };

    format!(
        "{notice}
        <h2>📝 Today's Eco Tasks</h2>
        <h3>📌 Assigned Tasks</h3>
        {daily}
        <h3>➕ Add Your Own Task</h3>
        <form hx-post=\"/htmx/tasks/add\" hx-target=\"#tasks-panel\">
            <input class=\"text-input\" type=\"text\" name=\"task\" placeholder=\"Enter your own eco task\" autocomplete=\"off\">
            <button type=\"submit\">Add Task</button>
        </form>
        <h3>📋 Custom Task List</h3>
        {custom}
        <hr>
        <h2>🌱 Environmental Awareness Quiz ({count} Questions)</h2>
        {quiz}
        <hr>
        {rewards}",
        notice = notice.map(Notice::html).unwrap_or_default(),
        daily = daily,
        custom = custom,
        count = questions.len(),
        quiz = quiz,
        rewards = Notice::Success(format!("🏆 Total Rewards Earned: {} points", ctx.rewards)).html(),
    )
}

pub fn tasks_body_html(panel: &str) -> String {
    format!("<div id=\"tasks-panel\">{}</div>", panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use eco_core::{EmissionEstimator, Rounding};
    use eco_search::RelatedLink;
    use eco_weather::{CurrentConditions, TrendPoint};

    fn report() -> WeatherReport {
        WeatherReport {
            city: "Sylhet".into(),
            current: CurrentConditions {
                temp_c: "27".into(),
                description: "Light rain".into(),
                humidity: "90".into(),
            },
            trend: vec![
                TrendPoint {
                    date: "2025-06-01".into(),
                    temperature: 27.0,
                    humidity: 88.0,
                },
                TrendPoint {
                    date: "2025-06-02".into(),
                    temperature: 28.0,
                    humidity: 85.0,
                },
            ],
        }
    }

    #[test]
    fn test_layout_marks_active_page() {
        let html = page_html(Page::Search, "<p>body</p>", "2025-06-01 10:00:00");
        assert!(html.contains("class=\"nav-item active\" href=\"/search\""));
        assert!(html.contains("Last updated: 2025-06-01 10:00:00"));
        assert_eq!(html.matches("class=\"nav-item").count(), 6);
    }

    #[test]
    fn test_weather_report_has_charts_and_map() {
        let points = map::simulate(&mut map::rng_for(Some(3)));
        let html = weather_report_html(&report(), &points);
        assert!(html.contains("Sylhet: 27°C | Light rain | Humidity: 90%"));
        assert!(html.contains("Sylhet Temperature Trend"));
        assert!(html.contains("Sylhet Humidity Trend"));
        assert_eq!(html.matches("<svg").count(), 3);
    }

    #[test]
    fn test_weather_error_has_no_charts() {
        let html = weather_error_html("Missing field in weather response: current_condition.0");
        assert!(html.contains("Weather data not available."));
        assert!(html.contains("current_condition.0"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_city_selector() {
        let html = weather_body_html("Khulna", Some(9), "");
        assert_eq!(html.matches("<option").count(), CITIES.len());
        assert!(html.contains("<option value=\"Khulna\" selected>"));
        assert!(html.contains("name=\"seed\" value=\"9\""));
    }

    #[test]
    fn test_calculator_inputs_and_result() {
        let usage = ActivityUsage::dashboard_defaults();
        let body = calculator_body_html(&usage);
        for a in Activity::ALL {
            assert!(body.contains(&format!("name=\"{}\"", a.field())));
        }
        assert!(body.contains("Smart Tips"));

        let result = EmissionEstimator::default().estimate_rounded(&usage, Rounding::CALCULATOR);
        let html = calculator_result_html(&result);
        assert!(html.contains("Monthly Emissions</strong>: 0.296 tons"));
        assert_eq!(html.matches("<li>").count(), 11);
    }

    #[test]
    fn test_breakdown_result() {
        let table = EmissionEstimator::default().breakdown_table(&ActivityUsage::dashboard_defaults());
        let html = breakdown_result_html(&table);
        assert!(html.contains(&format!("Monthly: <code>{} tons CO₂</code>", table.total_monthly_tons)));
        assert_eq!(html.matches("<tr><td>").count(), 11);
    }

    #[test]
    fn test_search_outcomes() {
        let html = search_result_html(&SearchOutcome::Related {
            links: vec![RelatedLink {
                text: "Solar <power>".into(),
                url: "https://duckduckgo.com/Solar".into(),
            }],
        });
        assert!(html.contains("Solar &lt;power&gt;"));
        assert!(search_result_html(&SearchOutcome::NoResults).contains("No relevant information"));
    }

    #[test]
    fn test_related_links_only_http_clickable() {
        let html = search_result_html(&SearchOutcome::Related {
            links: vec![
                RelatedLink {
                    text: "Mangroves".into(),
                    url: "http://duckduckgo.com/Mangroves".into(),
                },
                RelatedLink {
                    text: "Click me".into(),
                    url: "JavaScript:alert(1)".into(),
                },
                RelatedLink {
                    text: "Relative".into(),
                    url: "/c/Solar".into(),
                },
            ],
        });
        assert!(html.contains("href=\"http://duckduckgo.com/Mangroves\""));
        assert!(html.contains("<li>Click me</li>"));
        assert!(html.contains("<li>Relative</li>"));
        assert!(!html.to_lowercase().contains("javascript:"));
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_advice_with_audio_error() {
        let advice = Advice {
            text: "Use public transport.".into(),
            model: "mistral".into(),
            latency_ms: 12,
        };
        let html = advice_html(&advice, Err("HTTP 503".into()));
        assert!(html.contains("Use public transport."));
        assert!(html.contains("Audio error: HTTP 503"));
        assert!(!html.contains("<audio"));

        let id = Uuid::new_v4();
        let html = advice_html(&advice, Ok(id));
        assert!(html.contains(&format!("src=\"/audio/{}\"", id)));
    }

    #[test]
    fn test_tasks_panel_quiz_states() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut ctx = SessionContext::new(today);
        let questions = eco_session::quiz::shuffled_seeded(1);

        let open = tasks_panel_html(&ctx, true, &questions, None);
        assert!(open.contains("Submit Quiz"));
        assert_eq!(open.matches("class=\"quiz-question\"").count(), 10);
        assert!(open.contains("No custom tasks yet."));

        ctx.submit_quiz(&Default::default(), today).unwrap();
        ctx.complete_task(TaskList::Daily, 0).unwrap();
        let closed = tasks_panel_html(&ctx, false, &questions, Some(&Notice::Success("saved".into())));
        assert!(!closed.contains("Submit Quiz"));
        assert!(closed.contains("You already completed today&#39;s quiz. You earned: 0 points."));
        assert!(closed.contains("Total Rewards Earned: 1 points"));
        assert_eq!(closed.matches("✔ Done").count(), 1);
    }
}

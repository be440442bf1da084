//! Route definitions for the dashboard

/// All routes defined in the application
pub const ROUTES: &[(&str, &str, &str)] = &[
    // Page routes
    ("GET", "/", "Index - redirects to weather"),
    ("GET", "/weather", "Weather trend and emission map (?city=&seed=)"),
    ("GET", "/calculator", "Emission calculator"),
    ("GET", "/breakdown", "Emission breakdown"),
    ("GET", "/search", "Eco search"),
    ("GET", "/assistant", "Eco AI assistant"),
    ("GET", "/tasks", "Daily tasks, quiz and rewards (?seed=)"),

    // HTMX partial routes
    ("GET", "/htmx/weather", "Weather report for a city"),
    ("POST", "/htmx/calculator", "Calculate emissions"),
    ("POST", "/htmx/breakdown", "Recompute breakdown"),
    ("POST", "/htmx/search", "Execute search"),
    ("POST", "/htmx/assistant", "Ask the assistant"),
    ("POST", "/htmx/tasks/complete", "Mark a task done"),
    ("POST", "/htmx/tasks/add", "Add a custom task"),
    ("POST", "/htmx/quiz", "Submit today's quiz"),
    ("GET", "/audio/:id", "One-shot reply audio (MP3)"),

    // API routes
    ("GET", "/api/health", "Health check"),
    ("POST", "/api/estimate", "Emission estimate JSON"),
    ("POST", "/api/breakdown", "Breakdown table JSON"),

    // Static assets
    ("GET", "/static/style.css", "CSS stylesheet"),
];

/// Sidebar pages, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Weather,
    Calculator,
    Breakdown,
    Search,
    Assistant,
    Tasks,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Weather,
        Page::Calculator,
        Page::Breakdown,
        Page::Search,
        Page::Assistant,
        Page::Tasks,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Page::Weather => "/weather",
            Page::Calculator => "/calculator",
            Page::Breakdown => "/breakdown",
            Page::Search => "/search",
            Page::Assistant => "/assistant",
            Page::Tasks => "/tasks",
        }
    }

    /// Sidebar label
    pub fn label(self) -> &'static str {
        match self {
            Page::Weather => "🏙️ Weather",
            Page::Calculator => "🧮 Emission Calculator",
            Page::Breakdown => "📊 Emission Breakdown",
            Page::Search => "🔍 Eco Search",
            Page::Assistant => "🤖 Eco AI Assistant",
            Page::Tasks => "✅ Tasks & Rewards",
        }
    }

    /// Page heading
    pub fn title(self) -> &'static str {
        match self {
            Page::Weather => "🌍 Carbon Emission Map + Weather Trend",
            Page::Calculator => "🧮 CO₂ Emission Calculator",
            Page::Breakdown => "📊 Emission Breakdown",
            Page::Search => "🔍 Eco Search",
            Page::Assistant => "🤖 Ask Eco AI (Offline Model)",
            Page::Tasks => "✅ Daily Eco Tasks & Quiz",
        }
    }
}

/// Print all routes
pub fn print_routes() {
    println!("\nEco Agent BD Routes:");
    println!("{:-<60}", "");
    for (method, path, desc) in ROUTES {
        println!("{:6} {:30} {}", method, path, desc);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_page_is_routed() {
        for page in Page::ALL {
            assert!(
                ROUTES.iter().any(|(m, p, _)| *m == "GET" && *p == page.path()),
                "{:?} missing from route table",
                page
            );
        }
    }
}

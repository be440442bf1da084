//! Eco Agent BD CLI
//!
//! Runs the dashboard and exposes the estimator and collaborator clients
//! from the terminal.
//!
//! ```bash
//! eco serve                          # dashboard on 127.0.0.1:8501
//! eco estimate --elec 350 --cng 20   # footprint for custom usage
//! eco weather Sylhet
//! eco ask "How can I reduce plastic use?"
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eco_config::EcoConfig;
use eco_core::{find_city, Activity, ActivityUsage, EmissionEstimator, Rounding, CITIES};
use eco_ollama::{AdviceProvider, OllamaProvider};
use eco_search::{SearchClient, SearchOutcome};
use eco_weather::WeatherClient;
use eco_web::AppState;

#[derive(Parser)]
#[command(name = "eco")]
#[command(about = "Eco Agent BD - carbon footprint, weather and eco-advice for Bangladesh")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $ECO_CONFIG or ~/.config/eco-agent/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Listen address, overrides config
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Estimate daily, monthly and yearly emissions
    Estimate {
        #[command(flatten)]
        usage: UsageArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Per-source breakdown table
    Breakdown {
        #[command(flatten)]
        usage: UsageArgs,

        #[arg(long)]
        json: bool,
    },

    /// Current weather and trend for a city
    Weather {
        /// City name
        #[arg(default_value = "Dhaka")]
        city: String,
    },

    /// Instant-answer search
    Search {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Ask the local model for eco-advice
    Ask {
        /// Question
        question: Vec<String>,

        /// Only check that the model server is reachable
        #[arg(long)]
        check: bool,
    },

    /// List supported cities
    Cities,
}

/// Usage flags; omitted ones take the dashboard default
#[derive(Args, Debug, Default)]
struct UsageArgs {
    /// CNG (km/day)
    #[arg(long)]
    cng: Option<f64>,
    /// Bus (km/day)
    #[arg(long)]
    bus: Option<f64>,
    /// Uber (km/day)
    #[arg(long)]
    uber: Option<f64>,
    /// Bike (km/day)
    #[arg(long)]
    bike: Option<f64>,
    /// Motorbike (km/day)
    #[arg(long)]
    motorbike: Option<f64>,
    /// Air travel (km/month)
    #[arg(long)]
    air: Option<f64>,
    /// Electricity (kWh/month)
    #[arg(long)]
    elec: Option<f64>,
    /// LPG (kg/month)
    #[arg(long)]
    lpg: Option<f64>,
    /// Water (liters/day)
    #[arg(long)]
    water: Option<f64>,
    /// Meals per day
    #[arg(long)]
    meals: Option<u32>,
    /// Waste (kg/week)
    #[arg(long)]
    waste: Option<f64>,
}

impl UsageArgs {
    fn value(&self, activity: Activity) -> Option<f64> {
        match activity {
            Activity::Cng => self.cng,
            Activity::Bus => self.bus,
            Activity::Uber => self.uber,
            Activity::Bike => self.bike,
            Activity::Motorbike => self.motorbike,
            Activity::Air => self.air,
            Activity::Electricity => self.elec,
            Activity::Lpg => self.lpg,
            Activity::Water => self.water,
            Activity::Diet => self.meals.map(f64::from),
            Activity::Waste => self.waste,
        }
    }

    /// Dashboard defaults overlaid with the given flags, clamped into range
    fn to_usage(&self) -> ActivityUsage {
        let mut usage = ActivityUsage::dashboard_defaults();
        for activity in Activity::ALL {
            if let Some(value) = self.value(activity) {
                usage.set(activity, value);
            }
        }
        usage.clamped()
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "eco_web=info,tower_http=info,warn".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<EcoConfig> {
    match path {
        Some(path) => {
            let mut config = EcoConfig::from_file(path)?;
            config.apply_env_with(|key| std::env::var(key).ok())?;
            Ok(config)
        }
        None => Ok(EcoConfig::load()?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let config = load_config(cli.config.as_ref()).context("loading configuration")?;

    match cli.command {
        Commands::Serve { bind } => cmd_serve(config, bind).await,
        Commands::Estimate { usage, json } => cmd_estimate(&config, &usage, json),
        Commands::Breakdown { usage, json } => cmd_breakdown(&config, &usage, json),
        Commands::Weather { city } => cmd_weather(&config, &city).await,
        Commands::Search { query } => cmd_search(&config, &query.join(" ")).await,
        Commands::Ask { question, check } => cmd_ask(&config, &question.join(" "), check).await,
        Commands::Cities => cmd_cities(),
    }
}

async fn cmd_serve(config: EcoConfig, bind: Option<String>) -> Result<()> {
    let addr = bind.unwrap_or_else(|| config.bind.clone());

    println!();
    println!("  🌿 ECO AGENT BD v{}", env!("CARGO_PKG_VERSION"));
    println!("  =======================");

    let state = Arc::new(AppState::new(config));
    eco_web::routes::print_routes();
    println!("Server ready at http://{}", addr);
    println!();

    eco_web::serve(state, &addr)
        .await
        .with_context(|| format!("serving on {}", addr))
}

fn cmd_estimate(config: &EcoConfig, args: &UsageArgs, json: bool) -> Result<()> {
    let usage = args.to_usage();
    let result = EmissionEstimator::new(config.factor_table())
        .estimate_rounded(&usage, Rounding::CALCULATOR);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n  CO₂ EMISSIONS");
    println!("  =============");
    println!("  Daily:   {} tons", result.daily_tons);
    println!("  Monthly: {} tons", result.monthly_tons);
    println!("  Yearly:  {} tons", result.yearly_tons);
    println!();
    println!("  Breakdown (monthly, tons)");
    for (activity, tons) in result.breakdown_rows() {
        println!("    {:12} {}", activity.name(), tons);
    }
    println!();
    Ok(())
}

fn cmd_breakdown(config: &EcoConfig, args: &UsageArgs, json: bool) -> Result<()> {
    let table = EmissionEstimator::new(config.factor_table()).breakdown_table(&args.to_usage());

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!();
    println!("  {:12} {:>12} {:>12} {:>12} {:>7}", "Source", "Daily", "Monthly", "Yearly", "Share");
    println!("  {:-<60}", "");
    let shares = table.pie_shares();
    for row in &table.rows {
        let share = shares
            .iter()
            .find(|s| s.source == row.source)
            .map(|s| s.label())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:12} {:>12} {:>12} {:>12} {:>7}",
            row.source.name(),
            row.daily_tons,
            row.monthly_tons,
            row.yearly_tons,
            share
        );
    }
    println!("  {:-<60}", "");
    println!(
        "  {:12} {:>12} {:>12} {:>12}",
        "Total", table.total_daily_tons, table.total_monthly_tons, table.total_yearly_tons
    );
    println!();
    Ok(())
}

async fn cmd_weather(config: &EcoConfig, city: &str) -> Result<()> {
    let city = find_city(city)?;
    let client = WeatherClient::new(config.http_timeout()).with_endpoint(&config.weather_url);
    let report = client
        .fetch(city.name)
        .await
        .context("Weather data not available")?;

    println!("\n  📍 {}", report.summary());
    println!();
    println!("  {:12} {:>8} {:>10}", "Date", "Avg °C", "Humidity");
    for point in &report.trend {
        println!("  {:12} {:>8} {:>9}%", point.date, point.temperature, point.humidity);
    }
    println!();
    Ok(())
}

async fn cmd_search(config: &EcoConfig, query: &str) -> Result<()> {
    let client = SearchClient::new(config.http_timeout()).with_endpoint(&config.search_url);
    match client.search(query).await? {
        SearchOutcome::Summary { text } => println!("\n  Summary: {}\n", text),
        SearchOutcome::Related { links } => {
            println!("\n  Related Links:");
            for link in links {
                println!("  - {}\n    {}", link.text, link.url);
            }
            println!();
        }
        SearchOutcome::NoResults => println!("\n  No relevant information found for your query.\n"),
    }
    Ok(())
}

async fn cmd_ask(config: &EcoConfig, question: &str, check: bool) -> Result<()> {
    let provider = OllamaProvider::new(config.llm_timeout())
        .with_endpoint(&config.ollama_url)
        .with_model(&config.ollama_model);

    if check {
        let status = provider.health_check().await;
        println!("  {} ({}): {:?}", provider.name(), provider.model(), status);
        if !status.is_available() {
            anyhow::bail!("model server unavailable");
        }
        return Ok(());
    }

    let advice = provider.advise(question).await?;
    println!("\n  AI says: {}\n", advice.text);
    tracing::debug!(latency_ms = advice.latency_ms, "answered");
    Ok(())
}

fn cmd_cities() -> Result<()> {
    println!();
    for city in CITIES {
        println!("  {:14} {:>8.4} {:>8.4}", city.name, city.lat, city.lon);
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_usage_flags_overlay_defaults() {
        let cli = Cli::parse_from(["eco", "estimate", "--elec", "5000", "--meals", "2"]);
        let Commands::Estimate { usage, json } = cli.command else {
            panic!("expected estimate");
        };
        assert!(!json);
        let usage = usage.to_usage();
        assert_eq!(usage.electricity_kwh_per_month, 1000.0);
        assert_eq!(usage.meals_per_day, 2);
        assert_eq!(usage.cng_km_per_day, 10.0);
    }

    #[test]
    fn test_no_flags_is_dashboard_defaults() {
        assert_eq!(
            UsageArgs::default().to_usage(),
            ActivityUsage::dashboard_defaults()
        );
    }
}

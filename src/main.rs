use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use match_insights::api::routes::overview::AnalysisResponse;
use match_insights::api::state::AppState;
use match_insights::api::OutcomeBody;
use match_insights::calculate::ranking::{self, SortBy};
use match_insights::calculate::{
    aggregate_equipment, aggregate_synergies, analyze, apply_min_samples, filter_matches,
    InsightPolicy, StatsParams, SynergyScope,
};
use match_insights::config::{AnalysisConfig, AppConfig};
use match_insights::models::{GameModeFilter, Outcome};
use match_insights::report::text::{
    render_equipment_table, render_improvement, render_insight, render_strength,
    render_synergy_table,
};
use match_insights::report::{render_empty, render_report, ReportContext};
use match_insights::storage::{sample_matches, write_match_file, MatchSet, MatchStore};

#[derive(Parser)]
#[command(name = "match-insights")]
#[command(about = "Performance analytics for your auto-battler match history")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Match history file (JSON document or JSONL)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct FilterArgs {
    /// Game mode: all, solo or double-up
    #[arg(long)]
    mode: Option<GameModeFilter>,

    /// Most recent matches to include (0 for all)
    #[arg(long)]
    games: Option<usize>,

    /// Minimum games for an item to be shown
    #[arg(long)]
    min_item_games: Option<u32>,

    /// Minimum games for a trait to be shown
    #[arg(long)]
    min_trait_games: Option<u32>,

    /// Count only the first trait of each match
    #[arg(long)]
    primary_traits: bool,
}

impl FilterArgs {
    fn to_params(&self, defaults: &AnalysisConfig) -> StatsParams {
        let mut params = defaults.to_params();
        if let Some(mode) = self.mode {
            params.mode = mode;
        }
        if let Some(games) = self.games {
            params.max_matches = (games > 0).then_some(games);
        }
        if let Some(min) = self.min_item_games {
            params.min_equipment_games = min;
        }
        if let Some(min) = self.min_trait_games {
            params.min_synergy_games = Some(min);
        }
        if self.primary_traits {
            params.synergy_scope = SynergyScope::Primary;
        }
        params
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full performance dashboard
    Report {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the item performance table
    Items {
        #[command(flatten)]
        filter: FilterArgs,

        /// Sort by average placement (avg) or usage (games)
        #[arg(long, default_value = "avg")]
        sort: SortBy,

        /// Number of rows
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Print the trait performance table
    Traits {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of rows
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Print insights and takeaways
    Insights {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Write the built-in sample history to a file
    Sample {
        /// Output path (.json or .jsonl)
        #[arg(long)]
        out: PathBuf,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_matches(config: &AppConfig) -> Arc<MatchSet> {
    MatchStore::new(config.data_file.clone(), config.analysis.field_size).load()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_file) = &cli.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting match-insights v{}", env!("CARGO_PKG_VERSION"));

    let policy = InsightPolicy::default();

    match cli.command {
        Commands::Report { filter, json } => {
            let set = load_matches(&config);
            let params = filter.to_params(&config.analysis);
            let outcome = analyze(&set.matches, &params, &policy);

            if json {
                let body: OutcomeBody<AnalysisResponse> = outcome
                    .map(|analysis| AnalysisResponse::new(&set, analysis, params.field_size))
                    .into();
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                match outcome {
                    Outcome::Ready(analysis) => {
                        let ctx = ReportContext {
                            source: &set.source,
                            mode: params.mode,
                            field_size: params.field_size,
                        };
                        print!("{}", render_report(&analysis, &ctx));
                    }
                    Outcome::Empty(reason) => println!("{}", render_empty(reason, params.mode)),
                }
            }
        }
        Commands::Items { filter, sort, top } => {
            let set = load_matches(&config);
            let params = filter.to_params(&config.analysis);

            match filter_matches(&set.matches, &params) {
                Outcome::Ready(filtered) => {
                    let all = aggregate_equipment(filtered.iter().copied(), &params);
                    let shown = apply_min_samples(&all, params.min_equipment_games);
                    if shown.is_empty() {
                        println!(
                            "No item has {} or more games yet.",
                            params.min_equipment_games
                        );
                    } else {
                        let mut rows = ranking::sorted(&shown, sort);
                        rows.truncate(top);
                        print!("{}", render_equipment_table(&rows, params.field_size));
                    }
                }
                Outcome::Empty(reason) => println!("{}", render_empty(reason, params.mode)),
            }
        }
        Commands::Traits { filter, top } => {
            let set = load_matches(&config);
            let params = filter.to_params(&config.analysis);

            let outcome = filter_matches(&set.matches, &params)
                .and_then(|filtered| aggregate_synergies(filtered.iter().copied(), &params));
            match outcome {
                Outcome::Ready(stats) => {
                    let best: HashMap<String, _> = ranking::best_by_average(&stats, top)
                        .into_iter()
                        .map(|(name, stat)| (name.to_string(), stat.clone()))
                        .collect();
                    print!("{}", render_synergy_table(&best, params.field_size));
                }
                Outcome::Empty(reason) => println!("{}", render_empty(reason, params.mode)),
            }
        }
        Commands::Insights { filter } => {
            let set = load_matches(&config);
            let params = filter.to_params(&config.analysis);

            match analyze(&set.matches, &params, &policy) {
                Outcome::Ready(analysis) => {
                    if analysis.insights.is_empty() {
                        println!("No insights yet. Play a few more games!");
                    }
                    for insight in &analysis.insights {
                        println!("{}", render_insight(insight, params.field_size));
                    }
                    for strength in &analysis.takeaways.strengths {
                        println!("+ {}", render_strength(strength, params.field_size));
                    }
                    for improvement in &analysis.takeaways.improvements {
                        println!("- {}", render_improvement(improvement, params.field_size));
                    }
                }
                Outcome::Empty(reason) => println!("{}", render_empty(reason, params.mode)),
            }
        }
        Commands::Sample { out } => {
            let written = write_match_file(&out, &sample_matches())
                .with_context(|| format!("Failed to write sample to {:?}", out))?;
            tracing::info!("Wrote {} sample matches to {:?}", written, out);
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState::new(config);
            let app = match_insights::api::build_router(state);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard API: http://{}/api/health", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

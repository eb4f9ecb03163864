use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use petcare_stats::config::Config;
use petcare_stats::db::{self, PgStore};
use petcare_stats::energy;
use petcare_stats::logging::init_logging;
use petcare_stats::report;
use petcare_stats::series::{build_activity_series, build_weight_series, WeightPolicy};
use petcare_stats::window::{parse_anchor, resolve_window, today};

#[derive(Parser)]
#[command(name = "petcare-stats")]
#[command(about = "Weekly activity and weight statistics for pets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo data for the current week
    Seed,
    /// Import weight samples and/or activity sessions from CSV files
    Import {
        #[arg(long)]
        weights: Option<PathBuf>,
        #[arg(long)]
        activities: Option<PathBuf>,
    },
    /// Print the seven-day window around a date
    Window {
        #[arg(long)]
        anchor: Option<String>,
    },
    /// Estimate duration and calories for a single session
    Estimate {
        #[arg(long)]
        kind: String,
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Daily weight series for a pet
    Weight {
        #[arg(long)]
        pet: String,
        #[arg(long)]
        anchor: Option<String>,
        #[arg(long, value_enum, default_value_t = WeightPolicy::Each)]
        policy: WeightPolicy,
        #[arg(long)]
        json: bool,
    },
    /// Daily calorie and active-minute series for a pet
    Activity {
        #[arg(long)]
        pet: String,
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        anchor: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        pet: String,
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        anchor: Option<String>,
        #[arg(long, value_enum, default_value_t = WeightPolicy::Each)]
        policy: WeightPolicy,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn anchor_or_today(anchor: Option<&str>) -> anyhow::Result<NaiveDate> {
    match anchor {
        Some(raw) => Ok(parse_anchor(raw)?),
        None => Ok(today()),
    }
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let database_url = config
        .require_database_url()
        .context("DATABASE_URL must be set to a Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("invalid configuration")?;
    init_logging(config.log_format);

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&config).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect(&config).await?;
            let inserted = db::seed(&pool, today()).await?;
            println!("Seed data inserted ({inserted} new records).");
        }
        Commands::Import {
            weights,
            activities,
        } => {
            if weights.is_none() && activities.is_none() {
                anyhow::bail!("pass --weights and/or --activities");
            }
            let pool = connect(&config).await?;
            if let Some(csv) = weights {
                let inserted = db::import_weights_csv(&pool, &csv).await?;
                println!("Inserted {inserted} weight samples from {}.", csv.display());
            }
            if let Some(csv) = activities {
                let inserted = db::import_activities_csv(&pool, &csv).await?;
                println!("Inserted {inserted} activity sessions from {}.", csv.display());
            }
        }
        Commands::Window { anchor } => {
            let window = resolve_window(anchor_or_today(anchor.as_deref())?);
            println!("{} {}", window.start_iso(), window.end_iso());
        }
        Commands::Estimate {
            kind,
            weight,
            start,
            end,
        } => {
            let hours = energy::duration_hours_str(&start, &end)?;
            let kcal = energy::estimate_calories_str(&kind, weight, &start, &end)?;
            println!("{hours:.2} h, {kcal} kcal");
        }
        Commands::Weight {
            pet,
            anchor,
            policy,
            json,
        } => {
            let window = resolve_window(anchor_or_today(anchor.as_deref())?);
            let store = PgStore::new(connect(&config).await?);
            let series = build_weight_series(&store, &pet, window, policy)
                .await
                .context("weight statistics unavailable")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else {
                for (label, kg) in series.labels.iter().zip(&series.data) {
                    println!("{label:<5} {kg:>6.1}");
                }
            }
        }
        Commands::Activity {
            pet,
            weight,
            anchor,
            json,
        } => {
            let window = resolve_window(anchor_or_today(anchor.as_deref())?);
            let store = PgStore::new(connect(&config).await?);
            let series = build_activity_series(&store, &pet, weight, window)
                .await
                .context("activity statistics unavailable")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else {
                for ((label, kcal), minutes) in
                    series.labels.iter().zip(&series.kcal).zip(&series.minutes)
                {
                    println!("{label:<5} {kcal:>6} kcal {minutes:>5} min");
                }
            }
        }
        Commands::Report {
            pet,
            weight,
            anchor,
            policy,
            out,
        } => {
            let window = resolve_window(anchor_or_today(anchor.as_deref())?);
            let store = PgStore::new(connect(&config).await?);
            let (weights, activity) = tokio::try_join!(
                build_weight_series(&store, &pet, window, policy),
                build_activity_series(&store, &pet, weight, window),
            )
            .context("statistics unavailable")?;

            let report = report::build_report(&pet, window, &weights, &activity);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

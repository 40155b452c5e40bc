use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use mchart::{ClientConfig, MChart, ReturnType};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mchart-cli")]
#[command(about = "Fetch music charts from Billboard and other sources", long_about = None)]
struct Cli {
    /// JSON file with per-provider options (can also be set via MCHART_CONFIG env var)
    #[arg(long, env = "MCHART_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Format {
    /// Pretty-printed JSON
    Json,
    /// One line per chart or entry
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// List the charts of one provider, or of every provider
    List {
        /// Provider name, e.g. billboard
        provider: Option<String>,
    },
    /// Fetch a chart
    Get {
        /// Provider name, e.g. billboard
        provider: String,

        /// Chart name, e.g. hot-100
        chart: String,

        /// Publication date (YYYY-MM-DD) for historical charts
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Only show the top N entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClientConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ClientConfig::default(),
    };
    let mut client = MChart::with_config(config)?;

    match &cli.command {
        Commands::List { provider } => {
            let names = match provider {
                Some(name) => vec![name.clone()],
                None => client.providers(),
            };
            for name in names {
                let charts = client
                    .list_charts(&name, ReturnType::Model)?
                    .into_model()
                    .unwrap_or_default();
                match cli.format {
                    Format::Json => println!("{}", serde_json::to_string_pretty(&charts)?),
                    Format::Text => {
                        println!("{} ({} charts)", name, charts.len());
                        for chart in &charts {
                            println!("  [{}] {} - {}", chart.chart_type(), chart.title(), chart.url());
                        }
                    }
                }
            }
        }
        Commands::Get {
            provider,
            chart,
            date,
            limit,
        } => {
            let data = match date {
                Some(date) => {
                    client
                        .get_chart_by_date(provider, chart, *date, ReturnType::Model)
                        .await?
                }
                None => client.get_chart(provider, chart, ReturnType::Model).await?,
            };
            let Some(chart) = data.into_model() else {
                return Ok(());
            };
            let entries = match limit {
                Some(n) => chart.top(*n),
                None => chart.entries(),
            };

            match cli.format {
                Format::Json => {
                    let mut dict = chart.to_dict()?;
                    dict["entries"] = serde_json::to_value(entries)?;
                    println!("{}", serde_json::to_string_pretty(&dict)?);
                }
                Format::Text => {
                    println!(
                        "{} (week of {})",
                        chart.metadata().title(),
                        chart.published_date()
                    );
                    for entry in entries {
                        let movement = if entry.is_new() {
                            "NEW".to_string()
                        } else {
                            format!("LW {}", entry.last_week())
                        };
                        println!(
                            "{:>3}. {} - {} ({}, peak {}, {} wks)",
                            entry.rank(),
                            entry.title(),
                            entry.artist(),
                            movement,
                            entry.peak_position(),
                            entry.weeks_on_chart()
                        );
                    }
                }
            }
        }
    }

    client.close();
    Ok(())
}

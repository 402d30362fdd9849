use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Timelike;
use clap::{Parser, Subcommand};
use reststop_agents::AssistantAgent;
use reststop_core::{
    ChatInput, Coordinates, Preferences, RestroomType, SearchFilters, UnitSystem,
};
use reststop_observability::{init_tracing, AppMetrics};
use reststop_storage::{sample_restrooms, DatasetConfig, MemoryStore, COIMBATORE_CENTER};

#[derive(Debug, Parser)]
#[command(name = "reststop")]
#[command(about = "RestStop assistant CLI")]
struct Cli {
    /// Seed for the generated sample dataset.
    #[arg(long, env = "RESTSTOP_DATASET_SEED", default_value_t = 7)]
    seed: u64,

    /// Distance unit system: km/metric or mi/imperial.
    #[arg(long, env = "RESTSTOP_UNITS", default_value = "km")]
    units: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat with the assistant.
    Chat,
    /// Ask a single question and print the reply.
    Ask { text: String },
    /// Print ranked recommendations for a location.
    Recommend {
        #[arg(long, default_value_t = COIMBATORE_CENTER.lat)]
        lat: f64,
        #[arg(long, default_value_t = COIMBATORE_CENTER.lng)]
        lng: f64,
        #[arg(long)]
        accessibility: bool,
        #[arg(long)]
        baby_changing: bool,
        #[arg(long)]
        gender_neutral: bool,
    },
    /// List venues matching the given filters.
    List {
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        min_cleanliness: Option<f64>,
        #[arg(long)]
        max_distance: Option<f64>,
        /// Required amenity id; repeat for several.
        #[arg(long)]
        amenity: Vec<String>,
        #[arg(long)]
        open_now: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("reststop_cli");
    let cli = Cli::parse();

    let units: UnitSystem = cli.units.parse().context("invalid --units value")?;
    let agent = build_agent(cli.seed, units);

    match cli.command {
        Command::Chat => run_chat(agent).await?,
        Command::Ask { text } => {
            let reply = agent.handle_chat(ChatInput { text }).await?;
            println!("{}", reply.reply_text);
        }
        Command::Recommend {
            lat,
            lng,
            accessibility,
            baby_changing,
            gender_neutral,
        } => {
            let ranked = agent
                .recommend(
                    Coordinates { lat, lng },
                    &Preferences {
                        accessibility,
                        baby_changing,
                        gender_neutral,
                    },
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Command::List {
            kind,
            min_cleanliness,
            max_distance,
            amenity,
            open_now,
        } => {
            let mut filters = SearchFilters {
                min_cleanliness,
                max_distance,
                amenity_ids: amenity,
                open_now,
                ..SearchFilters::default()
            };
            if let Some(kind) = kind {
                filters
                    .kinds
                    .push(kind.parse::<RestroomType>().context("invalid --kind value")?);
            }

            let matched = agent.search(&filters).await?;
            println!("{}", serde_json::to_string_pretty(&matched)?);
        }
    }

    Ok(())
}

fn build_agent(seed: u64, units: UnitSystem) -> AssistantAgent<MemoryStore> {
    let dataset = sample_restrooms(&DatasetConfig {
        seed,
        user_location: COIMBATORE_CENTER,
        now_hour: chrono::Local::now().hour(),
        units,
    });

    AssistantAgent::new(
        Arc::new(MemoryStore::with_restrooms(dataset)),
        AppMetrics::shared(),
        units,
    )
}

async fn run_chat(agent: AssistantAgent<MemoryStore>) -> Result<()> {
    println!("RestStop assistant chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let reply = agent
            .handle_chat(ChatInput {
                text: message.to_string(),
            })
            .await?;

        println!("\n{}\n", reply.reply_text);

        if !reply.suggested_queries.is_empty() {
            println!("Try: \"{}\"\n", reply.suggested_queries.join("\" or \""));
        }
    }

    Ok(())
}

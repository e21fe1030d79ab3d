//! CLI frontend for the Nightfall narrative engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::content::ContentTable;
use commands::play::{OracleKind, PlayArgs};

#[derive(Parser)]
#[command(
    name = "nightfall",
    about = "Nightfall, a narrative vampire RPG for the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List races, classes, backgrounds, locations or haven upgrades
    Content {
        /// Table to show (default: all)
        #[arg(value_enum)]
        table: Option<ContentTable>,
    },

    /// Create a character and play through the nights
    Play {
        /// Character name
        #[arg(long)]
        name: String,

        /// Gender: male or female
        #[arg(long, default_value = "female")]
        gender: String,

        /// Race (e.g. Sanguine)
        #[arg(long)]
        race: String,

        /// Class (e.g. "Blood Knight")
        #[arg(long)]
        class: String,

        /// Mortal background (e.g. "Street Urchin")
        #[arg(long)]
        background: String,

        /// Six comma-separated attributes: strength, dexterity, charisma,
        /// fortitude, celerity, dominate (each 1-5, summing to 15)
        #[arg(long)]
        attributes: Option<String>,

        /// RNG seed for the scripted oracle
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Narrative oracle backend
        #[arg(long, value_enum, default_value = "scripted")]
        oracle: OracleKind,

        /// Base URL of the chat-completions server (chat oracle only)
        #[arg(long)]
        base_url: Option<String>,

        /// Model requested from the chat server (chat oracle only)
        #[arg(long)]
        model: Option<String>,

        /// Write the chronicle as Markdown to this file on exit
        #[arg(long)]
        chronicle: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Content { table } => commands::content::run(table),
        Commands::Play {
            name,
            gender,
            race,
            class,
            background,
            attributes,
            seed,
            oracle,
            base_url,
            model,
            chronicle,
        } => {
            commands::play::run(PlayArgs {
                name,
                gender,
                race,
                class,
                background,
                attributes,
                seed,
                oracle,
                base_url,
                model,
                chronicle,
            })
            .await
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

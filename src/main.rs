mod content;
mod dates;
mod guest;
mod server;
mod settings;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use settings::Settings;
use store::NotionClient;

#[derive(Parser)]
#[command(name = "guest_topics", about = "Podcast guest lookup backed by a Notion database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve GET /api/guest/:last_name
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Look up one guest and print the planned topics
    Lookup {
        /// Guest's last name
        surname: String,
    },
    /// Show the database columns and check the configured property names
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    let client = NotionClient::new(&settings).context("Failed to create Notion client")?;

    match cli.command {
        Commands::Serve { bind } => {
            let state = server::AppState {
                store: Arc::new(client),
                markers: Arc::new(settings.markers()),
            };
            server::serve(state, bind).await
        }
        Commands::Lookup { surname } => {
            let t0 = Instant::now();
            let found = guest::lookup_guest(&client, surname.trim(), &settings.markers())
                .await
                .with_context(|| format!("Lookup for {:?} failed", surname))?;

            let Some(guest) = found else {
                println!("Guest not found: {}", surname);
                return Ok(());
            };

            println!("Guest:     {} ({})", guest.name, guest.id);
            if let Some(date) = &guest.recording_date {
                let today = chrono::Local::now().date_naive();
                println!("Recording: {} ({})", date, dates::relative_label(date, today));
            }
            println!();
            match guest.page_content.as_deref() {
                Some(topics) if !topics.is_empty() => println!("{}", topics),
                _ => println!("No topics available yet."),
            }
            println!("\nDone in {:.1}s", t0.elapsed().as_secs_f64());
            Ok(())
        }
        Commands::Schema => {
            let schema = match client.retrieve_schema().await {
                Ok(schema) => schema,
                Err(e) => {
                    if let Some(hint) = e.hint() {
                        println!("{}", hint);
                    }
                    return Err(anyhow::Error::new(e).context("Failed to fetch database schema"));
                }
            };
            println!("Database: {}", schema.title);
            println!("\nColumns:");
            for (name, kind) in &schema.properties {
                println!("  • {} ({})", name, kind);
            }

            for (label, wanted) in [
                ("name", &settings.name_property),
                ("recording date", &settings.date_property),
            ] {
                if !schema.properties.iter().any(|(name, _)| name == wanted) {
                    println!("\nWarning: {} property {:?} not found", label, wanted);
                }
            }
            Ok(())
        }
    }
}

//! Causal Events CLI
//!
//! Command-line shell over [`GraphStore`]: every command loads the store from
//! the remote event service first. When the service is unreachable the
//! store falls back to the built-in sample graph and a warning is printed.
//!
//! ## Configuration
//!
//! - `CAUSAL_EVENTS_API_BASE`: API base URL (default: `http://localhost:8080/api`)
//! - `CAUSAL_EVENTS_TIMEOUT_SECS`: Request timeout (default: 10)
//! - `RUST_LOG`: Log level filter (default: warn)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin causal_events --features cli -- add --id 6 --data "Release" --parents "5"
//! cargo run --bin causal_events --features cli -- graph
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use causal_events::remote::{HttpRemoteStore, RemoteConfig};
use causal_events::{
    export, export_file_name, parse_event, parse_id, verify_lineage, DuplicatePolicy,
    EventRecord, GraphProjector, GraphStore, Refresh, StoreConfig, WritePolicy,
};

#[derive(Parser)]
#[command(name = "causal_events")]
#[command(about = "Record causal events and inspect the event graph")]
struct Cli {
    /// API base URL of the event service
    #[arg(long, env = "CAUSAL_EVENTS_API_BASE")]
    api_base: Option<String>,

    /// Merge new events locally instead of reloading after a write
    #[arg(long)]
    optimistic: bool,

    /// Submit events whose id is already present
    #[arg(long)]
    allow_duplicates: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all events
    List,
    /// Show one event and its parents
    Show {
        /// Event id
        id: String,
    },
    /// Record a new event
    Add {
        /// Event id (integer)
        #[arg(long)]
        id: String,
        /// Event payload
        #[arg(long)]
        data: String,
        /// Space separated parent ids; non-numeric tokens are ignored
        #[arg(long, default_value = "")]
        parents: String,
    },
    /// Show aggregate counts
    Stats,
    /// Show the text projection of the graph
    Graph,
    /// Write all events to a JSON file
    Export {
        /// Output path (default: causal-events-export-YYYY-MM-DD.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check parent links for cycles and dangling references
    Verify,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn report_refresh(refresh: &Refresh) {
    if let Some(cause) = refresh.warning() {
        eprintln!("Failed to load events: {cause}");
        if refresh.is_seeded() {
            eprintln!("Showing sample data.");
        }
    }
}

fn print_event(event: &EventRecord) {
    println!("#{}  {}", event.id(), event.data());
    if event.is_root() {
        println!("    Parents: none");
    } else {
        let parents: Vec<String> = event.parents().iter().map(ToString::to_string).collect();
        println!("    Parents: {}", parents.join(" "));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let remote_config = match cli.api_base {
        Some(api_base) => RemoteConfig::with_api_base(api_base),
        None => RemoteConfig::from_env(),
    };
    let config = StoreConfig {
        write_policy: if cli.optimistic {
            WritePolicy::Optimistic
        } else {
            WritePolicy::RefetchAfterWrite
        },
        duplicates: if cli.allow_duplicates {
            DuplicatePolicy::Allow
        } else {
            DuplicatePolicy::Reject
        },
    };
    let store = GraphStore::with_config(HttpRemoteStore::new(remote_config)?, config);

    report_refresh(&store.load().await);

    match cli.command {
        Command::List => {
            let events = store.all();
            if events.is_empty() {
                println!("No events found.");
            }
            for event in events.iter() {
                print_event(event);
            }
        }
        Command::Show { id } => {
            let id = parse_id(&id)?;
            match store.lineage(id) {
                Ok(lineage) => {
                    println!("Event ID: {}", lineage.event.id());
                    println!("Data: {}", lineage.event.data());
                    println!("Parent Events ({}):", lineage.event.parent_count());
                    if lineage.parents.is_empty() {
                        println!("  (no parent events)");
                    }
                    for parent in &lineage.parents {
                        match &parent.event {
                            Some(event) => println!("  Event #{}: {}", parent.id, event.data()),
                            None => println!("  Event #{} (not loaded)", parent.id),
                        }
                    }
                }
                Err(_) => {
                    eprintln!("Event not found.");
                    std::process::exit(1);
                }
            }
        }
        Command::Add { id, data, parents } => {
            let record = parse_event(&id, &data, &parents)?;
            let refresh = store.add(record).await?;
            report_refresh(&refresh);
            println!("Event added successfully!");
        }
        Command::Stats => {
            let stats = store.stats();
            println!("Total events:        {}", stats.total_events);
            println!("Total relationships: {}", stats.total_relationships);
            println!("Root events:         {}", stats.root_events);
            println!("Dangling parents:    {}", stats.dangling_parents);
        }
        Command::Graph => {
            let events = store.all();
            if events.is_empty() {
                println!("No events to visualize");
            } else {
                println!("{}", GraphProjector::render_text(&events));
            }
        }
        Command::Export { output } => {
            let path = output.unwrap_or_else(|| {
                PathBuf::from(export_file_name(chrono::Local::now().date_naive()))
            });
            std::fs::write(&path, export(&store.all()))?;
            println!("Data exported successfully to {}", path.display());
        }
        Command::Verify => {
            let report = verify_lineage(&store.all());
            if report.is_clean() {
                println!("No cycles or dangling parents.");
            }
            for cycle in &report.cycles {
                let ids: Vec<String> = cycle.iter().map(ToString::to_string).collect();
                println!("Cycle: {}", ids.join(", "));
            }
            for edge in &report.dangling {
                println!("Dangling parent: {edge}");
            }
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use pack_tally::api::{routes, AppState};
use pack_tally::{api, decode, KeyStore, MeasurementStore, Settings};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use warp::Filter;

#[derive(Parser)]
#[command(name = "pack-tally")]
#[command(about = "Decode measurement strings into package totals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Settings file (defaults to ./pack-tally.toml, then built-ins)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Human-readable log output instead of JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Decode one measurement string and print the totals as JSON
    Decode {
        /// The measurement string, taken verbatim
        input: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Decode { input } => {
            println!("{}", serde_json::to_string(&decode(&input))?);
            Ok(())
        }
        Command::Serve { config, pretty } => serve(config, pretty),
    }
}

#[tokio::main]
async fn serve(config: Option<PathBuf>, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    pack_tally::logging::setup_logging(pretty);

    let settings = Settings::load(config.as_deref())?;
    let keys = KeyStore::provision(&settings.keys)?;
    let store = MeasurementStore::open(&settings.storage.records_path);
    info!(records = %store.path().display(), "keys provisioned, store opened");

    let state = AppState::new(keys, store);
    let filter = routes::routes(state)
        .recover(api::handlers::handle_rejection)
        .with(warp::log("api"));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    info!("listening on {addr}");

    let (_bound, server) = warp::serve(filter).bind_with_graceful_shutdown(addr, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
    });
    server.await;
    Ok(())
}

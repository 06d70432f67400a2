//! TCP frontend for the Xanadu multiplayer text adventure.

mod error;
mod server;
mod wire;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xa_core::map::{DEFAULT_MAP, Map};
use xa_engine::GameConfig;

use crate::error::ServerResult;

#[derive(Parser)]
#[command(
    name = "xanadu",
    about = "Xanadu: a turn-based multiplayer text adventure server",
    version
)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Maximum number of players (at least 2)
    #[arg(short, long, default_value = "8", value_parser = clap::value_parser!(u16).range(2..))]
    max_players: u16,

    /// RNG seed for deterministic games
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Map file (default: the built-in map)
    #[arg(long)]
    map: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn config_from(cli: &Cli) -> ServerResult<GameConfig> {
    let map = match &cli.map {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_MAP.to_string(),
    };
    Map::parse(&map)?;
    Ok(GameConfig::default()
        .with_max_players(usize::from(cli.max_players))
        .with_seed(cli.seed)
        .with_map(map))
}

async fn listen(cli: &Cli, config: GameConfig) -> ServerResult<()> {
    let listener = TcpListener::bind((cli.host.as_str(), cli.port)).await?;
    info!(
        addr = %listener.local_addr()?,
        max_players = config.max_players,
        seed = config.seed,
        "listening"
    );
    server::serve(listener, config).await
}

fn run(cli: Cli) -> ServerResult<()> {
    let config = config_from(&cli)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(listen(&cli, config))
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

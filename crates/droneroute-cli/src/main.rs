use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use droneroute_cli::commands::{
    handle_replay_command, handle_route_command, handle_suggest_command,
};
use droneroute_cli::{GlobalOptions, ReplayArgs, RouteArgs, SuggestArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Battery-aware delivery drone routing")]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a route between two nodes of the delivery network.
    Route(RouteArgs),
    /// Replay a delivery history and report route and node frequencies.
    Replay(ReplayArgs),
    /// Suggest a route, reusing replayed history when possible.
    Suggest(SuggestArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Route(args) => handle_route_command(&cli.options, args),
        Command::Replay(args) => handle_replay_command(&cli.options, args),
        Command::Suggest(args) => handle_suggest_command(&cli.options, args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

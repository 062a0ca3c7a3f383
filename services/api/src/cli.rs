use crate::demo::{run_demo, run_import, run_score, DemoArgs, ImportArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use supplier_reputation::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Supplier Reputation Engine",
    about = "Score supplier quotes and track supplier reputation from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single extraction JSON file without recording it
    Score(ScoreArgs),
    /// Replay a CSV batch of extractions and print the resulting leaderboard
    Import(ImportArgs),
    /// Run an end-to-end demo with a handful of synthetic suppliers
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Import(args) => run_import(args),
        Command::Demo(args) => run_demo(args),
    }
}

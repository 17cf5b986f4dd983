use crate::demo::{run_deadline, run_demo, DeadlineArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use placemint::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Placemint",
    about = "Track internship and job applications through their pipeline",
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
    /// Walk a sample pipeline through create, stage updates, stats and the board
    Demo(DemoArgs),
    /// Show days remaining and urgency for a deadline
    Deadline(DeadlineArgs),
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
        Command::Demo(args) => run_demo(args),
        Command::Deadline(args) => run_deadline(args),
    }
}

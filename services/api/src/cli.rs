use crate::demo::{run_demo, run_intake, DemoArgs, IntakeArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use credit_wizard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Credit Wizard",
    about = "Run the credit wizard service or walk a document batch through it from the command line",
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
    /// Classify local files or a CSV manifest and apply the submission gate
    Intake(IntakeArgs),
    /// Run an end-to-end demo across all four wizard stages
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
        Command::Intake(args) => run_intake(args),
        Command::Demo(args) => run_demo(args),
    }
}

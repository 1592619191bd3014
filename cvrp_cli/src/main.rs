use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{
    cases::CasesSubcommands, export::ExportArgs, generate::GenerateSubcommands, shell::ShellArgs,
    solve::SolveArgs,
};

mod cases;
mod client_args;
mod export;
mod generate;
mod parsers;
mod problem_args;
mod render;
mod shell;
mod solve;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about = "CVRP configurator for an external solver backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a problem to the solver backend and print the routes
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Write the formatted request to a JSON file without submitting it
    Export {
        #[command(flatten)]
        args: ExportArgs,
    },
    /// Built-in test cases
    Cases {
        #[command(subcommand)]
        commands: CasesSubcommands,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
    /// Interactive configurator
    Shell {
        #[command(flatten)]
        args: ShellArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Solve { args }) => solve::run(args).await?,
        Some(Commands::Export { args }) => export::run(args)?,
        Some(Commands::Cases { commands }) => cases::run(commands)?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        Some(Commands::Shell { args }) => shell::run(args).await?,
        None => shell::run(ShellArgs::default()).await?,
    }

    Ok(())
}

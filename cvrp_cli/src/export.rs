use std::path::PathBuf;

use clap::Args;
use cvrp_client::request_export::export_current;

use crate::{client_args::ClientArgs, problem_args::ProblemArgs};

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    problem: ProblemArgs,

    #[command(flatten)]
    client: ClientArgs,

    /// Output folder for the cvrp-request-<ms>.json file
    #[arg(long, short = 'o', default_value = ".")]
    out: PathBuf,
}

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let store = args.problem.store()?;
    let params = args.client.params()?;

    let path = export_current(&store, &args.out, params.request_format)?;
    println!("JSON data exported to {}", path.display());

    Ok(())
}

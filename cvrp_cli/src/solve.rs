use std::{fs::File, io::BufWriter, path::PathBuf, time::Duration};

use clap::Args;
use cvrp_client::{
    solve_session::{SolveOutcome, solve_current},
    solver_client::SolverClient,
};
use cvrp_core::state::configurator_state::SolutionStatus;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::{client_args::ClientArgs, problem_args::ProblemArgs, render};

#[derive(Args)]
pub struct SolveArgs {
    #[command(flatten)]
    problem: ProblemArgs,

    #[command(flatten)]
    client: ClientArgs,

    /// Write the solution as JSON to this file
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

pub async fn run(args: SolveArgs) -> anyhow::Result<()> {
    let store = args.problem.store()?;
    if store.snapshot().customers().is_empty() {
        anyhow::bail!("No customers to solve. Pass --input or --case");
    }

    let params = args.client.params()?;
    info!(
        "Solving with {} ({} request)",
        params.endpoint, params.request_format
    );
    let client = SolverClient::new(params);

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} ({elapsed})")?);
    bar.set_message("solving...");
    bar.enable_steady_tick(Duration::from_millis(120));

    let outcome = solve_current(&store, &client).await;
    bar.finish_and_clear();

    let state = match outcome? {
        SolveOutcome::Applied(state) => state,
        SolveOutcome::Discarded { epoch } => {
            anyhow::bail!("Solve from epoch {} was discarded", epoch)
        }
    };

    if let Some(notice) = state.notice() {
        println!("{}", notice.message);
    }

    match state.status() {
        SolutionStatus::Solved(solution) => {
            println!("{}", render::render_solution(solution, state.depot().name()));

            if let Some(out) = &args.out {
                let writer = BufWriter::new(File::create(out)?);
                serde_json::to_writer_pretty(writer, solution)?;
                info!("Solution written to {}", out.display());
            }
        }
        SolutionStatus::Failed(message) => anyhow::bail!("{}", message),
        _ => {}
    }

    Ok(())
}

use std::path::PathBuf;

use clap::Args;
use cvrp_core::{
    cases::load_test_case,
    problem::problem_file::ProblemFile,
    state::{action::Action, store::Store},
};
use tracing::info;

#[derive(Args, Clone, Default)]
pub struct ProblemArgs {
    /// Problem file (depot, vehicles, customers)
    #[arg(short = 'i', long, conflicts_with = "case")]
    pub input: Option<PathBuf>,

    /// Built-in test case, e.g. case_small
    #[arg(short, long)]
    pub case: Option<String>,
}

impl ProblemArgs {
    pub fn problem(&self) -> anyhow::Result<Option<ProblemFile>> {
        if let Some(input) = &self.input {
            info!("Loading problem from {}", input.display());
            return Ok(Some(ProblemFile::from_file(input)?));
        }

        if let Some(case) = &self.case {
            info!("Loading test case {}", case);
            return Ok(Some(load_test_case(case)?));
        }

        Ok(None)
    }

    pub fn load_into(&self, store: &Store) -> anyhow::Result<()> {
        if let Some(problem) = self.problem()? {
            store.dispatch(Action::LoadProblem(problem))?;
        }

        Ok(())
    }

    /// A store holding the selected problem, or the default configurator state.
    pub fn store(&self) -> anyhow::Result<Store> {
        let store = Store::default();
        self.load_into(&store)?;
        Ok(store)
    }
}

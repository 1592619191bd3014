use std::time::Duration;

use clap::Args;
use cvrp_client::{solver_api::RequestFormat, solver_client::SolverClientParams};

use crate::parsers;

/// Overrides applied on top of the `CVRP_*` environment.
#[derive(Args, Clone, Default)]
pub struct ClientArgs {
    /// Solver submit endpoint, e.g. http://localhost:8000/api/solve-cvrp
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Request shape: compact or extended
    #[arg(long)]
    pub format: Option<RequestFormat>,

    #[arg(long)]
    pub max_poll_attempts: Option<u32>,

    /// Delay between polls (e.g., "1s", "500ms", "PT2S")
    #[arg(long, value_parser = parsers::parse_duration)]
    pub poll_interval: Option<Duration>,
}

impl ClientArgs {
    pub fn params(&self) -> anyhow::Result<SolverClientParams> {
        let mut params = SolverClientParams::from_env()?;

        if let Some(endpoint) = &self.endpoint {
            params.endpoint = endpoint.clone();
        }
        if let Some(format) = self.format {
            params.request_format = format;
        }
        if let Some(max_poll_attempts) = self.max_poll_attempts {
            params.max_poll_attempts = max_poll_attempts;
        }
        if let Some(poll_interval) = self.poll_interval {
            params.poll_interval = poll_interval;
        }

        Ok(params)
    }
}

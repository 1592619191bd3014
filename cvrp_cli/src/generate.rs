use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use cvrp_client::solver_api::ExtendedRequest;
use cvrp_core::problem::problem_file::ProblemFile;

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaTarget {
    /// The extended request sent to the solver
    Request,
    /// The problem file accepted by --input
    Problem,
}

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    JsonSchema {
        #[arg(long, value_enum, default_value_t = SchemaTarget::Request)]
        target: SchemaTarget,

        /// Output file
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

fn generate_json_schema(target: SchemaTarget) -> Result<String, serde_json::Error> {
    let schema = match target {
        SchemaTarget::Request => schemars::schema_for!(ExtendedRequest),
        SchemaTarget::Problem => schemars::schema_for!(ProblemFile),
    };

    serde_json::to_string_pretty(&schema)
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { target, out } => {
            let schema = generate_json_schema(target)?;

            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(out, schema)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_schema() {
        let schema: serde_json::Value =
            serde_json::from_str(&generate_json_schema(SchemaTarget::Request).unwrap()).unwrap();

        assert_eq!(schema["title"], "CvrpRequest");
        assert!(schema["properties"]["customers"].is_object());
    }
}

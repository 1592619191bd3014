use std::path::PathBuf;

use clap::Subcommand;
use comfy_table::{Table, presets::UTF8_FULL};
use cvrp_core::cases::{TEST_CASES, load_test_case};
use tracing::info;

#[derive(Subcommand)]
pub enum CasesSubcommands {
    /// List the built-in test cases
    List,
    /// Write a test case, in view coordinates, as a problem file
    Save {
        /// Case name, e.g. case_small
        name: String,

        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

pub fn run(subcommand: CasesSubcommands) -> anyhow::Result<()> {
    match subcommand {
        CasesSubcommands::List => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["File", "Name", "Category", "Customers", "Description"]);

            for test_case in TEST_CASES {
                let problem = test_case.raw_problem()?;
                table.add_row(vec![
                    test_case.file_name.to_owned(),
                    test_case.name.to_owned(),
                    test_case.category.to_string(),
                    problem.customers.len().to_string(),
                    test_case.description.to_owned(),
                ]);
            }

            println!("{}", table);
        }
        CasesSubcommands::Save { name, out } => {
            let problem = load_test_case(&name)?;

            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            problem.write_to_file(&out)?;
            info!("Saved {} to {}", name, out.display());
        }
    }

    Ok(())
}

use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::Args;
use cvrp_client::{
    request_export::export_current,
    solve_session::{SolveOutcome, solve_current},
    solver_api::RequestFormat,
    solver_client::SolverClient,
};
use cvrp_core::{
    cases::load_test_case,
    problem::{
        customer::CustomerId, depot::Depot, problem_file::ProblemFile, time_window::TimeWindow,
        vehicle::VehicleId,
    },
    state::{
        action::{Action, VehicleChanges},
        configurator_state::{ConfiguratorState, SolutionStatus},
        store::Store,
    },
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use crate::{client_args::ClientArgs, problem_args::ProblemArgs, render};

const HELP: &str = "\
Commands:
  add <x> <y>                          add a customer
  demand <id> <n>                      set a customer's demand
  window <id> <start> <end>            set a customer's time window
  clear-window <id>                    remove a customer's time window
  delete <id>                          delete a customer
  vehicle add                          add a vehicle
  vehicle set <id> <capacity> [max]    set capacity and max distance (\"none\" clears it)
  vehicle rename <id> <name>           rename a vehicle
  vehicle delete <id>                  delete a vehicle
  depot <x> <y>                        move the depot
  load <case|file>                     load a test case or problem file
  save <file>                          write the current problem to a file
  solve                                solve in the background
  export [dir]                         write the formatted request to a file
  reset                                remove all customers
  show                                 print the current problem
  help                                 print this message
  quit                                 leave the shell";

#[derive(Args, Clone, Default)]
pub struct ShellArgs {
    #[command(flatten)]
    problem: ProblemArgs,

    #[command(flatten)]
    client: ClientArgs,

    /// Reject depot moves
    #[arg(long)]
    lock_depot: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    AddCustomer { x: f64, y: f64 },
    SetDemand { id: CustomerId, demand: u32 },
    SetWindow { id: CustomerId, start: i64, end: i64 },
    ClearWindow { id: CustomerId },
    DeleteCustomer { id: CustomerId },
    AddVehicle,
    SetVehicle {
        id: VehicleId,
        capacity: u32,
        max_distance: Option<Option<f64>>,
    },
    RenameVehicle { id: VehicleId, name: String },
    DeleteVehicle { id: VehicleId },
    MoveDepot { x: f64, y: f64 },
    Load(String),
    Save(PathBuf),
    Solve,
    Export(Option<PathBuf>),
    Reset,
    Show,
    Help,
    Quit,
}

fn arg<T: std::str::FromStr>(args: &[&str], index: usize, name: &str) -> Result<T, String> {
    let raw = args
        .get(index)
        .ok_or_else(|| format!("Missing <{}>", name))?;

    raw.parse()
        .map_err(|_| format!("Invalid <{}>: {}", name, raw))
}

fn coordinate(args: &[&str], index: usize, name: &str) -> Result<f64, String> {
    let value: f64 = arg(args, index, name)?;
    if !value.is_finite() {
        return Err(format!("Invalid <{}>: {}", name, value));
    }
    Ok(value)
}

fn expect_args(args: &[&str], count: usize, usage: &str) -> Result<(), String> {
    if args.len() > count {
        return Err(format!("Usage: {}", usage));
    }
    Ok(())
}

fn parse_max_distance(raw: &str) -> Result<Option<f64>, String> {
    match raw {
        "none" | "-" => Ok(None),
        _ => raw
            .parse::<f64>()
            .ok()
            .filter(|distance| distance.is_finite() && *distance > 0.0)
            .map(Some)
            .ok_or_else(|| format!("Invalid <max>: {}", raw)),
    }
}

pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((command, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match *command {
        "add" => {
            expect_args(args, 2, "add <x> <y>")?;
            ShellCommand::AddCustomer {
                x: coordinate(args, 0, "x")?,
                y: coordinate(args, 1, "y")?,
            }
        }
        "demand" => {
            expect_args(args, 2, "demand <id> <n>")?;
            ShellCommand::SetDemand {
                id: arg(args, 0, "id")?,
                demand: arg(args, 1, "n")?,
            }
        }
        "window" => {
            expect_args(args, 3, "window <id> <start> <end>")?;
            ShellCommand::SetWindow {
                id: arg(args, 0, "id")?,
                start: arg(args, 1, "start")?,
                end: arg(args, 2, "end")?,
            }
        }
        "clear-window" => {
            expect_args(args, 1, "clear-window <id>")?;
            ShellCommand::ClearWindow {
                id: arg(args, 0, "id")?,
            }
        }
        "delete" => {
            expect_args(args, 1, "delete <id>")?;
            ShellCommand::DeleteCustomer {
                id: arg(args, 0, "id")?,
            }
        }
        "vehicle" => parse_vehicle_command(args)?,
        "depot" => {
            expect_args(args, 2, "depot <x> <y>")?;
            ShellCommand::MoveDepot {
                x: coordinate(args, 0, "x")?,
                y: coordinate(args, 1, "y")?,
            }
        }
        "load" => ShellCommand::Load(arg(args, 0, "case|file")?),
        "save" => ShellCommand::Save(arg(args, 0, "file")?),
        "solve" => ShellCommand::Solve,
        "export" => ShellCommand::Export(args.first().map(PathBuf::from)),
        "reset" => ShellCommand::Reset,
        "show" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("Unknown command: {}. Type help", other)),
    };

    Ok(Some(command))
}

fn parse_vehicle_command(args: &[&str]) -> Result<ShellCommand, String> {
    let Some((subcommand, args)) = args.split_first() else {
        return Err(String::from("Usage: vehicle add|set|rename|delete"));
    };

    match *subcommand {
        "add" => Ok(ShellCommand::AddVehicle),
        "set" => {
            expect_args(args, 3, "vehicle set <id> <capacity> [max]")?;
            Ok(ShellCommand::SetVehicle {
                id: arg(args, 0, "id")?,
                capacity: arg(args, 1, "capacity")?,
                max_distance: args.get(2).map(|raw| parse_max_distance(raw)).transpose()?,
            })
        }
        "rename" => {
            let id = arg(args, 0, "id")?;
            let name = args.get(1..).map(|words| words.join(" ")).unwrap_or_default();
            if name.is_empty() {
                return Err(String::from("Missing <name>"));
            }
            Ok(ShellCommand::RenameVehicle { id, name })
        }
        "delete" => {
            expect_args(args, 1, "vehicle delete <id>")?;
            Ok(ShellCommand::DeleteVehicle {
                id: arg(args, 0, "id")?,
            })
        }
        other => Err(format!("Unknown vehicle command: {}", other)),
    }
}

impl ShellCommand {
    /// The store action for commands that only edit the inputs.
    pub fn action(&self) -> Option<Action> {
        let action = match self {
            ShellCommand::AddCustomer { x, y } => Action::AddCustomer { x: *x, y: *y },
            ShellCommand::SetDemand { id, demand } => Action::UpdateCustomerDemand {
                id: *id,
                demand: *demand,
            },
            ShellCommand::SetWindow { id, start, end } => Action::UpdateCustomerTimeWindow {
                id: *id,
                time_window: Some(TimeWindow::new(*start, *end)),
            },
            ShellCommand::ClearWindow { id } => Action::UpdateCustomerTimeWindow {
                id: *id,
                time_window: None,
            },
            ShellCommand::DeleteCustomer { id } => Action::DeleteCustomer { id: *id },
            ShellCommand::AddVehicle => Action::AddVehicle,
            ShellCommand::SetVehicle {
                id,
                capacity,
                max_distance,
            } => Action::UpdateVehicle {
                id: *id,
                changes: VehicleChanges {
                    capacity: Some(*capacity),
                    max_distance: *max_distance,
                    ..VehicleChanges::default()
                },
            },
            ShellCommand::RenameVehicle { id, name } => Action::UpdateVehicle {
                id: *id,
                changes: VehicleChanges {
                    name: Some(name.clone()),
                    ..VehicleChanges::default()
                },
            },
            ShellCommand::DeleteVehicle { id } => Action::DeleteVehicle { id: *id },
            ShellCommand::MoveDepot { x, y } => Action::MoveDepot { x: *x, y: *y },
            ShellCommand::Reset => Action::Reset,
            _ => return None,
        };

        Some(action)
    }
}

/// A path to an existing file is read as a problem file, anything else is a case name.
fn load_problem(source: &str) -> anyhow::Result<ProblemFile> {
    let path = Path::new(source);
    if path.is_file() {
        return Ok(ProblemFile::from_file(path)?);
    }

    Ok(load_test_case(source)?)
}

fn print_state_change(state: &ConfiguratorState) {
    println!(
        "{} customers, {} vehicles, status {}",
        state.customers().len(),
        state.vehicles().len(),
        state.status().label()
    );
}

fn print_solve_result(state: &ConfiguratorState) {
    if let Some(notice) = state.notice() {
        println!("{}", notice.message);
    }

    match state.status() {
        SolutionStatus::Solved(solution) => {
            println!("{}", render::render_solution(solution, state.depot().name()))
        }
        SolutionStatus::Failed(message) => println!("{}", message),
        _ => {}
    }
}

fn spawn_solve(store: &Arc<Store>, client: &Arc<SolverClient>) {
    let store = Arc::clone(store);
    let client = Arc::clone(client);

    tokio::spawn(async move {
        match solve_current(&store, &client).await {
            Ok(SolveOutcome::Applied(state)) => print_solve_result(&state),
            Ok(SolveOutcome::Discarded { epoch }) => {
                println!("Discarded result of solve started at epoch {}: inputs changed", epoch)
            }
            Err(e) => error!("{}", e),
        }
    });
}

enum Flow {
    Continue,
    Quit,
}

fn execute(
    command: ShellCommand,
    store: &Arc<Store>,
    client: &Arc<SolverClient>,
    format: RequestFormat,
) -> anyhow::Result<Flow> {
    if let Some(action) = command.action() {
        let state = store.dispatch(action)?;
        print_state_change(&state);
        return Ok(Flow::Continue);
    }

    match command {
        ShellCommand::Load(source) => {
            let state = store.dispatch(Action::LoadProblem(load_problem(&source)?))?;
            print_state_change(&state);
        }
        ShellCommand::Save(path) => {
            let state = store.snapshot();
            ProblemFile::from_parts(state.depot(), state.vehicles(), state.customers())
                .write_to_file(&path)?;
            println!("Problem saved to {}", path.display());
        }
        ShellCommand::Solve => {
            if store.snapshot().customers().is_empty() {
                anyhow::bail!("No customers to solve");
            }
            println!("Solving in the background...");
            spawn_solve(store, client);
        }
        ShellCommand::Export(dir) => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            let path = export_current(store, &dir, format)?;
            println!("JSON data exported to {}", path.display());
        }
        ShellCommand::Show => print!("{}", render::render_problem(&store.snapshot())),
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => return Ok(Flow::Quit),
        _ => {}
    }

    Ok(Flow::Continue)
}

fn prompt() {
    print!("cvrp> ");
    std::io::stdout().flush().ok();
}

pub async fn run(args: ShellArgs) -> anyhow::Result<()> {
    let store = Arc::new(Store::new(ConfiguratorState::new(
        Depot::default(),
        args.lock_depot,
    )));
    args.problem.load_into(&store)?;

    let params = args.client.params()?;
    let format = params.request_format;
    info!("Solver endpoint {}", params.endpoint);
    let client = Arc::new(SolverClient::new(params));

    println!("Type help for the list of commands");
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(command)) => match execute(command, &store, &client, format) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => println!("Error: {}", e),
            },
            Ok(None) => {}
            Err(message) => println!("{}", message),
        }
        prompt();
    }

    Ok(())
}

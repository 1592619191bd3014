use crate::problem::{
    customer::CustomerId, problem_file::ProblemFile, solution::Solution,
    time_window::TimeWindow, vehicle::VehicleId,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleChanges {
    pub name: Option<String>,
    pub capacity: Option<u32>,
    /// `Some(None)` removes the distance limit.
    pub max_distance: Option<Option<f64>>,
}

#[derive(Debug, Clone)]
pub enum Action {
    AddCustomer {
        x: f64,
        y: f64,
    },
    UpdateCustomerDemand {
        id: CustomerId,
        demand: u32,
    },
    UpdateCustomerTimeWindow {
        id: CustomerId,
        time_window: Option<TimeWindow>,
    },
    DeleteCustomer {
        id: CustomerId,
    },
    AddVehicle,
    UpdateVehicle {
        id: VehicleId,
        changes: VehicleChanges,
    },
    DeleteVehicle {
        id: VehicleId,
    },
    MoveDepot {
        x: f64,
        y: f64,
    },
    LoadProblem(ProblemFile),
    Reset,
    SolveStarted,
    SolveSucceeded {
        epoch: u64,
        solution: Solution,
    },
    SolveFailed {
        epoch: u64,
        message: String,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddCustomer { .. } => "add_customer",
            Action::UpdateCustomerDemand { .. } => "update_customer_demand",
            Action::UpdateCustomerTimeWindow { .. } => "update_customer_time_window",
            Action::DeleteCustomer { .. } => "delete_customer",
            Action::AddVehicle => "add_vehicle",
            Action::UpdateVehicle { .. } => "update_vehicle",
            Action::DeleteVehicle { .. } => "delete_vehicle",
            Action::MoveDepot { .. } => "move_depot",
            Action::LoadProblem(_) => "load_problem",
            Action::Reset => "reset",
            Action::SolveStarted => "solve_started",
            Action::SolveSucceeded { .. } => "solve_succeeded",
            Action::SolveFailed { .. } => "solve_failed",
        }
    }
}

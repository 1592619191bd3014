use thiserror::Error;
use tracing::debug;

use crate::problem::{
    customer::{Customer, CustomerId, DEFAULT_CUSTOMER_DEMAND},
    depot::Depot,
    problem_file::ProblemFile,
    solution::Solution,
    time_window::TimeWindow,
    vehicle::{Vehicle, VehicleId},
};

use super::action::{Action, VehicleChanges};

pub const SOLVE_FAILED_NOTICE: &str =
    "Failed to solve CVRP. Please check your backend API connection.";
pub const NO_SOLUTION_NOTICE: &str = "No feasible solution found";
pub const SOLVED_NOTICE: &str = "CVRP solved successfully!";

#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("Customer {0} does not exist")]
    UnknownCustomer(CustomerId),

    #[error("Vehicle {0} does not exist")]
    UnknownVehicle(VehicleId),

    #[error("Demand must be at least 1, got {0}")]
    InvalidDemand(u32),

    #[error("Capacity must be at least 1, got {0}")]
    InvalidCapacity(u32),

    #[error("Maximum distance must be positive, got {0}")]
    InvalidMaxDistance(f64),

    #[error("Time window start {start} is after its end {end}")]
    InvalidTimeWindow { start: i64, end: i64 },

    #[error("At least one vehicle must remain")]
    LastVehicle,

    #[error("A problem needs at least one vehicle")]
    NoVehicles,

    #[error("No customers to solve. Please add customers first.")]
    NoCustomers,

    #[error("The depot position is fixed")]
    DepotLocked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolutionStatus {
    Unsolved,
    Solving,
    Solved(Solution),
    NoSolution,
    Failed(String),
}

impl SolutionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SolutionStatus::Unsolved => "unsolved",
            SolutionStatus::Solving => "solving",
            SolutionStatus::Solved(_) => "solved",
            SolutionStatus::NoSolution => "no-solution",
            SolutionStatus::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message for the user about the outcome of the last action.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Immutable snapshot of everything the configurator shows.
///
/// Every change goes through [`ConfiguratorState::reduce`], which returns a new
/// snapshot and leaves `self` untouched. Input edits bump `epoch` and drop the
/// solution; solve results carry the epoch they were started in and are
/// ignored once the inputs have moved on.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguratorState {
    depot: Depot,
    depot_locked: bool,
    customers: Vec<Customer>,
    vehicles: Vec<Vehicle>,
    next_vehicle_id: VehicleId,
    status: SolutionStatus,
    epoch: u64,
    submitted_fleet: Option<Vec<Vehicle>>,
    notice: Option<Notice>,
}

impl Default for ConfiguratorState {
    fn default() -> Self {
        ConfiguratorState::new(Depot::default(), false)
    }
}

impl ConfiguratorState {
    pub fn new(depot: Depot, depot_locked: bool) -> Self {
        ConfiguratorState {
            depot,
            depot_locked,
            customers: vec![],
            vehicles: vec![Vehicle::with_defaults(1), Vehicle::with_defaults(2)],
            next_vehicle_id: 3,
            status: SolutionStatus::Unsolved,
            epoch: 0,
            submitted_fleet: None,
            notice: None,
        }
    }

    pub fn depot(&self) -> &Depot {
        &self.depot
    }

    pub fn is_depot_locked(&self) -> bool {
        self.depot_locked
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|customer| customer.id() == id)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id() == id)
    }

    pub fn status(&self) -> &SolutionStatus {
        &self.status
    }

    pub fn solution(&self) -> Option<&Solution> {
        match &self.status {
            SolutionStatus::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The fleet to send with the next request, `None` when the backend already
    /// has exactly this fleet from the last successful solve.
    pub fn fleet_to_submit(&self) -> Option<&[Vehicle]> {
        match &self.submitted_fleet {
            Some(fleet) if *fleet == self.vehicles => None,
            _ => Some(self.vehicles.as_slice()),
        }
    }

    pub fn reduce(&self, action: Action) -> Result<ConfiguratorState, StateError> {
        match action {
            Action::AddCustomer { x, y } => {
                let id = self.customers.len() as CustomerId + 1;
                let mut next = self.invalidated();
                next.customers.push(Customer::new(id, x, y, DEFAULT_CUSTOMER_DEMAND));
                Ok(next)
            }
            Action::UpdateCustomerDemand { id, demand } => {
                check_demand(demand)?;
                self.with_customer(id, |customer| customer.with_demand(demand))
            }
            Action::UpdateCustomerTimeWindow { id, time_window } => {
                check_time_window(time_window.as_ref())?;
                self.with_customer(id, |customer| customer.with_time_window(time_window))
            }
            Action::DeleteCustomer { id } => {
                if self.customer(id).is_none() {
                    return Err(StateError::UnknownCustomer(id));
                }

                let mut next = self.invalidated();
                next.customers = self
                    .customers
                    .iter()
                    .filter(|customer| customer.id() != id)
                    .cloned()
                    .enumerate()
                    .map(|(index, customer)| customer.renumbered(index as CustomerId + 1))
                    .collect();
                Ok(next)
            }
            Action::AddVehicle => {
                let mut next = self.invalidated();
                next.vehicles.push(Vehicle::with_defaults(self.next_vehicle_id));
                next.next_vehicle_id += 1;
                Ok(next)
            }
            Action::UpdateVehicle { id, changes } => self.with_vehicle_changes(id, changes),
            Action::DeleteVehicle { id } => {
                if self.vehicle(id).is_none() {
                    return Err(StateError::UnknownVehicle(id));
                }
                if self.vehicles.len() <= 1 {
                    return Err(StateError::LastVehicle);
                }

                let mut next = self.invalidated();
                next.vehicles.retain(|vehicle| vehicle.id() != id);
                Ok(next)
            }
            Action::MoveDepot { x, y } => {
                if self.depot_locked {
                    return Err(StateError::DepotLocked);
                }

                let mut next = self.invalidated();
                next.depot = self.depot.clone().moved_to(x, y);
                Ok(next)
            }
            Action::LoadProblem(problem) => self.with_problem(&problem),
            Action::Reset => {
                let mut next = self.invalidated();
                next.customers.clear();
                Ok(next)
            }
            Action::SolveStarted => {
                if self.customers.is_empty() {
                    return Err(StateError::NoCustomers);
                }

                let mut next = self.clone();
                next.status = SolutionStatus::Solving;
                next.notice = None;
                Ok(next)
            }
            Action::SolveSucceeded { epoch, solution } => {
                if epoch != self.epoch {
                    debug!(
                        "Discarding solution from epoch {}, inputs are at epoch {}",
                        epoch, self.epoch
                    );
                    return Ok(self.clone());
                }

                let mut next = self.clone();
                next.submitted_fleet = Some(self.vehicles.clone());
                if solution.is_feasible() {
                    next.status = SolutionStatus::Solved(solution);
                    next.notice = Some(Notice::success(SOLVED_NOTICE));
                } else {
                    next.status = SolutionStatus::NoSolution;
                    next.notice = Some(Notice::error(NO_SOLUTION_NOTICE));
                }
                Ok(next)
            }
            Action::SolveFailed { epoch, message } => {
                if epoch != self.epoch {
                    debug!(
                        "Discarding failure from epoch {}, inputs are at epoch {}",
                        epoch, self.epoch
                    );
                    return Ok(self.clone());
                }

                let mut next = self.clone();
                next.status = SolutionStatus::Failed(message);
                next.notice = Some(Notice::error(SOLVE_FAILED_NOTICE));
                Ok(next)
            }
        }
    }

    /// Copy of the state with the solution dropped and a new epoch.
    fn invalidated(&self) -> ConfiguratorState {
        let mut next = self.clone();
        next.status = SolutionStatus::Unsolved;
        next.epoch += 1;
        next.notice = None;
        next
    }

    fn with_customer(
        &self,
        id: CustomerId,
        update: impl FnOnce(Customer) -> Customer,
    ) -> Result<ConfiguratorState, StateError> {
        let index = self
            .customers
            .iter()
            .position(|customer| customer.id() == id)
            .ok_or(StateError::UnknownCustomer(id))?;

        let mut next = self.invalidated();
        next.customers[index] = update(self.customers[index].clone());
        Ok(next)
    }

    fn with_vehicle_changes(
        &self,
        id: VehicleId,
        changes: VehicleChanges,
    ) -> Result<ConfiguratorState, StateError> {
        let index = self
            .vehicles
            .iter()
            .position(|vehicle| vehicle.id() == id)
            .ok_or(StateError::UnknownVehicle(id))?;

        let mut vehicle = self.vehicles[index].clone();
        if let Some(name) = changes.name {
            vehicle = vehicle.with_name(name);
        }
        if let Some(capacity) = changes.capacity {
            check_capacity(capacity)?;
            vehicle = vehicle.with_capacity(capacity);
        }
        if let Some(max_distance) = changes.max_distance {
            check_max_distance(max_distance)?;
            vehicle = vehicle.with_max_distance(max_distance);
        }

        let mut next = self.invalidated();
        next.vehicles[index] = vehicle;
        Ok(next)
    }

    fn with_problem(&self, problem: &ProblemFile) -> Result<ConfiguratorState, StateError> {
        let vehicles = problem.vehicles();
        if vehicles.is_empty() {
            return Err(StateError::NoVehicles);
        }
        for vehicle in &vehicles {
            check_capacity(vehicle.capacity())?;
            check_max_distance(vehicle.max_distance())?;
        }

        let customers = problem.customers();
        for customer in &customers {
            check_demand(customer.demand())?;
            check_time_window(customer.time_window())?;
        }

        let mut next = self.invalidated();
        if !self.depot_locked {
            next.depot = problem.depot();
        }
        next.next_vehicle_id = vehicles.len() as VehicleId + 1;
        next.vehicles = vehicles;
        next.customers = customers;
        Ok(next)
    }
}

fn check_demand(demand: u32) -> Result<(), StateError> {
    if demand < 1 {
        return Err(StateError::InvalidDemand(demand));
    }
    Ok(())
}

fn check_capacity(capacity: u32) -> Result<(), StateError> {
    if capacity < 1 {
        return Err(StateError::InvalidCapacity(capacity));
    }
    Ok(())
}

fn check_max_distance(max_distance: Option<f64>) -> Result<(), StateError> {
    match max_distance {
        Some(distance) if !(distance.is_finite() && distance > 0.0) => {
            Err(StateError::InvalidMaxDistance(distance))
        }
        _ => Ok(()),
    }
}

fn check_time_window(time_window: Option<&TimeWindow>) -> Result<(), StateError> {
    match time_window {
        Some(window) if !window.is_valid() => Err(StateError::InvalidTimeWindow {
            start: window.start(),
            end: window.end(),
        }),
        _ => Ok(()),
    }
}

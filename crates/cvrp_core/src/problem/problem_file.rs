use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use thiserror::Error;

use super::{customer::Customer, depot::Depot, time_window::TimeWindow, vehicle::Vehicle};

#[derive(Debug, Error)]
pub enum ProblemFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid problem file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "Depot")]
pub struct FileDepot {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "Vehicle", rename_all = "camelCase")]
pub struct FileVehicle {
    pub name: String,
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
}

#[serde_as]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "Customer", rename_all = "camelCase")]
pub struct FileCustomer {
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub id: u32,
    pub demand: u32,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<[i64; 2]>")]
    pub time_window: Option<TimeWindow>,
}

/// On-disk description of a CVRP instance: one depot, a fleet and the customers.
///
/// Customer ids are written as strings and accepted as strings or numbers.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "ProblemFile")]
pub struct ProblemFile {
    pub depot: FileDepot,
    pub vehicles: Vec<FileVehicle>,
    pub customers: Vec<FileCustomer>,
}

impl ProblemFile {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProblemFileError> {
        let file = File::open(path)?;
        let problem: ProblemFile = serde_json::from_reader(BufReader::new(file))?;
        Ok(problem)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ProblemFileError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn from_parts(depot: &Depot, vehicles: &[Vehicle], customers: &[Customer]) -> Self {
        ProblemFile {
            depot: FileDepot {
                name: depot.name().to_owned(),
                x: depot.x(),
                y: depot.y(),
            },
            vehicles: vehicles
                .iter()
                .map(|vehicle| FileVehicle {
                    name: vehicle.name().to_owned(),
                    capacity: vehicle.capacity(),
                    max_distance: vehicle.max_distance(),
                })
                .collect(),
            customers: customers
                .iter()
                .map(|customer| FileCustomer {
                    id: customer.id(),
                    demand: customer.demand(),
                    x: customer.x(),
                    y: customer.y(),
                    time_window: customer.time_window().copied(),
                })
                .collect(),
        }
    }

    pub fn depot(&self) -> Depot {
        Depot::new(self.depot.x, self.depot.y, self.depot.name.clone())
    }

    /// Vehicles numbered by position, starting at 1.
    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.vehicles
            .iter()
            .enumerate()
            .map(|(index, vehicle)| {
                Vehicle::new(index as u32 + 1, vehicle.name.clone(), vehicle.capacity)
                    .with_max_distance(vehicle.max_distance)
            })
            .collect()
    }

    /// Customers renumbered densely by position so ids always form `1..=N`.
    pub fn customers(&self) -> Vec<Customer> {
        self.customers
            .iter()
            .enumerate()
            .map(|(index, customer)| {
                Customer::new(index as u32 + 1, customer.x, customer.y, customer.demand)
                    .with_time_window(customer.time_window)
            })
            .collect()
    }

    /// Returns a copy with every coordinate mapped through `transform`.
    pub fn transformed(&self, transform: impl Fn(f64, f64) -> (f64, f64)) -> Self {
        let mut problem = self.clone();
        let (x, y) = transform(problem.depot.x, problem.depot.y);
        problem.depot.x = x;
        problem.depot.y = y;

        for customer in problem.customers.iter_mut() {
            let (x, y) = transform(customer.x, customer.y);
            customer.x = x;
            customer.y = y;
        }

        problem
    }
}

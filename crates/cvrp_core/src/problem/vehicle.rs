use serde::{Deserialize, Serialize};

pub type VehicleId = u32;

pub const DEFAULT_VEHICLE_CAPACITY: u32 = 20;
pub const DEFAULT_VEHICLE_MAX_DISTANCE: f64 = 1000.0;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    id: VehicleId,
    name: String,
    capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_distance: Option<f64>,
}

impl Vehicle {
    pub fn new(id: VehicleId, name: impl Into<String>, capacity: u32) -> Self {
        Vehicle {
            id,
            name: name.into(),
            capacity,
            max_distance: None,
        }
    }

    /// A freshly added vehicle: `V<id>`, default capacity and travel distance.
    pub fn with_defaults(id: VehicleId) -> Self {
        Vehicle {
            id,
            name: format!("V{}", id),
            capacity: DEFAULT_VEHICLE_CAPACITY,
            max_distance: Some(DEFAULT_VEHICLE_MAX_DISTANCE),
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn max_distance(&self) -> Option<f64> {
        self.max_distance
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_distance(mut self, max_distance: Option<f64>) -> Self {
        self.max_distance = max_distance;
        self
    }
}

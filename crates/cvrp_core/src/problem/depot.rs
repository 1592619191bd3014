use serde::{Deserialize, Serialize};

pub const DEFAULT_DEPOT_X: f64 = 600.0;
pub const DEFAULT_DEPOT_Y: f64 = 450.0;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Depot {
    x: f64,
    y: f64,
    name: String,
}

impl Depot {
    pub fn new(x: f64, y: f64, name: impl Into<String>) -> Self {
        Depot {
            x,
            y,
            name: name.into(),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn moved_to(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

impl Default for Depot {
    fn default() -> Self {
        Depot::new(DEFAULT_DEPOT_X, DEFAULT_DEPOT_Y, "Depot")
    }
}

use serde::{Deserialize, Serialize};

use super::customer::Customer;

/// Ordered customers served by one vehicle, starting and ending at the depot.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_name: Option<String>,
    pub customers: Vec<Customer>,
    pub total_demand: u32,
    pub total_distance: f64,
}

impl Route {
    /// Best available label for the vehicle driving this route.
    pub fn vehicle_label(&self) -> String {
        self.vehicle_name
            .clone()
            .or_else(|| self.vehicle_id.clone())
            .or_else(|| self.route_id.clone())
            .unwrap_or_else(|| String::from("unknown"))
    }

    pub fn sequence(&self, depot_name: &str) -> String {
        let mut sequence = String::from(depot_name);
        for customer in &self.customers {
            sequence.push_str(" -> ");
            sequence.push_str(customer.name());
        }
        sequence.push_str(" -> ");
        sequence.push_str(depot_name);
        sequence
    }
}

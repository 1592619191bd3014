use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{customer::Customer, route::Route};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SolverMeta {
    pub solver: String,
    pub solve_time_ms: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SolutionSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items_requested: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items_delivered: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_routes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unserved_customers: Option<u32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub routes: Vec<Route>,
    pub total_distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_states: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_vehicle_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SolverMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SolutionSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unserved_customers: Vec<Customer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solve_time_ms: Option<u64>,
}

impl Solution {
    /// A solution without any route means the backend found no feasible assignment.
    pub fn is_feasible(&self) -> bool {
        !self.routes.is_empty()
    }

    pub fn total_demand(&self) -> u64 {
        self.routes
            .iter()
            .map(|route| u64::from(route.total_demand))
            .sum()
    }

    /// Delivery rate from the summary, falling back to served over requested items.
    pub fn delivery_rate(&self) -> Option<f64> {
        if let Some(rate) = self.summary.as_ref().and_then(|summary| summary.delivery_rate) {
            return Some(rate);
        }

        let unserved: u64 = self
            .unserved_customers
            .iter()
            .map(|customer| u64::from(customer.demand()))
            .sum();
        let delivered = self.total_demand();
        let requested = delivered + unserved;

        if requested == 0 {
            None
        } else {
            Some(delivered as f64 / requested as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(demand: u32, customers: Vec<Customer>) -> Route {
        Route {
            route_id: None,
            vehicle_id: None,
            vehicle_name: None,
            customers,
            total_demand: demand,
            total_distance: 0.0,
        }
    }

    #[test]
    fn test_empty_routes_is_not_feasible() {
        assert!(!Solution::default().is_feasible());
    }

    #[test]
    fn test_delivery_rate_without_summary() {
        let solution = Solution {
            routes: vec![route(30, vec![Customer::new(1, 0.0, 0.0, 30)])],
            unserved_customers: vec![Customer::new(2, 0.0, 0.0, 10)],
            ..Solution::default()
        };

        assert_eq!(solution.delivery_rate(), Some(0.75));
    }

    #[test]
    fn test_delivery_rate_ignores_summary_without_rate() {
        let solution = Solution {
            routes: vec![route(10, vec![Customer::new(1, 0.0, 0.0, 10)])],
            unserved_customers: vec![Customer::new(2, 0.0, 0.0, 10)],
            summary: Some(SolutionSummary {
                total_distance: Some(12.0),
                ..SolutionSummary::default()
            }),
            ..Solution::default()
        };

        assert_eq!(solution.delivery_rate(), Some(0.5));
    }

    #[test]
    fn test_large_demands_do_not_overflow() {
        let solution = Solution {
            routes: vec![route(4_000_000_000, vec![]), route(4_000_000_000, vec![])],
            unserved_customers: vec![Customer::new(3, 0.0, 0.0, 4_000_000_000)],
            ..Solution::default()
        };

        assert_eq!(solution.total_demand(), 8_000_000_000);
        let rate = solution.delivery_rate().unwrap();
        assert!((rate - 2.0 / 3.0).abs() < 1e-9);
    }
}

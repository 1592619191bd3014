use crate::{
    problem::{customer::Customer, route::Route, solution::Solution},
    state::{action::Action, configurator_state::ConfiguratorState},
};

/// Default state with `count` customers, customer `i` placed at `(i, i)`.
pub fn state_with_customers(count: u32) -> ConfiguratorState {
    (1..=count).fold(ConfiguratorState::default(), |state, i| {
        state
            .reduce(Action::AddCustomer {
                x: i as f64,
                y: i as f64,
            })
            .unwrap()
    })
}

pub fn solution_with_routes(count: usize) -> Solution {
    let routes = (0..count)
        .map(|index| Route {
            route_id: Some(index.to_string()),
            vehicle_id: None,
            vehicle_name: Some(format!("V{}", index + 1)),
            customers: vec![Customer::new(index as u32 + 1, 0.0, 0.0, 5)],
            total_demand: 5,
            total_distance: 10.0,
        })
        .collect::<Vec<_>>();

    Solution {
        total_distance: 10.0 * count as f64,
        routes,
        ..Solution::default()
    }
}

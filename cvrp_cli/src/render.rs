use std::fmt::{self, Display};

use comfy_table::{Table, presets::UTF8_FULL};
use cvrp_core::{
    problem::solution::Solution,
    state::configurator_state::{ConfiguratorState, SolutionStatus},
};

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn format_max_distance(max_distance: Option<f64>) -> String {
    max_distance
        .map(|distance| format!("{:.1}", distance))
        .unwrap_or_else(|| String::from("-"))
}

struct ProblemView<'a>(&'a ConfiguratorState);

impl Display for ProblemView<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        let depot = state.depot();
        writeln!(
            out,
            "{} at ({:.1}, {:.1}){}",
            depot.name(),
            depot.x(),
            depot.y(),
            if state.is_depot_locked() { " [locked]" } else { "" }
        )?;

        let mut vehicles = table(vec!["Id", "Name", "Capacity", "Max distance"]);
        for vehicle in state.vehicles() {
            vehicles.add_row(vec![
                vehicle.id().to_string(),
                vehicle.name().to_owned(),
                vehicle.capacity().to_string(),
                format_max_distance(vehicle.max_distance()),
            ]);
        }
        writeln!(out, "{}", vehicles)?;

        if state.customers().is_empty() {
            writeln!(out, "No customers")?;
        } else {
            let mut customers = table(vec!["Id", "Name", "X", "Y", "Demand", "Time window"]);
            for customer in state.customers() {
                customers.add_row(vec![
                    customer.id().to_string(),
                    customer.name().to_owned(),
                    format!("{:.1}", customer.x()),
                    format!("{:.1}", customer.y()),
                    customer.demand().to_string(),
                    customer
                        .effective_time_window()
                        .map(|window| format!("[{}, {}]", window.start(), window.end()))
                        .unwrap_or_else(|| String::from("-")),
                ]);
            }
            writeln!(out, "{}", customers)?;
        }

        write!(out, "Status: {}", state.status().label())?;
        if let SolutionStatus::Failed(message) = state.status() {
            write!(out, " ({})", message)?;
        }
        writeln!(out)
    }
}

struct SolutionView<'a> {
    solution: &'a Solution,
    depot_name: &'a str,
}

impl Display for SolutionView<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let solution = self.solution;

        writeln!(out, "Vehicles used: {}", solution.routes.len())?;
        writeln!(out, "Total distance: {:.2}", solution.total_distance)?;
        writeln!(out, "Total demand served: {}", solution.total_demand())?;
        if let Some(rate) = solution.delivery_rate() {
            writeln!(out, "Delivery rate: {:.1}%", rate * 100.0)?;
        }
        if let Some(config_name) = &solution.config_name {
            writeln!(out, "Configuration: {}", config_name)?;
        }
        if let Some(solve_time_ms) = solution.solve_time_ms {
            writeln!(out, "Solve time: {} ms", solve_time_ms)?;
        }
        if let Some(meta) = &solution.meta {
            writeln!(out, "Solver: {}", meta.solver)?;
        }

        let mut routes = table(vec!["Vehicle", "Stops", "Load", "Distance", "Sequence"]);
        for route in &solution.routes {
            routes.add_row(vec![
                route.vehicle_label(),
                route.customers.len().to_string(),
                route.total_demand.to_string(),
                format!("{:.2}", route.total_distance),
                route.sequence(self.depot_name),
            ]);
        }
        writeln!(out, "{}", routes)?;

        if !solution.unserved_customers.is_empty() {
            let mut unserved = table(vec!["Unserved", "Demand", "X", "Y"]);
            for customer in &solution.unserved_customers {
                unserved.add_row(vec![
                    customer.name().to_owned(),
                    customer.demand().to_string(),
                    format!("{:.1}", customer.x()),
                    format!("{:.1}", customer.y()),
                ]);
            }
            writeln!(out, "{}", unserved)?;
        }

        if let Some(vehicle_states) = &solution.vehicle_states {
            let mut states = table(vec!["Vehicle", "State"]);
            for (vehicle, state) in vehicle_states {
                states.add_row(vec![vehicle.clone(), state.clone()]);
            }
            writeln!(out, "{}", states)?;
        }
        if let Some(available) = solution.available_vehicle_count {
            writeln!(out, "Available vehicles: {}", available)?;
        }

        Ok(())
    }
}

pub fn render_problem(state: &ConfiguratorState) -> String {
    ProblemView(state).to_string()
}

pub fn render_solution(solution: &Solution, depot_name: &str) -> String {
    SolutionView {
        solution,
        depot_name,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use cvrp_core::problem::{customer::Customer, route::Route};

    use super::*;

    #[test]
    fn test_render_solution() {
        let solution = Solution {
            routes: vec![Route {
                route_id: None,
                vehicle_id: None,
                vehicle_name: Some(String::from("V1")),
                customers: vec![Customer::new(1, 0.0, 0.0, 5), Customer::new(2, 0.0, 0.0, 5)],
                total_demand: 10,
                total_distance: 42.5,
            }],
            total_distance: 42.5,
            unserved_customers: vec![Customer::new(3, 1.0, 2.0, 30)],
            ..Solution::default()
        };

        let out = render_solution(&solution, "Depot");

        assert!(out.contains("Vehicles used: 1"));
        assert!(out.contains("Total distance: 42.50"));
        assert!(out.contains("Depot -> C1 -> C2 -> Depot"));
        assert!(out.contains("C3"));
    }

    #[test]
    fn test_render_solution_with_large_loads() {
        let route = |name: &str| Route {
            route_id: None,
            vehicle_id: None,
            vehicle_name: Some(String::from(name)),
            customers: vec![],
            total_demand: 4_000_000_000,
            total_distance: 1.0,
        };
        let solution = Solution {
            routes: vec![route("V1"), route("V2")],
            total_distance: 2.0,
            ..Solution::default()
        };

        let out = render_solution(&solution, "Depot");

        assert!(out.contains("Total demand served: 8000000000"));
        assert!(out.contains("Delivery rate: 100.0%"));
    }

    #[test]
    fn test_render_problem() {
        let out = render_problem(&ConfiguratorState::default());

        assert!(out.contains("Depot at (600.0, 450.0)"));
        assert!(out.contains("V1"));
        assert!(out.contains("No customers"));
        assert!(out.contains("Status: "));
    }
}

use std::collections::{BTreeMap, HashMap};

use cvrp_core::problem::{
    customer::{Customer, CustomerId, customer_name},
    route::Route,
    solution::{Solution, SolutionSummary, SolverMeta},
};

use crate::solver_api::{ApiCustomerEcho, ApiMeta, ApiRoute, ApiSolutionResponse, ApiSummary};

/// Fields only the older snake_case backend emits. Newer backends may still
/// send some of them next to the structured ones.
#[derive(Debug, Clone, Default)]
pub struct LegacyFields {
    pub vehicle_state: Option<BTreeMap<String, String>>,
    pub available_vehicle_count: Option<u32>,
    pub total_distance: Option<f64>,
    pub meta: Option<ApiMeta>,
}

#[derive(Debug, Clone)]
pub struct StructuredPayload {
    pub routes: Vec<ApiRoute>,
    pub timestamp: Option<String>,
    pub config_name: Option<String>,
    pub solve_time_ms: Option<u64>,
    pub summary: Option<ApiSummary>,
    pub unserved_customers: Vec<ApiCustomerEcho>,
    pub legacy: LegacyFields,
}

#[derive(Debug, Clone)]
pub struct LegacyPayload {
    pub routes: Vec<ApiRoute>,
    pub legacy: LegacyFields,
}

/// Backend solution body resolved to the API generation that produced it.
#[derive(Debug, Clone)]
pub enum ResponsePayload {
    Structured(StructuredPayload),
    Legacy(LegacyPayload),
}

impl From<ApiSolutionResponse> for ResponsePayload {
    fn from(response: ApiSolutionResponse) -> Self {
        let legacy = LegacyFields {
            vehicle_state: response.vehicle_state,
            available_vehicle_count: response.available_vehicle_count,
            total_distance: response.total_distance,
            meta: response.meta,
        };

        let is_structured = response.summary.is_some()
            || response.unserved_customers.is_some()
            || response.timestamp.is_some()
            || response.config_name.is_some()
            || response.solve_time_ms.is_some()
            || response.routes.iter().any(ApiRoute::has_structured_fields);

        if is_structured {
            ResponsePayload::Structured(StructuredPayload {
                routes: response.routes,
                timestamp: response.timestamp,
                config_name: response.config_name,
                solve_time_ms: response.solve_time_ms,
                summary: response.summary,
                unserved_customers: response.unserved_customers.unwrap_or_default(),
                legacy,
            })
        } else {
            ResponsePayload::Legacy(LegacyPayload {
                routes: response.routes,
                legacy,
            })
        }
    }
}

struct CustomerLookup<'a> {
    by_id: HashMap<CustomerId, &'a Customer>,
}

impl<'a> CustomerLookup<'a> {
    fn new(customers: &'a [Customer]) -> Self {
        Self {
            by_id: customers
                .iter()
                .map(|customer| (customer.id(), customer))
                .collect(),
        }
    }

    /// Rebuilds a customer from the backend echo. Coordinates always come from
    /// the submitted customer when one matches by id, since the echo may have
    /// lost or rounded them.
    fn restore(&self, echo: &ApiCustomerEcho) -> Customer {
        let id = echo.id.as_u32();
        let original = id.and_then(|id| self.by_id.get(&id).copied());

        match original {
            Some(original) => original
                .clone()
                .with_demand(echo.demand.unwrap_or(original.demand()))
                .with_name(echo.name.clone().unwrap_or_else(|| original.name().to_owned())),
            None => {
                let id = id.unwrap_or_default();
                Customer::new(
                    id,
                    echo.x.unwrap_or_default(),
                    echo.y.unwrap_or_default(),
                    echo.demand.unwrap_or_default(),
                )
                .with_name(echo.name.clone().unwrap_or_else(|| customer_name(id)))
            }
        }
    }
}

fn map_route(route: ApiRoute, lookup: &CustomerLookup) -> Route {
    let customers: Vec<Customer> = route
        .customers
        .iter()
        .map(|echo| lookup.restore(echo))
        .collect();

    let total_demand = route
        .total_demand
        .or(route.legacy_total_demand)
        .unwrap_or_else(|| {
            customers
                .iter()
                .fold(0u32, |total, customer| total.saturating_add(customer.demand()))
        });

    Route {
        route_id: route.route_id.map(|id| id.to_string()),
        vehicle_id: route.legacy_vehicle_id.map(|id| id.to_string()),
        vehicle_name: route.vehicle_name,
        total_distance: route
            .total_distance
            .or(route.legacy_total_distance)
            .unwrap_or_default(),
        total_demand,
        customers,
    }
}

fn routes_distance(routes: &[Route]) -> f64 {
    routes.iter().map(|route| route.total_distance).sum()
}

fn map_meta(meta: ApiMeta) -> SolverMeta {
    SolverMeta {
        solver: meta.solver,
        solve_time_ms: meta.solve_time_ms,
    }
}

fn map_summary(summary: ApiSummary) -> SolutionSummary {
    SolutionSummary {
        total_items_requested: summary.total_items_requested,
        total_items_delivered: summary.total_items_delivered,
        total_distance: summary.total_distance,
        number_of_routes: summary.number_of_routes,
        delivery_rate: summary.delivery_rate,
        unserved_customers: summary.unserved_customers,
    }
}

/// Converts a backend solution into the configurator's [`Solution`].
///
/// `original_customers` are the customers that were submitted; pass an empty
/// slice to keep whatever the backend echoed.
pub fn map_solution(response: ApiSolutionResponse, original_customers: &[Customer]) -> Solution {
    let lookup = CustomerLookup::new(original_customers);

    match ResponsePayload::from(response) {
        ResponsePayload::Structured(payload) => {
            let routes: Vec<Route> = payload
                .routes
                .into_iter()
                .map(|route| map_route(route, &lookup))
                .collect();

            let total_distance = payload
                .summary
                .as_ref()
                .and_then(|summary| summary.total_distance)
                .or(payload.legacy.total_distance)
                .unwrap_or_else(|| routes_distance(&routes));

            let solve_time_ms = payload.solve_time_ms.or(payload
                .legacy
                .meta
                .as_ref()
                .map(|meta| meta.solve_time_ms));

            Solution {
                total_distance,
                vehicle_states: payload.legacy.vehicle_state,
                available_vehicle_count: payload.legacy.available_vehicle_count,
                meta: payload.legacy.meta.map(map_meta),
                summary: payload.summary.map(map_summary),
                unserved_customers: payload
                    .unserved_customers
                    .iter()
                    .map(|echo| lookup.restore(echo))
                    .collect(),
                timestamp: payload.timestamp,
                config_name: payload.config_name,
                solve_time_ms,
                routes,
            }
        }
        ResponsePayload::Legacy(payload) => {
            let routes: Vec<Route> = payload
                .routes
                .into_iter()
                .map(|route| map_route(route, &lookup))
                .collect();

            Solution {
                total_distance: payload
                    .legacy
                    .total_distance
                    .unwrap_or_else(|| routes_distance(&routes)),
                vehicle_states: payload.legacy.vehicle_state,
                available_vehicle_count: payload.legacy.available_vehicle_count,
                meta: payload.legacy.meta.map(map_meta),
                routes,
                ..Solution::default()
            }
        }
    }
}

use std::collections::BTreeMap;

use cvrp_core::problem::{customer::Customer, depot::Depot, vehicle::Vehicle};

use crate::solver_api::{
    ApiCustomer, ApiDepot, ApiVehicle, CompactRequest, CvrpRequest, ExtendedRequest,
    RequestFormat,
};

/// Maps the configurator inputs onto the wire shape of `format`.
///
/// Passing `None` for `vehicles` leaves the fleet out of the request so the
/// backend keeps the one it was last given. No validation happens here.
pub fn format_request(
    format: RequestFormat,
    customers: &[Customer],
    vehicles: Option<&[Vehicle]>,
    depot: &Depot,
) -> CvrpRequest {
    match format {
        RequestFormat::Compact => CvrpRequest::Compact(format_compact(customers, vehicles)),
        RequestFormat::Extended => {
            CvrpRequest::Extended(format_extended(customers, vehicles, depot))
        }
    }
}

pub fn format_compact(customers: &[Customer], vehicles: Option<&[Vehicle]>) -> CompactRequest {
    let vehicles = vehicles.map(|vehicles| {
        vehicles
            .iter()
            .map(|vehicle| (format!("vehicle_{}", vehicle.id()), vehicle.capacity()))
            .collect::<BTreeMap<_, _>>()
    });

    let customers = customers
        .iter()
        .map(|customer| {
            (
                format!("customer_{}", customer.id()),
                ([customer.x(), customer.y()], customer.demand()),
            )
        })
        .collect();

    CompactRequest {
        vehicles,
        customers,
    }
}

pub fn format_extended(
    customers: &[Customer],
    vehicles: Option<&[Vehicle]>,
    depot: &Depot,
) -> ExtendedRequest {
    ExtendedRequest {
        depot: ApiDepot {
            name: depot.name().to_owned(),
            x: depot.x(),
            y: depot.y(),
        },
        vehicles: vehicles.map(|vehicles| {
            vehicles
                .iter()
                .map(|vehicle| ApiVehicle {
                    name: vehicle.name().to_owned(),
                    capacity: vehicle.capacity(),
                    max_distance: vehicle.max_distance(),
                })
                .collect()
        }),
        customers: customers
            .iter()
            .map(|customer| ApiCustomer {
                id: customer.id().to_string(),
                demand: customer.demand(),
                x: customer.x(),
                y: customer.y(),
                time_window: customer
                    .effective_time_window()
                    .map(|window| [window.start(), window.end()]),
            })
            .collect(),
    }
}

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type ApiPoint = [f64; 2];

#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestFormat {
    /// `vehicle_<id>: capacity` and `customer_<id>: [[x, y], demand]` maps.
    Compact,
    /// Depot object plus vehicle and customer arrays.
    #[default]
    Extended,
}

impl Display for RequestFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RequestFormat::Compact => "compact",
                RequestFormat::Extended => "extended",
            }
        )
    }
}

impl FromStr for RequestFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(RequestFormat::Compact),
            "extended" => Ok(RequestFormat::Extended),
            other => Err(format!("Unknown request format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompactRequest {
    /// Omitted when the backend should keep the fleet it already has.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicles: Option<BTreeMap<String, u32>>,
    pub customers: BTreeMap<String, (ApiPoint, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename = "Depot")]
pub struct ApiDepot {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename = "Vehicle", rename_all = "camelCase")]
pub struct ApiVehicle {
    pub name: String,
    pub capacity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename = "Customer", rename_all = "camelCase")]
pub struct ApiCustomer {
    pub id: String,
    pub demand: u32,
    pub x: f64,
    pub y: f64,
    /// Only present when the window is set to something other than `[0, 0]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window: Option<[i64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename = "CvrpRequest")]
pub struct ExtendedRequest {
    pub depot: ApiDepot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicles: Option<Vec<ApiVehicle>>,
    pub customers: Vec<ApiCustomer>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CvrpRequest {
    Compact(CompactRequest),
    Extended(ExtendedRequest),
}

impl CvrpRequest {
    pub fn format(&self) -> RequestFormat {
        match self {
            CvrpRequest::Compact(_) => RequestFormat::Compact,
            CvrpRequest::Extended(_) => RequestFormat::Extended,
        }
    }

    pub fn includes_vehicles(&self) -> bool {
        match self {
            CvrpRequest::Compact(request) => request.vehicles.is_some(),
            CvrpRequest::Extended(request) => request.vehicles.is_some(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SubmitResponse {
    pub request_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StatusResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub solution: Option<ApiSolutionResponse>,
}

pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_PROCESSING: &str = "processing";

/// Identifier echoed by the backend, either as a JSON number or a string.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ApiId {
    Number(i64),
    Text(String),
}

impl ApiId {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ApiId::Number(value) => u32::try_from(*value).ok(),
            ApiId::Text(value) => value.trim().parse().ok(),
        }
    }
}

impl Display for ApiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiId::Number(value) => write!(f, "{}", value),
            ApiId::Text(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApiCustomerEcho {
    pub id: ApiId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub demand: Option<u32>,
}

/// A route in any of the shapes the backend has produced.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoute {
    #[serde(default)]
    pub route_id: Option<ApiId>,
    #[serde(default)]
    pub vehicle_name: Option<String>,
    #[serde(default)]
    pub total_demand: Option<u32>,
    #[serde(default)]
    pub total_distance: Option<f64>,
    #[serde(default)]
    pub customers: Vec<ApiCustomerEcho>,

    #[serde(default, rename = "vehicle_id")]
    pub legacy_vehicle_id: Option<ApiId>,
    #[serde(default, rename = "total_demand")]
    pub legacy_total_demand: Option<u32>,
    #[serde(default, rename = "total_distance")]
    pub legacy_total_distance: Option<f64>,
}

impl ApiRoute {
    pub fn has_structured_fields(&self) -> bool {
        self.route_id.is_some()
            || self.vehicle_name.is_some()
            || self.total_demand.is_some()
            || self.total_distance.is_some()
    }
}

/// Any field may be missing, so each one is only used when present.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    #[serde(default)]
    pub total_items_requested: Option<u64>,
    #[serde(default)]
    pub total_items_delivered: Option<u64>,
    #[serde(default)]
    pub total_distance: Option<f64>,
    #[serde(default)]
    pub number_of_routes: Option<u32>,
    #[serde(default)]
    pub delivery_rate: Option<f64>,
    #[serde(default)]
    pub unserved_customers: Option<u32>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ApiMeta {
    pub solver: String,
    pub solve_time_ms: u64,
}

/// Solution body as sent by the backend, with every historical field optional.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiSolutionResponse {
    #[serde(default)]
    pub routes: Vec<ApiRoute>,

    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub config_name: Option<String>,
    #[serde(default)]
    pub solve_time_ms: Option<u64>,
    #[serde(default)]
    pub summary: Option<ApiSummary>,
    #[serde(default)]
    pub unserved_customers: Option<Vec<ApiCustomerEcho>>,

    #[serde(default, rename = "vehicle_state")]
    pub vehicle_state: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "available_vehicle_count")]
    pub available_vehicle_count: Option<u32>,
    #[serde(default, rename = "total_distance")]
    pub total_distance: Option<f64>,
    #[serde(default)]
    pub meta: Option<ApiMeta>,
}

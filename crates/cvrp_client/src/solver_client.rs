use std::time::Duration;

use cvrp_core::problem::{customer::Customer, depot::Depot, solution::Solution, vehicle::Vehicle};
use jiff::SpanRelativeTo;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    request_formatter::format_request,
    response_mapper::map_solution,
    solver_api::{RequestFormat, STATUS_COMPLETED, STATUS_PENDING, STATUS_PROCESSING},
    solver_transport::{HttpTransport, SolverTransport},
};

pub const DEFAULT_SOLVER_ENDPOINT: &str = "http://localhost:8000/api/solve-cvrp";
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const ENV_SOLVER_ENDPOINT: &str = "CVRP_SOLVER_ENDPOINT";
pub const ENV_MAX_POLL_ATTEMPTS: &str = "CVRP_MAX_POLL_ATTEMPTS";
pub const ENV_POLL_INTERVAL: &str = "CVRP_POLL_INTERVAL";
pub const ENV_REQUEST_FORMAT: &str = "CVRP_REQUEST_FORMAT";

#[derive(Debug, Error)]
pub enum SolverClientError {
    #[error(
        "Cannot connect to backend. Please ensure:\n1. Backend server is running\n2. CORS is enabled\n3. API URL is correct"
    )]
    Connection(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Backend API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(String),

    #[error("Request {0} completed without a solution")]
    MissingSolution(String),

    #[error("Timeout waiting for solution after {0} attempts")]
    Timeout(u32),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SolverClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            SolverClientError::Connection(error)
        } else {
            SolverClientError::Request(error)
        }
    }
}

impl SolverClientError {
    /// True when the backend could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, SolverClientError::Connection(_))
    }
}

/// Accepts `1s`, `500ms`, `PT2S`, or a plain number of seconds.
pub fn parse_poll_interval(input: &str) -> Result<Duration, String> {
    let input = input.trim();

    let duration = if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        duration
    } else if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        duration
    } else if let Ok(seconds) = input.parse::<u64>() {
        jiff::SignedDuration::from_secs(seconds as i64)
    } else {
        return Err(format!("Invalid duration: {}", input));
    };

    Duration::try_from(duration).map_err(|_| format!("Negative duration: {}", input))
}

#[derive(Debug, Clone)]
pub struct SolverClientParams {
    pub endpoint: String,
    pub max_poll_attempts: u32,
    pub poll_interval: Duration,
    pub request_format: RequestFormat,
}

impl Default for SolverClientParams {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SOLVER_ENDPOINT.to_owned(),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_format: RequestFormat::default(),
        }
    }
}

impl SolverClientParams {
    /// Defaults overridden by the `CVRP_*` environment variables that are set.
    pub fn from_env() -> Result<Self, SolverClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SolverClientError> {
        let mut params = Self::default();

        if let Some(endpoint) = lookup(ENV_SOLVER_ENDPOINT) {
            params.endpoint = endpoint;
        }

        if let Some(attempts) = lookup(ENV_MAX_POLL_ATTEMPTS) {
            params.max_poll_attempts = attempts.trim().parse().map_err(|_| {
                SolverClientError::Config(format!("{}={}", ENV_MAX_POLL_ATTEMPTS, attempts))
            })?;
        }

        if let Some(interval) = lookup(ENV_POLL_INTERVAL) {
            params.poll_interval = parse_poll_interval(&interval)
                .map_err(|error| SolverClientError::Config(format!("{}: {}", ENV_POLL_INTERVAL, error)))?;
        }

        if let Some(format) = lookup(ENV_REQUEST_FORMAT) {
            params.request_format = format
                .parse()
                .map_err(|error| SolverClientError::Config(format!("{}: {}", ENV_REQUEST_FORMAT, error)))?;
        }

        Ok(params)
    }
}

/// Submits a problem to the solver backend and polls until it is solved.
///
/// Concurrent calls to [`SolverClient::solve`] are independent: each gets its
/// own request id and its own poll loop.
pub struct SolverClient<T: SolverTransport = HttpTransport> {
    params: SolverClientParams,
    transport: T,
}

impl SolverClient<HttpTransport> {
    pub fn new(params: SolverClientParams) -> Self {
        let transport = HttpTransport::new(params.endpoint.clone());
        Self { params, transport }
    }
}

impl Default for SolverClient<HttpTransport> {
    fn default() -> Self {
        Self::new(SolverClientParams::default())
    }
}

impl<T: SolverTransport> SolverClient<T> {
    pub fn with_transport(params: SolverClientParams, transport: T) -> Self {
        Self { params, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `vehicles: None` leaves the fleet out of the request.
    #[instrument(skip_all)]
    pub async fn solve(
        &self,
        customers: &[Customer],
        vehicles: Option<&[Vehicle]>,
        depot: &Depot,
    ) -> Result<Solution, SolverClientError> {
        let request = format_request(self.params.request_format, customers, vehicles, depot);

        let submitted = self.transport.submit(&request).await?;
        info!(
            "SolverApi: Submitted {} customers, request_id = {}",
            customers.len(),
            submitted.request_id
        );
        if let Some(status) = &submitted.status {
            debug!(
                "SolverApi: Request {} accepted with status {}: {}",
                submitted.request_id,
                status,
                submitted.message.as_deref().unwrap_or_default()
            );
        }

        let solution = self
            .poll_until_completed(&submitted.request_id, customers)
            .await?;

        info!(
            "SolverApi: Request {} completed with {} routes",
            submitted.request_id,
            solution.routes.len()
        );

        Ok(solution)
    }

    async fn poll_until_completed(
        &self,
        request_id: &str,
        customers: &[Customer],
    ) -> Result<Solution, SolverClientError> {
        let max_attempts = self.params.max_poll_attempts;

        for attempt in 1..=max_attempts {
            debug!(
                "SolverApi: Polling for request completion {}/{}",
                attempt, max_attempts
            );

            match self.transport.fetch_status(request_id).await {
                Ok(response) => match response.status.as_str() {
                    STATUS_COMPLETED => {
                        return match response.solution {
                            Some(solution) => Ok(map_solution(solution, customers)),
                            None => Err(SolverClientError::MissingSolution(request_id.to_owned())),
                        };
                    }
                    STATUS_PENDING | STATUS_PROCESSING => {}
                    other => return Err(SolverClientError::UnexpectedStatus(other.to_owned())),
                },
                Err(error) if attempt < max_attempts => {
                    warn!(
                        "SolverApi: Poll attempt {}/{} failed: {}",
                        attempt, max_attempts, error
                    );
                }
                Err(error) => return Err(error),
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.params.poll_interval).await;
            }
        }

        Err(SolverClientError::Timeout(max_attempts))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use crate::test_utils::{ScriptedTransport, completed, pending, test_params};

    use super::*;

    fn customers() -> Vec<Customer> {
        vec![Customer::new(1, 10.0, 10.0, 5)]
    }

    fn vehicles() -> Vec<Vehicle> {
        vec![Vehicle::with_defaults(1)]
    }

    fn solved() -> serde_json::Value {
        json!({
            "routes": [{
                "vehicle_id": 1,
                "customers": [{ "id": 1, "x": 0.0, "y": 0.0, "demand": 5 }],
                "total_demand": 5,
                "total_distance": 28.28
            }],
            "total_distance": 28.28
        })
    }

    #[tokio::test]
    async fn test_completed_on_first_poll() {
        let transport = ScriptedTransport::new("req-1", vec![completed(solved())]);
        let client = SolverClient::with_transport(test_params(), transport);

        let vehicles = vehicles();
        let solution = client
            .solve(&customers(), Some(vehicles.as_slice()), &Depot::default())
            .await
            .unwrap();

        assert_eq!(client.transport().poll_count(), 1);
        assert_eq!(solution.routes.len(), 1);
        assert_eq!(solution.routes[0].customers[0].x(), 10.0);
        assert_eq!(client.transport().polled_ids(), vec!["req-1".to_owned()]);
    }

    #[tokio::test]
    async fn test_completes_on_last_attempt() {
        let mut script: Vec<_> = (0..29).map(|_| pending()).collect();
        script.push(completed(solved()));
        let client = SolverClient::with_transport(test_params(), ScriptedTransport::new("req", script));

        let solution = client.solve(&customers(), None, &Depot::default()).await;

        assert!(solution.is_ok());
        assert_eq!(client.transport().poll_count(), 30);
    }

    #[tokio::test]
    async fn test_times_out_after_max_attempts() {
        let script: Vec<_> = (0..31).map(|_| pending()).collect();
        let client = SolverClient::with_transport(test_params(), ScriptedTransport::new("req", script));

        let error = client
            .solve(&customers(), None, &Depot::default())
            .await
            .unwrap_err();

        assert!(matches!(error, SolverClientError::Timeout(30)));
        assert_eq!(client.transport().poll_count(), 30);
        assert_eq!(
            error.to_string(),
            "Timeout waiting for solution after 30 attempts"
        );
    }

    #[tokio::test]
    async fn test_unexpected_status_is_not_retried() {
        let script = vec![
            Ok(json!({ "request_id": "req", "status": "failed" })),
            completed(solved()),
        ];
        let client = SolverClient::with_transport(test_params(), ScriptedTransport::new("req", script));

        let error = client
            .solve(&customers(), None, &Depot::default())
            .await
            .unwrap_err();

        assert!(matches!(error, SolverClientError::UnexpectedStatus(ref status) if status == "failed"));
        assert_eq!(client.transport().poll_count(), 1);
    }

    #[tokio::test]
    async fn test_poll_errors_are_retried() {
        let script = vec![
            Err(SolverClientError::Api {
                status: 502,
                message: "Bad Gateway".to_owned(),
            }),
            pending(),
            completed(solved()),
        ];
        let client = SolverClient::with_transport(test_params(), ScriptedTransport::new("req", script));

        let solution = client.solve(&customers(), None, &Depot::default()).await;

        assert!(solution.is_ok());
        assert_eq!(client.transport().poll_count(), 3);
    }

    #[tokio::test]
    async fn test_error_on_final_attempt_propagates() {
        let params = SolverClientParams {
            max_poll_attempts: 2,
            ..test_params()
        };
        let script = vec![
            pending(),
            Err(SolverClientError::UnexpectedStatus("socket closed".to_owned())),
        ];
        let client = SolverClient::with_transport(params, ScriptedTransport::new("req", script));

        let error = client
            .solve(&customers(), None, &Depot::default())
            .await
            .unwrap_err();

        assert!(matches!(error, SolverClientError::UnexpectedStatus(_)));
        assert_eq!(client.transport().poll_count(), 2);
    }

    #[tokio::test]
    async fn test_completed_without_solution() {
        let script = vec![Ok(json!({ "request_id": "req", "status": "completed" }))];
        let client = SolverClient::with_transport(test_params(), ScriptedTransport::new("req", script));

        let error = client
            .solve(&customers(), None, &Depot::default())
            .await
            .unwrap_err();

        assert!(matches!(error, SolverClientError::MissingSolution(ref id) if id == "req"));
    }

    #[tokio::test]
    async fn test_submit_error_is_not_retried() {
        let transport = ScriptedTransport::failing_submit(SolverClientError::Api {
            status: 500,
            message: "Internal Server Error".to_owned(),
        });
        let client = SolverClient::with_transport(test_params(), transport);

        let error = client
            .solve(&customers(), None, &Depot::default())
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "Backend API error (500): Internal Server Error"
        );
        assert_eq!(client.transport().poll_count(), 0);
    }

    #[tokio::test]
    async fn test_request_omits_vehicles_when_not_given() {
        let client = SolverClient::with_transport(
            test_params(),
            ScriptedTransport::new("req", vec![completed(solved())]),
        );

        client
            .solve(&customers(), None, &Depot::default())
            .await
            .unwrap();

        let request = client.transport().last_request().unwrap();
        assert!(request.get("vehicles").is_none());
        assert_eq!(request["customers"][0]["id"], json!("1"));
    }

    #[test]
    fn test_params_from_lookup() {
        let env = HashMap::from([
            (ENV_SOLVER_ENDPOINT, "http://solver:9000/api/solve-cvrp"),
            (ENV_MAX_POLL_ATTEMPTS, "5"),
            (ENV_POLL_INTERVAL, "250ms"),
            (ENV_REQUEST_FORMAT, "compact"),
        ]);

        let params =
            SolverClientParams::from_lookup(|key| env.get(key).map(|value| value.to_string()))
                .unwrap();

        assert_eq!(params.endpoint, "http://solver:9000/api/solve-cvrp");
        assert_eq!(params.max_poll_attempts, 5);
        assert_eq!(params.poll_interval, Duration::from_millis(250));
        assert_eq!(params.request_format, RequestFormat::Compact);
    }

    #[test]
    fn test_params_defaults_and_invalid_values() {
        let params = SolverClientParams::from_lookup(|_| None).unwrap();
        assert_eq!(params.endpoint, DEFAULT_SOLVER_ENDPOINT);
        assert_eq!(params.max_poll_attempts, 30);
        assert_eq!(params.poll_interval, Duration::from_secs(1));

        let error = SolverClientParams::from_lookup(|key| {
            (key == ENV_MAX_POLL_ATTEMPTS).then(|| "many".to_owned())
        })
        .unwrap_err();
        assert!(matches!(error, SolverClientError::Config(_)));
    }

    #[test]
    fn test_parse_poll_interval() {
        assert_eq!(parse_poll_interval("2"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_poll_interval("1s"), Ok(Duration::from_secs(1)));
        assert_eq!(parse_poll_interval("PT2S"), Ok(Duration::from_secs(2)));
        assert!(parse_poll_interval("soon").is_err());
    }
}

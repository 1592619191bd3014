use std::future::Future;

use reqwest::header::ACCEPT;
use tracing::debug;

use crate::{
    solver_api::{CvrpRequest, StatusResponse, SubmitResponse},
    solver_client::SolverClientError,
};

/// The two calls the polling client needs from a solver backend.
pub trait SolverTransport: Send + Sync {
    fn submit(
        &self,
        request: &CvrpRequest,
    ) -> impl Future<Output = Result<SubmitResponse, SolverClientError>> + Send;

    fn fetch_status(
        &self,
        request_id: &str,
    ) -> impl Future<Output = Result<StatusResponse, SolverClientError>> + Send;
}

/// Status endpoint for `request_id`: the last path segment of the submit
/// endpoint is replaced by `solution/<request_id>`.
pub fn status_url(endpoint: &str, request_id: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');

    match trimmed.rsplit_once('/') {
        Some((base, _)) if !base.ends_with('/') => format!("{}/solution/{}", base, request_id),
        _ => format!("{}/solution/{}", trimmed, request_id),
    }
}

pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn error_from_response(response: reqwest::Response) -> SolverClientError {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        let message = if message.trim().is_empty() {
            status.canonical_reason().unwrap_or_default().to_owned()
        } else {
            message
        };

        SolverClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

impl SolverTransport for HttpTransport {
    async fn submit(&self, request: &CvrpRequest) -> Result<SubmitResponse, SolverClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        debug!("SolverApi: Posted {} request", request.format());

        Ok(response.json().await?)
    }

    async fn fetch_status(&self, request_id: &str) -> Result<StatusResponse, SolverClientError> {
        let response = self
            .client
            .get(status_url(&self.endpoint, request_id))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response.json().await?)
    }
}

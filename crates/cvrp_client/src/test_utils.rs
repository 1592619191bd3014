use std::{collections::VecDeque, time::Duration};

use parking_lot::Mutex;
use serde_json::json;

use crate::{
    solver_api::{CvrpRequest, StatusResponse, SubmitResponse},
    solver_client::{SolverClientError, SolverClientParams},
    solver_transport::SolverTransport,
};

pub type ScriptedStatus = Result<serde_json::Value, SolverClientError>;

pub fn pending() -> ScriptedStatus {
    Ok(json!({ "status": "pending" }))
}

pub fn completed(solution: serde_json::Value) -> ScriptedStatus {
    Ok(json!({ "status": "completed", "solution": solution }))
}

pub fn test_params() -> SolverClientParams {
    SolverClientParams {
        poll_interval: Duration::ZERO,
        ..SolverClientParams::default()
    }
}

type PollHook = Box<dyn Fn(u32) + Send + Sync>;

/// In-memory backend replaying a fixed sequence of status responses.
/// Once the script runs out every poll answers `pending`.
pub struct ScriptedTransport {
    request_id: String,
    submit_error: Mutex<Option<SolverClientError>>,
    script: Mutex<VecDeque<ScriptedStatus>>,
    polled_ids: Mutex<Vec<String>>,
    last_request: Mutex<Option<serde_json::Value>>,
    on_poll: Option<PollHook>,
}

impl ScriptedTransport {
    pub fn new(request_id: &str, script: Vec<ScriptedStatus>) -> Self {
        Self {
            request_id: request_id.to_owned(),
            submit_error: Mutex::new(None),
            script: Mutex::new(script.into()),
            polled_ids: Mutex::new(Vec::new()),
            last_request: Mutex::new(None),
            on_poll: None,
        }
    }

    pub fn failing_submit(error: SolverClientError) -> Self {
        let transport = Self::new("unused", Vec::new());
        *transport.submit_error.lock() = Some(error);
        transport
    }

    /// Runs `hook` with the 1-based attempt number before each poll is answered.
    pub fn with_poll_hook(mut self, hook: impl Fn(u32) + Send + Sync + 'static) -> Self {
        self.on_poll = Some(Box::new(hook));
        self
    }

    pub fn poll_count(&self) -> usize {
        self.polled_ids.lock().len()
    }

    pub fn polled_ids(&self) -> Vec<String> {
        self.polled_ids.lock().clone()
    }

    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.last_request.lock().clone()
    }
}

impl SolverTransport for ScriptedTransport {
    async fn submit(&self, request: &CvrpRequest) -> Result<SubmitResponse, SolverClientError> {
        if let Some(error) = self.submit_error.lock().take() {
            return Err(error);
        }

        *self.last_request.lock() = Some(serde_json::to_value(request)?);

        Ok(SubmitResponse {
            request_id: self.request_id.clone(),
            status: Some("accepted".to_owned()),
            message: None,
        })
    }

    async fn fetch_status(&self, request_id: &str) -> Result<StatusResponse, SolverClientError> {
        let attempt = {
            let mut polled_ids = self.polled_ids.lock();
            polled_ids.push(request_id.to_owned());
            polled_ids.len() as u32
        };

        if let Some(hook) = &self.on_poll {
            hook(attempt);
        }

        let next = self.script.lock().pop_front().unwrap_or_else(pending);

        Ok(serde_json::from_value(next?)?)
    }
}

use std::sync::Arc;

use cvrp_core::state::{
    action::Action,
    configurator_state::{ConfiguratorState, StateError},
    store::Store,
};
use tracing::{debug, error};

use crate::{solver_client::SolverClient, solver_transport::SolverTransport};

#[derive(Debug)]
pub enum SolveOutcome {
    /// The result was written into the store.
    Applied(Arc<ConfiguratorState>),
    /// The inputs changed while the solve was running; the result was dropped.
    Discarded { epoch: u64 },
}

/// Solves the store's current problem and writes the result back.
///
/// The epoch at `SolveStarted` travels with the request, so a result arriving
/// after the inputs were edited or reset cannot overwrite the newer state.
pub async fn solve_current<T: SolverTransport>(
    store: &Store,
    client: &SolverClient<T>,
) -> Result<SolveOutcome, StateError> {
    let started = store.dispatch(Action::SolveStarted)?;
    let epoch = started.epoch();

    let result = client
        .solve(
            started.customers(),
            started.fleet_to_submit(),
            started.depot(),
        )
        .await;

    let action = match result {
        Ok(solution) => Action::SolveSucceeded { epoch, solution },
        Err(e) => {
            if e.is_connection() {
                error!("Solver backend is unreachable: {}", e);
            } else {
                error!("Solve failed: {}", e);
            }
            Action::SolveFailed {
                epoch,
                message: e.to_string(),
            }
        }
    };

    let next = store.dispatch(action)?;
    if next.epoch() != epoch {
        debug!("Solve from epoch {} finished after inputs changed", epoch);
        return Ok(SolveOutcome::Discarded { epoch });
    }

    Ok(SolveOutcome::Applied(next))
}

#[cfg(test)]
mod tests {
    use cvrp_core::state::configurator_state::{NoticeLevel, SolutionStatus};
    use serde_json::json;

    use crate::{
        solver_client::SolverClientParams,
        test_utils::{ScriptedTransport, completed, test_params},
    };

    use super::*;

    fn solved() -> serde_json::Value {
        json!({
            "routes": [{
                "vehicleName": "V1",
                "totalDemand": 5,
                "totalDistance": 12.0,
                "customers": [{ "id": "1", "demand": 5 }]
            }]
        })
    }

    fn store_with_customer() -> Arc<Store> {
        let store = Arc::new(Store::default());
        store.dispatch(Action::AddCustomer { x: 100.0, y: 200.0 }).unwrap();
        store
    }

    #[tokio::test]
    async fn test_applies_solution() {
        let store = store_with_customer();
        let client = SolverClient::with_transport(
            test_params(),
            ScriptedTransport::new("req", vec![completed(solved())]),
        );

        let outcome = solve_current(&store, &client).await.unwrap();

        let SolveOutcome::Applied(state) = outcome else {
            panic!("solution was discarded");
        };
        let solution = state.solution().unwrap();
        assert_eq!(solution.routes[0].customers[0].x(), 100.0);
        assert_eq!(solution.total_distance, 12.0);
        assert_eq!(state.notice().unwrap().level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn test_records_failure() {
        let store = store_with_customer();
        let client = SolverClient::with_transport(
            test_params(),
            ScriptedTransport::new(
                "req",
                vec![Ok(json!({ "status": "cancelled" }))],
            ),
        );

        solve_current(&store, &client).await.unwrap();

        let state = store.snapshot();
        assert!(
            matches!(state.status(), SolutionStatus::Failed(message) if message == "Unexpected status: cancelled")
        );
        assert!(state.solution().is_none());
        assert_eq!(state.notice().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_with_checklist() {
        let store = store_with_customer();
        let client = SolverClient::new(SolverClientParams {
            endpoint: String::from("http://127.0.0.1:1/api/solve-cvrp"),
            ..test_params()
        });

        solve_current(&store, &client).await.unwrap();

        let state = store.snapshot();
        assert!(matches!(
            state.status(),
            SolutionStatus::Failed(message) if message.starts_with("Cannot connect to backend")
        ));
        assert_eq!(state.notice().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_empty_routes_is_no_solution() {
        let store = store_with_customer();
        let client = SolverClient::with_transport(
            test_params(),
            ScriptedTransport::new("req", vec![completed(json!({ "routes": [] }))]),
        );

        solve_current(&store, &client).await.unwrap();

        assert_eq!(store.snapshot().status(), &SolutionStatus::NoSolution);
    }

    #[tokio::test]
    async fn test_discards_result_after_reset() {
        let store = store_with_customer();
        let hook_store = Arc::clone(&store);
        let transport = ScriptedTransport::new("req", vec![completed(solved())])
            .with_poll_hook(move |_| {
                hook_store.dispatch(Action::Reset).unwrap();
            });
        let client = SolverClient::with_transport(test_params(), transport);

        let outcome = solve_current(&store, &client).await.unwrap();

        assert!(matches!(outcome, SolveOutcome::Discarded { epoch: 1 }));
        let state = store.snapshot();
        assert_eq!(state.status(), &SolutionStatus::Unsolved);
        assert!(state.customers().is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_fleet_is_sent_once() {
        let store = store_with_customer();
        let client = SolverClient::with_transport(
            test_params(),
            ScriptedTransport::new("req", vec![completed(solved()), completed(solved())]),
        );

        solve_current(&store, &client).await.unwrap();
        let first = client.transport().last_request().unwrap();
        solve_current(&store, &client).await.unwrap();
        let second = client.transport().last_request().unwrap();

        assert_eq!(first["vehicles"].as_array().unwrap().len(), 2);
        assert!(second.get("vehicles").is_none());

        store.dispatch(Action::AddVehicle).unwrap();
        let client = SolverClient::with_transport(
            test_params(),
            ScriptedTransport::new("req", vec![completed(solved())]),
        );
        solve_current(&store, &client).await.unwrap();
        let third = client.transport().last_request().unwrap();

        assert_eq!(third["vehicles"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_solve_without_customers() {
        let store = Store::default();
        let client = SolverClient::with_transport(
            test_params(),
            ScriptedTransport::new("req", vec![]),
        );

        let error = solve_current(&store, &client).await.unwrap_err();

        assert_eq!(error, StateError::NoCustomers);
        assert_eq!(client.transport().poll_count(), 0);
    }
}

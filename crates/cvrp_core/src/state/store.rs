use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{
    action::Action,
    configurator_state::{ConfiguratorState, StateError},
};

/// Holds the current snapshot. Dispatching replaces it with the reduced one.
pub struct Store {
    state: RwLock<Arc<ConfiguratorState>>,
}

impl Default for Store {
    fn default() -> Self {
        Store::new(ConfiguratorState::default())
    }
}

impl Store {
    pub fn new(state: ConfiguratorState) -> Self {
        Self {
            state: RwLock::new(Arc::new(state)),
        }
    }

    pub fn snapshot(&self) -> Arc<ConfiguratorState> {
        Arc::clone(&self.state.read())
    }

    pub fn dispatch(&self, action: Action) -> Result<Arc<ConfiguratorState>, StateError> {
        let name = action.name();
        let mut state = self.state.write();

        let next = Arc::new(state.reduce(action)?);
        debug!(
            "Store: {} (epoch {} -> {}, status {})",
            name,
            state.epoch(),
            next.epoch(),
            next.status().label()
        );

        *state = Arc::clone(&next);
        Ok(next)
    }
}

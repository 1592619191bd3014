pub mod action;
pub mod configurator_state;
pub mod store;

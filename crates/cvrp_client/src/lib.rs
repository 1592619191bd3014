pub mod request_export;
pub mod request_formatter;
pub mod response_mapper;
pub mod solve_session;
pub mod solver_api;
pub mod solver_client;
pub mod solver_transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub mod customer;
pub mod depot;
pub mod problem_file;
pub mod route;
pub mod solution;
pub mod time_window;
pub mod vehicle;

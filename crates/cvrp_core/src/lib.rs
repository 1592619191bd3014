pub mod cases;
pub mod problem;
pub mod state;

#[cfg(test)]
pub(crate) mod test_utils;

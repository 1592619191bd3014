use std::time::Duration;

use cvrp_client::solver_client::parse_poll_interval;

pub fn parse_duration(input: &str) -> Result<Duration, String> {
    parse_poll_interval(input)
}

pub fn parse_point(input: &str) -> Result<(f64, f64), String> {
    let (x, y) = input
        .split_once(',')
        .ok_or_else(|| format!("Expected x,y but got {}", input))?;

    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;

    if !x.is_finite() || !y.is_finite() {
        return Err(String::from("Coordinates must be finite"));
    }

    Ok((x, y))
}

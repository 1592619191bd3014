use serde::{Deserialize, Serialize};

use super::time_window::TimeWindow;

pub type CustomerId = u32;

pub const DEFAULT_CUSTOMER_DEMAND: u32 = 5;

pub fn customer_name(id: CustomerId) -> String {
    format!("C{}", id)
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    id: CustomerId,
    x: f64,
    y: f64,
    demand: u32,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_window: Option<TimeWindow>,
}

impl Customer {
    pub fn new(id: CustomerId, x: f64, y: f64, demand: u32) -> Self {
        Customer {
            id,
            x,
            y,
            demand,
            name: customer_name(id),
            time_window: None,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn demand(&self) -> u32 {
        self.demand
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    /// The time window if it carries a real constraint, `None` for the `[0, 0]` sentinel.
    pub fn effective_time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref().filter(|window| window.is_set())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_demand(mut self, demand: u32) -> Self {
        self.demand = demand;
        self
    }

    pub fn with_time_window(mut self, time_window: Option<TimeWindow>) -> Self {
        self.time_window = time_window;
        self
    }

    /// Moves the customer to a new dense id, renaming it to `C<id>`.
    pub fn renumbered(mut self, id: CustomerId) -> Self {
        self.id = id;
        self.name = customer_name(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_is_named_after_id() {
        let customer = Customer::new(3, 10.0, 20.0, 5);
        assert_eq!(customer.name(), "C3");
        assert!(customer.time_window().is_none());
    }

    #[test]
    fn test_effective_time_window_skips_sentinel() {
        let customer = Customer::new(1, 0.0, 0.0, 1).with_time_window(Some(TimeWindow::new(0, 0)));
        assert!(customer.time_window().is_some());
        assert!(customer.effective_time_window().is_none());

        let customer = customer.with_time_window(Some(TimeWindow::new(10, 50)));
        assert_eq!(
            customer.effective_time_window(),
            Some(&TimeWindow::new(10, 50))
        );
    }

    #[test]
    fn test_renumbered() {
        let customer = Customer::new(7, 1.0, 2.0, 9).renumbered(2);
        assert_eq!(customer.id(), 2);
        assert_eq!(customer.name(), "C2");
        assert_eq!(customer.demand(), 9);
    }
}

use std::fmt::Display;

use thiserror::Error;

use crate::problem::problem_file::ProblemFile;

/// Catalog coordinates place the depot at the origin; the view space puts it here.
pub const VIEW_DEPOT_X: f64 = 800.0;
pub const VIEW_DEPOT_Y: f64 = 600.0;
pub const VIEW_SCALE_FACTOR: f64 = 10.0;

#[derive(Debug, Error)]
pub enum TestCaseError {
    #[error("Test case not found: {0}")]
    NotFound(String),

    #[error("Test case {name} is malformed: {source}")]
    Malformed {
        name: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCaseCategory {
    BasicCvrp,
    TimeWindowCvrp,
}

impl Display for TestCaseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TestCaseCategory::BasicCvrp => "Basic CVRP",
                TestCaseCategory::TimeWindowCvrp => "Time Window CVRP",
            }
        )
    }
}

pub struct TestCase {
    pub name: &'static str,
    pub file_name: &'static str,
    pub description: &'static str,
    pub category: TestCaseCategory,
    data: &'static str,
}

pub const TEST_CASES: &[TestCase] = &[
    TestCase {
        name: "Small Case",
        file_name: "case_small.json",
        description: "5 customers, basic scenario",
        category: TestCaseCategory::BasicCvrp,
        data: include_str!("../data/cases/case_small.json"),
    },
    TestCase {
        name: "Capacity Shortfall",
        file_name: "case_capacity_shortfall.json",
        description: "Insufficient vehicle capacity",
        category: TestCaseCategory::BasicCvrp,
        data: include_str!("../data/cases/case_capacity_shortfall.json"),
    },
    TestCase {
        name: "Many Customers",
        file_name: "case_many_customers.json",
        description: "Large number of customers",
        category: TestCaseCategory::BasicCvrp,
        data: include_str!("../data/cases/case_many_customers.json"),
    },
    TestCase {
        name: "Random Seeded",
        file_name: "case_random_seeded.json",
        description: "Randomly generated case",
        category: TestCaseCategory::BasicCvrp,
        data: include_str!("../data/cases/case_random_seeded.json"),
    },
    TestCase {
        name: "Tight Distance",
        file_name: "case_tight_distance.json",
        description: "Limited vehicle range",
        category: TestCaseCategory::BasicCvrp,
        data: include_str!("../data/cases/case_tight_distance.json"),
    },
    TestCase {
        name: "TW: Basic",
        file_name: "case_twvrp_basic.json",
        description: "Basic time windows",
        category: TestCaseCategory::TimeWindowCvrp,
        data: include_str!("../data/cases/case_twvrp_basic.json"),
    },
    TestCase {
        name: "TW: Capacity Shortfall",
        file_name: "case_twvrp_capacity_shortfall.json",
        description: "Time windows + capacity issues",
        category: TestCaseCategory::TimeWindowCvrp,
        data: include_str!("../data/cases/case_twvrp_capacity_shortfall.json"),
    },
    TestCase {
        name: "TW: Conflicting",
        file_name: "case_twvrp_conflicting.json",
        description: "Conflicting time constraints",
        category: TestCaseCategory::TimeWindowCvrp,
        data: include_str!("../data/cases/case_twvrp_conflicting.json"),
    },
    TestCase {
        name: "TW: Early/Late",
        file_name: "case_twvrp_early_late.json",
        description: "Early and late deliveries",
        category: TestCaseCategory::TimeWindowCvrp,
        data: include_str!("../data/cases/case_twvrp_early_late.json"),
    },
    TestCase {
        name: "TW: Impossible",
        file_name: "case_twvrp_impossible.json",
        description: "Impossible time windows",
        category: TestCaseCategory::TimeWindowCvrp,
        data: include_str!("../data/cases/case_twvrp_impossible.json"),
    },
    TestCase {
        name: "TW: Mixed",
        file_name: "case_twvrp_mixed.json",
        description: "Mixed window sizes",
        category: TestCaseCategory::TimeWindowCvrp,
        data: include_str!("../data/cases/case_twvrp_mixed.json"),
    },
    TestCase {
        name: "TW: Overlapping",
        file_name: "case_twvrp_overlapping.json",
        description: "Overlapping time windows",
        category: TestCaseCategory::TimeWindowCvrp,
        data: include_str!("../data/cases/case_twvrp_overlapping.json"),
    },
    TestCase {
        name: "TW: Sequential",
        file_name: "case_twvrp_sequential.json",
        description: "Sequential delivery windows",
        category: TestCaseCategory::TimeWindowCvrp,
        data: include_str!("../data/cases/case_twvrp_sequential.json"),
    },
    TestCase {
        name: "TW: Tight Windows",
        file_name: "case_twvrp_tight_windows.json",
        description: "Very narrow time windows",
        category: TestCaseCategory::TimeWindowCvrp,
        data: include_str!("../data/cases/case_twvrp_tight_windows.json"),
    },
    TestCase {
        name: "TW: Wide Windows",
        file_name: "case_twvrp_wide_windows.json",
        description: "Flexible time windows",
        category: TestCaseCategory::TimeWindowCvrp,
        data: include_str!("../data/cases/case_twvrp_wide_windows.json"),
    },
];

pub fn test_case_info(file_name: &str) -> Option<&'static TestCase> {
    TEST_CASES
        .iter()
        .find(|test_case| test_case.file_name == file_name)
}

fn to_view_space(x: f64, y: f64) -> (f64, f64) {
    (
        VIEW_DEPOT_X + x * VIEW_SCALE_FACTOR,
        VIEW_DEPOT_Y + y * VIEW_SCALE_FACTOR,
    )
}

impl TestCase {
    /// The case exactly as catalogued, depot at the origin.
    pub fn raw_problem(&self) -> Result<ProblemFile, TestCaseError> {
        serde_json::from_str(self.data).map_err(|source| TestCaseError::Malformed {
            name: self.file_name.to_owned(),
            source,
        })
    }

    /// The case scaled and shifted into view coordinates.
    pub fn problem(&self) -> Result<ProblemFile, TestCaseError> {
        Ok(self.raw_problem()?.transformed(to_view_space))
    }
}

/// Accepts either the file name (`case_small.json`) or its stem (`case_small`).
pub fn load_test_case(name: &str) -> Result<ProblemFile, TestCaseError> {
    let test_case = test_case_info(name)
        .or_else(|| test_case_info(&format!("{}.json", name)))
        .ok_or_else(|| TestCaseError::NotFound(name.to_owned()))?;

    test_case.problem()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_cases_parse() {
        for test_case in TEST_CASES {
            let problem = test_case.raw_problem().unwrap();
            assert!(!problem.vehicles.is_empty(), "{}", test_case.file_name);
            assert!(!problem.customers.is_empty(), "{}", test_case.file_name);
        }
    }

    #[test]
    fn test_catalog_is_complete() {
        assert_eq!(TEST_CASES.len(), 15);

        let time_window_cases = TEST_CASES
            .iter()
            .filter(|test_case| test_case.category == TestCaseCategory::TimeWindowCvrp)
            .count();
        assert_eq!(time_window_cases, 10);

        let problem = load_test_case("case_many_customers").unwrap();
        assert_eq!(problem.customers.len(), 20);
        assert_eq!(problem.vehicles.len(), 5);
    }

    #[test]
    fn test_all_cases_load_into_state() {
        for test_case in TEST_CASES {
            let state = crate::state::configurator_state::ConfiguratorState::default()
                .reduce(crate::state::action::Action::LoadProblem(test_case.problem().unwrap()));
            assert!(state.is_ok(), "{}", test_case.file_name);
        }
    }

    #[test]
    fn test_load_transforms_coordinates() {
        let problem = load_test_case("case_small").unwrap();

        assert_eq!(problem.depot.x, 800.0);
        assert_eq!(problem.depot.y, 600.0);
        assert_eq!(problem.customers[0].x, 900.0);
        assert_eq!(problem.customers[0].y, 700.0);
    }

    #[test]
    fn test_time_window_cases_keep_windows() {
        let problem = load_test_case("case_twvrp_basic.json").unwrap();
        let customers = problem.customers();

        assert!(customers.iter().all(|c| c.time_window().is_some()));
        assert_eq!(customers[0].name(), "C1");
    }

    #[test]
    fn test_unknown_case() {
        assert!(matches!(
            load_test_case("case_missing"),
            Err(TestCaseError::NotFound(_))
        ));
    }
}


/// Functional unit tests.
pub mod units;

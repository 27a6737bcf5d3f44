//! Repository abstractions for data access.

pub mod calculation;

pub use calculation::{CalculationRepository, HistoryError, NewCalculation};

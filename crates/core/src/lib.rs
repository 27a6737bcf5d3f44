//! Core business logic for Fiscus.
//!
//! This crate contains pure calculation logic with ZERO web or database dependencies.
//! All amounts are `rust_decimal::Decimal`; no binary floating point is involved.
//!
//! # Modules
//!
//! - `calculator` - Interest, investment, depreciation and Brazilian tax formulas

pub mod calculator;

pub use calculator::{
    CalculationError, CalculationInput, CalculationResult, CalculationType, CalculatorService,
    InssPolicy,
};

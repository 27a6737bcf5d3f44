//! Financial and Brazilian tax calculations.
//!
//! Every formula is a pure function over `Decimal`. [`CalculatorService`]
//! dispatches a typed [`CalculationInput`] to its formula, and
//! [`parse_input`] builds that input from a loosely typed parameter bag.

pub mod catalog;
pub mod depreciation;
pub mod error;
pub mod interest;
pub mod math;
pub mod params;
pub mod payroll;
pub mod service;
pub mod tax;
pub mod types;


pub use catalog::{ParameterDescriptor, ParameterKind, TypeDescriptor, describe, supported_types};
pub use error::CalculationError;
pub use math::{allocate_by_percentages, format_brl, format_percent, round_money, round_rate};
pub use params::{ParameterBag, parse_input};
pub use payroll::{InssPolicy, IrrfBracket, inss, irrf, irrf_bracket};
pub use service::CalculatorService;
pub use types::{
    Atividade, BreakdownItem, CalculationInput, CalculationResult, CalculationType,
    CompoundInterestParams, DepreciationMethod, DepreciationParams, InterestParams,
    InvestmentReturnParams, LucroPresumidoParams, PayrollParams, SimplesAnexo,
    SimplesNacionalParams, TaxParams,
};

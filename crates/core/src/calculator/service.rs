//! Dispatch from a calculation input to its formula.

use super::depreciation::depreciation;
use super::error::CalculationError;
use super::interest::{compound_interest, investment_return, loan_payment, simple_interest};
use super::params::{ParameterBag, parse_input};
use super::payroll::{InssPolicy, folha_pagamento};
use super::tax::{income_tax, lucro_presumido, simples_nacional};
use super::types::{CalculationInput, CalculationResult};

/// Runs calculations with a fixed configuration.
///
/// Stateless apart from the INSS policy, so it is `Copy` and can be shared
/// freely between request handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculatorService {
    inss_policy: InssPolicy,
}

impl CalculatorService {
    /// Creates a service using the given INSS policy for payroll.
    #[must_use]
    pub const fn new(inss_policy: InssPolicy) -> Self {
        Self { inss_policy }
    }

    /// INSS policy applied to payroll calculations.
    #[must_use]
    pub const fn inss_policy(&self) -> InssPolicy {
        self.inss_policy
    }

    /// Computes the result for a typed input.
    pub fn calculate(&self, input: &CalculationInput) -> Result<CalculationResult, CalculationError> {
        match input {
            CalculationInput::SimpleInterest(p) => simple_interest(p),
            CalculationInput::CompoundInterest(p) => compound_interest(p),
            CalculationInput::LoanPayment(p) => loan_payment(p),
            CalculationInput::InvestmentReturn(p) => investment_return(p),
            CalculationInput::TaxCalculation(p) => income_tax(p),
            CalculationInput::Depreciation(p) => depreciation(p),
            CalculationInput::SimplesNacional(p) => simples_nacional(p),
            CalculationInput::FolhaPagamento(p) => folha_pagamento(p, self.inss_policy),
            CalculationInput::LucroPresumido(p) => lucro_presumido(p),
        }
    }

    /// Parses a type name and parameter bag, then computes the result.
    ///
    /// Returns the typed input alongside the result so callers can echo
    /// the resolved parameters, defaults included.
    pub fn calculate_raw(
        &self,
        calculation_type: &str,
        parameters: &ParameterBag,
    ) -> Result<(CalculationInput, CalculationResult), CalculationError> {
        let input = parse_input(calculation_type, parameters)?;
        let result = self.calculate(&input)?;
        Ok((input, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::types::CalculationType;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn bag(value: serde_json::Value) -> ParameterBag {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_calculate_raw_dispatches_by_type() {
        let service = CalculatorService::default();
        let (input, result) = service
            .calculate_raw(
                "SIMPLE_INTEREST",
                &bag(json!({"principal": 1000, "rate": 5, "time": 2})),
            )
            .unwrap();

        assert_eq!(input.calculation_type(), CalculationType::SimpleInterest);
        assert_eq!(result.total, dec!(1100));
    }

    #[test]
    fn test_payroll_uses_configured_policy() {
        let params = bag(json!({"salario": 3000}));
        let progressive = CalculatorService::new(InssPolicy::Progressive)
            .calculate_raw("FOLHA_PAGAMENTO", &params)
            .unwrap()
            .1;
        let flat = CalculatorService::new(InssPolicy::FlatCapped)
            .calculate_raw("FOLHA_PAGAMENTO", &params)
            .unwrap()
            .1;

        assert_eq!(progressive.total, dec!(2674.47));
        assert_eq!(flat.total, dec!(2612.55));
    }

    #[test]
    fn test_arithmetic_failure_is_not_validation() {
        let err = CalculatorService::default()
            .calculate_raw(
                "LOAN_PAYMENT",
                &bag(json!({"principal": 1000, "rate": 0, "time": 1})),
            )
            .unwrap_err();

        assert!(!err.is_validation());
        assert_eq!(err.error_code(), "CALCULATION_ERROR");
    }

    #[test]
    fn test_unknown_type_rejected_before_parameters() {
        let err = CalculatorService::default()
            .calculate_raw("MORTGAGE", &ParameterBag::new())
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CALCULATION_TYPE");
    }
}

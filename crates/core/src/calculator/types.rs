//! Calculation data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::CalculationError;

/// Kind of financial calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationType {
    /// Simple interest over a number of years.
    SimpleInterest,
    /// Compound interest with a compounding frequency.
    CompoundInterest,
    /// Fixed monthly payment of an amortized loan.
    LoanPayment,
    /// Total and annualized return of an investment.
    InvestmentReturn,
    /// Generic flat-rate income tax.
    TaxCalculation,
    /// Asset depreciation.
    Depreciation,
    /// Simples Nacional monthly tax (DAS).
    SimplesNacional,
    /// Payroll withholding (INSS, IRRF, allowances).
    FolhaPagamento,
    /// Presumed-profit corporate taxes.
    LucroPresumido,
}

impl CalculationType {
    /// Every calculation type, in catalog order.
    pub const ALL: [Self; 9] = [
        Self::SimpleInterest,
        Self::CompoundInterest,
        Self::LoanPayment,
        Self::InvestmentReturn,
        Self::TaxCalculation,
        Self::Depreciation,
        Self::SimplesNacional,
        Self::FolhaPagamento,
        Self::LucroPresumido,
    ];

    /// Returns the wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SimpleInterest => "SIMPLE_INTEREST",
            Self::CompoundInterest => "COMPOUND_INTEREST",
            Self::LoanPayment => "LOAN_PAYMENT",
            Self::InvestmentReturn => "INVESTMENT_RETURN",
            Self::TaxCalculation => "TAX_CALCULATION",
            Self::Depreciation => "DEPRECIATION",
            Self::SimplesNacional => "SIMPLES_NACIONAL",
            Self::FolhaPagamento => "FOLHA_PAGAMENTO",
            Self::LucroPresumido => "LUCRO_PRESUMIDO",
        }
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationType {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CalculationError::UnsupportedType(s.to_string()))
    }
}

// ============================================================================
// Typed parameters
// ============================================================================

/// Principal, annual rate (percent) and duration (years).
///
/// Shared by simple interest and loan payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestParams {
    /// Amount borrowed or invested.
    pub principal: Decimal,
    /// Annual rate in percent.
    pub rate: Decimal,
    /// Duration in years.
    pub time: Decimal,
}

/// Parameters for compound interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundInterestParams {
    /// Amount invested.
    pub principal: Decimal,
    /// Annual rate in percent.
    pub rate: Decimal,
    /// Duration in years.
    pub time: Decimal,
    /// Compounding periods per year.
    pub compound: Decimal,
}

/// Parameters for investment return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentReturnParams {
    /// Value at the start of the holding period.
    pub initial_value: Decimal,
    /// Value at the end of the holding period.
    pub final_value: Decimal,
    /// Holding period in years.
    pub time: Decimal,
}

/// Parameters for the generic income tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxParams {
    /// Gross income.
    pub income: Decimal,
    /// Tax rate in percent.
    pub tax_rate: Decimal,
    /// Deductions subtracted before the rate applies.
    pub deductions: Decimal,
}

/// Depreciation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepreciationMethod {
    /// Even spread of (cost - salvage) over the useful life.
    StraightLine,
    /// `cost * 2 / life` per year. Not a full declining-balance schedule.
    DoubleDeclining,
}

/// Parameters for depreciation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationParams {
    /// Acquisition cost.
    pub cost: Decimal,
    /// Residual value at the end of the useful life.
    pub salvage_value: Decimal,
    /// Useful life in years.
    pub useful_life: Decimal,
    /// Depreciation method.
    pub method: DepreciationMethod,
}

/// Simples Nacional activity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimplesAnexo {
    /// Commerce.
    Anexo1,
    /// Industry.
    Anexo2,
    /// Services (general).
    Anexo3,
    /// Services with separate CPP.
    Anexo4,
    /// Intellectual services.
    Anexo5,
}

/// Parameters for Simples Nacional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplesNacionalParams {
    /// Gross monthly revenue.
    pub revenue: Decimal,
    /// Activity table.
    pub anexo: SimplesAnexo,
}

/// Parameters for payroll withholding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollParams {
    /// Gross monthly salary.
    pub salario: Decimal,
    /// Number of dependents for IRRF.
    pub dependentes: u32,
    /// Whether the employee opted into transport allowance.
    pub vale_transporte: bool,
    /// Meal allowance paid on top of the salary.
    pub vale_refeicao: Decimal,
}

/// Business activity for presumed profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Atividade {
    /// Commerce.
    Comercio,
    /// Industry.
    Industria,
    /// Services.
    Servicos,
    /// Freight transport.
    Transporte,
    /// Construction.
    Construcao,
}

/// Parameters for presumed profit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LucroPresumidoParams {
    /// Gross revenue for the period.
    pub revenue: Decimal,
    /// Business activity.
    pub atividade: Atividade,
    /// Operating expenses, used only for the net profit estimate.
    pub despesas: Decimal,
}

/// A validated calculation request, one variant per type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CalculationInput {
    /// See [`CalculationType::SimpleInterest`].
    SimpleInterest(InterestParams),
    /// See [`CalculationType::CompoundInterest`].
    CompoundInterest(CompoundInterestParams),
    /// See [`CalculationType::LoanPayment`].
    LoanPayment(InterestParams),
    /// See [`CalculationType::InvestmentReturn`].
    InvestmentReturn(InvestmentReturnParams),
    /// See [`CalculationType::TaxCalculation`].
    TaxCalculation(TaxParams),
    /// See [`CalculationType::Depreciation`].
    Depreciation(DepreciationParams),
    /// See [`CalculationType::SimplesNacional`].
    SimplesNacional(SimplesNacionalParams),
    /// See [`CalculationType::FolhaPagamento`].
    FolhaPagamento(PayrollParams),
    /// See [`CalculationType::LucroPresumido`].
    LucroPresumido(LucroPresumidoParams),
}

impl CalculationInput {
    /// Returns the type this input belongs to.
    #[must_use]
    pub const fn calculation_type(&self) -> CalculationType {
        match self {
            Self::SimpleInterest(_) => CalculationType::SimpleInterest,
            Self::CompoundInterest(_) => CalculationType::CompoundInterest,
            Self::LoanPayment(_) => CalculationType::LoanPayment,
            Self::InvestmentReturn(_) => CalculationType::InvestmentReturn,
            Self::TaxCalculation(_) => CalculationType::TaxCalculation,
            Self::Depreciation(_) => CalculationType::Depreciation,
            Self::SimplesNacional(_) => CalculationType::SimplesNacional,
            Self::FolhaPagamento(_) => CalculationType::FolhaPagamento,
            Self::LucroPresumido(_) => CalculationType::LucroPresumido,
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// One line of a calculation breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownItem {
    /// Display label.
    pub label: String,
    /// Amount for this line.
    pub value: Decimal,
    /// Rate applied or share of the total, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
}

impl BreakdownItem {
    /// Creates a line without a percentage.
    #[must_use]
    pub fn new(label: impl Into<String>, value: Decimal) -> Self {
        Self {
            label: label.into(),
            value,
            percentage: None,
        }
    }

    /// Creates a line with a percentage.
    #[must_use]
    pub fn with_percentage(label: impl Into<String>, value: Decimal, percentage: Decimal) -> Self {
        Self {
            label: label.into(),
            value,
            percentage: Some(percentage),
        }
    }
}

/// Result of a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Headline amount.
    pub total: Decimal,
    /// Line items in display order.
    pub breakdown: Vec<BreakdownItem>,
    /// Advisory text.
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Human-readable formula, when there is a single one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl CalculationResult {
    /// Creates a result with no recommendations or formula.
    #[must_use]
    pub const fn new(total: Decimal, breakdown: Vec<BreakdownItem>) -> Self {
        Self {
            total,
            breakdown,
            recommendations: Vec::new(),
            formula: None,
        }
    }

    /// Sets the formula label.
    #[must_use]
    pub fn with_formula(mut self, formula: &str) -> Self {
        self.formula = Some(formula.to_string());
        self
    }

    /// Appends a recommendation.
    #[must_use]
    pub fn recommend(mut self, text: impl Into<String>) -> Self {
        self.recommendations.push(text.into());
        self
    }

    /// Looks up a breakdown value by label.
    #[must_use]
    pub fn value_of(&self, label: &str) -> Option<Decimal> {
        self.breakdown
            .iter()
            .find(|item| item.label == label)
            .map(|item| item.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_calculation_type_round_trips_through_wire_name() {
        for t in CalculationType::ALL {
            assert_eq!(t.as_str().parse::<CalculationType>().unwrap(), t);
            assert_eq!(
                serde_json::to_value(t).unwrap(),
                serde_json::Value::String(t.as_str().to_string())
            );
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert_eq!(
            "NOT_A_TYPE".parse::<CalculationType>(),
            Err(CalculationError::UnsupportedType("NOT_A_TYPE".into()))
        );
        // Wire names are case-sensitive.
        assert!("simple_interest".parse::<CalculationType>().is_err());
    }

    #[test]
    fn test_input_reports_its_type() {
        let input = CalculationInput::LoanPayment(InterestParams {
            principal: dec!(1000),
            rate: dec!(12),
            time: dec!(1),
        });
        assert_eq!(input.calculation_type(), CalculationType::LoanPayment);
    }

    #[test]
    fn test_input_serializes_params_in_camel_case() {
        let input = CalculationInput::InvestmentReturn(InvestmentReturnParams {
            initial_value: dec!(100),
            final_value: dec!(150),
            time: dec!(2),
        });
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["initialValue"], "100");
        assert_eq!(json["finalValue"], "150");
    }

    #[test]
    fn test_breakdown_item_skips_missing_percentage() {
        let json = serde_json::to_value(BreakdownItem::new("Juros", dec!(1))).unwrap();
        assert!(json.get("percentage").is_none());
    }

    #[test]
    fn test_value_of() {
        let result = CalculationResult::new(
            dec!(10),
            vec![BreakdownItem::new("a", dec!(1)), BreakdownItem::new("b", dec!(2))],
        );
        assert_eq!(result.value_of("b"), Some(dec!(2)));
        assert_eq!(result.value_of("c"), None);
    }
}

//! Asset depreciation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::CalculationError;
use super::math::{div, format_brl, mul, round_money, sub};
use super::types::{BreakdownItem, CalculationResult, DepreciationMethod, DepreciationParams};

const DOUBLE_DECLINING_FACTOR: Decimal = dec!(2);

/// Annual depreciation of an asset.
///
/// The total is the annual depreciation. The double declining variant
/// applies `cost * 2 / life` every year, so its book value can go below
/// the salvage value or even negative.
pub fn depreciation(p: &DepreciationParams) -> Result<CalculationResult, CalculationError> {
    let annual = match p.method {
        DepreciationMethod::StraightLine => div(
            sub(p.cost, p.salvage_value, "depreciable amount")?,
            p.useful_life,
            "straight line depreciation",
        )?,
        DepreciationMethod::DoubleDeclining => mul(
            p.cost,
            div(DOUBLE_DECLINING_FACTOR, p.useful_life, "double declining rate")?,
            "double declining depreciation",
        )?,
    };
    let total_depreciation = mul(annual, p.useful_life, "total depreciation")?;
    let book_value = sub(p.cost, total_depreciation, "book value")?;

    let (method_label, formula) = match p.method {
        DepreciationMethod::StraightLine => ("Linha reta", "(Custo − Valor residual) / Vida útil"),
        DepreciationMethod::DoubleDeclining => ("Saldo decrescente duplo", "Custo × 2 / Vida útil"),
    };

    let annual_rate = if p.cost.is_zero() {
        None
    } else {
        Some(round_money(mul(
            div(annual, p.cost, "depreciation rate")?,
            Decimal::ONE_HUNDRED,
            "depreciation rate",
        )?))
    };

    let mut result = CalculationResult::new(
        round_money(annual),
        vec![
            BreakdownItem::new("Custo", round_money(p.cost)),
            BreakdownItem::new("Valor residual", round_money(p.salvage_value)),
            BreakdownItem::new("Vida útil (anos)", p.useful_life),
            BreakdownItem {
                label: "Depreciação anual".to_string(),
                value: round_money(annual),
                percentage: annual_rate,
            },
            BreakdownItem::new("Depreciação total", round_money(total_depreciation)),
            BreakdownItem::new("Valor contábil", round_money(book_value)),
        ],
    )
    .with_formula(formula)
    .recommend(format!(
        "Método {}: {} por ano durante {} anos.",
        method_label.to_lowercase(),
        format_brl(annual),
        p.useful_life.normalize()
    ));

    if round_money(book_value) < round_money(p.salvage_value) {
        result = result.recommend(
            "O valor contábil final fica abaixo do valor residual; limite a depreciação no último ano.",
        );
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(method: DepreciationMethod) -> DepreciationParams {
        DepreciationParams {
            cost: dec!(10000),
            salvage_value: dec!(1000),
            useful_life: dec!(5),
            method,
        }
    }

    #[test]
    fn test_straight_line() {
        let result = depreciation(&params(DepreciationMethod::StraightLine)).unwrap();

        assert_eq!(result.total, dec!(1800));
        assert_eq!(result.value_of("Depreciação total"), Some(dec!(9000)));
        assert_eq!(result.value_of("Valor contábil"), Some(dec!(1000)));
        assert_eq!(result.breakdown[3].percentage, Some(dec!(18)));
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn test_straight_line_book_value_equals_salvage_for_uneven_life() {
        let result = depreciation(&DepreciationParams {
            cost: dec!(1000),
            salvage_value: dec!(100),
            useful_life: dec!(3),
            method: DepreciationMethod::StraightLine,
        })
        .unwrap();

        assert_eq!(result.total, dec!(300));
        assert_eq!(result.value_of("Valor contábil"), Some(dec!(100)));
    }

    #[test]
    fn test_double_declining() {
        let result = depreciation(&params(DepreciationMethod::DoubleDeclining)).unwrap();

        assert_eq!(result.total, dec!(4000));
        assert_eq!(result.value_of("Depreciação total"), Some(dec!(20000)));
        assert_eq!(result.value_of("Valor contábil"), Some(dec!(-10000)));
        assert_eq!(result.recommendations.len(), 2);
    }

    #[test]
    fn test_zero_life_is_division_by_zero() {
        let mut p = params(DepreciationMethod::StraightLine);
        p.useful_life = Decimal::ZERO;
        assert!(matches!(
            depreciation(&p),
            Err(CalculationError::DivisionByZero { .. })
        ));

        p.method = DepreciationMethod::DoubleDeclining;
        assert!(matches!(
            depreciation(&p),
            Err(CalculationError::DivisionByZero { .. })
        ));
    }
}

//! Interest, loan and investment formulas.

use rust_decimal::Decimal;

use super::error::CalculationError;
use super::math::{
    add, div, format_brl, format_percent, mul, pow, round_money, round_rate, sub,
};
use super::types::{
    BreakdownItem, CalculationResult, CompoundInterestParams, InterestParams,
    InvestmentReturnParams,
};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const PERCENT_PER_MONTH_DIVISOR: Decimal = Decimal::from_parts(1200, 0, 0, false, 0);

/// Simple interest: `I = P × r × t / 100`.
pub fn simple_interest(p: &InterestParams) -> Result<CalculationResult, CalculationError> {
    let interest = simple_interest_amount(p.principal, p.rate, p.time)?;
    let amount = add(p.principal, interest, "simple interest amount")?;

    let mut result = CalculationResult::new(
        round_money(amount),
        vec![
            BreakdownItem::new("Capital", round_money(p.principal)),
            BreakdownItem::with_percentage("Juros", round_money(interest), round_rate(p.rate)),
            BreakdownItem::new("Montante", round_money(amount)),
        ],
    )
    .with_formula("I = P × r × t");

    if p.time > Decimal::ONE {
        result = result.recommend(
            "Para prazos superiores a um ano, compare com a modalidade de juros compostos.",
        );
    }
    Ok(result)
}

/// Compound interest: `A = P(1 + r/n)^(nt)`.
pub fn compound_interest(
    p: &CompoundInterestParams,
) -> Result<CalculationResult, CalculationError> {
    let periodic_rate = div(
        p.rate,
        mul(Decimal::ONE_HUNDRED, p.compound, "compound periodic rate")?,
        "compound periodic rate",
    )?;
    let periods = mul(p.compound, p.time, "compound periods")?;
    let factor = pow(
        add(Decimal::ONE, periodic_rate, "compound factor")?,
        periods,
        "compound factor",
    )?;
    let amount = mul(p.principal, factor, "compound amount")?;
    let interest = sub(amount, p.principal, "compound interest")?;

    let mut result = CalculationResult::new(
        round_money(amount),
        vec![
            BreakdownItem::new("Capital", round_money(p.principal)),
            BreakdownItem::with_percentage("Juros", round_money(interest), round_rate(p.rate)),
            BreakdownItem::new("Montante", round_money(amount)),
        ],
    )
    .with_formula("A = P(1 + r/n)^(nt)");

    let simple = simple_interest_amount(p.principal, p.rate, p.time)?;
    let gain = round_money(sub(interest, simple, "compound gain")?);
    if gain > Decimal::ZERO {
        result = result.recommend(format!(
            "A capitalização composta rendeu {} a mais que juros simples no mesmo período.",
            format_brl(gain)
        ));
    }
    Ok(result)
}

/// Fixed monthly payment of an amortized loan (Price table).
///
/// A zero rate is a division by zero, as in the closed formula.
pub fn loan_payment(p: &InterestParams) -> Result<CalculationResult, CalculationError> {
    let monthly_rate = div(p.rate, PERCENT_PER_MONTH_DIVISOR, "loan monthly rate")?;
    let payments = mul(p.time, MONTHS_PER_YEAR, "loan payment count")?;
    let growth = pow(Decimal::ONE + monthly_rate, payments, "loan growth factor")?;

    let numerator = mul(
        mul(p.principal, monthly_rate, "loan payment")?,
        growth,
        "loan payment",
    )?;
    let monthly_payment = div(
        numerator,
        sub(growth, Decimal::ONE, "loan payment")?,
        "loan payment",
    )?;
    let total_payment = mul(monthly_payment, payments, "loan total payment")?;
    let total_interest = sub(total_payment, p.principal, "loan total interest")?;

    let interest_share = if p.principal.is_zero() {
        None
    } else {
        Some(round_rate(mul(
            div(total_interest, p.principal, "loan interest share")?,
            Decimal::ONE_HUNDRED,
            "loan interest share",
        )?))
    };

    let mut result = CalculationResult::new(
        round_money(monthly_payment),
        vec![
            BreakdownItem::new("Parcela mensal", round_money(monthly_payment)),
            BreakdownItem::new("Número de parcelas", payments),
            BreakdownItem::new("Total pago", round_money(total_payment)),
            BreakdownItem {
                label: "Total de juros".to_string(),
                value: round_money(total_interest),
                percentage: interest_share,
            },
        ],
    )
    .with_formula("PMT = P × i × (1 + i)^n / ((1 + i)^n − 1)");

    if let Some(share) = interest_share.filter(|s| *s > Decimal::ONE_HUNDRED) {
        result = result.recommend(format!(
            "Os juros somam {} do valor financiado; avalie reduzir o prazo ou amortizar antecipadamente.",
            format_percent(share)
        ));
    }
    Ok(result)
}

/// Total, percentage and annualized return of an investment.
pub fn investment_return(
    p: &InvestmentReturnParams,
) -> Result<CalculationResult, CalculationError> {
    let total_return = sub(p.final_value, p.initial_value, "total return")?;
    let return_percentage = mul(
        div(total_return, p.initial_value, "return percentage")?,
        Decimal::ONE_HUNDRED,
        "return percentage",
    )?;

    let ratio = div(p.final_value, p.initial_value, "annualized return")?;
    let exponent = div(Decimal::ONE, p.time, "annualized return")?;
    let annualized = mul(
        sub(
            pow(ratio, exponent, "annualized return")?,
            Decimal::ONE,
            "annualized return",
        )?,
        Decimal::ONE_HUNDRED,
        "annualized return",
    )?;

    let mut result = CalculationResult::new(
        round_money(total_return),
        vec![
            BreakdownItem::new("Valor inicial", round_money(p.initial_value)),
            BreakdownItem::new("Valor final", round_money(p.final_value)),
            BreakdownItem::with_percentage(
                "Retorno total",
                round_money(total_return),
                round_rate(return_percentage),
            ),
            BreakdownItem::with_percentage(
                "Retorno anualizado",
                round_rate(annualized),
                round_rate(annualized),
            ),
        ],
    )
    .with_formula("((Vf / Vi)^(1/t) − 1) × 100");

    if total_return.is_sign_negative() && !total_return.is_zero() {
        result = result.recommend("O investimento apresentou perda no período analisado.");
    } else {
        result = result.recommend(format!(
            "Rentabilidade anualizada de {}; compare com o CDI do mesmo período.",
            format_percent(annualized)
        ));
    }
    Ok(result)
}

fn simple_interest_amount(
    principal: Decimal,
    rate: Decimal,
    time: Decimal,
) -> Result<Decimal, CalculationError> {
    let product = mul(mul(principal, rate, "simple interest")?, time, "simple interest")?;
    div(product, Decimal::ONE_HUNDRED, "simple interest")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_simple_interest_reference_values() {
        let result = simple_interest(&InterestParams {
            principal: dec!(1000),
            rate: dec!(5),
            time: dec!(2),
        })
        .unwrap();

        assert_eq!(result.value_of("Juros"), Some(dec!(100)));
        assert_eq!(result.total, dec!(1100));
        assert_eq!(result.formula.as_deref(), Some("I = P × r × t"));
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn test_compound_interest_single_period() {
        let result = compound_interest(&CompoundInterestParams {
            principal: dec!(1000),
            rate: dec!(10),
            time: dec!(1),
            compound: dec!(1),
        })
        .unwrap();

        assert_eq!(result.total, dec!(1100));
        assert_eq!(result.value_of("Juros"), Some(dec!(100)));
        // Single annual period earns exactly the simple interest.
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_compound_interest_monthly() {
        let result = compound_interest(&CompoundInterestParams {
            principal: dec!(1000),
            rate: dec!(12),
            time: dec!(1),
            compound: dec!(12),
        })
        .unwrap();

        // 1000 × 1.01^12
        assert_eq!(result.total, dec!(1126.83));
        assert_eq!(result.value_of("Juros"), Some(dec!(126.83)));
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn test_compound_zero_periods_is_division_by_zero() {
        let result = compound_interest(&CompoundInterestParams {
            principal: dec!(1000),
            rate: dec!(10),
            time: dec!(1),
            compound: Decimal::ZERO,
        });
        assert!(matches!(
            result,
            Err(CalculationError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_compound_fractional_period_with_negative_base_has_no_real_result() {
        let result = compound_interest(&CompoundInterestParams {
            principal: dec!(1000),
            rate: dec!(-300),
            time: dec!(0.5),
            compound: Decimal::ONE,
        });
        assert!(matches!(result, Err(CalculationError::NonReal { .. })));
    }

    #[test]
    fn test_loan_payment_reference_values() {
        let result = loan_payment(&InterestParams {
            principal: dec!(1000),
            rate: dec!(12),
            time: dec!(1),
        })
        .unwrap();

        assert_eq!(result.total, dec!(88.85));
        assert_eq!(result.value_of("Número de parcelas"), Some(dec!(12)));
        assert_eq!(result.value_of("Total pago"), Some(dec!(1066.19)));
        assert_eq!(result.value_of("Total de juros"), Some(dec!(66.19)));
    }

    #[test]
    fn test_loan_payment_zero_rate_divides_by_zero() {
        let result = loan_payment(&InterestParams {
            principal: dec!(1000),
            rate: Decimal::ZERO,
            time: dec!(1),
        });
        assert_eq!(
            result,
            Err(CalculationError::DivisionByZero {
                context: "loan payment"
            })
        );
    }

    #[test]
    fn test_investment_return_one_year() {
        let result = investment_return(&InvestmentReturnParams {
            initial_value: dec!(1000),
            final_value: dec!(1150),
            time: dec!(1),
        })
        .unwrap();

        assert_eq!(result.total, dec!(150));
        let total_line = &result.breakdown[2];
        assert_eq!(total_line.percentage, Some(dec!(15)));
        assert_eq!(result.value_of("Retorno anualizado"), Some(dec!(15)));
    }

    #[test]
    fn test_investment_return_annualizes_over_two_years() {
        let result = investment_return(&InvestmentReturnParams {
            initial_value: dec!(1000),
            final_value: dec!(1210),
            time: dec!(2),
        })
        .unwrap();

        let annualized = result.value_of("Retorno anualizado").unwrap();
        assert!((annualized - dec!(10)).abs() < dec!(0.001), "got {annualized}");
    }

    #[test]
    fn test_investment_loss_recommendation() {
        let result = investment_return(&InvestmentReturnParams {
            initial_value: dec!(1000),
            final_value: dec!(800),
            time: dec!(1),
        })
        .unwrap();

        assert_eq!(result.total, dec!(-200));
        assert_eq!(
            result.recommendations,
            vec!["O investimento apresentou perda no período analisado.".to_string()]
        );
    }

    #[test]
    fn test_investment_zero_initial_value() {
        let result = investment_return(&InvestmentReturnParams {
            initial_value: Decimal::ZERO,
            final_value: dec!(800),
            time: dec!(1),
        });
        assert!(matches!(
            result,
            Err(CalculationError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_investment_sign_change_has_no_annualized_return() {
        let result = investment_return(&InvestmentReturnParams {
            initial_value: dec!(1000),
            final_value: dec!(-500),
            time: dec!(3),
        });
        assert!(matches!(result, Err(CalculationError::NonReal { .. })));
    }
}

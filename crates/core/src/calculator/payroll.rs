//! Payroll withholding: INSS, IRRF and allowances.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::CalculationError;
use super::math::{add, div, format_brl, mul, round_money, round_rate, sub};
use super::types::{BreakdownItem, CalculationResult, PayrollParams};

/// How the employee INSS contribution is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InssPolicy {
    /// Marginal rates per bracket (7.5%, 9%, 12%, 14%).
    #[default]
    Progressive,
    /// 11% of the full salary, capped at the contribution ceiling.
    FlatCapped,
}

impl fmt::Display for InssPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Progressive => write!(f, "progressive"),
            Self::FlatCapped => write!(f, "flat_capped"),
        }
    }
}

impl FromStr for InssPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "progressive" => Ok(Self::Progressive),
            "flat_capped" | "flat" => Ok(Self::FlatCapped),
            _ => Err(format!("Unknown INSS policy: {s}")),
        }
    }
}

struct InssBracket {
    ceiling: Decimal,
    rate: Decimal,
}

static INSS_BRACKETS: [InssBracket; 3] = [
    InssBracket {
        ceiling: dec!(1320.00),
        rate: dec!(0.075),
    },
    InssBracket {
        ceiling: dec!(2571.29),
        rate: dec!(0.09),
    },
    InssBracket {
        ceiling: dec!(3856.94),
        rate: dec!(0.12),
    },
];
const INSS_TOP_RATE: Decimal = dec!(0.14);

const INSS_FLAT_RATE: Decimal = dec!(0.11);
const INSS_FLAT_CAP: Decimal = dec!(751.99);

/// One row of the IRRF monthly table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrrfBracket {
    /// Inclusive upper bound of the base; `None` for the top row.
    pub upper_bound: Option<Decimal>,
    /// Rate applied to the whole base.
    pub rate: Decimal,
    /// Amount subtracted after applying the rate.
    pub deduction: Decimal,
}

/// IRRF monthly table, lowest row first.
pub static IRRF_TABLE: [IrrfBracket; 5] = [
    IrrfBracket {
        upper_bound: Some(dec!(1903.98)),
        rate: Decimal::ZERO,
        deduction: Decimal::ZERO,
    },
    IrrfBracket {
        upper_bound: Some(dec!(2826.65)),
        rate: dec!(0.075),
        deduction: dec!(142.80),
    },
    IrrfBracket {
        upper_bound: Some(dec!(3751.05)),
        rate: dec!(0.15),
        deduction: dec!(354.80),
    },
    IrrfBracket {
        upper_bound: Some(dec!(4664.68)),
        rate: dec!(0.225),
        deduction: dec!(636.13),
    },
    IrrfBracket {
        upper_bound: None,
        rate: dec!(0.275),
        deduction: dec!(869.36),
    },
];

/// IRRF base reduction per dependent.
pub const DEPENDENT_DEDUCTION: Decimal = dec!(189.59);

/// Employee share of transport allowance, as a fraction of salary.
const VALE_TRANSPORTE_RATE: Decimal = dec!(0.06);

/// Employee INSS contribution for a gross salary.
#[must_use]
pub fn inss(salario: Decimal, policy: InssPolicy) -> Decimal {
    match policy {
        InssPolicy::Progressive => {
            let mut contribution = Decimal::ZERO;
            let mut floor = Decimal::ZERO;
            for bracket in &INSS_BRACKETS {
                if salario <= floor {
                    return contribution;
                }
                contribution += (salario.min(bracket.ceiling) - floor) * bracket.rate;
                floor = bracket.ceiling;
            }
            if salario > floor {
                contribution += (salario - floor) * INSS_TOP_RATE;
            }
            contribution
        }
        InssPolicy::FlatCapped => (salario * INSS_FLAT_RATE)
            .min(INSS_FLAT_CAP)
            .max(Decimal::ZERO),
    }
}

/// Selects the IRRF row for a base. Upper bounds are inclusive.
#[must_use]
pub fn irrf_bracket(base: Decimal) -> &'static IrrfBracket {
    IRRF_TABLE
        .iter()
        .find(|b| b.upper_bound.is_none_or(|upper| base <= upper))
        .unwrap_or(&IRRF_TABLE[IRRF_TABLE.len() - 1])
}

/// IRRF withheld for a base, never negative.
#[must_use]
pub fn irrf(base: Decimal) -> Decimal {
    let bracket = irrf_bracket(base);
    (base * bracket.rate - bracket.deduction).max(Decimal::ZERO)
}

/// Monthly payroll for one employee.
///
/// The total is the net salary: gross minus INSS, IRRF and transport
/// allowance, plus the meal allowance.
pub fn folha_pagamento(
    p: &PayrollParams,
    policy: InssPolicy,
) -> Result<CalculationResult, CalculationError> {
    let inss_amount = round_money(inss(p.salario, policy));
    let dependent_deduction = mul(
        Decimal::from(p.dependentes),
        DEPENDENT_DEDUCTION,
        "dependent deduction",
    )?;
    let irrf_base = sub(
        sub(p.salario, inss_amount, "irrf base")?,
        dependent_deduction,
        "irrf base",
    )?;
    let bracket = irrf_bracket(irrf_base);
    let irrf_amount = round_money(irrf(irrf_base));
    let vale_transporte = if p.vale_transporte {
        round_money(mul(p.salario, VALE_TRANSPORTE_RATE, "vale-transporte")?)
    } else {
        Decimal::ZERO
    };

    let deductions = add(
        add(inss_amount, irrf_amount, "total deductions")?,
        vale_transporte,
        "total deductions",
    )?;
    let net = add(
        sub(p.salario, deductions, "net salary")?,
        p.vale_refeicao,
        "net salary",
    )?;

    let inss_effective = if p.salario > Decimal::ZERO {
        Some(round_rate(mul(
            div(inss_amount, p.salario, "inss effective rate")?,
            Decimal::ONE_HUNDRED,
            "inss effective rate",
        )?))
    } else {
        None
    };

    let mut result = CalculationResult::new(
        round_money(net),
        vec![
            BreakdownItem::new("Salário bruto", round_money(p.salario)),
            BreakdownItem {
                label: "INSS".to_string(),
                value: inss_amount,
                percentage: inss_effective,
            },
            BreakdownItem::new("Base de cálculo IRRF", round_money(irrf_base)),
            BreakdownItem::with_percentage(
                "IRRF",
                irrf_amount,
                mul(bracket.rate, Decimal::ONE_HUNDRED, "irrf rate")?,
            ),
            BreakdownItem::with_percentage(
                "Vale-transporte",
                vale_transporte,
                mul(VALE_TRANSPORTE_RATE, Decimal::ONE_HUNDRED, "vale-transporte")?,
            ),
            BreakdownItem::new("Vale-refeição", round_money(p.vale_refeicao)),
            BreakdownItem::new("Total de descontos", deductions),
            BreakdownItem::new("Salário líquido", round_money(net)),
        ],
    );

    if irrf_amount.is_zero() {
        result = result.recommend("Salário isento de IRRF na faixa atual da tabela progressiva.");
    } else if p.dependentes == 0 {
        result = result.recommend(format!(
            "Cada dependente declarado reduz a base do IRRF em {}.",
            format_brl(DEPENDENT_DEDUCTION)
        ));
    }
    if policy == InssPolicy::FlatCapped {
        result = result.recommend(format!(
            "INSS estimado pela alíquota única de 11% limitada a {}.",
            format_brl(INSS_FLAT_CAP)
        ));
    }
    if p.vale_transporte {
        result = result.recommend(
            "O desconto de vale-transporte é limitado a 6% do salário; o excedente é custeado pelo empregador.",
        );
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(dec!(1000), dec!(75))]
    #[case(dec!(1320), dec!(99))]
    #[case(dec!(2000), dec!(160.2))]
    #[case(dec!(3000), dec!(263.0613))]
    #[case(dec!(5000), dec!(525.9225))]
    #[case(Decimal::ZERO, Decimal::ZERO)]
    fn test_inss_progressive(#[case] salario: Decimal, #[case] expected: Decimal) {
        assert_eq!(inss(salario, InssPolicy::Progressive), expected);
    }

    #[test]
    fn test_inss_progressive_is_continuous_at_bracket_edges() {
        for bracket in &INSS_BRACKETS {
            let below = inss(bracket.ceiling, InssPolicy::Progressive);
            let above = inss(bracket.ceiling + dec!(0.01), InssPolicy::Progressive);
            assert!(above > below);
            assert!(above - below <= dec!(0.0014));
        }
    }

    #[rstest]
    #[case(dec!(3000), dec!(330))]
    #[case(dec!(6836.27), dec!(751.9897))]
    #[case(dec!(10000), dec!(751.99))]
    fn test_inss_flat_capped(#[case] salario: Decimal, #[case] expected: Decimal) {
        assert_eq!(inss(salario, InssPolicy::FlatCapped), expected);
    }

    #[rstest]
    #[case(dec!(1903.98), Decimal::ZERO)]
    #[case(dec!(1903.99), dec!(0.075))]
    #[case(dec!(2826.65), dec!(0.075))]
    #[case(dec!(2826.66), dec!(0.15))]
    #[case(dec!(3751.05), dec!(0.15))]
    #[case(dec!(3751.06), dec!(0.225))]
    #[case(dec!(4664.68), dec!(0.225))]
    #[case(dec!(4664.69), dec!(0.275))]
    fn test_irrf_bracket_boundaries_are_inclusive(
        #[case] base: Decimal,
        #[case] expected_rate: Decimal,
    ) {
        assert_eq!(irrf_bracket(base).rate, expected_rate);
    }

    #[rstest]
    #[case(dec!(-500), Decimal::ZERO)]
    #[case(dec!(1903.98), Decimal::ZERO)]
    #[case(dec!(1903.99), Decimal::ZERO)]
    #[case(dec!(2826.65), dec!(69.19875))]
    #[case(dec!(2826.66), dec!(69.199))]
    #[case(dec!(3751.05), dec!(207.8575))]
    #[case(dec!(3751.06), dec!(207.8585))]
    #[case(dec!(4664.68), dec!(413.423))]
    #[case(dec!(4664.69), dec!(413.42975))]
    fn test_irrf_amounts(#[case] base: Decimal, #[case] expected: Decimal) {
        assert_eq!(irrf(base), expected);
    }

    #[test]
    fn test_folha_basic() {
        let result = folha_pagamento(
            &PayrollParams {
                salario: dec!(3000),
                dependentes: 0,
                vale_transporte: false,
                vale_refeicao: Decimal::ZERO,
            },
            InssPolicy::Progressive,
        )
        .unwrap();

        assert_eq!(result.value_of("INSS"), Some(dec!(263.06)));
        assert_eq!(result.value_of("Base de cálculo IRRF"), Some(dec!(2736.94)));
        assert_eq!(result.value_of("IRRF"), Some(dec!(62.47)));
        assert_eq!(result.value_of("Total de descontos"), Some(dec!(325.53)));
        assert_eq!(result.total, dec!(2674.47));
        assert_eq!(result.value_of("Salário líquido"), Some(result.total));
    }

    #[test]
    fn test_folha_with_dependents_and_allowances() {
        let result = folha_pagamento(
            &PayrollParams {
                salario: dec!(5000),
                dependentes: 2,
                vale_transporte: true,
                vale_refeicao: dec!(600),
            },
            InssPolicy::Progressive,
        )
        .unwrap();

        assert_eq!(result.value_of("INSS"), Some(dec!(525.92)));
        assert_eq!(result.value_of("Base de cálculo IRRF"), Some(dec!(4094.90)));
        assert_eq!(result.value_of("IRRF"), Some(dec!(285.22)));
        assert_eq!(result.value_of("Vale-transporte"), Some(dec!(300)));
        assert_eq!(result.value_of("Total de descontos"), Some(dec!(1111.14)));
        assert_eq!(result.total, dec!(4488.86));
    }

    #[test]
    fn test_folha_flat_policy() {
        let result = folha_pagamento(
            &PayrollParams {
                salario: dec!(3000),
                dependentes: 0,
                vale_transporte: false,
                vale_refeicao: Decimal::ZERO,
            },
            InssPolicy::FlatCapped,
        )
        .unwrap();

        assert_eq!(result.value_of("INSS"), Some(dec!(330)));
        assert_eq!(result.value_of("IRRF"), Some(dec!(57.45)));
        assert_eq!(result.total, dec!(2612.55));
        assert!(result.recommendations.iter().any(|r| r.contains("11%")));
    }

    #[test]
    fn test_folha_exempt_salary() {
        let result = folha_pagamento(
            &PayrollParams {
                salario: dec!(1500),
                dependentes: 0,
                vale_transporte: false,
                vale_refeicao: Decimal::ZERO,
            },
            InssPolicy::Progressive,
        )
        .unwrap();

        assert_eq!(result.value_of("INSS"), Some(dec!(115.2)));
        assert_eq!(result.value_of("IRRF"), Some(Decimal::ZERO));
        assert_eq!(
            result.recommendations,
            vec!["Salário isento de IRRF na faixa atual da tabela progressiva.".to_string()]
        );
    }

    #[test]
    fn test_inss_policy_parsing() {
        assert_eq!(
            "progressive".parse::<InssPolicy>(),
            Ok(InssPolicy::Progressive)
        );
        assert_eq!(
            "FLAT_CAPPED".parse::<InssPolicy>(),
            Ok(InssPolicy::FlatCapped)
        );
        assert!("marginal".parse::<InssPolicy>().is_err());
        assert_eq!(InssPolicy::FlatCapped.to_string(), "flat_capped");
    }

    #[test]
    fn test_folha_net_overflow_is_an_error() {
        let result = folha_pagamento(
            &PayrollParams {
                salario: Decimal::MAX,
                dependentes: 0,
                vale_transporte: true,
                vale_refeicao: Decimal::MAX,
            },
            InssPolicy::Progressive,
        );
        assert_eq!(
            result,
            Err(CalculationError::Overflow {
                context: "net salary"
            })
        );
    }
}

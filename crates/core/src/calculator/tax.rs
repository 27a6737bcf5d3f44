//! Income tax, Simples Nacional and Lucro Presumido.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::CalculationError;
use super::math::{
    MONEY_DP, add, allocate_by_percentages, div, format_brl, format_percent, mul, round_money,
    round_rate, sub,
};
use super::types::{
    Atividade, BreakdownItem, CalculationResult, LucroPresumidoParams, SimplesAnexo,
    SimplesNacionalParams, TaxParams,
};

/// Shares of the DAS total attributed to each component, in percent.
///
/// These are fixed illustrative splits, not the official partition tables.
const SIMPLES_SPLIT: [Decimal; 5] = [dec!(25), dec!(15), dec!(10), dec!(30), dec!(20)];

const IRPJ_RATE: Decimal = dec!(0.15);
const CSLL_RATE: Decimal = dec!(0.09);
const PIS_RATE: Decimal = dec!(0.0065);
const COFINS_RATE: Decimal = dec!(0.03);

/// Monthly presumed profit above which the 10% IRPJ surcharge applies.
const IRPJ_SURCHARGE_THRESHOLD: Decimal = dec!(20000);

impl SimplesAnexo {
    /// Nominal DAS rate for the table, in percent.
    #[must_use]
    pub const fn nominal_rate(self) -> Decimal {
        match self {
            Self::Anexo1 => dec!(4.0),
            Self::Anexo2 | Self::Anexo4 => dec!(4.5),
            Self::Anexo3 => dec!(6.0),
            Self::Anexo5 => dec!(15.5),
        }
    }

    const fn last_component_label(self) -> &'static str {
        match self {
            Self::Anexo4 => "INSS/CPP",
            _ => "ICMS/ISS",
        }
    }
}

impl Atividade {
    /// Presumption rate applied to revenue to obtain taxable profit.
    #[must_use]
    pub const fn presumption_rate(self) -> Decimal {
        match self {
            Self::Comercio | Self::Industria | Self::Transporte => dec!(0.08),
            Self::Servicos | Self::Construcao => dec!(0.32),
        }
    }
}

/// Generic flat income tax after deductions.
pub fn income_tax(p: &TaxParams) -> Result<CalculationResult, CalculationError> {
    let taxable = sub(p.income, p.deductions, "taxable income")?.max(Decimal::ZERO);
    let tax = div(
        mul(taxable, p.tax_rate, "income tax")?,
        Decimal::ONE_HUNDRED,
        "income tax",
    )?;
    let net = sub(p.income, tax, "net income")?;

    let mut result = CalculationResult::new(
        round_money(tax),
        vec![
            BreakdownItem::new("Renda bruta", round_money(p.income)),
            BreakdownItem::new("Deduções", round_money(p.deductions)),
            BreakdownItem::new("Base tributável", round_money(taxable)),
            BreakdownItem::with_percentage("Imposto", round_money(tax), round_rate(p.tax_rate)),
            BreakdownItem::new("Renda líquida", round_money(net)),
        ],
    );

    if p.income > Decimal::ZERO {
        let effective = mul(
            div(tax, p.income, "effective tax rate")?,
            Decimal::ONE_HUNDRED,
            "effective tax rate",
        )?;
        result = result.recommend(format!(
            "Alíquota efetiva de {} sobre a renda bruta.",
            format_percent(effective)
        ));
    }
    if p.deductions.is_zero() {
        result = result.recommend(
            "Informe despesas dedutíveis (dependentes, previdência, saúde) para reduzir a base tributável.",
        );
    }
    Ok(result)
}

/// Simples Nacional DAS on monthly revenue, split into its components.
///
/// The component shares always add up to the total.
pub fn simples_nacional(p: &SimplesNacionalParams) -> Result<CalculationResult, CalculationError> {
    let rate = p.anexo.nominal_rate();
    let total = round_money(div(
        mul(p.revenue, rate, "simples nacional")?,
        Decimal::ONE_HUNDRED,
        "simples nacional",
    )?);

    let shares = allocate_by_percentages(total, &SIMPLES_SPLIT, MONEY_DP);
    let labels = [
        "IRPJ",
        "CSLL",
        "PIS",
        "COFINS",
        p.anexo.last_component_label(),
    ];
    let breakdown = labels
        .into_iter()
        .zip(shares)
        .zip(SIMPLES_SPLIT)
        .map(|((label, value), share)| BreakdownItem::with_percentage(label, value, share))
        .collect();

    let mut result = CalculationResult::new(total, breakdown)
        .with_formula("DAS = Receita × Alíquota")
        .recommend(format!(
            "Alíquota de {} aplicada sobre o faturamento de {}.",
            format_percent(rate),
            format_brl(p.revenue)
        ));

    if p.anexo == SimplesAnexo::Anexo5 {
        result = result.recommend(
            "No Anexo V, verifique o Fator R: folha de pagamento igual ou superior a 28% da receita permite tributação pelo Anexo III.",
        );
    }
    Ok(result)
}

/// Lucro Presumido federal taxes.
///
/// The total is the combined tax (IRPJ + CSLL + PIS + COFINS); expenses
/// only feed the estimated net profit line.
pub fn lucro_presumido(p: &LucroPresumidoParams) -> Result<CalculationResult, CalculationError> {
    let presumption = p.atividade.presumption_rate();
    let presumed_profit = mul(p.revenue, presumption, "presumed profit")?;

    let irpj = round_money(mul(presumed_profit, IRPJ_RATE, "irpj")?);
    let csll = round_money(mul(presumed_profit, CSLL_RATE, "csll")?);
    let pis = round_money(mul(p.revenue, PIS_RATE, "pis")?);
    let cofins = round_money(mul(p.revenue, COFINS_RATE, "cofins")?);
    let total = [csll, pis, cofins]
        .into_iter()
        .try_fold(irpj, |acc, tax| add(acc, tax, "total taxes"))?;
    let net_profit = sub(
        sub(p.revenue, p.despesas, "net profit")?,
        total,
        "net profit",
    )?;

    let burden = if p.revenue.is_zero() {
        None
    } else {
        Some(round_rate(mul(
            div(total, p.revenue, "tax burden")?,
            Decimal::ONE_HUNDRED,
            "tax burden",
        )?))
    };

    let percent = |rate: Decimal| mul(rate, Decimal::ONE_HUNDRED, "rate percentage");
    let mut result = CalculationResult::new(
        total,
        vec![
            BreakdownItem::new("Receita bruta", round_money(p.revenue)),
            BreakdownItem::with_percentage(
                "Lucro presumido",
                round_money(presumed_profit),
                percent(presumption)?,
            ),
            BreakdownItem::with_percentage("IRPJ", irpj, percent(IRPJ_RATE)?),
            BreakdownItem::with_percentage("CSLL", csll, percent(CSLL_RATE)?),
            BreakdownItem::with_percentage("PIS", pis, percent(PIS_RATE)?),
            BreakdownItem::with_percentage("COFINS", cofins, percent(COFINS_RATE)?),
            BreakdownItem {
                label: "Total de impostos".to_string(),
                value: total,
                percentage: burden,
            },
            BreakdownItem::new("Lucro líquido estimado", round_money(net_profit)),
        ],
    );

    if let Some(burden) = burden {
        result = result.recommend(format!(
            "Carga tributária federal efetiva de {} sobre a receita.",
            format_percent(burden)
        ));
    }
    if presumed_profit > IRPJ_SURCHARGE_THRESHOLD {
        result = result.recommend(
            "Lucro presumido acima de R$ 20.000,00 por mês está sujeito ao adicional de 10% de IRPJ, não incluído nesta estimativa.",
        );
    }
    Ok(result)
}

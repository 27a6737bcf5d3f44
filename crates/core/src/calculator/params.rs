//! Resolution of loosely typed parameter bags into [`CalculationInput`].
//!
//! Browsers and form posts send numbers either as JSON numbers or as
//! strings, so both are accepted. `null` and empty strings count as absent.
//! All missing required fields are collected and reported together.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::error::CalculationError;
use super::types::{
    Atividade, CalculationInput, CalculationType, CompoundInterestParams, DepreciationMethod,
    DepreciationParams, InterestParams, InvestmentReturnParams, LucroPresumidoParams,
    PayrollParams, SimplesAnexo, SimplesNacionalParams, TaxParams,
};

/// A JSON object of parameter name to value.
pub type ParameterBag = Map<String, Value>;

/// Parses a calculation type name and its parameter bag.
pub fn parse_input(
    calculation_type: &str,
    parameters: &ParameterBag,
) -> Result<CalculationInput, CalculationError> {
    let calculation_type: CalculationType = calculation_type.parse()?;
    CalculationInput::from_parameters(calculation_type, parameters)
}

impl CalculationInput {
    /// Builds a typed input for `calculation_type` from a parameter bag.
    pub fn from_parameters(
        calculation_type: CalculationType,
        parameters: &ParameterBag,
    ) -> Result<Self, CalculationError> {
        let mut r = ParameterReader::new(parameters);

        match calculation_type {
            CalculationType::SimpleInterest => {
                let p = interest_params(&mut r);
                r.finish(Self::SimpleInterest(p))
            }
            CalculationType::LoanPayment => {
                let p = interest_params(&mut r);
                r.finish(Self::LoanPayment(p))
            }
            CalculationType::CompoundInterest => {
                let p = CompoundInterestParams {
                    principal: r.required_decimal("principal"),
                    rate: r.required_decimal("rate"),
                    time: r.required_decimal("time"),
                    compound: r.optional_decimal("compound", Decimal::ONE),
                };
                r.finish(Self::CompoundInterest(p))
            }
            CalculationType::InvestmentReturn => {
                let p = InvestmentReturnParams {
                    initial_value: r.required_decimal("initialValue"),
                    final_value: r.required_decimal("finalValue"),
                    time: r.required_decimal("time"),
                };
                r.finish(Self::InvestmentReturn(p))
            }
            CalculationType::TaxCalculation => {
                let p = TaxParams {
                    income: r.required_decimal("income"),
                    tax_rate: r.required_decimal("taxRate"),
                    deductions: r.optional_decimal("deductions", Decimal::ZERO),
                };
                r.finish(Self::TaxCalculation(p))
            }
            CalculationType::Depreciation => {
                let p = DepreciationParams {
                    cost: r.required_decimal("cost"),
                    salvage_value: r.optional_decimal("salvageValue", Decimal::ZERO),
                    useful_life: r.required_decimal("usefulLife"),
                    method: r
                        .optional_string("method")
                        .map_or(DepreciationMethod::StraightLine, |m| parse_method(&m)),
                };
                r.finish(Self::Depreciation(p))
            }
            CalculationType::SimplesNacional => {
                let revenue = r.required_decimal("revenue");
                let anexo = r.required_anexo("anexo");
                match anexo {
                    Some(anexo) => r.finish(Self::SimplesNacional(SimplesNacionalParams {
                        revenue,
                        anexo,
                    })),
                    None => r.finish_failed(),
                }
            }
            CalculationType::FolhaPagamento => {
                let p = PayrollParams {
                    salario: r.required_decimal("salario"),
                    dependentes: r.optional_count("dependentes"),
                    vale_transporte: r.optional_bool("valeTransporte"),
                    vale_refeicao: r.optional_decimal("valeRefeicao", Decimal::ZERO),
                };
                r.finish(Self::FolhaPagamento(p))
            }
            CalculationType::LucroPresumido => {
                let p = LucroPresumidoParams {
                    revenue: r.required_decimal("revenue"),
                    atividade: r.optional_atividade("atividade"),
                    despesas: r.optional_decimal("despesas", Decimal::ZERO),
                };
                r.finish(Self::LucroPresumido(p))
            }
        }
    }
}

fn interest_params(r: &mut ParameterReader<'_>) -> InterestParams {
    InterestParams {
        principal: r.required_decimal("principal"),
        rate: r.required_decimal("rate"),
        time: r.required_decimal("time"),
    }
}

/// Anything other than straight line selects the accelerated method.
fn parse_method(method: &str) -> DepreciationMethod {
    if method.trim().eq_ignore_ascii_case("STRAIGHT_LINE") {
        DepreciationMethod::StraightLine
    } else {
        DepreciationMethod::DoubleDeclining
    }
}

fn parse_anexo(raw: &str) -> Option<SimplesAnexo> {
    let normalized: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    let code = normalized.strip_prefix("anexo").unwrap_or(&normalized);

    match code {
        "1" | "i" => Some(SimplesAnexo::Anexo1),
        "2" | "ii" => Some(SimplesAnexo::Anexo2),
        "3" | "iii" => Some(SimplesAnexo::Anexo3),
        "4" | "iv" => Some(SimplesAnexo::Anexo4),
        "5" | "v" => Some(SimplesAnexo::Anexo5),
        _ => None,
    }
}

fn parse_atividade(raw: &str) -> Option<Atividade> {
    match raw.trim().to_lowercase().as_str() {
        "comercio" | "comércio" => Some(Atividade::Comercio),
        "industria" | "indústria" => Some(Atividade::Industria),
        "servicos" | "serviços" => Some(Atividade::Servicos),
        "transporte" => Some(Atividade::Transporte),
        "construcao" | "construção" => Some(Atividade::Construcao),
        _ => None,
    }
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        _ => None,
    }
}

/// Reads typed values out of a parameter bag, recording problems as it goes.
///
/// Accessors always return a value so a single pass can collect every
/// missing field; [`ParameterReader::finish`] then decides the outcome.
struct ParameterReader<'a> {
    params: &'a ParameterBag,
    missing: Vec<String>,
    invalid: Option<CalculationError>,
}

impl<'a> ParameterReader<'a> {
    const fn new(params: &'a ParameterBag) -> Self {
        Self {
            params,
            missing: Vec::new(),
            invalid: None,
        }
    }

    fn present(&self, name: &str) -> Option<&'a Value> {
        match self.params.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        }
    }

    fn reject(&mut self, name: &str, reason: &str) {
        if self.invalid.is_none() {
            self.invalid = Some(CalculationError::invalid(name, reason));
        }
    }

    fn decimal(&mut self, name: &str, value: &Value) -> Decimal {
        parse_decimal(value).unwrap_or_else(|| {
            self.reject(name, "expected a number");
            Decimal::ZERO
        })
    }

    fn required_decimal(&mut self, name: &str) -> Decimal {
        match self.present(name) {
            Some(v) => self.decimal(name, v),
            None => {
                self.missing.push(name.to_string());
                Decimal::ZERO
            }
        }
    }

    fn optional_decimal(&mut self, name: &str, default: Decimal) -> Decimal {
        match self.present(name) {
            Some(v) => self.decimal(name, v),
            None => default,
        }
    }

    fn optional_count(&mut self, name: &str) -> u32 {
        let Some(v) = self.present(name) else {
            return 0;
        };
        let value = self.decimal(name, v);
        if !value.fract().is_zero() || value.is_sign_negative() {
            self.reject(name, "expected a non-negative whole number");
            return 0;
        }
        value.to_u32().unwrap_or_else(|| {
            self.reject(name, "value is too large");
            0
        })
    }

    fn optional_bool(&mut self, name: &str) -> bool {
        match self.present(name) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "sim" => true,
                "false" | "0" | "nao" | "não" => false,
                _ => {
                    self.reject(name, "expected true or false");
                    false
                }
            },
            Some(Value::Number(n)) => n.as_u64() == Some(1),
            Some(_) => {
                self.reject(name, "expected true or false");
                false
            }
        }
    }

    fn optional_string(&mut self, name: &str) -> Option<String> {
        match self.present(name)? {
            Value::String(s) => Some(s.trim().to_string()),
            _ => {
                self.reject(name, "expected a string");
                None
            }
        }
    }

    fn required_anexo(&mut self, name: &str) -> Option<SimplesAnexo> {
        let Some(value) = self.present(name) else {
            self.missing.push(name.to_string());
            return None;
        };
        let raw = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        let anexo = parse_anexo(&raw);
        if anexo.is_none() {
            self.reject(name, "expected one of anexo1, anexo2, anexo3, anexo4, anexo5");
        }
        anexo
    }

    fn optional_atividade(&mut self, name: &str) -> Atividade {
        let Some(raw) = self.optional_string(name) else {
            return Atividade::Servicos;
        };
        parse_atividade(&raw).unwrap_or_else(|| {
            self.reject(
                name,
                "expected one of comercio, industria, servicos, transporte, construcao",
            );
            Atividade::Servicos
        })
    }

    fn finish<T>(self, value: T) -> Result<T, CalculationError> {
        if !self.missing.is_empty() {
            return Err(CalculationError::MissingParameters(self.missing));
        }
        match self.invalid {
            Some(err) => Err(err),
            None => Ok(value),
        }
    }

    /// Finishes a read whose value could not be assembled; an error was
    /// necessarily recorded.
    fn finish_failed<T>(self) -> Result<T, CalculationError> {
        if !self.missing.is_empty() {
            return Err(CalculationError::MissingParameters(self.missing));
        }
        Err(self
            .invalid
            .unwrap_or_else(|| CalculationError::invalid("parameters", "incomplete input")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn bag(value: Value) -> ParameterBag {
        match value {
            Value::Object(map) => map,
            _ => panic!("test parameters must be an object"),
        }
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let result = parse_input("NOT_A_TYPE", &bag(json!({"principal": 1})));
        assert_eq!(
            result,
            Err(CalculationError::UnsupportedType("NOT_A_TYPE".into()))
        );
    }

    #[test]
    fn test_loan_without_principal_is_missing_parameter() {
        let result = parse_input("LOAN_PAYMENT", &bag(json!({"rate": 12, "time": 1})));
        assert_eq!(
            result,
            Err(CalculationError::MissingParameters(vec!["principal".into()]))
        );
    }

    #[test]
    fn test_all_missing_fields_reported_together() {
        let result = parse_input("INVESTMENT_RETURN", &bag(json!({})));
        assert_eq!(
            result,
            Err(CalculationError::MissingParameters(vec![
                "initialValue".into(),
                "finalValue".into(),
                "time".into(),
            ]))
        );
    }

    #[test]
    fn test_null_and_blank_count_as_missing() {
        let result = parse_input(
            "SIMPLE_INTEREST",
            &bag(json!({"principal": null, "rate": "  ", "time": 2})),
        );
        assert_eq!(
            result,
            Err(CalculationError::MissingParameters(vec![
                "principal".into(),
                "rate".into()
            ]))
        );
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let input = parse_input(
            "SIMPLE_INTEREST",
            &bag(json!({"principal": "1000.50", "rate": 5, "time": "2"})),
        )
        .unwrap();
        assert_eq!(
            input,
            CalculationInput::SimpleInterest(InterestParams {
                principal: dec!(1000.50),
                rate: dec!(5),
                time: dec!(2),
            })
        );
    }

    #[test]
    fn test_float_numbers_parse_exactly() {
        let input = parse_input(
            "TAX_CALCULATION",
            &bag(json!({"income": 0.1, "taxRate": 27.5})),
        )
        .unwrap();
        let CalculationInput::TaxCalculation(p) = input else {
            panic!("wrong variant");
        };
        assert_eq!(p.income, dec!(0.1));
        assert_eq!(p.tax_rate, dec!(27.5));
        assert_eq!(p.deductions, Decimal::ZERO);
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let result = parse_input(
            "SIMPLE_INTEREST",
            &bag(json!({"principal": "mil", "rate": 5, "time": 2})),
        );
        assert!(matches!(
            result,
            Err(CalculationError::InvalidParameter { ref name, .. }) if name == "principal"
        ));
    }

    #[test]
    fn test_missing_takes_precedence_over_invalid() {
        let result = parse_input("SIMPLE_INTEREST", &bag(json!({"principal": "abc"})));
        assert_eq!(
            result,
            Err(CalculationError::MissingParameters(vec![
                "rate".into(),
                "time".into()
            ]))
        );
    }

    #[test]
    fn test_compound_defaults_to_annual() {
        let input = parse_input(
            "COMPOUND_INTEREST",
            &bag(json!({"principal": 1000, "rate": 10, "time": 1})),
        )
        .unwrap();
        let CalculationInput::CompoundInterest(p) = input else {
            panic!("wrong variant");
        };
        assert_eq!(p.compound, Decimal::ONE);
    }

    #[rstest]
    #[case(json!("STRAIGHT_LINE"), DepreciationMethod::StraightLine)]
    #[case(json!("straight_line"), DepreciationMethod::StraightLine)]
    #[case(json!("DECLINING_BALANCE"), DepreciationMethod::DoubleDeclining)]
    #[case(json!("SUM_OF_YEARS"), DepreciationMethod::DoubleDeclining)]
    #[case(Value::Null, DepreciationMethod::StraightLine)]
    fn test_depreciation_method(#[case] method: Value, #[case] expected: DepreciationMethod) {
        let input = parse_input(
            "DEPRECIATION",
            &bag(json!({"cost": 10000, "usefulLife": 5, "method": method})),
        )
        .unwrap();
        let CalculationInput::Depreciation(p) = input else {
            panic!("wrong variant");
        };
        assert_eq!(p.method, expected);
        assert_eq!(p.salvage_value, Decimal::ZERO);
    }

    #[rstest]
    #[case(json!("anexo1"), SimplesAnexo::Anexo1)]
    #[case(json!("ANEXO_2"), SimplesAnexo::Anexo2)]
    #[case(json!("Anexo III"), SimplesAnexo::Anexo3)]
    #[case(json!(4), SimplesAnexo::Anexo4)]
    #[case(json!("5"), SimplesAnexo::Anexo5)]
    fn test_anexo_spellings(#[case] anexo: Value, #[case] expected: SimplesAnexo) {
        let input = parse_input(
            "SIMPLES_NACIONAL",
            &bag(json!({"revenue": 10000, "anexo": anexo})),
        )
        .unwrap();
        let CalculationInput::SimplesNacional(p) = input else {
            panic!("wrong variant");
        };
        assert_eq!(p.anexo, expected);
    }

    #[test]
    fn test_unknown_anexo_rejected() {
        let result = parse_input(
            "SIMPLES_NACIONAL",
            &bag(json!({"revenue": 10000, "anexo": "anexo6"})),
        );
        assert!(matches!(
            result,
            Err(CalculationError::InvalidParameter { ref name, .. }) if name == "anexo"
        ));
    }

    #[test]
    fn test_simples_missing_both_fields() {
        let result = parse_input("SIMPLES_NACIONAL", &bag(json!({})));
        assert_eq!(
            result,
            Err(CalculationError::MissingParameters(vec![
                "revenue".into(),
                "anexo".into()
            ]))
        );
    }

    #[test]
    fn test_payroll_defaults() {
        let input = parse_input("FOLHA_PAGAMENTO", &bag(json!({"salario": 3000}))).unwrap();
        assert_eq!(
            input,
            CalculationInput::FolhaPagamento(PayrollParams {
                salario: dec!(3000),
                dependentes: 0,
                vale_transporte: false,
                vale_refeicao: Decimal::ZERO,
            })
        );
    }

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!("true"), true)]
    #[case(json!("false"), false)]
    #[case(json!(1), true)]
    #[case(json!(0), false)]
    fn test_vale_transporte_flag(#[case] flag: Value, #[case] expected: bool) {
        let input = parse_input(
            "FOLHA_PAGAMENTO",
            &bag(json!({"salario": 3000, "valeTransporte": flag})),
        )
        .unwrap();
        let CalculationInput::FolhaPagamento(p) = input else {
            panic!("wrong variant");
        };
        assert_eq!(p.vale_transporte, expected);
    }

    #[rstest]
    #[case(json!(-1))]
    #[case(json!(1.5))]
    fn test_dependentes_must_be_whole(#[case] dependentes: Value) {
        let result = parse_input(
            "FOLHA_PAGAMENTO",
            &bag(json!({"salario": 3000, "dependentes": dependentes})),
        );
        assert!(matches!(
            result,
            Err(CalculationError::InvalidParameter { ref name, .. }) if name == "dependentes"
        ));
    }

    #[rstest]
    #[case(None, Atividade::Servicos)]
    #[case(Some("comercio"), Atividade::Comercio)]
    #[case(Some("Indústria"), Atividade::Industria)]
    #[case(Some("transporte"), Atividade::Transporte)]
    #[case(Some("construção"), Atividade::Construcao)]
    fn test_atividade(#[case] atividade: Option<&str>, #[case] expected: Atividade) {
        let mut params = bag(json!({"revenue": 100000}));
        if let Some(a) = atividade {
            params.insert("atividade".into(), json!(a));
        }
        let input = parse_input("LUCRO_PRESUMIDO", &params).unwrap();
        let CalculationInput::LucroPresumido(p) = input else {
            panic!("wrong variant");
        };
        assert_eq!(p.atividade, expected);
    }

    #[test]
    fn test_unknown_atividade_rejected() {
        let result = parse_input(
            "LUCRO_PRESUMIDO",
            &bag(json!({"revenue": 100000, "atividade": "agricultura"})),
        );
        assert!(matches!(
            result,
            Err(CalculationError::InvalidParameter { ref name, .. }) if name == "atividade"
        ));
    }
}

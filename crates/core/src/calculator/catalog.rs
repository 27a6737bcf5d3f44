//! Descriptors of the supported calculation types.

use serde::Serialize;

use super::types::CalculationType;

/// Wire type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Decimal number, sent as a JSON number or numeric string.
    Number,
    /// Free text or enumerated value.
    String,
    /// Flag.
    Boolean,
}

/// One accepted parameter of a calculation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    /// Parameter name as sent by the caller.
    pub name: &'static str,
    /// Wire type.
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    /// Whether the parameter has no default.
    pub required: bool,
    /// What the parameter means.
    pub description: &'static str,
}

/// Catalog entry for a calculation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    /// The calculation type.
    #[serde(rename = "type")]
    pub calculation_type: CalculationType,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Accepted parameters, required ones first.
    pub parameters: &'static [ParameterDescriptor],
}

const fn number(
    name: &'static str,
    required: bool,
    description: &'static str,
) -> ParameterDescriptor {
    ParameterDescriptor {
        name,
        kind: ParameterKind::Number,
        required,
        description,
    }
}

const PRINCIPAL: ParameterDescriptor = number("principal", true, "Valor principal");
const ANNUAL_RATE: ParameterDescriptor = number("rate", true, "Taxa de juros anual (%)");
const YEARS: ParameterDescriptor = number("time", true, "Prazo em anos");

static CATALOG: [TypeDescriptor; 9] = [
    TypeDescriptor {
        calculation_type: CalculationType::SimpleInterest,
        name: "Juros Simples",
        description: "Juros calculados apenas sobre o capital inicial",
        parameters: &[PRINCIPAL, ANNUAL_RATE, YEARS],
    },
    TypeDescriptor {
        calculation_type: CalculationType::CompoundInterest,
        name: "Juros Compostos",
        description: "Juros sobre juros com frequência de capitalização",
        parameters: &[
            PRINCIPAL,
            ANNUAL_RATE,
            YEARS,
            number("compound", false, "Capitalizações por ano (padrão 1)"),
        ],
    },
    TypeDescriptor {
        calculation_type: CalculationType::LoanPayment,
        name: "Parcela de Empréstimo",
        description: "Parcela mensal fixa pela Tabela Price",
        parameters: &[
            number("principal", true, "Valor financiado"),
            ANNUAL_RATE,
            YEARS,
        ],
    },
    TypeDescriptor {
        calculation_type: CalculationType::InvestmentReturn,
        name: "Retorno de Investimento",
        description: "Retorno total e anualizado de um investimento",
        parameters: &[
            number("initialValue", true, "Valor investido"),
            number("finalValue", true, "Valor de resgate"),
            YEARS,
        ],
    },
    TypeDescriptor {
        calculation_type: CalculationType::TaxCalculation,
        name: "Imposto de Renda",
        description: "Imposto com alíquota única sobre a renda após deduções",
        parameters: &[
            number("income", true, "Renda bruta"),
            number("taxRate", true, "Alíquota (%)"),
            number("deductions", false, "Deduções (padrão 0)"),
        ],
    },
    TypeDescriptor {
        calculation_type: CalculationType::Depreciation,
        name: "Depreciação",
        description: "Depreciação anual de um ativo",
        parameters: &[
            number("cost", true, "Custo de aquisição"),
            number("usefulLife", true, "Vida útil em anos"),
            number("salvageValue", false, "Valor residual (padrão 0)"),
            ParameterDescriptor {
                name: "method",
                kind: ParameterKind::String,
                required: false,
                description: "STRAIGHT_LINE (padrão) ou DOUBLE_DECLINING",
            },
        ],
    },
    TypeDescriptor {
        calculation_type: CalculationType::SimplesNacional,
        name: "Simples Nacional",
        description: "DAS mensal pela alíquota nominal do anexo",
        parameters: &[
            number("revenue", true, "Receita bruta mensal"),
            ParameterDescriptor {
                name: "anexo",
                kind: ParameterKind::String,
                required: true,
                description: "Anexo da atividade (anexo1 a anexo5)",
            },
        ],
    },
    TypeDescriptor {
        calculation_type: CalculationType::FolhaPagamento,
        name: "Folha de Pagamento",
        description: "Descontos de INSS, IRRF e benefícios de um empregado",
        parameters: &[
            number("salario", true, "Salário bruto mensal"),
            number("dependentes", false, "Número de dependentes (padrão 0)"),
            ParameterDescriptor {
                name: "valeTransporte",
                kind: ParameterKind::Boolean,
                required: false,
                description: "Desconta 6% de vale-transporte (padrão false)",
            },
            number("valeRefeicao", false, "Vale-refeição pago (padrão 0)"),
        ],
    },
    TypeDescriptor {
        calculation_type: CalculationType::LucroPresumido,
        name: "Lucro Presumido",
        description: "IRPJ, CSLL, PIS e COFINS pelo lucro presumido",
        parameters: &[
            number("revenue", true, "Receita bruta do período"),
            ParameterDescriptor {
                name: "atividade",
                kind: ParameterKind::String,
                required: false,
                description: "comercio, industria, servicos (padrão), transporte ou construcao",
            },
            number("despesas", false, "Despesas operacionais (padrão 0)"),
        ],
    },
];

/// Returns the descriptors of every supported type, in catalog order.
#[must_use]
pub fn supported_types() -> &'static [TypeDescriptor] {
    &CATALOG
}

/// Returns the descriptor of one type.
#[must_use]
pub fn describe(calculation_type: CalculationType) -> Option<&'static TypeDescriptor> {
    CATALOG
        .iter()
        .find(|d| d.calculation_type == calculation_type)
}

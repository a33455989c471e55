use crate::error::{FinanceAdvisorError, Result};
use crate::schema::{MonthlyExpense, MonthlyInvestment, BALANCE_TOTAL, INVESTMENT};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ADVICE_SYSTEM_PROMPT: &str = "Você é um especialista em finanças pessoais.";

const ADVICE_INSTRUCTIONS: &str = r#"
Você é um assistente financeiro pessoal. Com base nos dados do último mês abaixo,
dê conselhos diretos e personalizados.

## GASTOS DO ÚLTIMO MÊS (por categoria)
{expenses}

## INVESTIMENTOS DO ÚLTIMO MÊS
{investment}

Aponte onde a pessoa pode economizar e como pode reforçar os investimentos.
Seja específico e use os valores informados.
"#;

/// Last-month figures handed to the external advice generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AdviceSummary {
    #[schemars(description = "Month label of the most recent expense record")]
    pub expense_month: String,

    #[schemars(description = "Amount spent per category in the most recent month")]
    pub last_month_expenses: BTreeMap<String, f64>,

    #[schemars(description = "Month label of the most recent investment record")]
    pub investment_month: String,

    #[schemars(
        description = "Most recent investment figures keyed by column: 'Investimento' (amount invested) and 'Saldo Total' (reported balance)"
    )]
    pub last_month_investment: BTreeMap<String, f64>,
}

impl AdviceSummary {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AdviceSummary)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }

    pub fn to_prompt(&self) -> Result<String> {
        let expenses = serde_json::to_string_pretty(&self.last_month_expenses)?;
        let investment = serde_json::to_string_pretty(&self.last_month_investment)?;

        Ok(ADVICE_INSTRUCTIONS
            .replace("{expenses}", &expenses)
            .replace("{investment}", &investment)
            .trim()
            .to_string())
    }
}

/// Selects the latest expense breakdown and investment figures.
pub fn build_summary(
    expenses: &[MonthlyExpense],
    investments: &[MonthlyInvestment],
) -> Result<AdviceSummary> {
    let (expense, investment) = match (expenses.last(), investments.last()) {
        (Some(e), Some(i)) => (e, i),
        _ => {
            return Err(FinanceAdvisorError::InsufficientData {
                required: 1,
                available: 0,
            })
        }
    };

    let mut last_month_investment = BTreeMap::new();
    last_month_investment.insert(INVESTMENT.to_string(), investment.investment_amount);
    last_month_investment.insert(BALANCE_TOTAL.to_string(), investment.balance_total);

    Ok(AdviceSummary {
        expense_month: expense.month.clone(),
        last_month_expenses: expense.categories.clone(),
        investment_month: investment.month.clone(),
        last_month_investment,
    })
}

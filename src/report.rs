use crate::advice::{build_summary, AdviceSummary};
use crate::error::Result;
use crate::metrics::{
    category_share, column_series, comparison_table, expense_categories, expense_totals,
    income_totals, proportions, ComparisonRow, MonthlyValues,
};
use crate::projection::{project_from_series, DEFAULT_PROJECTION_HORIZON};
use crate::recommendation::evaluate_feedback;
use crate::schema::{
    FeedbackItem, FinancialTables, ProjectionPoint, BALANCE_TOTAL, OTHER_INCOME, SALARY,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How much of the history the report looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryView {
    #[default]
    FullHistory,
    /// Only the latest month of every table.
    CurrentMonth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub view: HistoryView,
}

/// Everything a dashboard needs for one owner, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub view: HistoryView,
    pub income_totals: MonthlyValues,
    /// Salário and Outras Entradas side by side, month by month.
    pub income_breakdown: BTreeMap<String, MonthlyValues>,
    pub income_proportions: BTreeMap<String, f64>,
    pub expense_totals: MonthlyValues,
    pub category_series: BTreeMap<String, MonthlyValues>,
    pub expense_proportions: BTreeMap<String, f64>,
    pub comparison: Vec<ComparisonRow>,
    pub balance_totals: MonthlyValues,
    pub projection: Vec<ProjectionPoint>,
    pub feedback: Vec<FeedbackItem>,
    pub advice_summary: AdviceSummary,
}

impl FinancialReport {
    pub fn build(tables: &FinancialTables, options: &ReportOptions) -> Result<Self> {
        let trimmed;
        let tables = match options.view {
            HistoryView::FullHistory => tables,
            HistoryView::CurrentMonth => {
                trimmed = tables.current_month_view();
                &trimmed
            }
        };

        info!(
            "Building {:?} report: {} income, {} expense, {} investment month(s)",
            options.view,
            tables.income.len(),
            tables.expenses.len(),
            tables.investments.len()
        );

        let categories = expense_categories(&tables.expenses);
        debug!("Expense categories: {:?}", categories);

        let category_series = categories
            .iter()
            .map(|c| (c.clone(), category_share(&tables.expenses, c)))
            .collect();

        let income_breakdown = [SALARY, OTHER_INCOME]
            .iter()
            .map(|c| (c.to_string(), column_series(&tables.income, c)))
            .collect();

        let report = Self {
            view: options.view,
            income_totals: income_totals(&tables.income),
            income_breakdown,
            income_proportions: proportions(&tables.income, &[SALARY, OTHER_INCOME])?,
            expense_totals: expense_totals(&tables.expenses),
            category_series,
            expense_proportions: proportions(&tables.expenses, &categories)?,
            comparison: comparison_table(&tables.expenses, &tables.investments)?,
            balance_totals: column_series(&tables.investments, BALANCE_TOTAL),
            projection: project_from_series(&tables.investments, DEFAULT_PROJECTION_HORIZON)?,
            feedback: evaluate_feedback(&tables.expenses, &tables.investments),
            advice_summary: build_summary(&tables.expenses, &tables.investments)?,
        };

        debug!("Report produced {} feedback item(s)", report.feedback.len());
        Ok(report)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinanceAdvisorError;
    use crate::schema::{MessageKind, MonthlyExpense, MonthlyIncome, MonthlyInvestment, Series};

    fn tables() -> FinancialTables {
        FinancialTables {
            income: Series::new(vec![
                MonthlyIncome::new("2024-01", 5000.0, 0.0),
                MonthlyIncome::new("2024-02", 5000.0, 500.0),
                MonthlyIncome::new("2024-03", 5000.0, 0.0),
                MonthlyIncome::new("2024-04", 5000.0, 1000.0),
            ]),
            expenses: Series::new(vec![
                MonthlyExpense::from_pairs("2024-01", [("Mercado", 800.0), ("Aluguel", 1500.0)]),
                MonthlyExpense::from_pairs("2024-02", [("Mercado", 800.0), ("Aluguel", 1500.0)]),
                MonthlyExpense::from_pairs("2024-03", [("Mercado", 800.0), ("Aluguel", 1500.0)]),
                MonthlyExpense::from_pairs("2024-04", [("Mercado", 1200.0), ("Aluguel", 1500.0)]),
            ]),
            investments: Series::new(vec![
                MonthlyInvestment::new("2024-01", 500.0, 10_000.0),
                MonthlyInvestment::new("2024-02", 500.0, 10_500.0),
                MonthlyInvestment::new("2024-03", 500.0, 11_000.0),
                MonthlyInvestment::new("2024-04", 300.0, 11_300.0),
            ]),
        }
    }

    #[test]
    fn test_full_history_report() {
        let report = FinancialReport::build(&tables(), &ReportOptions::default()).unwrap();

        assert_eq!(report.income_totals.len(), 4);
        assert_eq!(report.income_totals[3].value, 6000.0);
        assert_eq!(report.expense_totals[3].value, 2700.0);
        assert_eq!(report.category_series["Mercado"][3].value, 1200.0);
        assert_eq!(report.comparison.len(), 4);

        let other: Vec<f64> = report.income_breakdown[OTHER_INCOME]
            .iter()
            .map(|p| p.value)
            .collect();
        assert_eq!(other, vec![0.0, 500.0, 0.0, 1000.0]);
        assert_eq!(report.income_breakdown[SALARY][2].value, 5000.0);

        let balances: Vec<f64> = report.balance_totals.iter().map(|p| p.value).collect();
        assert_eq!(balances, vec![10_000.0, 10_500.0, 11_000.0, 11_300.0]);
        assert_eq!(report.balance_totals[3].month, "2024-04");

        let share_sum: f64 = report.expense_proportions.values().sum();
        assert!((share_sum - 1.0).abs() < 1e-9);

        // average investment 450 over the whole series
        assert_eq!(report.projection.len(), 6);
        assert!((report.projection[0].projected_balance - 11_750.0).abs() < 1e-9);

        let kinds: Vec<MessageKind> = report.feedback.iter().map(|f| f.message_kind).collect();
        assert_eq!(
            kinds,
            vec![
                MessageKind::CategoryOverspend,
                MessageKind::SavingsGoal,
                MessageKind::InvestmentShortfall,
            ]
        );
        assert_eq!(report.advice_summary.expense_month, "2024-04");
    }

    #[test]
    fn test_current_month_view() {
        let options = ReportOptions {
            view: HistoryView::CurrentMonth,
        };
        let report = FinancialReport::build(&tables(), &options).unwrap();

        assert_eq!(report.income_totals.len(), 1);
        assert_eq!(report.balance_totals.len(), 1);
        assert_eq!(report.income_breakdown[SALARY].len(), 1);
        assert_eq!(report.feedback.len(), 1);
        assert_eq!(
            report.feedback[0].message_kind,
            MessageKind::InsufficientHistory
        );
        assert!((report.projection[0].projected_balance - 11_600.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_tables_surface_insufficient_data() {
        let result = FinancialReport::build(&FinancialTables::default(), &ReportOptions::default());
        assert!(matches!(
            result,
            Err(FinanceAdvisorError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_report_serializes() {
        let report = FinancialReport::build(&tables(), &ReportOptions::default()).unwrap();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"view\": \"full_history\""));
        assert!(json.contains("\"Gastos\""));
    }
}

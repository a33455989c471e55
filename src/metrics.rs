use crate::error::{FinanceAdvisorError, Result};
use crate::schema::{MonthlyExpense, MonthlyIncome, MonthlyInvestment, MonthlyRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One point of a month-indexed series, kept in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthValue {
    pub month: String,
    pub value: f64,
}

pub type MonthlyValues = Vec<MonthValue>;

/// Spending against investment for one month, as shown side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    #[serde(rename = "Mês")]
    pub month: String,
    #[serde(rename = "Gastos")]
    pub expenses: f64,
    #[serde(rename = "Investimentos")]
    pub investments: f64,
}

pub fn total_income(record: &MonthlyIncome) -> f64 {
    record.total_income()
}

pub fn total_expense(record: &MonthlyExpense) -> f64 {
    record.total_expense()
}

pub fn income_totals(series: &[MonthlyIncome]) -> MonthlyValues {
    series
        .iter()
        .map(|r| MonthValue {
            month: r.month.clone(),
            value: total_income(r),
        })
        .collect()
}

pub fn expense_totals(series: &[MonthlyExpense]) -> MonthlyValues {
    series
        .iter()
        .map(|r| MonthValue {
            month: r.month.clone(),
            value: total_expense(r),
        })
        .collect()
}

/// Per-month amount for one category; months without it count as zero.
pub fn category_share(series: &[MonthlyExpense], category: &str) -> MonthlyValues {
    series
        .iter()
        .map(|r| MonthValue {
            month: r.month.clone(),
            value: r.amount(category),
        })
        .collect()
}

/// Per-month values of any named column; months without it count as zero.
pub fn column_series<R: MonthlyRecord>(records: &[R], column: &str) -> MonthlyValues {
    records
        .iter()
        .map(|r| MonthValue {
            month: r.month().to_string(),
            value: r.column(column).unwrap_or(0.0),
        })
        .collect()
}

/// Every category name seen anywhere in the series, sorted.
pub fn expense_categories(series: &[MonthlyExpense]) -> Vec<String> {
    series
        .iter()
        .flat_map(|r| r.categories.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(FinanceAdvisorError::InsufficientData {
            required: 1,
            available: 0,
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Values of `column` for every record, in order.
///
/// A record lacking the column contributes zero, but at least one record must
/// know the column.
pub fn column_values<R: MonthlyRecord>(records: &[R], column: &str) -> Result<Vec<f64>> {
    if records.is_empty() {
        return Err(FinanceAdvisorError::InsufficientData {
            required: 1,
            available: 0,
        });
    }

    let values: Vec<Option<f64>> = records.iter().map(|r| r.column(column)).collect();
    if values.iter().all(Option::is_none) {
        return Err(FinanceAdvisorError::UnknownColumn(column.to_string()));
    }

    Ok(values.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

pub fn mean_by_column<R: MonthlyRecord, S: AsRef<str>>(
    records: &[R],
    columns: &[S],
) -> Result<BTreeMap<String, f64>> {
    let mut means = BTreeMap::new();
    for column in columns {
        let column = column.as_ref();
        let values = column_values(records, column)?;
        means.insert(column.to_string(), mean(&values)?);
    }
    Ok(means)
}

/// Share of each column's mean in the sum of all the means.
///
/// When the means add up to zero every share is zero.
pub fn proportions<R: MonthlyRecord, S: AsRef<str>>(
    records: &[R],
    columns: &[S],
) -> Result<BTreeMap<String, f64>> {
    let means = mean_by_column(records, columns)?;
    let sum: f64 = means.values().sum();

    Ok(means
        .into_iter()
        .map(|(column, value)| {
            let share = if sum == 0.0 { 0.0 } else { value / sum };
            (column, share)
        })
        .collect())
}

/// Pairs each month's total spending with that month's investment, by position.
pub fn comparison_table(
    expenses: &[MonthlyExpense],
    investments: &[MonthlyInvestment],
) -> Result<Vec<ComparisonRow>> {
    if expenses.len() != investments.len() {
        return Err(FinanceAdvisorError::SeriesLengthMismatch {
            left: expenses.len(),
            right: investments.len(),
        });
    }

    Ok(expenses
        .iter()
        .zip(investments)
        .map(|(expense, investment)| ComparisonRow {
            month: expense.month.clone(),
            expenses: total_expense(expense),
            investments: investment.investment_amount,
        })
        .collect())
}

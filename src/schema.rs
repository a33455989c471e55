use crate::error::{FinanceAdvisorError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Deref;

pub const MONTH: &str = "Mês";
pub const SALARY: &str = "Salário";
pub const OTHER_INCOME: &str = "Outras Entradas";
pub const TOTAL_INCOME: &str = "Total Entradas";
pub const TOTAL_EXPENSES: &str = "Total Gastos";
pub const INVESTMENT: &str = "Investimento";
pub const BALANCE_TOTAL: &str = "Saldo Total";

/// A monthly row that exposes its numeric values by column name.
pub trait MonthlyRecord {
    fn month(&self) -> &str;

    /// `None` when this record has no such column.
    fn column(&self, name: &str) -> Option<f64>;

    fn column_names(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyIncome {
    pub month: String,
    pub salary: f64,
    pub other_income: f64,
}

impl MonthlyIncome {
    pub fn new(month: impl Into<String>, salary: f64, other_income: f64) -> Self {
        Self {
            month: month.into(),
            salary,
            other_income,
        }
    }

    pub fn total_income(&self) -> f64 {
        self.salary + self.other_income
    }
}

impl MonthlyRecord for MonthlyIncome {
    fn month(&self) -> &str {
        &self.month
    }

    fn column(&self, name: &str) -> Option<f64> {
        match name {
            SALARY => Some(self.salary),
            OTHER_INCOME => Some(self.other_income),
            TOTAL_INCOME => Some(self.total_income()),
            _ => None,
        }
    }

    fn column_names(&self) -> Vec<String> {
        vec![SALARY.to_string(), OTHER_INCOME.to_string()]
    }
}

/// One month of spending, broken down by category.
///
/// Category names never include the month label; ingestion strips it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyExpense {
    pub month: String,
    pub categories: BTreeMap<String, f64>,
}

impl MonthlyExpense {
    pub fn new(month: impl Into<String>, categories: BTreeMap<String, f64>) -> Self {
        Self {
            month: month.into(),
            categories,
        }
    }

    pub fn from_pairs<K: Into<String>>(
        month: impl Into<String>,
        pairs: impl IntoIterator<Item = (K, f64)>,
    ) -> Self {
        Self::new(
            month,
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )
    }

    pub fn total_expense(&self) -> f64 {
        self.categories.values().sum()
    }

    /// Amount spent on `category`, zero when the category is absent this month.
    pub fn amount(&self, category: &str) -> f64 {
        self.categories.get(category).copied().unwrap_or(0.0)
    }
}

impl MonthlyRecord for MonthlyExpense {
    fn month(&self) -> &str {
        &self.month
    }

    fn column(&self, name: &str) -> Option<f64> {
        if name == TOTAL_EXPENSES {
            return Some(self.total_expense());
        }
        self.categories.get(name).copied()
    }

    fn column_names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyInvestment {
    pub month: String,
    pub investment_amount: f64,
    /// Reported balance; not derived from previous months.
    pub balance_total: f64,
}

impl MonthlyInvestment {
    pub fn new(month: impl Into<String>, investment_amount: f64, balance_total: f64) -> Self {
        Self {
            month: month.into(),
            investment_amount,
            balance_total,
        }
    }
}

impl MonthlyRecord for MonthlyInvestment {
    fn month(&self) -> &str {
        &self.month
    }

    fn column(&self, name: &str) -> Option<f64> {
        match name {
            INVESTMENT => Some(self.investment_amount),
            BALANCE_TOTAL => Some(self.balance_total),
            _ => None,
        }
    }

    fn column_names(&self) -> Vec<String> {
        vec![INVESTMENT.to_string(), BALANCE_TOTAL.to_string()]
    }
}

/// Chronologically ordered records, most recent last.
///
/// A series is read-only once built; analysis borrows it as a slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series<T> {
    records: Vec<T>,
}

impl<T> Series<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// The current month view: the last record.
    pub fn current(&self) -> Result<&T> {
        self.records
            .last()
            .ok_or(FinanceAdvisorError::InsufficientData {
                required: 1,
                available: 0,
            })
    }

    /// The last `window` records.
    pub fn trailing(&self, window: usize) -> Result<&[T]> {
        if window > self.records.len() {
            return Err(FinanceAdvisorError::InsufficientData {
                required: window,
                available: self.records.len(),
            });
        }
        Ok(&self.records[self.records.len() - window..])
    }

    /// Every record except the current one.
    pub fn history_before_current(&self) -> &[T] {
        match self.records.len() {
            0 => &[],
            n => &self.records[..n - 1],
        }
    }
}

impl<T: Clone> Series<T> {
    /// A series holding only the most recent month; empty stays empty.
    pub fn current_month_view(&self) -> Series<T> {
        Series::new(self.records.last().cloned().into_iter().collect())
    }
}

impl<T> Default for Series<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T> Deref for Series<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.records
    }
}

impl<T> From<Vec<T>> for Series<T> {
    fn from(records: Vec<T>) -> Self {
        Self::new(records)
    }
}

impl<T> FromIterator<T> for Series<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The three monthly tables belonging to one owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialTables {
    pub income: Series<MonthlyIncome>,
    pub expenses: Series<MonthlyExpense>,
    pub investments: Series<MonthlyInvestment>,
}

impl FinancialTables {
    pub fn current_month_view(&self) -> Self {
        Self {
            income: self.income.current_month_view(),
            expenses: self.expenses.current_month_view(),
            investments: self.investments.current_month_view(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    CategoryOverspend,
    SavingsGoal,
    InvestmentShortfall,
    InsufficientHistory,
    AllClear,
}

/// Which check produced a feedback item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackScope {
    Spending,
    Savings,
    Investment,
    History,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackItem {
    pub severity: Severity,
    pub scope: FeedbackScope,
    pub category: Option<String>,
    pub message_kind: MessageKind,
    #[schemars(
        description = "Named figures supporting the message, e.g. excess, suggested_reduction, percent_over. A figure that is undefined is omitted."
    )]
    pub metrics: BTreeMap<String, f64>,
}

impl FeedbackItem {
    pub fn new(severity: Severity, scope: FeedbackScope, message_kind: MessageKind) -> Self {
        Self {
            severity,
            scope,
            category: None,
            message_kind,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectionPoint {
    pub offset_months: u32,
    pub projected_balance: f64,
}

impl ProjectionPoint {
    pub fn label(&self) -> String {
        format!("+{}m", self.offset_months)
    }
}

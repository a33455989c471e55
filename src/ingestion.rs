use crate::error::{FinanceAdvisorError, Result};
use crate::schema::{
    FinancialTables, MonthlyExpense, MonthlyIncome, MonthlyInvestment, Series, BALANCE_TOTAL,
    INVESTMENT, MONTH, OTHER_INCOME, SALARY, TOTAL_EXPENSES,
};
use crate::utils::ensure_chronological;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

/// One spreadsheet row keyed by column header.
pub type RawRow = BTreeMap<String, String>;

/// Identity whose uploaded tables are requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Anything that can hand over the three tables of one owner: a spreadsheet
/// upload, a database, an API.
pub trait RecordSource {
    fn fetch(&self, owner: &OwnerId) -> Result<FinancialTables>;
}

/// Tables held in memory, keyed by owner.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tables: HashMap<OwnerId, FinancialTables>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, owner: OwnerId, tables: FinancialTables) {
        self.tables.insert(owner, tables);
    }
}

impl RecordSource for InMemorySource {
    /// An owner with nothing stored gets empty tables.
    fn fetch(&self, owner: &OwnerId) -> Result<FinancialTables> {
        match self.tables.get(owner) {
            Some(tables) => Ok(tables.clone()),
            None => {
                debug!("No stored tables for owner {}", owner.0);
                Ok(FinancialTables::default())
            }
        }
    }
}

/// Reads header-keyed rows from CSV. Headers and cells are trimmed.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let row: RawRow = record?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn read_income_csv<R: Read>(reader: R) -> Result<Series<MonthlyIncome>> {
    income_from_rows(&read_rows(reader)?)
}

pub fn read_expense_csv<R: Read>(reader: R) -> Result<Series<MonthlyExpense>> {
    expenses_from_rows(&read_rows(reader)?)
}

pub fn read_investment_csv<R: Read>(reader: R) -> Result<Series<MonthlyInvestment>> {
    investments_from_rows(&read_rows(reader)?)
}

pub fn income_from_rows(rows: &[RawRow]) -> Result<Series<MonthlyIncome>> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| -> Result<MonthlyIncome> {
            Ok(MonthlyIncome {
                month: month_cell(row, "income")?,
                salary: numeric_cell(row, idx, "income", SALARY)?,
                other_income: numeric_cell(row, idx, "income", OTHER_INCOME)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ensure_chronological(records.iter().map(|r| r.month.as_str()))?;
    debug!("Ingested {} income month(s)", records.len());
    Ok(Series::new(records))
}

/// Every column other than the month label (and a previously derived total)
/// is a spending category. Blank cells leave the category out for that month.
pub fn expenses_from_rows(rows: &[RawRow]) -> Result<Series<MonthlyExpense>> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| -> Result<MonthlyExpense> {
            let month = month_cell(row, "expense")?;
            let mut categories = BTreeMap::new();

            for (column, raw) in row {
                if column == MONTH || column == TOTAL_EXPENSES || raw.trim().is_empty() {
                    continue;
                }
                let value = parse_amount(raw).ok_or_else(|| FinanceAdvisorError::InvalidCell {
                    row: idx + 1,
                    column: column.clone(),
                    value: raw.clone(),
                })?;
                categories.insert(column.clone(), value);
            }

            Ok(MonthlyExpense { month, categories })
        })
        .collect::<Result<Vec<_>>>()?;

    ensure_chronological(records.iter().map(|r| r.month.as_str()))?;
    debug!("Ingested {} expense month(s)", records.len());
    Ok(Series::new(records))
}

pub fn investments_from_rows(rows: &[RawRow]) -> Result<Series<MonthlyInvestment>> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| -> Result<MonthlyInvestment> {
            Ok(MonthlyInvestment {
                month: month_cell(row, "investment")?,
                investment_amount: numeric_cell(row, idx, "investment", INVESTMENT)?,
                balance_total: numeric_cell(row, idx, "investment", BALANCE_TOTAL)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ensure_chronological(records.iter().map(|r| r.month.as_str()))?;
    debug!("Ingested {} investment month(s)", records.len());
    Ok(Series::new(records))
}

/// Parses "1234.5", "1.234,50", "1,234.50" or "R$ 99,90". Blank is zero.
///
/// A lone dot followed by exactly three digits ("1.234") reads as a
/// thousands separator, as in Brazilian spreadsheets.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Some(0.0);
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        (None, Some(_)) if is_dot_grouped(&cleaned) => cleaned.replace('.', ""),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True for "1.234" or "12.345.678": every group after the leading one is
/// exactly three digits, so the dots are thousands separators. "0.500" and
/// "1.5" stay decimals.
fn is_dot_grouped(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut groups = digits.split('.');
    let all_digits = |g: &str| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit());

    let head = groups.next().unwrap_or_default();
    if !all_digits(head) || head.len() > 3 || head.starts_with('0') {
        return false;
    }

    let mut tail = groups.peekable();
    tail.peek().is_some() && tail.all(|g| g.len() == 3 && all_digits(g))
}

fn month_cell(row: &RawRow, table: &str) -> Result<String> {
    row.get(MONTH)
        .map(|m| m.trim().to_string())
        .ok_or_else(|| FinanceAdvisorError::MissingColumn {
            table: table.to_string(),
            column: MONTH.to_string(),
        })
}

fn numeric_cell(row: &RawRow, idx: usize, table: &str, column: &str) -> Result<f64> {
    let raw = row
        .get(column)
        .ok_or_else(|| FinanceAdvisorError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })?;

    parse_amount(raw).ok_or_else(|| FinanceAdvisorError::InvalidCell {
        row: idx + 1,
        column: column.to_string(),
        value: raw.clone(),
    })
}

//! # Monthly Finance Advisor
//!
//! A library that turns three monthly tables (income, expenses, investments)
//! into dashboard metrics, a six-month balance projection, and rule-based
//! budget feedback.
//!
//! ## Core Concepts
//!
//! - **Series**: Chronologically ordered monthly records, most recent last
//! - **Trailing Window**: The last few months, used as a baseline
//! - **Feedback**: Structured findings (overspend, savings goal, investment shortfall)
//! - **Projection**: A flat, non-compounding extrapolation of the balance
//! - **Advice Summary**: Last-month figures handed to an external text generator
//!
//! All analysis is pure and synchronous. Reading files and calling language
//! models happen before or after it, never inside.
//!
//! ## Example
//!
//! ```rust
//! use monthly_finance_advisor::*;
//!
//! let tables = FinancialTables {
//!     income: Series::new(vec![
//!         MonthlyIncome::new("2024-01", 5000.0, 0.0),
//!         MonthlyIncome::new("2024-02", 5000.0, 200.0),
//!         MonthlyIncome::new("2024-03", 5000.0, 0.0),
//!         MonthlyIncome::new("2024-04", 5000.0, 0.0),
//!     ]),
//!     expenses: Series::new(vec![
//!         MonthlyExpense::from_pairs("2024-01", [("Mercado", 800.0)]),
//!         MonthlyExpense::from_pairs("2024-02", [("Mercado", 800.0)]),
//!         MonthlyExpense::from_pairs("2024-03", [("Mercado", 800.0)]),
//!         MonthlyExpense::from_pairs("2024-04", [("Mercado", 1000.0)]),
//!     ]),
//!     investments: Series::new(vec![
//!         MonthlyInvestment::new("2024-01", 500.0, 10_000.0),
//!         MonthlyInvestment::new("2024-02", 500.0, 10_500.0),
//!         MonthlyInvestment::new("2024-03", 500.0, 11_000.0),
//!         MonthlyInvestment::new("2024-04", 500.0, 11_500.0),
//!     ]),
//! };
//!
//! let report = analyze(&tables).unwrap();
//! assert_eq!(report.projection.len(), 6);
//! assert_eq!(report.feedback[0].message_kind, MessageKind::CategoryOverspend);
//! ```

pub mod advice;
pub mod error;
pub mod formatting;
pub mod ingestion;
pub mod metrics;
pub mod projection;
pub mod recommendation;
pub mod report;
pub mod schema;
pub mod utils;

#[cfg(feature = "llm")]
pub mod llm;

pub use advice::{build_summary, AdviceSummary};
pub use error::{FinanceAdvisorError, Result};
pub use formatting::{format_brl, prettify_advice, projection_rows, round_cents, ProjectionRow};
pub use ingestion::{InMemorySource, OwnerId, RawRow, RecordSource};
pub use metrics::*;
pub use projection::*;
pub use recommendation::{evaluate_feedback, RecommendationEngine};
pub use report::{FinancialReport, HistoryView, ReportOptions};
pub use schema::*;
pub use utils::*;

/// Full-history report for one set of tables.
pub fn analyze(tables: &FinancialTables) -> Result<FinancialReport> {
    FinancialReport::build(tables, &ReportOptions::default())
}

/// Fetches an owner's tables from `source` and builds the report.
pub fn analyze_owner<S: RecordSource + ?Sized>(
    source: &S,
    owner: &OwnerId,
    options: &ReportOptions,
) -> Result<FinancialReport> {
    let tables = source.fetch(owner)?;
    FinancialReport::build(&tables, options)
}

use crate::error::{FinanceAdvisorError, Result};
use crate::metrics::{column_values, mean};
use crate::schema::{MonthlyInvestment, MonthlyRecord, ProjectionPoint, INVESTMENT};
use log::debug;

pub const DEFAULT_TRAILING_WINDOW: usize = 3;
pub const DEFAULT_PROJECTION_HORIZON: u32 = 6;

/// Mean of the last `window` values of `column`.
pub fn trailing_average<R: MonthlyRecord>(
    records: &[R],
    window: usize,
    column: &str,
) -> Result<f64> {
    if window == 0 {
        return Err(FinanceAdvisorError::InvalidWindow(window));
    }
    if records.len() < window {
        return Err(FinanceAdvisorError::InsufficientData {
            required: window,
            available: records.len(),
        });
    }

    let values = column_values(&records[records.len() - window..], column)?;
    mean(&values)
}

/// Linear, non-compounding balance extrapolation for offsets `1..=horizon`.
///
/// Values are left unrounded; a negative average produces a declining line.
pub fn project_balance(
    current_balance: f64,
    average_monthly_investment: f64,
    horizon: u32,
) -> Vec<ProjectionPoint> {
    (1..=horizon)
        .map(|offset| ProjectionPoint {
            offset_months: offset,
            projected_balance: current_balance + average_monthly_investment * offset as f64,
        })
        .collect()
}

/// Projection from the latest reported balance and the average investment
/// over the whole series.
pub fn project_from_series(
    investments: &[MonthlyInvestment],
    horizon: u32,
) -> Result<Vec<ProjectionPoint>> {
    let current = investments
        .last()
        .ok_or(FinanceAdvisorError::InsufficientData {
            required: 1,
            available: 0,
        })?;
    let average = mean(&column_values(investments, INVESTMENT)?)?;
    debug!(
        "Projecting {} month(s) from balance {:.2} at {:.2} per month",
        horizon, current.balance_total, average
    );

    Ok(project_balance(current.balance_total, average, horizon))
}

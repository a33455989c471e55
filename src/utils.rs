use crate::error::{FinanceAdvisorError, Result};
use chrono::{Datelike, NaiveDate};

/// Parses a month label in one of the layouts spreadsheets usually produce:
/// "YYYY-MM", "YYYY-MM-DD", "MM/YYYY" or "DD/MM/YYYY".
///
/// Returns the first day of that month, or `None` for free-form labels such
/// as "Janeiro".
pub fn parse_month_label(label: &str) -> Option<NaiveDate> {
    let label = label.trim();

    if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
        return first_of_month(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", label), "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(label, "%d/%m/%Y") {
        return first_of_month(date);
    }
    NaiveDate::parse_from_str(&format!("01/{}", label), "%d/%m/%Y").ok()
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

/// Checks that month labels never go backwards.
///
/// Only enforced when every label parses as a date; otherwise the given
/// order is trusted. Repeated months are allowed.
pub fn ensure_chronological<'a>(labels: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let labels: Vec<&str> = labels.into_iter().collect();
    let parsed: Option<Vec<NaiveDate>> = labels.iter().map(|l| parse_month_label(l)).collect();

    let Some(dates) = parsed else {
        return Ok(());
    };

    for (i, pair) in dates.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(FinanceAdvisorError::OutOfOrder {
                previous: labels[i].to_string(),
                next: labels[i + 1].to_string(),
            });
        }
    }

    Ok(())
}

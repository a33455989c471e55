//! Rule-based budget feedback.
//!
//! Three independent checks compare the current month against the average of
//! the months just before it:
//!
//! - **Category overspend**: a category above 115% of its baseline.
//! - **Savings goal**: total spending above 110% of its baseline.
//! - **Investment shortfall**: investment below 90% of its baseline.
//!
//! The checks only run once both the expense and investment series hold at
//! least [`MIN_HISTORY_MONTHS`] months, and a baseline needs [`BASELINE_WINDOW`]
//! full months before the current one; otherwise a single
//! `insufficient_history` item is returned.
//!
//! Thresholds are percentages of the baseline. Both sides of a comparison are
//! scaled to whole percent so that a value sitting exactly on a threshold
//! (115 against 100) is not pushed over it by binary rounding.

use crate::error::{FinanceAdvisorError, Result};
use crate::metrics::expense_categories;
use crate::projection::trailing_average;
use crate::schema::{
    FeedbackItem, FeedbackScope, MessageKind, MonthlyExpense, MonthlyInvestment, MonthlyRecord,
    Severity, INVESTMENT, TOTAL_EXPENSES,
};
use log::{debug, warn};

pub const MIN_HISTORY_MONTHS: usize = 3;
pub const BASELINE_WINDOW: usize = 3;

pub const OVERSPEND_THRESHOLD_PCT: f64 = 115.0;
pub const OVERSPEND_REDUCTION_RATE: f64 = 0.25;
pub const SAVINGS_THRESHOLD_PCT: f64 = 110.0;
pub const SAVINGS_GOAL_RATE: f64 = 0.10;
pub const INVESTMENT_SHORTFALL_THRESHOLD_PCT: f64 = 90.0;
pub const INVESTMENT_REINFORCEMENT_RATE: f64 = 0.20;

pub const METRIC_EXCESS: &str = "excess";
pub const METRIC_SUGGESTED_REDUCTION: &str = "suggested_reduction";
pub const METRIC_PERCENT_OVER: &str = "percent_over";
pub const METRIC_BASELINE: &str = "baseline";
pub const METRIC_GOAL_AMOUNT: &str = "goal_amount";
pub const METRIC_CURRENT: &str = "current";
pub const METRIC_REINFORCEMENT: &str = "reinforcement";

pub struct RecommendationEngine<'a> {
    expenses: &'a [MonthlyExpense],
    investments: &'a [MonthlyInvestment],
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(expenses: &'a [MonthlyExpense], investments: &'a [MonthlyInvestment]) -> Self {
        Self {
            expenses,
            investments,
        }
    }

    pub fn has_enough_history(&self) -> bool {
        self.expenses.len() >= MIN_HISTORY_MONTHS && self.investments.len() >= MIN_HISTORY_MONTHS
    }

    /// Runs every check and returns the items in rule order: overspend items,
    /// then savings, then investment.
    pub fn evaluate(&self) -> Vec<FeedbackItem> {
        if !self.has_enough_history() {
            debug!(
                "Skipping feedback checks: {} expense month(s), {} investment month(s)",
                self.expenses.len(),
                self.investments.len()
            );
            return vec![insufficient_history()];
        }

        match self.run_checks() {
            Ok(items) => items,
            Err(e) => {
                warn!("Feedback checks could not complete: {}", e);
                vec![insufficient_history()]
            }
        }
    }

    fn run_checks(&self) -> Result<Vec<FeedbackItem>> {
        let mut items = self.check_category_overspend()?;
        items.push(self.check_savings_goal()?);
        items.push(self.check_investment_shortfall()?);
        Ok(items)
    }

    fn check_category_overspend(&self) -> Result<Vec<FeedbackItem>> {
        let current = latest(self.expenses)?;
        let mut items = Vec::new();

        for category in expense_categories(self.expenses) {
            let baseline = match baseline_for(self.expenses, &category) {
                // First seen this month.
                Err(FinanceAdvisorError::UnknownColumn(_)) => 0.0,
                other => other?,
            };
            let spent = current.amount(&category);

            if !exceeds_pct(spent, baseline, OVERSPEND_THRESHOLD_PCT) {
                continue;
            }

            let excess = spent - baseline;
            debug!(
                "Category '{}' over baseline: {:.2} vs {:.2}",
                category, spent, baseline
            );

            let mut item = FeedbackItem::new(
                Severity::Alert,
                FeedbackScope::Spending,
                MessageKind::CategoryOverspend,
            )
            .with_category(category.as_str())
            .with_metric(METRIC_EXCESS, excess)
            .with_metric(
                METRIC_SUGGESTED_REDUCTION,
                excess * OVERSPEND_REDUCTION_RATE,
            );

            // No percentage against a zero baseline.
            if baseline != 0.0 {
                item = item.with_metric(METRIC_PERCENT_OVER, excess / baseline);
            }

            items.push(item);
        }

        if items.is_empty() {
            items.push(all_clear(FeedbackScope::Spending));
        }

        Ok(items)
    }

    fn check_savings_goal(&self) -> Result<FeedbackItem> {
        let baseline = baseline_for(self.expenses, TOTAL_EXPENSES)?;
        let current = latest(self.expenses)?.total_expense();

        if exceeds_pct(current, baseline, SAVINGS_THRESHOLD_PCT) {
            return Ok(FeedbackItem::new(
                Severity::Warning,
                FeedbackScope::Savings,
                MessageKind::SavingsGoal,
            )
            .with_metric(METRIC_BASELINE, baseline)
            .with_metric(METRIC_GOAL_AMOUNT, baseline * SAVINGS_GOAL_RATE));
        }

        Ok(all_clear(FeedbackScope::Savings))
    }

    fn check_investment_shortfall(&self) -> Result<FeedbackItem> {
        let baseline = baseline_for(self.investments, INVESTMENT)?;
        let current = latest(self.investments)?.investment_amount;

        if below_pct(current, baseline, INVESTMENT_SHORTFALL_THRESHOLD_PCT) {
            return Ok(FeedbackItem::new(
                Severity::Warning,
                FeedbackScope::Investment,
                MessageKind::InvestmentShortfall,
            )
            .with_metric(METRIC_CURRENT, current)
            .with_metric(METRIC_BASELINE, baseline)
            .with_metric(
                METRIC_REINFORCEMENT,
                baseline * INVESTMENT_REINFORCEMENT_RATE,
            ));
        }

        Ok(all_clear(FeedbackScope::Investment))
    }
}

/// Convenience wrapper around [`RecommendationEngine::evaluate`].
pub fn evaluate_feedback(
    expenses: &[MonthlyExpense],
    investments: &[MonthlyInvestment],
) -> Vec<FeedbackItem> {
    RecommendationEngine::new(expenses, investments).evaluate()
}

/// Average of `column` over the [`BASELINE_WINDOW`] months preceding the
/// current one. Fails with `InsufficientData` when fewer are available.
fn baseline_for<R: MonthlyRecord>(records: &[R], column: &str) -> Result<f64> {
    let history = records.split_last().map_or(&[][..], |(_, rest)| rest);
    trailing_average(history, BASELINE_WINDOW, column)
}

/// `value > baseline * pct / 100`, compared without the division.
fn exceeds_pct(value: f64, baseline: f64, pct: f64) -> bool {
    value * 100.0 > baseline * pct
}

/// `value < baseline * pct / 100`, compared without the division.
fn below_pct(value: f64, baseline: f64, pct: f64) -> bool {
    value * 100.0 < baseline * pct
}

fn latest<R>(records: &[R]) -> Result<&R> {
    records.last().ok_or(FinanceAdvisorError::InsufficientData {
        required: 1,
        available: 0,
    })
}

fn insufficient_history() -> FeedbackItem {
    FeedbackItem::new(
        Severity::Warning,
        FeedbackScope::History,
        MessageKind::InsufficientHistory,
    )
}

fn all_clear(scope: FeedbackScope) -> FeedbackItem {
    FeedbackItem::new(Severity::Info, scope, MessageKind::AllClear)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expenses(rows: &[&[(&str, f64)]]) -> Vec<MonthlyExpense> {
        rows.iter()
            .enumerate()
            .map(|(i, cats)| {
                MonthlyExpense::from_pairs(format!("2024-{:02}", i + 1), cats.iter().copied())
            })
            .collect()
    }

    fn investments(amounts: &[f64]) -> Vec<MonthlyInvestment> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| MonthlyInvestment::new(format!("2024-{:02}", i + 1), a, 10_000.0))
            .collect()
    }

    fn flat_food(months: usize) -> Vec<MonthlyExpense> {
        (0..months)
            .map(|i| MonthlyExpense::from_pairs(format!("2024-{:02}", i + 1), [("Food", 100.0)]))
            .collect()
    }

    fn steady_investments() -> Vec<MonthlyInvestment> {
        investments(&[200.0, 200.0, 200.0, 200.0])
    }

    #[test]
    fn test_gate_requires_both_series() {
        let exp = expenses(&[&[("Food", 100.0)], &[("Food", 100.0)]]);
        let items = evaluate_feedback(&exp, &steady_investments());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].message_kind, MessageKind::InsufficientHistory);
        assert_eq!(items[0].severity, Severity::Warning);

        let exp = flat_food(4);
        let items = evaluate_feedback(&exp, &investments(&[200.0, 200.0]));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].message_kind, MessageKind::InsufficientHistory);
    }

    #[test]
    fn test_category_overspend_metrics() {
        let exp = expenses(&[
            &[("Food", 100.0), ("Rent", 1000.0)],
            &[("Food", 100.0), ("Rent", 1000.0)],
            &[("Food", 100.0), ("Rent", 1000.0)],
            &[("Food", 140.0), ("Rent", 1000.0)],
        ]);
        let items = evaluate_feedback(&exp, &steady_investments());

        let food = &items[0];
        assert_eq!(food.message_kind, MessageKind::CategoryOverspend);
        assert_eq!(food.severity, Severity::Alert);
        assert_eq!(food.category.as_deref(), Some("Food"));
        assert!((food.metric(METRIC_EXCESS).unwrap() - 40.0).abs() < 1e-9);
        assert!((food.metric(METRIC_SUGGESTED_REDUCTION).unwrap() - 10.0).abs() < 1e-9);
        assert!((food.metric(METRIC_PERCENT_OVER).unwrap() - 0.4).abs() < 1e-9);

        // Rent did not move, so only one overspend item precedes savings.
        assert_eq!(items[1].scope, FeedbackScope::Savings);
    }

    #[test]
    fn test_small_increase_is_not_flagged() {
        let exp = expenses(&[
            &[("Food", 100.0)],
            &[("Food", 100.0)],
            &[("Food", 100.0)],
            &[("Food", 114.0)],
        ]);
        let items = evaluate_feedback(&exp, &steady_investments());
        assert_eq!(items[0].message_kind, MessageKind::AllClear);
        assert_eq!(items[0].scope, FeedbackScope::Spending);
    }

    #[test]
    fn test_zero_baseline_omits_percent() {
        let exp = expenses(&[
            &[("Food", 100.0), ("Gifts", 0.0)],
            &[("Food", 100.0)],
            &[("Food", 100.0)],
            &[("Food", 100.0), ("Gifts", 50.0)],
        ]);
        let items = evaluate_feedback(&exp, &steady_investments());
        let gifts = items
            .iter()
            .find(|i| i.category.as_deref() == Some("Gifts"))
            .unwrap();
        assert!((gifts.metric(METRIC_SUGGESTED_REDUCTION).unwrap() - 12.5).abs() < 1e-9);
        assert!((gifts.metric(METRIC_EXCESS).unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(gifts.metric(METRIC_PERCENT_OVER), None);
    }

    #[test]
    fn test_new_category_counts_as_overspend() {
        let exp = expenses(&[
            &[("Food", 100.0)],
            &[("Food", 100.0)],
            &[("Food", 100.0)],
            &[("Food", 100.0), ("Vet", 80.0)],
        ]);
        let items = evaluate_feedback(&exp, &steady_investments());
        assert_eq!(items[0].category.as_deref(), Some("Vet"));
        assert!((items[0].metric(METRIC_EXCESS).unwrap() - 80.0).abs() < 1e-9);
        assert_eq!(items[0].metric(METRIC_PERCENT_OVER), None);
    }

    #[test]
    fn test_savings_goal() {
        let exp = expenses(&[
            &[("Food", 1000.0)],
            &[("Food", 1000.0)],
            &[("Food", 1000.0)],
            &[("Food", 1050.0)],
        ]);
        let items = evaluate_feedback(&exp, &steady_investments());
        let savings = items
            .iter()
            .find(|i| i.scope == FeedbackScope::Savings)
            .unwrap();
        assert_eq!(savings.message_kind, MessageKind::AllClear);
        assert_eq!(savings.severity, Severity::Info);

        let exp = expenses(&[
            &[("Food", 500.0), ("Rent", 500.0)],
            &[("Food", 500.0), ("Rent", 500.0)],
            &[("Food", 500.0), ("Rent", 500.0)],
            &[("Food", 500.0), ("Rent", 650.0)],
        ]);
        let items = evaluate_feedback(&exp, &steady_investments());
        let savings = items
            .iter()
            .find(|i| i.scope == FeedbackScope::Savings)
            .unwrap();
        assert_eq!(savings.message_kind, MessageKind::SavingsGoal);
        assert!((savings.metric(METRIC_BASELINE).unwrap() - 1000.0).abs() < 1e-9);
        assert!((savings.metric(METRIC_GOAL_AMOUNT).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_investment_shortfall() {
        let exp = flat_food(4);
        let items = evaluate_feedback(&exp, &investments(&[200.0, 200.0, 200.0, 150.0]));
        let last = items.last().unwrap();
        assert_eq!(last.message_kind, MessageKind::InvestmentShortfall);
        assert!((last.metric(METRIC_CURRENT).unwrap() - 150.0).abs() < 1e-9);
        assert!((last.metric(METRIC_BASELINE).unwrap() - 200.0).abs() < 1e-9);
        assert!((last.metric(METRIC_REINFORCEMENT).unwrap() - 40.0).abs() < 1e-9);

        let items = evaluate_feedback(&exp, &investments(&[200.0, 200.0, 200.0, 180.0]));
        let last = items.last().unwrap();
        assert_eq!(last.message_kind, MessageKind::AllClear);
        assert_eq!(last.scope, FeedbackScope::Investment);
    }

    #[test]
    fn test_rule_order_and_count() {
        let exp = expenses(&[
            &[("Food", 100.0), ("Fun", 100.0)],
            &[("Food", 100.0), ("Fun", 100.0)],
            &[("Food", 100.0), ("Fun", 100.0)],
            &[("Food", 200.0), ("Fun", 200.0)],
        ]);
        let items = evaluate_feedback(&exp, &investments(&[200.0, 200.0, 200.0, 50.0]));
        let kinds: Vec<MessageKind> = items.iter().map(|i| i.message_kind).collect();
        assert_eq!(
            kinds,
            vec![
                MessageKind::CategoryOverspend,
                MessageKind::CategoryOverspend,
                MessageKind::SavingsGoal,
                MessageKind::InvestmentShortfall,
            ]
        );
    }

    #[test]
    fn test_three_months_lack_a_full_baseline() {
        let exp = expenses(&[&[("Food", 100.0)], &[("Food", 100.0)], &[("Food", 130.0)]]);
        let inv = investments(&[200.0, 200.0, 200.0]);
        let engine = RecommendationEngine::new(&exp, &inv);
        assert!(engine.has_enough_history());

        let items = engine.evaluate();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].message_kind, MessageKind::InsufficientHistory);
        assert_eq!(items[0].scope, FeedbackScope::History);
    }

    #[test]
    fn test_thresholds_are_strict_at_the_boundary() {
        let exp = expenses(&[
            &[("Food", 100.0)],
            &[("Food", 100.0)],
            &[("Food", 100.0)],
            &[("Food", 115.0)],
        ]);
        let items = evaluate_feedback(&exp, &steady_investments());
        let kinds: Vec<(MessageKind, FeedbackScope)> =
            items.iter().map(|i| (i.message_kind, i.scope)).collect();
        assert_eq!(
            kinds,
            vec![
                (MessageKind::AllClear, FeedbackScope::Spending),
                (MessageKind::SavingsGoal, FeedbackScope::Savings),
                (MessageKind::AllClear, FeedbackScope::Investment),
            ]
        );

        let exp = expenses(&[
            &[("Food", 500.0), ("Rent", 500.0)],
            &[("Food", 500.0), ("Rent", 500.0)],
            &[("Food", 500.0), ("Rent", 500.0)],
            &[("Food", 550.0), ("Rent", 550.0)],
        ]);
        let items = evaluate_feedback(&exp, &investments(&[200.0, 200.0, 200.0, 180.0]));
        assert!(items.iter().all(|i| i.message_kind == MessageKind::AllClear));
    }

    #[test]
    fn test_pct_comparisons() {
        assert!(!exceeds_pct(115.0, 100.0, OVERSPEND_THRESHOLD_PCT));
        assert!(exceeds_pct(115.01, 100.0, OVERSPEND_THRESHOLD_PCT));
        assert!(!exceeds_pct(1100.0, 1000.0, SAVINGS_THRESHOLD_PCT));
        assert!(!below_pct(180.0, 200.0, INVESTMENT_SHORTFALL_THRESHOLD_PCT));
        assert!(below_pct(179.99, 200.0, INVESTMENT_SHORTFALL_THRESHOLD_PCT));
        assert!(exceeds_pct(50.0, 0.0, OVERSPEND_THRESHOLD_PCT));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let exp = expenses(&[
            &[("Food", 100.0)],
            &[("Food", 120.0)],
            &[("Food", 90.0)],
            &[("Food", 160.0)],
        ]);
        let inv = investments(&[100.0, 300.0, 200.0, 100.0]);
        let engine = RecommendationEngine::new(&exp, &inv);
        assert_eq!(engine.evaluate(), engine.evaluate());
    }
}

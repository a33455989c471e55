//! Presentation helpers. Nothing here feeds back into the analysis.

use crate::schema::ProjectionPoint;
use serde::{Deserialize, Serialize};

/// Headings and lead words in generated advice, and their decorated form.
const ADVICE_MARKERS: &[(&str, &str)] = &[
    ("Análise dos Gastos", "🔍 **Análise dos Gastos**"),
    ("Análise dos Investimentos", "📈 **Análise dos Investimentos**"),
    ("Conclusão e Sugestões", "✅ **Conclusão e Sugestões**"),
    ("Sugiero", "💡 Sugiro"),
    ("Você", "👉 Você"),
    ("Reduzir", "🔻 Reduzir"),
    ("Aumentar", "🔺 Aumentar"),
    ("Explorar", "🔍 Explorar"),
    ("Resumo", "📝 Resumo"),
    ("Em primeiro lugar", "📌 Em primeiro lugar"),
    ("Em seguida", "📎 Em seguida"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub label: String,
    pub projected_balance: f64,
    pub text: String,
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats `value` with two decimals, `.` thousands and `,` decimal separator.
pub fn format_brl(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{},{}", sign, grouped, frac_part)
}

/// Rounds each projected balance for display.
pub fn projection_rows(points: &[ProjectionPoint]) -> Vec<ProjectionRow> {
    points
        .iter()
        .map(|p| {
            let rounded = round_cents(p.projected_balance);
            ProjectionRow {
                label: p.label(),
                projected_balance: rounded,
                text: format_brl(rounded),
            }
        })
        .collect()
}

/// Decorates generated advice text for markdown display.
pub fn prettify_advice(text: &str) -> String {
    let decorated = ADVICE_MARKERS
        .iter()
        .fold(text.to_string(), |acc, &(plain, fancy)| acc.replace(plain, fancy));
    decorated.replace('\n', "\n\n")
}

use monthly_finance_advisor::*;

const INCOME_CSV: &str = "\
Mês,Salário,Outras Entradas
2024-01,7200,0
2024-02,7200,350
2024-03,7200,0
2024-04,7200,900
";

const EXPENSE_CSV: &str = "\
Mês,Mercado,Aluguel,Transporte,Lazer
2024-01,1100,2400,380,450
2024-02,1050,2400,410,500
2024-03,1150,2400,395,420
2024-04,1480,2400,400,610
";

const INVESTMENT_CSV: &str = "\
Mês,Investimento,Saldo Total
2024-01,1500,32000
2024-02,1500,33600
2024-03,1200,34900
2024-04,800,35800
";

fn main() -> anyhow::Result<()> {
    println!("📊 Monthly Finance Report Demo\n");

    let tables = FinancialTables {
        income: ingestion::read_income_csv(INCOME_CSV.as_bytes())?,
        expenses: ingestion::read_expense_csv(EXPENSE_CSV.as_bytes())?,
        investments: ingestion::read_investment_csv(INVESTMENT_CSV.as_bytes())?,
    };

    let report = analyze(&tables)?;

    println!("💰 Income per month:");
    for point in &report.income_totals {
        println!("  {}: R$ {:>12}", point.month, format_brl(point.value));
    }

    println!("\n💸 Spending per month:");
    for point in &report.expense_totals {
        println!("  {}: R$ {:>12}", point.month, format_brl(point.value));
    }

    println!("\n📋 Average spending distribution:");
    for (category, share) in &report.expense_proportions {
        println!("  {:<12} {:>5.1}%", category, share * 100.0);
    }

    println!("\n🔮 Balance projection:");
    for row in projection_rows(&report.projection) {
        println!("  {:>4}: R$ {:>12}", row.label, row.text);
    }

    println!("\n🔍 Feedback:");
    for item in &report.feedback {
        let subject = item.category.as_deref().unwrap_or("-");
        println!(
            "  [{:?}] {:?} ({:?}, {}) {:?}",
            item.severity, item.message_kind, item.scope, subject, item.metrics
        );
    }

    println!("\n🤖 Prompt for the advice generator:\n");
    println!("{}", report.advice_summary.to_prompt()?);

    Ok(())
}

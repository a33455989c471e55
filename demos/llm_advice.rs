use monthly_finance_advisor::llm::AdviceClient;
use monthly_finance_advisor::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let tables = FinancialTables {
        income: Series::new(vec![
            MonthlyIncome::new("2024-01", 6500.0, 0.0),
            MonthlyIncome::new("2024-02", 6500.0, 400.0),
            MonthlyIncome::new("2024-03", 6500.0, 0.0),
            MonthlyIncome::new("2024-04", 6500.0, 250.0),
        ]),
        expenses: Series::new(vec![
            MonthlyExpense::from_pairs("2024-01", [("Mercado", 950.0), ("Aluguel", 2100.0)]),
            MonthlyExpense::from_pairs("2024-02", [("Mercado", 1000.0), ("Aluguel", 2100.0)]),
            MonthlyExpense::from_pairs("2024-03", [("Mercado", 980.0), ("Aluguel", 2100.0)]),
            MonthlyExpense::from_pairs("2024-04", [("Mercado", 1320.0), ("Aluguel", 2100.0)]),
        ]),
        investments: Series::new(vec![
            MonthlyInvestment::new("2024-01", 1000.0, 18000.0),
            MonthlyInvestment::new("2024-02", 1000.0, 19050.0),
            MonthlyInvestment::new("2024-03", 1000.0, 20100.0),
            MonthlyInvestment::new("2024-04", 600.0, 20750.0),
        ]),
    };

    let report = analyze(&tables)?;
    let client = AdviceClient::from_env()?;

    println!("🤖 Asking {} for advice...\n", client.config().model);
    match client.generate(&report.advice_summary).await {
        Ok(text) => println!("{}", prettify_advice(&text)),
        Err(e) => eprintln!("❌ Advice request failed: {}", e),
    }

    Ok(())
}

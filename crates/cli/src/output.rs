//! Output formatting for allocation plans.

use alloy_primitives::U256;
use euler_earn_rs_sim::{Allocation, EulerEarn, ReturnsDetails};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Diff")]
    diff: String,
    #[tabled(rename = "APY %")]
    apy: String,
    #[tabled(rename = "Util %")]
    utilization: String,
}

/// Renders a candidate allocation as a table, one row per strategy in
/// the vault's canonical queue order.
pub fn format_allocation_table(
    vault: &EulerEarn,
    allocation: &Allocation,
    details: &ReturnsDetails,
) -> String {
    let rows: Vec<AllocationRow> = vault
        .initial_allocation_queue
        .iter()
        .filter_map(|address| {
            let entry = allocation.get(address)?;
            let symbol = vault
                .strategies
                .get(address)
                .map_or_else(String::new, |s| s.details.symbol.clone());
            let returns = details.get(address);
            Some(AllocationRow {
                strategy: address.to_string(),
                symbol,
                current: entry.old_amount.to_string(),
                planned: entry.new_amount.to_string(),
                diff: entry.diff.to_string(),
                apy: returns.map_or_else(String::new, |r| {
                    format!("{:.4}", r.interest_apy + r.rewards_apy)
                }),
                utilization: returns.map_or_else(String::new, |r| {
                    format!("{:.2}", r.utilization * 100.0)
                }),
            })
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Serializes a candidate allocation for `--format json`.
pub fn allocation_json(
    vault: &EulerEarn,
    allocation: &Allocation,
    details: &ReturnsDetails,
    returns_before: f64,
    returns_after: f64,
    transferred: Option<U256>,
) -> serde_json::Value {
    let strategies: Vec<serde_json::Value> = vault
        .initial_allocation_queue
        .iter()
        .filter_map(|address| {
            let entry = allocation.get(address)?;
            let returns = details.get(address);
            Some(serde_json::json!({
                "strategy": address.to_string(),
                "current": entry.old_amount.to_string(),
                "planned": entry.new_amount.to_string(),
                "diff": entry.diff.to_string(),
                "interest_apy": returns.map(|r| r.interest_apy),
                "rewards_apy": returns.map(|r| r.rewards_apy),
                "utilization": returns.map(|r| r.utilization),
            }))
        })
        .collect();

    serde_json::json!({
        "total_returns_before": returns_before,
        "total_returns_after": returns_after,
        "transferred": transferred.map(|t| t.to_string()),
        "strategies": strategies,
    })
}

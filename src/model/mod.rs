pub mod chart;
pub mod transaction;

pub use chart::*;
pub use transaction::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Portfolio %")]
    pub portfolio_pct: f64,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Cost")]
    pub cost: f64,
    #[serde(rename = "Value")]
    pub value: f64,
    #[serde(rename = "P&L")]
    pub pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedPosition {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "Cost")]
    pub cost: f64,
    #[serde(rename = "Sell Price")]
    pub sell_price: f64,
    #[serde(rename = "Sell Date")]
    pub sell_date: String,
    #[serde(rename = "P&L")]
    pub pnl: f64,
}

/// One day of portfolio history. `cumulative_return` and `drawdown` are fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValueRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Current Value")]
    pub current_value: f64,
    #[serde(rename = "Cost")]
    pub cost: f64,
    #[serde(rename = "Current P&L")]
    pub current_pnl: f64,
    #[serde(rename = "Closed P&L")]
    pub closed_pnl: f64,
    #[serde(rename = "Overall P&L")]
    pub overall_pnl: f64,
    #[serde(rename = "Net Invested Capital")]
    pub net_invested_capital: f64,
    #[serde(rename = "Cumulative Cash Flow Adjusted Return")]
    pub cumulative_return: f64,
    #[serde(rename = "Drawdown")]
    pub drawdown: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMetrics {
    #[serde(default)]
    pub sharpe_ratio: Option<f64>,
    #[serde(default)]
    pub sortino_ratio: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default)]
    pub alpha: Option<f64>,
}

/// Served already scaled to a percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaximumDrawdown {
    #[serde(default)]
    pub maximum_drawdown: Option<f64>,
}

/// Everything the portfolio values section shows, fetched as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioSnapshot {
    pub rows: Vec<PortfolioValueRow>,
    pub metrics: AdvancedMetrics,
    pub maximum_drawdown: MaximumDrawdown,
}

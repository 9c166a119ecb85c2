use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValueSeries {
    pub dates: Vec<String>,
    pub current_value: Vec<f64>,
    pub cost: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPnlSeries {
    pub dates: Vec<String>,
    pub daily_pnl_change: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwrSeries {
    pub dates: Vec<String>,
    pub portfolio_twr: Vec<f64>,
    pub spy_twr: Vec<f64>,
}

/// `cumulative_return` holds fractions; the chart scales them to percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeReturnSeries {
    pub dates: Vec<String>,
    pub cumulative_return: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartBundle {
    pub portfolio_value: PortfolioValueSeries,
    pub daily_pnl: DailyPnlSeries,
    pub asset_allocation: AssetAllocation,
    pub twr_vs_spy: TwrSeries,
    pub cumulative_return: CumulativeReturnSeries,
}

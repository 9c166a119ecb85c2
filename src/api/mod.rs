pub mod demo;
pub mod http;
pub mod provider;

#[cfg(test)]
pub mod fake;

/// Backend paths, relative to the configured API base URL.
pub mod endpoints {
    pub const OPEN_POSITIONS: &str = "data/open_positions";
    pub const CLOSED_POSITIONS: &str = "data/closed_positions";
    pub const PORTFOLIO_VALUE: &str = "data/portfolio_value";
    pub const ADVANCED_METRICS: &str = "data/metrics/advanced";
    pub const MAXIMUM_DRAWDOWN: &str = "data/metrics/maximum_drawdown";
    pub const CHART_PORTFOLIO_VALUE: &str = "data/chart/portfolio_value_over_time";
    pub const CHART_DAILY_PNL: &str = "data/chart/daily_pnl_change";
    pub const CHART_ASSET_ALLOCATION: &str = "data/chart/asset_allocation";
    pub const CHART_TWR_VS_SPY: &str = "data/chart/twr_vs_spy";
    pub const CHART_CUMULATIVE_RETURN: &str = "data/chart/cumulative_cash_flow_adjusted_return";
    pub const TRANSACTIONS: &str = "transactions";
}

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::*;

/// Everything the dashboard reads from or writes to the portfolio backend.
///
/// Each section view calls only the methods it needs, once per activation.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn get_open_positions(&self) -> Result<Vec<OpenPosition>, ApiError>;
    async fn get_closed_positions(&self) -> Result<Vec<ClosedPosition>, ApiError>;
    async fn get_portfolio_values(&self) -> Result<Vec<PortfolioValueRow>, ApiError>;
    async fn get_advanced_metrics(&self) -> Result<AdvancedMetrics, ApiError>;
    async fn get_maximum_drawdown(&self) -> Result<MaximumDrawdown, ApiError>;

    async fn get_portfolio_value_chart(&self) -> Result<PortfolioValueSeries, ApiError>;
    async fn get_daily_pnl_chart(&self) -> Result<DailyPnlSeries, ApiError>;
    async fn get_asset_allocation_chart(&self) -> Result<AssetAllocation, ApiError>;
    async fn get_twr_vs_spy_chart(&self) -> Result<TwrSeries, ApiError>;
    async fn get_cumulative_return_chart(&self) -> Result<CumulativeReturnSeries, ApiError>;

    /// Returns the message to show on success; a refusal comes back as
    /// [`ApiError::Rejected`] with the server's own message.
    async fn submit_transaction(&self, transaction: &NewTransaction) -> Result<String, ApiError>;

    /// Where the data comes from, for the loading and help screens.
    fn describe(&self) -> String;
}

//! Scripted provider for view and app tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::endpoints;
use crate::api::provider::DataProvider;
use crate::error::ApiError;
use crate::model::*;

pub struct FakeProvider {
    pub open_positions: Result<Vec<OpenPosition>, ApiError>,
    pub closed_positions: Result<Vec<ClosedPosition>, ApiError>,
    pub portfolio_values: Result<Vec<PortfolioValueRow>, ApiError>,
    pub advanced_metrics: Result<AdvancedMetrics, ApiError>,
    pub maximum_drawdown: Result<MaximumDrawdown, ApiError>,
    pub charts: ChartBundle,
    pub chart_failure: Option<ApiError>,
    pub submit_response: Result<String, ApiError>,
    /// Holds every GET for this long, so tests can navigate away mid-request.
    pub latency: Option<Duration>,
    pub(crate) calls: Mutex<HashMap<&'static str, usize>>,
    pub(crate) submitted: Mutex<Vec<NewTransaction>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            open_positions: Ok(vec![sample_open_position()]),
            closed_positions: Ok(vec![sample_closed_position()]),
            portfolio_values: Ok(vec![sample_portfolio_row()]),
            advanced_metrics: Ok(AdvancedMetrics {
                sharpe_ratio: Some(1.5),
                sortino_ratio: Some(2.1),
                beta: Some(0.95),
                alpha: Some(0.02),
            }),
            maximum_drawdown: Ok(MaximumDrawdown { maximum_drawdown: Some(8.25) }),
            charts: sample_charts(),
            chart_failure: None,
            submit_response: Ok("Transaction added successfully!".to_string()),
            latency: None,
            calls: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

impl FakeProvider {
    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn submitted(&self) -> Vec<NewTransaction> {
        self.submitted.lock().unwrap().clone()
    }

    async fn hit(&self, endpoint: &'static str) {
        *self.calls.lock().unwrap().entry(endpoint).or_insert(0) += 1;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    async fn chart<T: Clone>(&self, endpoint: &'static str, series: &T) -> Result<T, ApiError> {
        self.hit(endpoint).await;
        match &self.chart_failure {
            Some(err) => Err(err.clone()),
            None => Ok(series.clone()),
        }
    }
}

#[async_trait]
impl DataProvider for FakeProvider {
    async fn get_open_positions(&self) -> Result<Vec<OpenPosition>, ApiError> {
        self.hit(endpoints::OPEN_POSITIONS).await;
        self.open_positions.clone()
    }

    async fn get_closed_positions(&self) -> Result<Vec<ClosedPosition>, ApiError> {
        self.hit(endpoints::CLOSED_POSITIONS).await;
        self.closed_positions.clone()
    }

    async fn get_portfolio_values(&self) -> Result<Vec<PortfolioValueRow>, ApiError> {
        self.hit(endpoints::PORTFOLIO_VALUE).await;
        self.portfolio_values.clone()
    }

    async fn get_advanced_metrics(&self) -> Result<AdvancedMetrics, ApiError> {
        self.hit(endpoints::ADVANCED_METRICS).await;
        self.advanced_metrics.clone()
    }

    async fn get_maximum_drawdown(&self) -> Result<MaximumDrawdown, ApiError> {
        self.hit(endpoints::MAXIMUM_DRAWDOWN).await;
        self.maximum_drawdown.clone()
    }

    async fn get_portfolio_value_chart(&self) -> Result<PortfolioValueSeries, ApiError> {
        self.chart(endpoints::CHART_PORTFOLIO_VALUE, &self.charts.portfolio_value).await
    }

    async fn get_daily_pnl_chart(&self) -> Result<DailyPnlSeries, ApiError> {
        self.chart(endpoints::CHART_DAILY_PNL, &self.charts.daily_pnl).await
    }

    async fn get_asset_allocation_chart(&self) -> Result<AssetAllocation, ApiError> {
        self.chart(endpoints::CHART_ASSET_ALLOCATION, &self.charts.asset_allocation).await
    }

    async fn get_twr_vs_spy_chart(&self) -> Result<TwrSeries, ApiError> {
        self.chart(endpoints::CHART_TWR_VS_SPY, &self.charts.twr_vs_spy).await
    }

    async fn get_cumulative_return_chart(&self) -> Result<CumulativeReturnSeries, ApiError> {
        self.chart(endpoints::CHART_CUMULATIVE_RETURN, &self.charts.cumulative_return).await
    }

    async fn submit_transaction(&self, transaction: &NewTransaction) -> Result<String, ApiError> {
        *self.calls.lock().unwrap().entry(endpoints::TRANSACTIONS).or_insert(0) += 1;
        self.submitted.lock().unwrap().push(transaction.clone());
        self.submit_response.clone()
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

pub fn sample_open_position() -> OpenPosition {
    OpenPosition {
        symbol: "AAPL".to_string(),
        portfolio_pct: 61.5,
        quantity: 10.0,
        price: 190.5,
        cost: 1500.0,
        value: 1905.0,
        pnl: 405.0,
    }
}

pub fn sample_closed_position() -> ClosedPosition {
    ClosedPosition {
        symbol: "TSLA".to_string(),
        quantity: 5.0,
        cost: 1200.0,
        sell_price: 260.0,
        sell_date: "2025-04-17".to_string(),
        pnl: 100.0,
    }
}

pub fn sample_portfolio_row() -> PortfolioValueRow {
    PortfolioValueRow {
        date: "2025-04-01".to_string(),
        current_value: 3100.0,
        cost: 2700.0,
        current_pnl: 400.0,
        closed_pnl: 100.0,
        overall_pnl: 500.0,
        net_invested_capital: 2600.0,
        cumulative_return: 0.1534,
        drawdown: 0.0421,
    }
}

pub fn sample_charts() -> ChartBundle {
    let dates: Vec<String> = ["2025-04-01", "2025-04-02", "2025-04-03"]
        .iter()
        .map(|d| d.to_string())
        .collect();

    ChartBundle {
        portfolio_value: PortfolioValueSeries {
            dates: dates.clone(),
            current_value: vec![3000.0, 3050.0, 3100.0],
            cost: vec![2700.0, 2700.0, 2700.0],
        },
        daily_pnl: DailyPnlSeries {
            dates: dates.clone(),
            daily_pnl_change: vec![0.0, 50.0, -20.0],
        },
        asset_allocation: AssetAllocation {
            labels: vec!["AAPL".to_string(), "MSFT".to_string()],
            values: vec![1905.0, 1195.0],
        },
        twr_vs_spy: TwrSeries {
            dates: dates.clone(),
            portfolio_twr: vec![0.0, 0.016, 0.033],
            spy_twr: vec![0.0, 0.004, 0.011],
        },
        cumulative_return: CumulativeReturnSeries {
            dates,
            cumulative_return: vec![0.1, 0.12, 0.1534],
        },
    }
}

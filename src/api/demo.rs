use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::RwLock;

use crate::api::provider::DataProvider;
use crate::error::ApiError;
use crate::model::*;

const TRADING_DAYS: usize = 90;
const DEMO_SEED: u64 = 0x5eed_f011;

struct Holding {
    symbol: &'static str,
    quantity: f64,
    avg_cost: f64,
    start_price: f64,
}

const HOLDINGS: &[Holding] = &[
    Holding { symbol: "AAPL", quantity: 15.0, avg_cost: 172.40, start_price: 221.5 },
    Holding { symbol: "MSFT", quantity: 8.0, avg_cost: 389.10, start_price: 390.6 },
    Holding { symbol: "NVDA", quantity: 20.0, avg_cost: 94.30, start_price: 113.8 },
    Holding { symbol: "VOO", quantity: 6.0, avg_cost: 480.20, start_price: 518.0 },
];

/// Offline stand-in for the backend, serving a fixed simulated portfolio.
pub struct DemoProvider {
    open_positions: Vec<OpenPosition>,
    closed_positions: Vec<ClosedPosition>,
    history: Vec<DemoDay>,
    submitted: RwLock<Vec<NewTransaction>>,
}

#[derive(Debug, Clone)]
struct DemoDay {
    date: NaiveDate,
    row: PortfolioValueRow,
    daily_pnl_change: f64,
    twr: f64,
    spy_twr: f64,
}

impl DemoProvider {
    pub fn new() -> Self {
        Self::with_seed(DEMO_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let dates = trading_days(NaiveDate::from_ymd_opt(2025, 3, 26).unwrap_or_default(), TRADING_DAYS);

        let paths: Vec<Vec<f64>> = HOLDINGS
            .iter()
            .map(|h| random_walk(&mut rng, h.start_price, TRADING_DAYS, 0.022))
            .collect();
        let spy = random_walk(&mut rng, 565.0, TRADING_DAYS, 0.012);

        let closed_positions = vec![
            ClosedPosition {
                symbol: "TSLA".to_string(),
                quantity: 5.0,
                cost: 1_310.25,
                sell_price: 281.40,
                sell_date: "2025-04-17".to_string(),
                pnl: 96.75,
            },
            ClosedPosition {
                symbol: "AMD".to_string(),
                quantity: 12.0,
                cost: 1_452.00,
                sell_price: 108.15,
                sell_date: "2025-05-09".to_string(),
                pnl: -154.20,
            },
        ];
        let closed_pnl: f64 = closed_positions.iter().map(|p| p.pnl).sum();
        let cost: f64 = HOLDINGS.iter().map(|h| h.quantity * h.avg_cost).sum();

        let mut history = Vec::with_capacity(TRADING_DAYS);
        let mut peak = f64::MIN;
        let mut previous_overall = None;
        let mut first_value = None;

        for (day, date) in dates.iter().enumerate() {
            let value: f64 = HOLDINGS
                .iter()
                .zip(&paths)
                .map(|(h, path)| h.quantity * path[day])
                .sum();
            peak = peak.max(value);
            let first = *first_value.get_or_insert(value);

            let current_pnl = value - cost;
            let overall_pnl = current_pnl + closed_pnl;
            let daily_pnl_change = previous_overall.map_or(0.0, |prev| overall_pnl - prev);
            previous_overall = Some(overall_pnl);

            history.push(DemoDay {
                date: *date,
                row: PortfolioValueRow {
                    date: date.format("%Y-%m-%d").to_string(),
                    current_value: round2(value),
                    cost: round2(cost),
                    current_pnl: round2(current_pnl),
                    closed_pnl: round2(closed_pnl),
                    overall_pnl: round2(overall_pnl),
                    net_invested_capital: round2(cost - closed_pnl),
                    cumulative_return: overall_pnl / cost,
                    drawdown: (peak - value) / peak,
                },
                daily_pnl_change: round2(daily_pnl_change),
                twr: value / first - 1.0,
                spy_twr: spy[day] / spy[0] - 1.0,
            });
        }

        let last_prices: Vec<f64> = paths.iter().map(|p| p[TRADING_DAYS - 1]).collect();
        let total_value: f64 = HOLDINGS.iter().zip(&last_prices).map(|(h, p)| h.quantity * p).sum();
        let open_positions = HOLDINGS
            .iter()
            .zip(&last_prices)
            .map(|(h, &price)| {
                let value = h.quantity * price;
                let cost = h.quantity * h.avg_cost;
                OpenPosition {
                    symbol: h.symbol.to_string(),
                    portfolio_pct: round2(value / total_value * 100.0),
                    quantity: h.quantity,
                    price: round2(price),
                    cost: round2(cost),
                    value: round2(value),
                    pnl: round2(value - cost),
                }
            })
            .collect();

        debug!("🧪 Generated demo portfolio: {} days, value ${:.2}", history.len(), total_value);

        Self {
            open_positions,
            closed_positions,
            history,
            submitted: RwLock::new(Vec::new()),
        }
    }

    #[cfg(test)]
    pub async fn submitted(&self) -> Vec<NewTransaction> {
        self.submitted.read().await.clone()
    }

    fn dates(&self) -> Vec<String> {
        self.history.iter().map(|d| d.date.format("%Y-%m-%d").to_string()).collect()
    }
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn trading_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    std::iter::successors(Some(start), |d| Some(*d + Duration::days(1)))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(count)
        .collect()
}

fn random_walk(rng: &mut StdRng, start: f64, steps: usize, volatility: f64) -> Vec<f64> {
    let mut price = start;
    (0..steps)
        .map(|step| {
            if step > 0 {
                price *= 1.0 + rng.gen_range(-volatility..volatility) + 0.0006;
            }
            price
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[async_trait]
impl DataProvider for DemoProvider {
    async fn get_open_positions(&self) -> Result<Vec<OpenPosition>, ApiError> {
        Ok(self.open_positions.clone())
    }

    async fn get_closed_positions(&self) -> Result<Vec<ClosedPosition>, ApiError> {
        Ok(self.closed_positions.clone())
    }

    async fn get_portfolio_values(&self) -> Result<Vec<PortfolioValueRow>, ApiError> {
        Ok(self.history.iter().map(|d| d.row.clone()).collect())
    }

    async fn get_advanced_metrics(&self) -> Result<AdvancedMetrics, ApiError> {
        Ok(AdvancedMetrics {
            sharpe_ratio: Some(1.42),
            sortino_ratio: Some(2.05),
            beta: Some(1.08),
            alpha: Some(0.031),
        })
    }

    async fn get_maximum_drawdown(&self) -> Result<MaximumDrawdown, ApiError> {
        let worst = self.history.iter().map(|d| d.row.drawdown).fold(0.0f64, f64::max);
        Ok(MaximumDrawdown { maximum_drawdown: Some(round2(worst * 100.0)) })
    }

    async fn get_portfolio_value_chart(&self) -> Result<PortfolioValueSeries, ApiError> {
        Ok(PortfolioValueSeries {
            dates: self.dates(),
            current_value: self.history.iter().map(|d| d.row.current_value).collect(),
            cost: self.history.iter().map(|d| d.row.cost).collect(),
        })
    }

    async fn get_daily_pnl_chart(&self) -> Result<DailyPnlSeries, ApiError> {
        Ok(DailyPnlSeries {
            dates: self.dates(),
            daily_pnl_change: self.history.iter().map(|d| d.daily_pnl_change).collect(),
        })
    }

    async fn get_asset_allocation_chart(&self) -> Result<AssetAllocation, ApiError> {
        Ok(AssetAllocation {
            labels: self.open_positions.iter().map(|p| p.symbol.clone()).collect(),
            values: self.open_positions.iter().map(|p| p.value).collect(),
        })
    }

    async fn get_twr_vs_spy_chart(&self) -> Result<TwrSeries, ApiError> {
        Ok(TwrSeries {
            dates: self.dates(),
            portfolio_twr: self.history.iter().map(|d| d.twr).collect(),
            spy_twr: self.history.iter().map(|d| d.spy_twr).collect(),
        })
    }

    async fn get_cumulative_return_chart(&self) -> Result<CumulativeReturnSeries, ApiError> {
        Ok(CumulativeReturnSeries {
            dates: self.dates(),
            cumulative_return: self.history.iter().map(|d| d.row.cumulative_return).collect(),
        })
    }

    async fn submit_transaction(&self, transaction: &NewTransaction) -> Result<String, ApiError> {
        let valid_ticker = transaction
            .ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !valid_ticker {
            return Err(ApiError::Rejected { status: 400, message: "Invalid ticker".to_string() });
        }

        info!("🧪 Demo backend recorded {} {} x{}", transaction.kind, transaction.ticker, transaction.quantity);
        self.submitted.write().await.push(transaction.clone());
        Ok("Transaction added and portfolio updated successfully!".to_string())
    }

    fn describe(&self) -> String {
        "demo data (offline)".to_string()
    }
}

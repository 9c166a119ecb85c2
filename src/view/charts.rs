use log::debug;
use ratatui::style::Color;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use crate::api::provider::DataProvider;
use crate::error::{or_empty, ApiError};
use crate::model::ChartBundle;
use crate::view::{InFlight, LoadState, Payload, UpdateSender};

pub const VALUE_COLOR: Color = Color::Rgb(75, 192, 192);
pub const COST_COLOR: Color = Color::Rgb(255, 99, 132);
pub const GAIN_COLOR: Color = Color::Rgb(75, 192, 192);
pub const LOSS_COLOR: Color = Color::Rgb(255, 99, 132);
pub const PORTFOLIO_TWR_COLOR: Color = Color::Rgb(255, 99, 132);
pub const SPY_TWR_COLOR: Color = Color::Rgb(54, 162, 235);
pub const SLICE_COLORS: [Color; 6] = [
    Color::Rgb(255, 99, 132),
    Color::Rgb(54, 162, 235),
    Color::Rgb(255, 206, 86),
    Color::Rgb(75, 192, 192),
    Color::Rgb(153, 102, 255),
    Color::Rgb(255, 159, 64),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartTab {
    #[default]
    PortfolioValue,
    DailyPnl,
    AssetAllocation,
    TwrVsSpy,
    CumulativeReturn,
}

impl ChartTab {
    pub fn all() -> &'static [ChartTab] {
        &[
            ChartTab::PortfolioValue,
            ChartTab::DailyPnl,
            ChartTab::AssetAllocation,
            ChartTab::TwrVsSpy,
            ChartTab::CumulativeReturn,
        ]
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartTab::PortfolioValue => "Portfolio Value",
            ChartTab::DailyPnl => "Daily P&L",
            ChartTab::AssetAllocation => "Asset Allocation",
            ChartTab::TwrVsSpy => "TWR vs SPY",
            ChartTab::CumulativeReturn => "Cumulative Return",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            ChartTab::PortfolioValue => "Portfolio Value Over Time",
            ChartTab::DailyPnl => "Daily P&L Change",
            ChartTab::AssetAllocation => "Asset Allocation",
            ChartTab::TwrVsSpy => "Time-Weighted Return (TWR) vs. SPY",
            ChartTab::CumulativeReturn => "Cumulative Cash Flow Adjusted Return",
        }
    }

    pub fn index(self) -> usize {
        ChartTab::all().iter().position(|&t| t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        let tabs = ChartTab::all();
        tabs[(self.index() + 1) % tabs.len()]
    }

    pub fn previous(self) -> Self {
        let tabs = ChartTab::all();
        tabs[(self.index() + tabs.len() - 1) % tabs.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub color: Color,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub share: f64,
    pub color: Color,
}

/// Renderable geometry for one chart, x positions are day indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Plot {
    Lines {
        series: Vec<Series>,
        dates: Vec<String>,
        y_bounds: [f64; 2],
    },
    Bars {
        series: Vec<Series>,
        dates: Vec<String>,
        y_bounds: [f64; 2],
    },
    Allocation {
        slices: Vec<Slice>,
    },
    Empty,
}

impl Plot {
    pub fn build(tab: ChartTab, data: &ChartBundle) -> Plot {
        match tab {
            ChartTab::PortfolioValue => {
                let pv = &data.portfolio_value;
                lines(
                    &pv.dates,
                    vec![
                        ("Total Portfolio Value", VALUE_COLOR, &pv.current_value[..]),
                        ("Total Cost", COST_COLOR, &pv.cost[..]),
                    ],
                )
            }
            ChartTab::DailyPnl => {
                let pnl = &data.daily_pnl;
                if pnl.dates.is_empty() || pnl.daily_pnl_change.is_empty() {
                    return Plot::Empty;
                }
                let (gains, losses): (Vec<(f64, f64)>, Vec<(f64, f64)>) = pnl
                    .daily_pnl_change
                    .iter()
                    .take(pnl.dates.len())
                    .enumerate()
                    .map(|(i, &v)| (i as f64, v))
                    .partition(|&(_, v)| v > 0.0);
                let all: Vec<f64> = gains.iter().chain(&losses).map(|p| p.1).chain([0.0]).collect();
                Plot::Bars {
                    y_bounds: bounds(&all),
                    series: vec![
                        Series { name: "Gain", color: GAIN_COLOR, points: gains },
                        Series { name: "Loss", color: LOSS_COLOR, points: losses },
                    ],
                    dates: pnl.dates.clone(),
                }
            }
            ChartTab::AssetAllocation => {
                let alloc = &data.asset_allocation;
                let total: f64 = alloc.values.iter().sum();
                if alloc.labels.is_empty() || total <= 0.0 {
                    return Plot::Empty;
                }
                let slices = alloc
                    .labels
                    .iter()
                    .zip(&alloc.values)
                    .enumerate()
                    .map(|(i, (label, &value))| Slice {
                        label: label.clone(),
                        value,
                        share: value / total * 100.0,
                        color: SLICE_COLORS[i % SLICE_COLORS.len()],
                    })
                    .collect();
                Plot::Allocation { slices }
            }
            ChartTab::TwrVsSpy => {
                let twr = &data.twr_vs_spy;
                lines(
                    &twr.dates,
                    vec![
                        ("Portfolio TWR", PORTFOLIO_TWR_COLOR, &twr.portfolio_twr[..]),
                        ("SPY TWR", SPY_TWR_COLOR, &twr.spy_twr[..]),
                    ],
                )
            }
            ChartTab::CumulativeReturn => {
                let cr = &data.cumulative_return;
                let percent: Vec<f64> = cr.cumulative_return.iter().map(|v| v * 100.0).collect();
                lines(
                    &cr.dates,
                    vec![("Cumulative Cash Flow Adjusted Return", VALUE_COLOR, &percent[..])],
                )
            }
        }
    }
}

fn lines(dates: &[String], sources: Vec<(&'static str, Color, &[f64])>) -> Plot {
    let series: Vec<Series> = sources
        .into_iter()
        .map(|(name, color, values)| Series {
            name,
            color,
            points: values
                .iter()
                .take(dates.len())
                .enumerate()
                .map(|(i, &v)| (i as f64, v))
                .collect(),
        })
        .collect();

    if series.iter().all(|s| s.points.is_empty()) {
        return Plot::Empty;
    }

    let values: Vec<f64> = series.iter().flat_map(|s| s.points.iter().map(|p| p.1)).collect();
    Plot::Lines {
        y_bounds: bounds(&values),
        series,
        dates: dates.to_vec(),
    }
}

fn bounds(values: &[f64]) -> [f64; 2] {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((max - min) * 0.05).max(f64::EPSILON);
    if max - min < f64::EPSILON {
        return [min - 1.0, max + 1.0];
    }
    [min - pad, max + pad]
}

/// Counts live chart handles for one canvas; released on drop.
#[derive(Debug)]
struct CanvasLease(Rc<Cell<usize>>);

impl CanvasLease {
    fn acquire(live: &Rc<Cell<usize>>) -> Self {
        live.set(live.get() + 1);
        Self(live.clone())
    }
}

impl Drop for CanvasLease {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

/// The one chart currently drawn on the charts canvas.
#[derive(Debug)]
pub struct ChartHandle {
    pub tab: ChartTab,
    pub plot: Plot,
    _lease: CanvasLease,
}

#[derive(Debug)]
pub struct ChartsView {
    pub state: LoadState<ChartBundle>,
    active: ChartTab,
    canvas: Option<ChartHandle>,
    live: Rc<Cell<usize>>,
    request: Option<InFlight>,
}

impl ChartsView {
    /// Fires all five chart requests at once.
    pub fn start<P: DataProvider + 'static>(provider: Arc<P>, updates: UpdateSender, activation: u64) -> Self {
        let request = InFlight::spawn(
            updates,
            activation,
            async move { fetch_bundle(provider.as_ref()).await },
            Payload::Charts,
        );

        Self {
            state: LoadState::Loading,
            active: ChartTab::default(),
            canvas: None,
            live: Rc::new(Cell::new(0)),
            request: Some(request),
        }
    }

    pub fn apply(&mut self, result: Result<ChartBundle, ApiError>) {
        self.request = None;
        self.state = LoadState::settle(result);
        self.redraw();
    }

    pub fn active_tab(&self) -> ChartTab {
        self.active
    }

    pub fn select_tab(&mut self, tab: ChartTab) {
        self.active = tab;
        self.redraw();
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.active.next());
    }

    pub fn previous_tab(&mut self) {
        self.select_tab(self.active.previous());
    }

    pub fn canvas(&self) -> Option<&ChartHandle> {
        self.canvas.as_ref()
    }

    #[cfg(test)]
    pub fn live_charts(&self) -> usize {
        self.live.get()
    }

    fn redraw(&mut self) {
        // Release the previous chart before building its replacement.
        drop(self.canvas.take());

        if let LoadState::Ready(data) = &self.state {
            debug!("📈 Building {} chart", self.active.title());
            self.canvas = Some(ChartHandle {
                tab: self.active,
                plot: Plot::build(self.active, data),
                _lease: CanvasLease::acquire(&self.live),
            });
        }
    }
}

async fn fetch_bundle<P: DataProvider + ?Sized>(provider: &P) -> Result<ChartBundle, ApiError> {
    let (portfolio_value, daily_pnl, asset_allocation, twr_vs_spy, cumulative_return) = tokio::join!(
        provider.get_portfolio_value_chart(),
        provider.get_daily_pnl_chart(),
        provider.get_asset_allocation_chart(),
        provider.get_twr_vs_spy_chart(),
        provider.get_cumulative_return_chart(),
    );

    Ok(ChartBundle {
        portfolio_value: or_empty(portfolio_value)?,
        daily_pnl: or_empty(daily_pnl)?,
        asset_allocation: or_empty(asset_allocation)?,
        twr_vs_spy: or_empty(twr_vs_spy)?,
        cumulative_return: or_empty(cumulative_return)?,
    })
}

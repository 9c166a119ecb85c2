pub mod charts;
pub mod form;
pub mod portfolio_values;
pub mod table;

use log::debug;
use std::future::Future;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::error::ApiError;
use crate::model::*;

/// Lifecycle of a section's data, from activation to first answer.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn settle(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => LoadState::Ready(data),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Result of a view's request, routed back to the UI loop.
#[derive(Debug)]
pub enum Payload {
    OpenPositions(Result<Vec<OpenPosition>, ApiError>),
    ClosedPositions(Result<Vec<ClosedPosition>, ApiError>),
    PortfolioValues(Result<PortfolioSnapshot, ApiError>),
    Charts(Result<ChartBundle, ApiError>),
    Submitted(Result<String, ApiError>),
}

#[derive(Debug)]
pub struct ViewUpdate {
    /// Which activation of the section asked for this; stale ones are dropped.
    pub activation: u64,
    pub payload: Payload,
}

pub type UpdateSender = UnboundedSender<ViewUpdate>;

/// A request owned by a view. Dropping it aborts the request.
#[derive(Debug)]
pub struct InFlight(JoinHandle<()>);

impl InFlight {
    pub fn spawn<T, F>(
        updates: UpdateSender,
        activation: u64,
        request: F,
        wrap: fn(Result<T, ApiError>) -> Payload,
    ) -> Self
    where
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
        T: Send + 'static,
    {
        InFlight(tokio::spawn(async move {
            let payload = wrap(request.await);
            if updates.send(ViewUpdate { activation, payload }).is_err() {
                debug!("No update receiver for activation #{}", activation);
            }
        }))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.0.is_finished() {
            debug!("🛑 Aborting in-flight request");
            self.0.abort();
        }
    }
}

/// A record that renders as one row of a section table.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

impl TableRow for OpenPosition {
    const HEADERS: &'static [&'static str] =
        &["Symbol", "Portfolio %", "Quantity", "Price", "Cost", "Value", "P&L"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.portfolio_pct.to_string(),
            self.quantity.to_string(),
            self.price.to_string(),
            self.cost.to_string(),
            self.value.to_string(),
            self.pnl.to_string(),
        ]
    }
}

impl TableRow for ClosedPosition {
    const HEADERS: &'static [&'static str] =
        &["Symbol", "Quantity", "Cost", "Sell Price", "Sell Date", "P&L"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.quantity.to_string(),
            self.cost.to_string(),
            self.sell_price.to_string(),
            self.sell_date.clone(),
            self.pnl.to_string(),
        ]
    }
}

impl TableRow for PortfolioValueRow {
    const HEADERS: &'static [&'static str] = &[
        "Date",
        "Current Value",
        "Cost",
        "Current P&L",
        "Closed P&L",
        "Overall P&L",
        "Net Invested Capital",
        "Cumulative Cash Flow Adjusted Return",
        "Drawdown",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.current_value.to_string(),
            self.cost.to_string(),
            self.current_pnl.to_string(),
            self.closed_pnl.to_string(),
            self.overall_pnl.to_string(),
            self.net_invested_capital.to_string(),
            format_percent(self.cumulative_return),
            format_percent(self.drawdown),
        ]
    }
}

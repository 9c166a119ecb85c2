use std::sync::Arc;

use crate::api::provider::DataProvider;
use crate::error::{or_empty, ApiError};
use crate::model::{PortfolioSnapshot, PortfolioValueRow};
use crate::view::{InFlight, LoadState, Payload, UpdateSender};

/// Daily value history plus the risk metrics block.
#[derive(Debug)]
pub struct PortfolioValuesView {
    pub state: LoadState<PortfolioSnapshot>,
    pub offset: usize,
    request: Option<InFlight>,
}

impl PortfolioValuesView {
    pub fn start<P: DataProvider + 'static>(provider: Arc<P>, updates: UpdateSender, activation: u64) -> Self {
        let request = InFlight::spawn(
            updates,
            activation,
            async move { fetch_snapshot(provider.as_ref()).await },
            Payload::PortfolioValues,
        );

        Self {
            state: LoadState::Loading,
            offset: 0,
            request: Some(request),
        }
    }

    pub fn apply(&mut self, result: Result<PortfolioSnapshot, ApiError>) {
        self.request = None;
        self.offset = 0;
        self.state = LoadState::settle(result);
    }

    pub fn rows(&self) -> &[PortfolioValueRow] {
        match self.state.ready() {
            Some(snapshot) => &snapshot.rows,
            None => &[],
        }
    }

    pub fn scroll_down(&mut self, by: usize) {
        let last = self.rows().len().saturating_sub(1);
        self.offset = (self.offset + by).min(last);
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.offset = self.offset.saturating_sub(by);
    }

    pub fn scroll_home(&mut self) {
        self.offset = 0;
    }
}

async fn fetch_snapshot<P: DataProvider + ?Sized>(provider: &P) -> Result<PortfolioSnapshot, ApiError> {
    let (rows, metrics, maximum_drawdown) = tokio::join!(
        provider.get_portfolio_values(),
        provider.get_advanced_metrics(),
        provider.get_maximum_drawdown(),
    );

    Ok(PortfolioSnapshot {
        rows: or_empty(rows)?,
        metrics: or_empty(metrics)?,
        maximum_drawdown: or_empty(maximum_drawdown)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints;
    use crate::api::fake::FakeProvider;
    use crate::model::AdvancedMetrics;
    use tokio::sync::mpsc;

    async fn loaded(provider: FakeProvider) -> (PortfolioValuesView, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut view = PortfolioValuesView::start(provider.clone(), tx, 3);

        match rx.recv().await.expect("update").payload {
            Payload::PortfolioValues(result) => view.apply(result),
            other => panic!("unexpected payload {:?}", other),
        }
        (view, provider)
    }

    #[tokio::test]
    async fn fetches_rows_metrics_and_drawdown_once() {
        let (view, provider) = loaded(FakeProvider::default()).await;

        let snapshot = view.state.ready().expect("ready");
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.metrics.sharpe_ratio, Some(1.5));
        assert_eq!(snapshot.maximum_drawdown.maximum_drawdown, Some(8.25));
        assert_eq!(provider.calls(endpoints::PORTFOLIO_VALUE), 1);
        assert_eq!(provider.calls(endpoints::ADVANCED_METRICS), 1);
        assert_eq!(provider.calls(endpoints::MAXIMUM_DRAWDOWN), 1);
    }

    #[tokio::test]
    async fn any_failed_request_fails_the_view() {
        let (view, _) = loaded(FakeProvider {
            advanced_metrics: Err(ApiError::Network("connection refused".into())),
            ..FakeProvider::default()
        })
        .await;

        assert_eq!(view.state, LoadState::Failed("connection refused".to_string()));
        assert!(view.rows().is_empty());
    }

    #[tokio::test]
    async fn malformed_metrics_fall_back_to_not_available() {
        let (view, _) = loaded(FakeProvider {
            advanced_metrics: Err(ApiError::Parse("bad json".into())),
            ..FakeProvider::default()
        })
        .await;

        let snapshot = view.state.ready().expect("ready");
        assert_eq!(snapshot.metrics, AdvancedMetrics::default());
        assert_eq!(snapshot.rows.len(), 1);
    }
}

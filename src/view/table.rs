use std::sync::Arc;

use crate::api::provider::DataProvider;
use crate::error::{or_empty, ApiError};
use crate::model::{ClosedPosition, OpenPosition};
use crate::view::{InFlight, LoadState, Payload, TableRow, UpdateSender};

/// A read-only table section: one GET on activation, rows in server order.
#[derive(Debug)]
pub struct TableView<R> {
    pub title: &'static str,
    pub state: LoadState<Vec<R>>,
    pub offset: usize,
    request: Option<InFlight>,
}

impl<R: TableRow> TableView<R> {
    fn loading(title: &'static str, request: InFlight) -> Self {
        Self {
            title,
            state: LoadState::Loading,
            offset: 0,
            request: Some(request),
        }
    }

    pub fn apply(&mut self, result: Result<Vec<R>, ApiError>) {
        self.request = None;
        self.offset = 0;
        self.state = LoadState::settle(or_empty(result));
    }

    pub fn rows(&self) -> &[R] {
        match self.state.ready() {
            Some(rows) => rows,
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

impl TableView<OpenPosition> {
    pub fn open_positions<P: DataProvider + 'static>(
        provider: Arc<P>,
        updates: UpdateSender,
        activation: u64,
    ) -> Self {
        let request = InFlight::spawn(
            updates,
            activation,
            async move { provider.get_open_positions().await },
            Payload::OpenPositions,
        );
        Self::loading("Open Positions", request)
    }
}

impl TableView<ClosedPosition> {
    pub fn closed_positions<P: DataProvider + 'static>(
        provider: Arc<P>,
        updates: UpdateSender,
        activation: u64,
    ) -> Self {
        let request = InFlight::spawn(
            updates,
            activation,
            async move { provider.get_closed_positions().await },
            Payload::ClosedPositions,
        );
        Self::loading("Closed Positions", request)
    }
}

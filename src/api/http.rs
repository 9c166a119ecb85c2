use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::{multipart::Form, Client};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::api::endpoints;
use crate::api::provider::DataProvider;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::*;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Transaction added successfully!";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Error adding transaction.";

/// Talks to the portfolio backend over plain HTTP.
pub struct HttpProvider {
    client: Client,
    base_url: Url,
}

impl HttpProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        info!("🚀 Initializing HttpProvider with API: {}", config.api_base_url);

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Self::with_client(client, &config.api_base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Endpoints are joined as relative paths, so the base must end in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| ApiError::Endpoint(format!("{}: {}", endpoint, e)))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.endpoint_url(endpoint)?;
        debug!("📡 GET {}", url);

        let response = self.client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                error!("❌ HTTP request failed: {}", e);
                ApiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("❌ GET {} failed with status {}", url, status);
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let result = serde_json::from_slice(&body).map_err(|e| {
            warn!("⚠️ Unexpected payload from {}: {}", url, e);
            ApiError::Parse(e.to_string())
        })?;

        debug!("✅ GET {} ok ({} bytes)", url, body.len());
        Ok(result)
    }
}

fn reports_success(message: &str) -> bool {
    message.to_lowercase().contains("success")
}

#[async_trait]
impl DataProvider for HttpProvider {
    async fn get_open_positions(&self) -> Result<Vec<OpenPosition>, ApiError> {
        info!("📊 Fetching open positions");
        self.get_json(endpoints::OPEN_POSITIONS).await
    }

    async fn get_closed_positions(&self) -> Result<Vec<ClosedPosition>, ApiError> {
        info!("📊 Fetching closed positions");
        self.get_json(endpoints::CLOSED_POSITIONS).await
    }

    async fn get_portfolio_values(&self) -> Result<Vec<PortfolioValueRow>, ApiError> {
        info!("📊 Fetching portfolio values");
        self.get_json(endpoints::PORTFOLIO_VALUE).await
    }

    async fn get_advanced_metrics(&self) -> Result<AdvancedMetrics, ApiError> {
        self.get_json(endpoints::ADVANCED_METRICS).await
    }

    async fn get_maximum_drawdown(&self) -> Result<MaximumDrawdown, ApiError> {
        self.get_json(endpoints::MAXIMUM_DRAWDOWN).await
    }

    async fn get_portfolio_value_chart(&self) -> Result<PortfolioValueSeries, ApiError> {
        self.get_json(endpoints::CHART_PORTFOLIO_VALUE).await
    }

    async fn get_daily_pnl_chart(&self) -> Result<DailyPnlSeries, ApiError> {
        self.get_json(endpoints::CHART_DAILY_PNL).await
    }

    async fn get_asset_allocation_chart(&self) -> Result<AssetAllocation, ApiError> {
        self.get_json(endpoints::CHART_ASSET_ALLOCATION).await
    }

    async fn get_twr_vs_spy_chart(&self) -> Result<TwrSeries, ApiError> {
        self.get_json(endpoints::CHART_TWR_VS_SPY).await
    }

    async fn get_cumulative_return_chart(&self) -> Result<CumulativeReturnSeries, ApiError> {
        self.get_json(endpoints::CHART_CUMULATIVE_RETURN).await
    }

    async fn submit_transaction(&self, transaction: &NewTransaction) -> Result<String, ApiError> {
        let url = self.endpoint_url(endpoints::TRANSACTIONS)?;
        info!("📝 Submitting {} {} x{} to {}", transaction.kind, transaction.ticker, transaction.quantity, url);

        let form = transaction
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        let response = self.client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Transaction submission failed: {}", e);
                ApiError::Network(e.to_string())
            })?;

        let status = response.status();
        let message = response
            .json::<TransactionMessage>()
            .await
            .ok()
            .and_then(|body| body.message);

        if status.is_success() {
            match message {
                None => {
                    info!("✅ Transaction accepted");
                    Ok(DEFAULT_SUCCESS_MESSAGE.to_string())
                }
                Some(message) if reports_success(&message) => {
                    info!("✅ Transaction accepted: {}", message);
                    Ok(message)
                }
                // The backend answers 200 on its own failure paths; only the message tells.
                Some(message) => {
                    warn!("⚠️ Transaction refused despite status {}: {}", status, message);
                    Err(ApiError::Rejected { status: status.as_u16(), message })
                }
            }
        } else {
            let message = message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            warn!("⚠️ Transaction rejected with status {}: {}", status, message);
            Err(ApiError::Rejected { status: status.as_u16(), message })
        }
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Multipart, State},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Received = Arc<Mutex<Vec<(String, String)>>>;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider(base_url: &str) -> HttpProvider {
        HttpProvider::with_client(Client::new(), base_url).unwrap()
    }

    fn sample_transaction() -> NewTransaction {
        NewTransaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            ticker: "AAPL".to_string(),
            kind: TransactionType::Buy,
            quantity: 10,
            price: dec!(50.00),
            commission: dec!(1.50),
        }
    }

    async fn record_fields(received: &Received, mut multipart: Multipart) {
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap().to_string();
            let value = field.text().await.unwrap();
            received.lock().unwrap().push((name, value));
        }
    }

    #[tokio::test]
    async fn fetches_rows_from_the_data_endpoints() {
        let router = Router::new().route(
            "/data/open_positions",
            get(|| async {
                Json(json!([{
                    "Symbol": "MSFT", "Portfolio %": 100.0, "Quantity": 3, "Price": 400.0,
                    "Cost": 1000.0, "Value": 1200.0, "P&L": 200.0
                }]))
            }),
        );
        let base = spawn_backend(router).await;

        let rows = provider(&base).get_open_positions().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "MSFT");
        assert_eq!(rows[0].value, 1200.0);
    }

    #[tokio::test]
    async fn honours_a_path_prefix_in_the_base_url() {
        let router = Router::new().route(
            "/api/data/metrics/maximum_drawdown",
            get(|| async { Json(json!({ "maximum_drawdown": 12.34 })) }),
        );
        let base = spawn_backend(router).await;

        let mdd = provider(&format!("{}/api", base)).get_maximum_drawdown().await.unwrap();
        assert_eq!(mdd.maximum_drawdown, Some(12.34));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let router = Router::new().route(
            "/data/closed_positions",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_backend(router).await;

        let err = provider(&base).get_closed_positions().await.unwrap_err();
        assert_eq!(err, ApiError::Status(500));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let router = Router::new().route(
            "/data/portfolio_value",
            get(|| async { Json(json!({ "not": "an array" })) }),
        );
        let base = spawn_backend(router).await;

        let err = provider(&base).get_portfolio_values().await.unwrap_err();
        assert!(err.is_malformed_payload());
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{}", addr)).get_open_positions().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn transaction_is_posted_as_one_multipart_form() {
        let received = Received::default();
        let router = Router::new()
            .route(
                "/transactions",
                post(|State(received): State<Received>, multipart: Multipart| async move {
                    record_fields(&received, multipart).await;
                    Json(json!({ "message": "Transaction added successfully!" }))
                }),
            )
            .with_state(received.clone());
        let base = spawn_backend(router).await;

        let message = provider(&base).submit_transaction(&sample_transaction()).await.unwrap();
        assert_eq!(message, "Transaction added successfully!");

        let fields = received.lock().unwrap().clone();
        assert_eq!(
            fields,
            vec![
                ("date".to_string(), "2024-01-05".to_string()),
                ("ticker".to_string(), "AAPL".to_string()),
                ("type".to_string(), "Buy".to_string()),
                ("quantity".to_string(), "10".to_string()),
                ("price".to_string(), "50.00".to_string()),
                ("commission".to_string(), "1.50".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn rejected_transaction_carries_the_server_message() {
        let router = Router::new().route(
            "/transactions",
            post(|_multipart: Multipart| async {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": "Invalid ticker" })))
            }),
        );
        let base = spawn_backend(router).await;

        let err = provider(&base).submit_transaction(&sample_transaction()).await.unwrap_err();
        assert_eq!(err, ApiError::Rejected { status: 400, message: "Invalid ticker".to_string() });
    }

    #[tokio::test]
    async fn ok_status_with_an_error_message_is_a_rejection() {
        let router = Router::new().route(
            "/transactions",
            post(|_multipart: Multipart| async {
                Json(json!({ "message": "Error adding transaction: no such ticker" }))
            }),
        );
        let base = spawn_backend(router).await;

        let err = provider(&base).submit_transaction(&sample_transaction()).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 200,
                message: "Error adding transaction: no such ticker".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn form_keeps_its_input_when_an_ok_response_reports_an_error() {
        use crate::view::form::{FormStatus, TransactionForm};
        use crate::view::Payload;
        use tokio::sync::mpsc;

        let router = Router::new().route(
            "/transactions",
            post(|_multipart: Multipart| async {
                Json(json!({ "message": "Error adding transaction: no such ticker" }))
            }),
        );
        let base = spawn_backend(router).await;

        let mut form = TransactionForm::new();
        form.date = "2024-01-05".to_string();
        form.ticker = "AAPL".to_string();
        form.quantity = "10".to_string();
        form.price = "50.00".to_string();
        let (tx, mut rx) = mpsc::unbounded_channel();
        form.submit(Arc::new(provider(&base)), tx, 1);

        match rx.recv().await.expect("update").payload {
            Payload::Submitted(result) => form.apply(result),
            other => panic!("unexpected payload {:?}", other),
        }
        assert_eq!(
            form.status,
            Some(FormStatus::Error("Error adding transaction: no such ticker".to_string()))
        );
        assert_eq!(form.ticker, "AAPL");
        assert_eq!(form.quantity, "10");
    }

    #[tokio::test]
    async fn ok_status_without_a_message_uses_the_default() {
        let router = Router::new().route(
            "/transactions",
            post(|_multipart: Multipart| async { Json(json!({})) }),
        );
        let base = spawn_backend(router).await;

        let message = provider(&base).submit_transaction(&sample_transaction()).await.unwrap();
        assert_eq!(message, DEFAULT_SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn missing_messages_fall_back_to_defaults() {
        let router = Router::new().route(
            "/transactions",
            post(|_multipart: Multipart| async { (StatusCode::UNPROCESSABLE_ENTITY, Json(Value::Null)) }),
        );
        let base = spawn_backend(router).await;

        let err = provider(&base).submit_transaction(&sample_transaction()).await.unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_FAILURE_MESSAGE);
    }
}

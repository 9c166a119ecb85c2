use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::api::provider::DataProvider;
use crate::error::ApiError;
use crate::model::{NewTransaction, TransactionType};
use crate::view::{InFlight, Payload, UpdateSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Ticker,
    Type,
    Quantity,
    Price,
    Commission,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[
            FormField::Date,
            FormField::Ticker,
            FormField::Type,
            FormField::Quantity,
            FormField::Price,
            FormField::Commission,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Date => "Date",
            FormField::Ticker => "Ticker",
            FormField::Type => "Type",
            FormField::Quantity => "Quantity",
            FormField::Price => "Price",
            FormField::Commission => "Commission",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            FormField::Date => "YYYY-MM-DD",
            FormField::Ticker => "e.g. AAPL",
            FormField::Type => "←/→ to toggle",
            FormField::Quantity => "whole number, at least 1",
            FormField::Price => "at least 0.01, step 0.01",
            FormField::Commission => "at least 0, step 0.01",
        }
    }

    fn index(self) -> usize {
        FormField::all().iter().position(|&f| f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        let fields = FormField::all();
        fields[(self.index() + 1) % fields.len()]
    }

    fn previous(self) -> Self {
        let fields = FormField::all();
        fields[(self.index() + fields.len() - 1) % fields.len()]
    }
}

/// Input constraints a browser form would enforce before submitting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Date must be a valid YYYY-MM-DD date")]
    InvalidDate,
    #[error("Quantity must be a whole number of at least 1")]
    InvalidQuantity,
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: &'static str },
    #[error("{0} accepts at most two decimal places")]
    TooPrecise(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormStatus {
    Submitting,
    Success(String),
    Error(String),
}

impl FormStatus {
    pub fn text(&self) -> &str {
        match self {
            FormStatus::Submitting => "Submitting...",
            FormStatus::Success(message) | FormStatus::Error(message) => message,
        }
    }
}

#[derive(Debug)]
pub struct TransactionForm {
    pub date: String,
    pub ticker: String,
    pub kind: TransactionType,
    pub quantity: String,
    pub price: String,
    pub commission: String,
    pub focus: FormField,
    pub status: Option<FormStatus>,
    request: Option<InFlight>,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            date: String::new(),
            ticker: String::new(),
            kind: TransactionType::Buy,
            quantity: String::new(),
            price: String::new(),
            commission: "0".to_string(),
            focus: FormField::Date,
            status: None,
            request: None,
        }
    }
}

impl TransactionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::Ticker => &self.ticker,
            FormField::Type => self.kind.as_str(),
            FormField::Quantity => &self.quantity,
            FormField::Price => &self.price,
            FormField::Commission => &self.commission,
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Date => Some(&mut self.date),
            FormField::Ticker => Some(&mut self.ticker),
            FormField::Type => None,
            FormField::Quantity => Some(&mut self.quantity),
            FormField::Price => Some(&mut self.price),
            FormField::Commission => Some(&mut self.commission),
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn input(&mut self, c: char) {
        let field = self.focus;
        if field == FormField::Type {
            if c == ' ' {
                self.toggle_type();
            }
            return;
        }
        let accepts = match field {
            FormField::Date => c.is_ascii_digit() || c == '-',
            FormField::Quantity => c.is_ascii_digit(),
            FormField::Price | FormField::Commission => c.is_ascii_digit() || c == '.',
            FormField::Ticker => !c.is_control(),
            FormField::Type => false,
        };
        if accepts {
            if let Some(text) = self.text_mut(field) {
                text.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut(self.focus) {
            text.pop();
        }
    }

    pub fn toggle_type(&mut self) {
        if self.focus == FormField::Type {
            self.kind = self.kind.toggled();
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.request.is_some()
    }

    /// Resets every field to its default, keeping the status message.
    pub fn reset(&mut self) {
        let status = self.status.take();
        *self = Self { status, ..Self::default() };
    }

    pub fn validate(&self) -> Result<NewTransaction, FormError> {
        let date = required(&self.date, "Date")?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| FormError::InvalidDate)?;

        let ticker = required(&self.ticker, "Ticker")?.to_string();

        let quantity: u32 = required(&self.quantity, "Quantity")?
            .parse()
            .map_err(|_| FormError::InvalidQuantity)?;
        if quantity < 1 {
            return Err(FormError::InvalidQuantity);
        }

        let price = money(&self.price, "Price")?;
        if price < Decimal::new(1, 2) {
            return Err(FormError::BelowMinimum { field: "Price", min: "0.01" });
        }

        let commission = money(&self.commission, "Commission")?;
        if commission < Decimal::ZERO {
            return Err(FormError::BelowMinimum { field: "Commission", min: "0" });
        }

        Ok(NewTransaction {
            date,
            ticker,
            kind: self.kind,
            quantity,
            price,
            commission,
        })
    }

    /// Validates and posts the form. Nothing is sent when a constraint fails.
    pub fn submit<P: DataProvider + 'static>(&mut self, provider: Arc<P>, updates: UpdateSender, activation: u64) {
        if self.is_submitting() {
            return;
        }

        let transaction = match self.validate() {
            Ok(transaction) => transaction,
            Err(e) => {
                warn!("⚠️ Transaction form blocked: {}", e);
                self.status = Some(FormStatus::Error(e.to_string()));
                return;
            }
        };

        info!("📝 Submitting transaction for {}", transaction.ticker);
        self.status = Some(FormStatus::Submitting);
        self.request = Some(InFlight::spawn(
            updates,
            activation,
            async move { provider.submit_transaction(&transaction).await },
            Payload::Submitted,
        ));
    }

    pub fn apply(&mut self, result: Result<String, ApiError>) {
        self.request = None;
        match result {
            Ok(message) => {
                self.status = Some(FormStatus::Success(message));
                self.reset();
            }
            Err(ApiError::Rejected { message, .. }) => {
                self.status = Some(FormStatus::Error(message));
            }
            Err(e) => {
                self.status = Some(FormStatus::Error(format!("Network error: {}", e)));
            }
        }
    }
}

/// Like an HTML `required` input: only an empty value is missing.
fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, FormError> {
    if value.is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(value)
}

fn money(value: &str, field: &'static str) -> Result<Decimal, FormError> {
    let amount = Decimal::from_str(required(value, field)?).map_err(|_| FormError::NotANumber(field))?;
    if amount.normalize().scale() > 2 {
        return Err(FormError::TooPrecise(field));
    }
    Ok(amount)
}

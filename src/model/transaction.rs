use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[default]
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Buy => "Buy",
            TransactionType::Sell => "Sell",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TransactionType::Buy => TransactionType::Sell,
            TransactionType::Sell => TransactionType::Buy,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A buy or sell that passed the form's input constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub ticker: String,
    pub kind: TransactionType,
    pub quantity: u32,
    pub price: Decimal,
    pub commission: Decimal,
}

impl NewTransaction {
    /// Field name and wire value, in the order the form posts them.
    pub fn form_fields(&self) -> [(&'static str, String); 6] {
        [
            ("date", self.date.format("%Y-%m-%d").to_string()),
            ("ticker", self.ticker.clone()),
            ("type", self.kind.to_string()),
            ("quantity", self.quantity.to_string()),
            ("price", self.price.to_string()),
            ("commission", self.commission.to_string()),
        ]
    }
}

/// Body of the `/transactions` response. Both outcomes carry a message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionMessage {
    #[serde(default)]
    pub message: Option<String>,
}

//! Bank-transfer payment models
//!
//! The gateway posts one event per transfer hitting the shop's account. The
//! payload is normalized into a [`PaymentTransaction`] before it is stored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{lenient, normalize_label, parse_date_value, DateValue};
use crate::validation::validate_transaction_id;

/// Inbound payment-gateway event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWebhookPayload {
    /// Gateway transaction id, numeric or string
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    /// Older gateway versions send the id under this key
    #[serde(default, deserialize_with = "lenient::text")]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub gateway: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub transaction_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub account_number: Option<String>,
    /// Payment code the gateway matched in the transfer content
    #[serde(default, deserialize_with = "lenient::text")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub transfer_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub transfer_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub accumulated: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sub_account: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reference_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
}

impl PaymentWebhookPayload {
    /// The trimmed transaction id, `id` first, then `transactionId`
    pub fn identifier(&self) -> Option<&str> {
        [self.id.as_deref(), self.transaction_id.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|id| !id.is_empty())
    }
}

/// Direction of a transfer relative to the shop's account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    In,
    Out,
    Unknown,
}

impl TransferDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferDirection::In => "in",
            TransferDirection::Out => "out",
            TransferDirection::Unknown => "unknown",
        }
    }

    fn parse(raw: Option<&str>) -> Self {
        match raw.map(normalize_label).as_deref() {
            Some("in") | Some("credit") => TransferDirection::In,
            Some("out") | Some("debit") => TransferDirection::Out,
            _ => TransferDirection::Unknown,
        }
    }
}

/// A normalized transaction record ready to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub transaction_id: String,
    pub gateway: Option<String>,
    /// Gateway-reported time; absent when missing or unparseable
    pub transaction_date: Option<DateTime<Utc>>,
    pub account_number: Option<String>,
    pub amount: Decimal,
    pub direction: TransferDirection,
    pub order_code: Option<String>,
    pub content: Option<String>,
    pub reference_code: Option<String>,
    pub description: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// Reasons a webhook payload cannot be recorded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Missing transaction id")]
    MissingTransactionId,

    #[error("Invalid transaction id: {0}")]
    InvalidTransactionId(&'static str),
}

impl PaymentTransaction {
    /// Normalize a webhook payload. Only the transaction id is required.
    pub fn from_webhook(
        payload: &PaymentWebhookPayload,
        received_at: DateTime<Utc>,
    ) -> Result<Self, PaymentError> {
        let transaction_id = payload
            .identifier()
            .ok_or(PaymentError::MissingTransactionId)?;
        validate_transaction_id(transaction_id).map_err(PaymentError::InvalidTransactionId)?;

        let transaction_date = payload
            .transaction_date
            .as_deref()
            .and_then(|raw| parse_date_value(&DateValue::from(raw)));

        Ok(Self {
            transaction_id: transaction_id.to_string(),
            gateway: non_blank(&payload.gateway),
            transaction_date,
            account_number: non_blank(&payload.account_number),
            amount: payload.transfer_amount.unwrap_or(Decimal::ZERO),
            direction: TransferDirection::parse(payload.transfer_type.as_deref()),
            order_code: non_blank(&payload.code),
            content: non_blank(&payload.content),
            reference_code: non_blank(&payload.reference_code),
            description: non_blank(&payload.description),
            received_at,
        })
    }

    pub fn is_incoming(&self) -> bool {
        self.direction == TransferDirection::In
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

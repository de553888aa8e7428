//! Customer order models
//!
//! Orders are owned by the order-management workflow; reports only read them.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{label_from_json, lenient, normalize_label, parse_date_value_at, DateValue};

/// A customer order as stored in the document store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: String,
    /// Human-readable number printed on receipts
    #[serde(default, deserialize_with = "lenient::text")]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_customer")]
    pub customer: Option<Customer>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<OrderItem>,
    /// Authoritative amount; line items are not re-summed
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    /// Absent when the record carries no readable payment status
    #[serde(default, deserialize_with = "lenient_payment_status")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub order_date: Option<DateValue>,
    /// Older records carry the order date under `date`
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<DateValue>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub delivery_date: Option<DateValue>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub delivery_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub note: Option<String>,
}

impl Order {
    /// `orderNumber` when present, otherwise the document id
    pub fn display_number(&self) -> &str {
        self.order_number
            .as_deref()
            .map(str::trim)
            .filter(|number| !number.is_empty())
            .unwrap_or(&self.id)
    }

    /// When the order was placed, preferring `orderDate` over the legacy `date`.
    /// Dates stored without an offset are read on the wall clock at `offset`.
    pub fn placed_at(&self, offset: &FixedOffset) -> Option<DateTime<Utc>> {
        self.order_date
            .as_ref()
            .and_then(|value| parse_date_value_at(value, offset))
            .or_else(|| {
                self.date
                    .as_ref()
                    .and_then(|value| parse_date_value_at(value, offset))
            })
    }

    pub fn delivery_at(&self, offset: &FixedOffset) -> Option<DateTime<Utc>> {
        self.delivery_date
            .as_ref()
            .and_then(|value| parse_date_value_at(value, offset))
    }

    /// Only an explicit unpaid status counts
    pub fn is_unpaid(&self) -> bool {
        self.payment_status == Some(PaymentStatus::Unpaid)
    }

    /// Delivered and cancelled orders need no further action
    pub fn is_open(&self) -> bool {
        !matches!(self.status, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer.as_ref().and_then(|c| c.name.as_deref())
    }

    pub fn customer_phone(&self) -> Option<&str> {
        self.customer.as_ref().and_then(|c| c.phone.as_deref())
    }

    pub fn customer_address(&self) -> Option<&str> {
        self.customer.as_ref().and_then(|c| c.address.as_deref())
    }
}

fn lenient_customer<'de, D>(deserializer: D) -> Result<Option<Customer>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

fn lenient_payment_status<'de, D>(deserializer: D) -> Result<Option<PaymentStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(label_from_json).map(PaymentStatus::from))
}

/// Items that fail to decode are dropped rather than failing the order
fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Customer contact details copied onto the order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
}

/// A line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub price: Decimal,
}

/// Fulfilment status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
    Unknown(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    pub fn label_vi(&self) -> &str {
        match self {
            OrderStatus::Pending => "Chờ xử lý",
            OrderStatus::Processing => "Đang xử lý",
            OrderStatus::Shipped => "Đang giao",
            OrderStatus::Delivered => "Đã giao",
            OrderStatus::Cancelled => "Đã hủy",
            OrderStatus::Returned => "Đã trả hàng",
            OrderStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match normalize_label(&raw).as_str() {
            "pending" => OrderStatus::Pending,
            "processing" => OrderStatus::Processing,
            "shipped" | "shipping" => OrderStatus::Shipped,
            "delivered" => OrderStatus::Delivered,
            "cancelled" | "canceled" => OrderStatus::Cancelled,
            "returned" => OrderStatus::Returned,
            _ => OrderStatus::Unknown(raw),
        }
    }
}

impl From<Value> for OrderStatus {
    fn from(value: Value) -> Self {
        label_from_json(value).map(Self::from).unwrap_or_default()
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Payment status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Refunded,
    Unknown(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Unknown(raw) => raw,
        }
    }

    pub fn label_vi(&self) -> &str {
        match self {
            PaymentStatus::Paid => "Đã thanh toán",
            PaymentStatus::Unpaid => "Chưa thanh toán",
            PaymentStatus::Refunded => "Đã hoàn tiền",
            PaymentStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match normalize_label(&raw).as_str() {
            "paid" => PaymentStatus::Paid,
            "unpaid" => PaymentStatus::Unpaid,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::Unknown(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        value.as_str().to_string()
    }
}

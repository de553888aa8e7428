//! Notification message compiler
//!
//! Turns order and ingredient records into the Vietnamese text reports the
//! shop receives in its chat channel. Selection and rendering are pure and
//! deterministic; delivery is the caller's business.
//!
//! Every report opens with a title line and a count/amount summary, then one
//! numbered block per order. An empty selection renders a fixed sentence.

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::{
    field_or, format_currency, format_date, format_quantity, or_not_available, NOT_AVAILABLE,
};
use crate::models::{Ingredient, Order, PaymentStatus};
use crate::stock::StockSummary;
use crate::types::{calendar_date, vietnam_offset};

const UNPAID_TITLE: &str = "💰 ĐƠN HÀNG CHƯA THANH TOÁN";
const PENDING_TITLE: &str = "📦 ĐƠN HÀNG ĐANG CHỜ XỬ LÝ";
const DELIVERY_DUE_TITLE: &str = "🚚 ĐƠN HÀNG CẦN GIAO NGÀY";
const CUSTOM_TITLE: &str = "📢 THÔNG BÁO";
const PAYMENT_RECEIVED_TITLE: &str = "✅ ĐÃ NHẬN THANH TOÁN";
const OUT_OF_STOCK_TITLE: &str = "⚠️ NGUYÊN LIỆU HẾT HÀNG";

pub const NO_UNPAID_ORDERS: &str = "✅ Không có đơn hàng nào chưa thanh toán.";
pub const NO_PENDING_ORDERS: &str = "✅ Không có đơn hàng nào đang chờ xử lý.";
pub const EMPTY_CUSTOM_MESSAGE: &str = "Không có nội dung thông báo.";
pub const ALL_IN_STOCK: &str = "✅ Tất cả nguyên liệu đều còn hàng.";

const INDENT: &str = "   ";

/// Which report to build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportKind {
    Unpaid,
    Pending,
    /// Orders to deliver on `date`
    DeliveryDue { date: NaiveDate },
    /// Free text, no order selection
    Custom { content: String },
}

impl ReportKind {
    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::Unpaid => "unpaid",
            ReportKind::Pending => "pending",
            ReportKind::DeliveryDue { .. } => "delivery_due",
            ReportKind::Custom { .. } => "custom",
        }
    }
}

/// A report kind plus the orders to scan
#[derive(Debug, Clone, Copy)]
pub struct NotificationReportRequest<'a> {
    pub kind: &'a ReportKind,
    pub orders: &'a [Order],
}

impl<'a> NotificationReportRequest<'a> {
    pub fn new(kind: &'a ReportKind, orders: &'a [Order]) -> Self {
        Self { kind, orders }
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Orders whose payment status is unpaid
pub fn select_unpaid(orders: &[Order]) -> Vec<&Order> {
    orders
        .iter()
        .filter(|order| order.is_unpaid())
        .collect()
}

/// Orders that are neither delivered nor cancelled
pub fn select_pending(orders: &[Order]) -> Vec<&Order> {
    orders.iter().filter(|order| order.is_open()).collect()
}

/// Open orders whose delivery date falls on `date` at `offset`.
///
/// Time of day is ignored. Orders without a parseable delivery date never
/// match.
pub fn select_delivery_due<'a>(
    orders: &'a [Order],
    date: NaiveDate,
    offset: &FixedOffset,
) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|order| order.is_open())
        .filter(|order| {
            order
                .delivery_at(offset)
                .map(|at| calendar_date(at, offset) == date)
                .unwrap_or(false)
        })
        .collect()
}

/// Oldest order first; orders without a date go last
fn sort_by_placed(orders: &mut [&Order], offset: &FixedOffset) {
    orders.sort_by_key(|order| {
        let placed = order.placed_at(offset);
        (placed.is_none(), placed)
    });
}

/// Sort key for a delivery slot: clock times first in time order, then other
/// text, then blank slots
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SlotKey {
    Time(NaiveTime),
    Text(String),
    Blank,
}

impl SlotKey {
    fn of(slot: Option<&str>) -> Self {
        match slot.map(str::trim).filter(|slot| !slot.is_empty()) {
            None => SlotKey::Blank,
            Some(slot) => slot_start(slot)
                .map(SlotKey::Time)
                .unwrap_or_else(|| SlotKey::Text(slot.to_string())),
        }
    }
}

/// Leading clock time of a slot: `9:00`, `14:30 - 16:00`, `9h`, `9h30`
fn slot_start(slot: &str) -> Option<NaiveTime> {
    let head: String = slot
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, ':' | 'h' | 'H'))
        .collect();
    let (hours, minutes) = head.split_once(|c| matches!(c, ':' | 'h' | 'H'))?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = match minutes {
        "" => 0,
        minutes if minutes.len() == 2 => minutes.parse().ok()?,
        _ => return None,
    };
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// By delivery time slot, then delivery instant
fn sort_by_delivery_slot(orders: &mut [&Order], offset: &FixedOffset) {
    orders.sort_by_key(|order| {
        (
            SlotKey::of(order.delivery_time.as_deref()),
            order.delivery_at(offset),
        )
    });
}

fn sum_totals(orders: &[&Order]) -> Decimal {
    orders
        .iter()
        .fold(Decimal::ZERO, |acc, order| acc.saturating_add(order.total))
}

// ============================================================================
// Rendering
// ============================================================================

/// How much of an order a block shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockDetail {
    Basic,
    WithStatus,
    Delivery,
}

/// Renders reports with dates read on one fixed wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageCompiler {
    offset: FixedOffset,
}

impl Default for MessageCompiler {
    fn default() -> Self {
        Self::new(vietnam_offset())
    }
}

impl MessageCompiler {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Render the report a request asks for
    pub fn compile(&self, request: &NotificationReportRequest<'_>) -> String {
        match request.kind {
            ReportKind::Unpaid => self.format_unpaid_orders_message(request.orders),
            ReportKind::Pending => self.format_pending_orders_message(request.orders),
            ReportKind::DeliveryDue { date } => {
                self.format_delivery_due_message(request.orders, *date)
            }
            ReportKind::Custom { content } => self.format_custom_message(content),
        }
    }

    pub fn format_unpaid_orders_message(&self, orders: &[Order]) -> String {
        let mut selected = select_unpaid(orders);
        if selected.is_empty() {
            return NO_UNPAID_ORDERS.to_string();
        }
        sort_by_placed(&mut selected, &self.offset);
        self.render_orders(UNPAID_TITLE, &selected, BlockDetail::Basic)
    }

    pub fn format_pending_orders_message(&self, orders: &[Order]) -> String {
        let mut selected = select_pending(orders);
        if selected.is_empty() {
            return NO_PENDING_ORDERS.to_string();
        }
        sort_by_placed(&mut selected, &self.offset);
        self.render_orders(PENDING_TITLE, &selected, BlockDetail::WithStatus)
    }

    /// `date` is the caller's "today" or any other target day
    pub fn format_delivery_due_message(&self, orders: &[Order], date: NaiveDate) -> String {
        let day = date.format("%d/%m/%Y").to_string();
        let mut selected = select_delivery_due(orders, date, &self.offset);
        if selected.is_empty() {
            return format!("✅ Không có đơn hàng nào cần giao ngày {}.", day);
        }
        sort_by_delivery_slot(&mut selected, &self.offset);
        let title = format!("{} {}", DELIVERY_DUE_TITLE, day);
        self.render_orders(&title, &selected, BlockDetail::Delivery)
    }

    /// Title line, blank line, then `content` verbatim
    pub fn format_custom_message(&self, content: &str) -> String {
        if content.trim().is_empty() {
            return EMPTY_CUSTOM_MESSAGE.to_string();
        }
        format!("{}\n\n{}", CUSTOM_TITLE, content)
    }

    pub fn format_payment_received_message(
        &self,
        order_number: Option<&str>,
        amount: Decimal,
    ) -> String {
        let number = match field_or(order_number, "") {
            "" => NOT_AVAILABLE.to_string(),
            number => format!("#{}", number),
        };
        [
            PAYMENT_RECEIVED_TITLE.to_string(),
            format!("Đơn hàng: {}", number),
            format!("Số tiền: {}", format_currency(amount)),
        ]
        .join("\n")
    }

    /// Ingredients whose derived stock is zero or below
    pub fn format_out_of_stock_message(&self, ingredients: &[Ingredient]) -> String {
        let out_of_stock: Vec<(&Ingredient, StockSummary)> = ingredients
            .iter()
            .map(|ingredient| (ingredient, ingredient.stock()))
            .filter(|(_, stock)| stock.is_out_of_stock)
            .collect();
        if out_of_stock.is_empty() {
            return ALL_IN_STOCK.to_string();
        }

        let mut lines = vec![
            OUT_OF_STOCK_TITLE.to_string(),
            format!("Tổng: {} nguyên liệu", out_of_stock.len()),
        ];
        for (index, (ingredient, stock)) in out_of_stock.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!(
                "{}. {} ({})",
                index + 1,
                or_not_available(Some(ingredient.name.as_str())),
                ingredient.ingredient_type.label_vi()
            ));
            lines.push(format!(
                "{}Tồn kho: {} {}",
                INDENT,
                format_quantity(stock.current_quantity),
                ingredient.unit.label_vi()
            ));
            lines.push(format!("{}Số lần nhập: {}", INDENT, stock.import_count));
        }
        lines.join("\n")
    }

    fn render_orders(&self, title: &str, orders: &[&Order], detail: BlockDetail) -> String {
        let mut lines = vec![
            title.to_string(),
            format!(
                "Tổng: {} đơn | {}",
                orders.len(),
                format_currency(sum_totals(orders))
            ),
        ];
        for (index, order) in orders.iter().enumerate() {
            lines.push(String::new());
            self.render_order_block(&mut lines, index + 1, order, detail);
        }
        lines.join("\n")
    }

    fn render_order_block(
        &self,
        lines: &mut Vec<String>,
        position: usize,
        order: &Order,
        detail: BlockDetail,
    ) {
        let placed = order
            .placed_at(&self.offset)
            .map(|at| format_date(at, &self.offset));

        lines.push(format!(
            "{}. Đơn #{}",
            position,
            or_not_available(Some(order.display_number()))
        ));
        lines.push(format!("{}Khách hàng: {}", INDENT, or_not_available(order.customer_name())));
        lines.push(format!("{}SĐT: {}", INDENT, or_not_available(order.customer_phone())));
        lines.push(format!("{}Ngày đặt: {}", INDENT, or_not_available(placed.as_deref())));
        lines.push(format!("{}Tổng tiền: {}", INDENT, format_currency(order.total)));

        if detail == BlockDetail::Basic {
            return;
        }
        lines.push(format!("{}Trạng thái: {}", INDENT, order.status.label_vi()));
        let payment = order.payment_status.as_ref().map(PaymentStatus::label_vi);
        lines.push(format!("{}Thanh toán: {}", INDENT, or_not_available(payment)));

        if detail != BlockDetail::Delivery {
            return;
        }
        lines.push(format!(
            "{}Giờ giao: {}",
            INDENT,
            or_not_available(order.delivery_time.as_deref())
        ));
        lines.push(format!("{}Địa chỉ: {}", INDENT, or_not_available(order.customer_address())));
        if !order.items.is_empty() {
            lines.push(format!("{}Sản phẩm:", INDENT));
            for item in &order.items {
                lines.push(format!(
                    "{}  - {} x {}",
                    INDENT,
                    or_not_available(item.name.as_deref()),
                    format_quantity(item.quantity)
                ));
            }
        }
        if let Some(note) = order.note.as_deref().filter(|note| !note.trim().is_empty()) {
            lines.push(format!("{}Ghi chú: {}", INDENT, note.trim()));
        }
    }
}

//! WebAssembly module for the bakery back-office
//!
//! Lets the dashboard compute the same figures the server does:
//! - Ingredient stock summaries
//! - Report previews from locally cached orders
//! - VND and quantity formatting
//! - Input validation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{format_currency, format_quantity, MessageCompiler, NotificationReportRequest, ReportKind};

fn to_js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn parse_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn compiler_for(utc_offset_hours: i32) -> Result<MessageCompiler, String> {
    offset_from_hours(utc_offset_hours)
        .map(MessageCompiler::new)
        .ok_or_else(|| format!("UTC offset out of range: {}", utc_offset_hours))
}

// ============================================================================
// Stock
// ============================================================================

fn stock_summary(ingredient_json: &str) -> Result<String, String> {
    let ingredient: Ingredient = serde_json::from_str(ingredient_json)
        .map_err(|e| format!("Invalid ingredient JSON: {}", e))?;
    serde_json::to_string(&ingredient.stock()).map_err(|e| e.to_string())
}

/// Stock summary of one ingredient document, as JSON
#[wasm_bindgen]
pub fn calculate_stock_summary(ingredient_json: &str) -> Result<String, JsValue> {
    stock_summary(ingredient_json).map_err(to_js_error)
}

/// Whether an ingredient document is at or below zero stock
#[wasm_bindgen]
pub fn is_ingredient_out_of_stock(ingredient_json: &str) -> Result<bool, JsValue> {
    let ingredient: Ingredient = serde_json::from_str(ingredient_json)
        .map_err(|e| to_js_error(format!("Invalid ingredient JSON: {}", e)))?;
    Ok(shared::is_out_of_stock(&ingredient))
}

// ============================================================================
// Reports
// ============================================================================

fn render_report(kind_json: &str, orders_json: &str, utc_offset_hours: i32) -> Result<String, String> {
    let kind: ReportKind =
        serde_json::from_str(kind_json).map_err(|e| format!("Invalid report kind: {}", e))?;
    let orders: Vec<Order> =
        serde_json::from_str(orders_json).map_err(|e| format!("Invalid orders JSON: {}", e))?;
    let compiler = compiler_for(utc_offset_hours)?;
    Ok(compiler.compile(&NotificationReportRequest::new(&kind, &orders)))
}

/// Render a report from cached orders.
///
/// `kind_json` is e.g. `{"kind":"delivery_due","date":"2024-03-15"}`; the caller
/// supplies the date, including "today".
#[wasm_bindgen]
pub fn render_report_preview(
    kind_json: &str,
    orders_json: &str,
    utc_offset_hours: i32,
) -> Result<String, JsValue> {
    render_report(kind_json, orders_json, utc_offset_hours).map_err(to_js_error)
}

fn render_out_of_stock(ingredients_json: &str, utc_offset_hours: i32) -> Result<String, String> {
    let ingredients: Vec<Ingredient> = serde_json::from_str(ingredients_json)
        .map_err(|e| format!("Invalid ingredients JSON: {}", e))?;
    Ok(compiler_for(utc_offset_hours)?.format_out_of_stock_message(&ingredients))
}

/// Render the out-of-stock alert from cached ingredients
#[wasm_bindgen]
pub fn render_out_of_stock_preview(
    ingredients_json: &str,
    utc_offset_hours: i32,
) -> Result<String, JsValue> {
    render_out_of_stock(ingredients_json, utc_offset_hours).map_err(to_js_error)
}

/// Payment-received message for an order number (empty for none)
#[wasm_bindgen]
pub fn render_payment_received(order_number: &str, amount: f64) -> String {
    MessageCompiler::default().format_payment_received_message(Some(order_number), parse_decimal(amount))
}

/// Today's date on the shop's wall clock, `YYYY-MM-DD`
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn shop_today(utc_offset_hours: i32) -> Result<String, JsValue> {
    let millis = js_sys::Date::now();
    let now = parse_date_value(&DateValue::Epoch(millis))
        .ok_or_else(|| to_js_error("Clock is out of range".to_string()))?;
    let offset = offset_from_hours(utc_offset_hours)
        .ok_or_else(|| to_js_error(format!("UTC offset out of range: {}", utc_offset_hours)))?;
    let today: NaiveDate = calendar_date(now, &offset);
    Ok(today.format("%Y-%m-%d").to_string())
}

/// Check that a `YYYY-MM-DD` string names a real calendar day
#[wasm_bindgen]
pub fn is_valid_report_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").is_ok()
}

// ============================================================================
// Formatting & Validation
// ============================================================================

/// VND amount, e.g. `150.000 ₫`
#[wasm_bindgen]
pub fn format_vnd(amount: f64) -> String {
    format_currency(parse_decimal(amount))
}

/// Quantity with vi-VN separators
#[wasm_bindgen]
pub fn format_ingredient_quantity(quantity: f64) -> String {
    format_quantity(parse_decimal(quantity))
}

/// Validate a customer phone number
#[wasm_bindgen]
pub fn is_valid_phone(phone: &str) -> bool {
    validate_vietnamese_phone(phone).is_ok()
}

/// Validate custom announcement text
#[wasm_bindgen]
pub fn is_valid_announcement(content: &str) -> bool {
    validate_custom_content(content).is_ok()
}

//! HTTP request handlers

pub mod health;
pub mod inventory;
pub mod notification;
pub mod payment_webhook;

pub use health::health_check;
pub use inventory::{get_ingredient, get_out_of_stock, list_ingredients};
pub use notification::{preview_report, send_report};
pub use payment_webhook::{handle_payment_webhook, method_not_allowed};

//! Shared types and pure computation for the bakery back-office
//!
//! This crate contains the data model, the stock derivation engine and the
//! notification message compiler. It performs no I/O and is used by the
//! backend server and, via WASM, by the browser UI.

pub mod format;
pub mod models;
pub mod notification;
pub mod stock;
pub mod types;
pub mod validation;

pub use format::*;
pub use models::*;
pub use notification::*;
pub use stock::*;
pub use types::*;
pub use validation::*;

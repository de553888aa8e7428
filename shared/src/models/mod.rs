//! Domain models for the bakery back-office

mod ingredient;
mod order;
mod payment;

pub use ingredient::*;
pub use order::*;
pub use payment::*;

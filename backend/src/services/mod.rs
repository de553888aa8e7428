//! Business logic services for the bakery back-office

pub mod ingredient;
pub mod notification;
pub mod order;
pub mod payment;

pub use ingredient::IngredientService;
pub use notification::NotificationService;
pub use order::OrderService;
pub use payment::PaymentService;

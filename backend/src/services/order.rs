//! Order reads for report compilation

use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{DocumentRow, Order};

/// Order service; orders are written by the ordering front end, never here
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Every order on record. Report selection happens in the compiler.
    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data
            FROM orders
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let total = rows.len();
        let orders: Vec<Order> = rows.into_iter().filter_map(DocumentRow::decode).collect();
        if orders.len() < total {
            tracing::warn!("Skipped {} undecodable orders", total - orders.len());
        }
        Ok(orders)
    }
}

//! Payment transaction recording
//!
//! Gateways retry webhooks until they see a 2xx, so recording is idempotent on
//! the gateway transaction id.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::PaymentTransaction;

/// Outcome of recording one webhook delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted,
    /// The gateway re-sent a transaction we already hold
    Duplicate,
}

/// Payment service for storing gateway transactions
#[derive(Clone)]
pub struct PaymentService {
    db: PgPool,
}

impl PaymentService {
    /// Create a new PaymentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Store a normalized transaction alongside the raw payload
    pub async fn record_transaction(
        &self,
        transaction: &PaymentTransaction,
        raw_payload: &Value,
    ) -> AppResult<RecordOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO payment_transactions (
                id, transaction_id, gateway, transaction_date, account_number,
                amount, direction, order_code, content, reference_code,
                description, raw_payload, received_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (transaction_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&transaction.transaction_id)
        .bind(&transaction.gateway)
        .bind(transaction.transaction_date)
        .bind(&transaction.account_number)
        .bind(transaction.amount)
        .bind(transaction.direction.as_str())
        .bind(&transaction.order_code)
        .bind(&transaction.content)
        .bind(&transaction.reference_code)
        .bind(&transaction.description)
        .bind(raw_payload)
        .bind(transaction.received_at)
        .execute(&self.db)
        .await?;

        let outcome = if result.rows_affected() == 0 {
            RecordOutcome::Duplicate
        } else {
            RecordOutcome::Inserted
        };
        tracing::info!(
            transaction_id = %transaction.transaction_id,
            outcome = ?outcome,
            "Recorded payment transaction"
        );
        Ok(outcome)
    }
}

//! HTTP handlers for the payment gateway webhook
//!
//! The gateway only looks at the status code and retries anything that is not
//! 2xx, so every outcome has a fixed JSON envelope.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::services::payment::RecordOutcome;
use crate::services::{NotificationService, PaymentService};
use crate::AppState;
use shared::{PaymentError, PaymentTransaction, PaymentWebhookPayload};

// ============================================================================
// Response Types
// ============================================================================

/// Body of a successful webhook call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAccepted {
    pub success: bool,
    pub message: String,
    pub transaction_id: String,
}

/// Body of a rejected or failed webhook call
#[derive(Debug, Serialize)]
pub struct WebhookFailure {
    pub success: bool,
    pub error: String,
}

/// A webhook outcome: status code plus its envelope
#[derive(Debug)]
pub enum WebhookResponse {
    Accepted(WebhookAccepted),
    Rejected(StatusCode, WebhookFailure),
}

impl WebhookResponse {
    fn accepted(transaction_id: String, outcome: RecordOutcome) -> Self {
        let message = match outcome {
            RecordOutcome::Inserted => "Transaction recorded",
            RecordOutcome::Duplicate => "Transaction already recorded",
        };
        WebhookResponse::Accepted(WebhookAccepted {
            success: true,
            message: message.to_string(),
            transaction_id,
        })
    }

    fn rejected(status: StatusCode, error: impl Into<String>) -> Self {
        WebhookResponse::Rejected(
            status,
            WebhookFailure {
                success: false,
                error: error.into(),
            },
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            WebhookResponse::Accepted(_) => StatusCode::OK,
            WebhookResponse::Rejected(status, _) => *status,
        }
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        match self {
            WebhookResponse::Accepted(body) => (StatusCode::OK, Json(body)).into_response(),
            WebhookResponse::Rejected(status, body) => (status, Json(body)).into_response(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Handle a payment gateway event
/// POST /webhook/payment
pub async fn handle_payment_webhook(State(state): State<AppState>, body: Bytes) -> WebhookResponse {
    let (transaction, raw) = match parse_payment(&body) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let service = PaymentService::new(state.db.clone());
    let outcome = match service.record_transaction(&transaction, &raw).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(
                transaction_id = %transaction.transaction_id,
                "Failed to record payment: {}",
                e
            );
            return WebhookResponse::rejected(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record transaction",
            );
        }
    };

    if outcome == RecordOutcome::Inserted && transaction.is_incoming() {
        let notifier =
            NotificationService::new(state.db.clone(), state.compiler, state.messenger.clone());
        notifier.notify_payment_received(&transaction).await;
    }

    WebhookResponse::accepted(transaction.transaction_id, outcome)
}

/// Any method other than POST on the webhook path
pub async fn method_not_allowed() -> WebhookResponse {
    WebhookResponse::rejected(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Decode and normalize a webhook body, or produce the 400 to send back
fn parse_payment(body: &[u8]) -> Result<(PaymentTransaction, Value), WebhookResponse> {
    let raw: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Payment webhook body is not JSON: {}", e);
        WebhookResponse::rejected(StatusCode::BAD_REQUEST, "Invalid JSON body")
    })?;

    // Arrays, strings and other non-objects carry no fields at all
    let payload: PaymentWebhookPayload = if raw.is_object() {
        serde_json::from_value(raw.clone()).map_err(|e| {
            tracing::warn!("Payment webhook payload rejected: {}", e);
            WebhookResponse::rejected(StatusCode::BAD_REQUEST, "Invalid payload")
        })?
    } else {
        PaymentWebhookPayload::default()
    };

    let transaction = PaymentTransaction::from_webhook(&payload, Utc::now()).map_err(|e| {
        tracing::warn!("Payment webhook rejected: {}", e);
        let message = match e {
            PaymentError::MissingTransactionId => "Missing transaction id".to_string(),
            PaymentError::InvalidTransactionId(reason) => reason.to_string(),
        };
        WebhookResponse::rejected(StatusCode::BAD_REQUEST, message)
    })?;

    Ok((transaction, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_of(response: WebhookResponse) -> (StatusCode, String) {
        match response {
            WebhookResponse::Rejected(status, body) => {
                assert!(!body.success);
                (status, body.error)
            }
            WebhookResponse::Accepted(body) => panic!("unexpected success: {:?}", body),
        }
    }

    #[test]
    fn test_parse_valid_payload() {
        let (transaction, raw) =
            parse_payment(br#"{"id": 92704, "transferType": "in", "transferAmount": 150000, "code": "DH001"}"#)
                .unwrap();
        assert_eq!(transaction.transaction_id, "92704");
        assert!(transaction.is_incoming());
        assert_eq!(raw["code"], "DH001");
    }

    #[test]
    fn test_payload_with_both_id_keys_is_accepted() {
        let (transaction, _) =
            parse_payment(br#"{"id": 92704, "transactionId": "FT24075123456789"}"#).unwrap();
        assert_eq!(transaction.transaction_id, "92704");
    }

    #[test]
    fn test_missing_identifier_is_bad_request() {
        let bodies: [&[u8]; 4] = [
            br#"{}"#,
            br#"{"id": ""}"#,
            br#"{"id": null, "transferAmount": 1}"#,
            b"[]",
        ];
        for body in bodies {
            let (status, error) = error_of(parse_payment(body).unwrap_err());
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(error, "Missing transaction id");
        }
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        let (status, error) = error_of(parse_payment(b"{not json").unwrap_err());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error, "Invalid JSON body");
    }

    #[test]
    fn test_accepted_body_shape() {
        let response = WebhookResponse::accepted("92704".to_string(), RecordOutcome::Inserted);
        assert_eq!(response.status(), StatusCode::OK);
        let WebhookResponse::Accepted(body) = response else {
            panic!("expected success");
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Transaction recorded");
        assert_eq!(json["transactionId"], "92704");
    }

    #[test]
    fn test_method_not_allowed() {
        let response = tokio_test::block_on(method_not_allowed());
        let (status, error) = error_of(response);
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(error, "Method not allowed");
    }
}

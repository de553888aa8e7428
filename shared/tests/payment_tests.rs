//! Payment webhook normalization tests

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use shared::*;

fn payload(value: serde_json::Value) -> PaymentWebhookPayload {
    serde_json::from_value(value).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_full_gateway_payload() {
        let received_at = Utc.with_ymd_and_hms(2024, 3, 15, 3, 0, 5).unwrap();
        let payload = payload(json!({
            "id": 92704,
            "gateway": "Vietcombank",
            "transactionDate": "2024-03-15 10:00:00",
            "accountNumber": "0123499999",
            "code": "DH001",
            "content": "DH001 chuyen tien",
            "transferType": "in",
            "transferAmount": 150000,
            "accumulated": 19077000,
            "subAccount": null,
            "referenceCode": "MBVCB.3278907687",
            "description": ""
        }));

        let transaction = PaymentTransaction::from_webhook(&payload, received_at).unwrap();
        assert_eq!(transaction.transaction_id, "92704");
        assert_eq!(transaction.gateway.as_deref(), Some("Vietcombank"));
        assert_eq!(
            transaction.transaction_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap())
        );
        assert_eq!(transaction.amount, Decimal::from(150000));
        assert_eq!(transaction.direction, TransferDirection::In);
        assert!(transaction.is_incoming());
        assert_eq!(transaction.order_code.as_deref(), Some("DH001"));
        assert_eq!(transaction.reference_code.as_deref(), Some("MBVCB.3278907687"));
        assert_eq!(transaction.description, None);
        assert_eq!(transaction.received_at, received_at);
    }

    #[test]
    fn test_transaction_id_alias() {
        let payload = payload(json!({"transactionId": "FT24075123456789"}));
        let transaction = PaymentTransaction::from_webhook(&payload, Utc::now()).unwrap();
        assert_eq!(transaction.transaction_id, "FT24075123456789");
        assert_eq!(transaction.amount, Decimal::ZERO);
        assert_eq!(transaction.direction, TransferDirection::Unknown);
    }

    #[test]
    fn test_id_preferred_over_transaction_id() {
        let both = payload(json!({"id": 92704, "transactionId": "FT24075123456789"}));
        let transaction = PaymentTransaction::from_webhook(&both, Utc::now()).unwrap();
        assert_eq!(transaction.transaction_id, "92704");

        let blank_id = payload(json!({"id": "  ", "transactionId": "FT24075123456789"}));
        let transaction = PaymentTransaction::from_webhook(&blank_id, Utc::now()).unwrap();
        assert_eq!(transaction.transaction_id, "FT24075123456789");
    }

    #[test]
    fn test_missing_transaction_id() {
        for body in [
            json!({}),
            json!({"id": null}),
            json!({"id": ""}),
            json!({"id": "   "}),
            json!({"id": {"nested": true}}),
            json!({"id": null, "transactionId": ""}),
        ] {
            let result = PaymentTransaction::from_webhook(&payload(body), Utc::now());
            assert_eq!(result, Err(PaymentError::MissingTransactionId));
        }
    }

    #[test]
    fn test_invalid_transaction_id() {
        let long = payload(json!({"id": "9".repeat(200)}));
        assert!(matches!(
            PaymentTransaction::from_webhook(&long, Utc::now()),
            Err(PaymentError::InvalidTransactionId(_))
        ));
    }

    #[test]
    fn test_outgoing_and_malformed_fields() {
        let payload = payload(json!({
            "id": "t1",
            "transferType": "OUT",
            "transferAmount": "not a number",
            "transactionDate": "yesterday"
        }));
        let transaction = PaymentTransaction::from_webhook(&payload, Utc::now()).unwrap();
        assert_eq!(transaction.direction, TransferDirection::Out);
        assert!(!transaction.is_incoming());
        assert_eq!(transaction.amount, Decimal::ZERO);
        assert_eq!(transaction.transaction_date, None);
    }

    #[test]
    fn test_payment_error_messages() {
        assert_eq!(
            PaymentError::MissingTransactionId.to_string(),
            "Missing transaction id"
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any non-blank printable id up to the limit is accepted and trimmed
        #[test]
        fn prop_valid_ids_are_accepted(id in "[A-Za-z0-9._-]{1,128}") {
            let padded = format!("  {}  ", id);
            let payload = payload(json!({"id": padded}));
            let transaction = PaymentTransaction::from_webhook(&payload, Utc::now()).unwrap();
            prop_assert_eq!(transaction.transaction_id, id);
        }

        /// Numeric ids read the same as their decimal text
        #[test]
        fn prop_numeric_ids_match_text(id in 0u64..u64::MAX) {
            let numeric = payload(json!({"id": id}));
            let text = payload(json!({"id": id.to_string()}));
            prop_assert_eq!(numeric.id, text.id);
        }
    }
}

//! Validation utilities for the bakery back-office
//!
//! Includes Vietnam-specific checks for customer contact data.

/// Longest transaction id accepted from the payment gateway
pub const MAX_TRANSACTION_ID_LEN: usize = 128;

/// Chat messages above this are rejected by the delivery channel
pub const MAX_MESSAGE_LEN: usize = 4096;

// ============================================================================
// Payment Validations
// ============================================================================

/// Validate a gateway transaction id
pub fn validate_transaction_id(id: &str) -> Result<(), &'static str> {
    let id = id.trim();
    if id.is_empty() {
        return Err("Transaction id must not be empty");
    }
    if id.chars().count() > MAX_TRANSACTION_ID_LEN {
        return Err("Transaction id must be at most 128 characters");
    }
    if id.chars().any(char::is_control) {
        return Err("Transaction id must not contain control characters");
    }
    Ok(())
}

// ============================================================================
// Notification Validations
// ============================================================================

/// Validate free-text content for a custom announcement
pub fn validate_custom_content(content: &str) -> Result<(), &'static str> {
    if content.trim().is_empty() {
        return Err("Message content must not be empty");
    }
    if content.chars().count() > MAX_MESSAGE_LEN {
        return Err("Message content must be at most 4096 characters");
    }
    Ok(())
}

// ============================================================================
// Vietnam-Specific Validations
// ============================================================================

/// Validate Vietnamese phone number format
/// Accepts: 0901234567, 090-123-4567, +84901234567, 84901234567
pub fn validate_vietnamese_phone(phone: &str) -> Result<(), &'static str> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Err("Phone number must not be empty");
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '.'))
    {
        return Err("Phone number contains invalid characters");
    }

    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    // Domestic: 10 digits starting with 0
    if digits.len() == 10 && digits.starts_with('0') {
        return Ok(());
    }
    // International: country code 84 followed by 9 digits
    if digits.len() == 11 && digits.starts_with("84") {
        return Ok(());
    }

    Err("Invalid Vietnamese phone number format")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Payment Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_transaction_id_valid() {
        assert!(validate_transaction_id("92704").is_ok());
        assert!(validate_transaction_id("FT24075123456789").is_ok());
        assert!(validate_transaction_id(&"9".repeat(128)).is_ok());
    }

    #[test]
    fn test_validate_transaction_id_invalid() {
        assert!(validate_transaction_id("").is_err());
        assert!(validate_transaction_id("   ").is_err());
        assert!(validate_transaction_id(&"9".repeat(129)).is_err());
        assert!(validate_transaction_id("927\n04").is_err());
    }

    // ========================================================================
    // Notification Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_custom_content() {
        assert!(validate_custom_content("Tiệm nghỉ lễ ngày 30/4").is_ok());
        assert!(validate_custom_content(" \n ").is_err());
        assert!(validate_custom_content(&"a".repeat(4097)).is_err());
        // Multi-byte characters are counted as characters, not bytes
        assert!(validate_custom_content(&"ệ".repeat(4096)).is_ok());
    }

    // ========================================================================
    // Vietnam-Specific Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_vietnamese_phone_valid() {
        assert!(validate_vietnamese_phone("0901234567").is_ok());
        assert!(validate_vietnamese_phone("090-123-4567").is_ok());
        assert!(validate_vietnamese_phone("090 123 4567").is_ok());
        assert!(validate_vietnamese_phone("+84901234567").is_ok());
        assert!(validate_vietnamese_phone("84901234567").is_ok());
    }

    #[test]
    fn test_validate_vietnamese_phone_invalid() {
        assert!(validate_vietnamese_phone("").is_err());
        assert!(validate_vietnamese_phone("12345").is_err());
        assert!(validate_vietnamese_phone("1901234567").is_err());
        assert!(validate_vietnamese_phone("090123456a").is_err());
        assert!(validate_vietnamese_phone("+6612345678").is_err());
    }
}

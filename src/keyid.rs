use crate::error::{Error, Result};

/// Shortens a key identifier to its 8-character short form.
///
/// Accepted inputs:
/// - 8 hex characters (short key ID): returned unchanged
/// - 16 hex characters (long key ID): trailing 8 characters
///
/// Any other length fails normalization and returns `None`. Callers treat
/// an unnormalizable identifier as never matching a key list and log a
/// diagnostic; it is not an error.
pub fn short_key_id(keyid: &str) -> Option<&str> {
    match keyid.len() {
        8 => Some(keyid),
        // get() rather than indexing: a 16-byte id with multibyte garbage
        // must fail normalization, not panic
        16 => keyid.get(8..),
        _ => None,
    }
}

/// Validates a key fingerprint before passing it to a gpg subprocess.
///
/// Deletions address keys by full fingerprint, taken from gpg's own
/// `fpr` records: exactly 40 hex characters. Anything else is rejected
/// rather than handed to `gpg --delete-keys`.
///
/// Returns the normalized fingerprint (uppercase) on success.
pub fn validate_fingerprint(fingerprint: &str) -> Result<String> {
    if fingerprint.is_empty() {
        return Err(Error::InvalidKeyId {
            keyid: fingerprint.to_string(),
            reason: "fingerprint cannot be empty".to_string(),
        });
    }

    let normalized = fingerprint.to_uppercase();

    if !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidKeyId {
            keyid: fingerprint.to_string(),
            reason: "fingerprint must contain only hexadecimal characters".to_string(),
        });
    }

    if normalized.len() != 40 {
        return Err(Error::InvalidKeyId {
            keyid: fingerprint.to_string(),
            reason: format!(
                "fingerprint must be 40 hex characters (got {})",
                normalized.len()
            ),
        });
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_passes_through() {
        assert_eq!(short_key_id("AABBCCDD"), Some("AABBCCDD"));
    }

    #[test]
    fn test_long_id_keeps_trailing_half() {
        assert_eq!(short_key_id("1122334455667788"), Some("55667788"));
    }

    #[test]
    fn test_long_and_short_forms_agree() {
        let long = "0011223344556677";
        let short = &long[8..];
        assert_eq!(short_key_id(long), short_key_id(short));
    }

    #[test]
    fn test_wrong_length_fails() {
        assert_eq!(short_key_id(""), None);
        assert_eq!(short_key_id("ABCDE"), None);
        assert_eq!(short_key_id("AABBCCDDEE"), None);
        // 40-char fingerprints are not key IDs for list purposes
        assert_eq!(short_key_id(&"A".repeat(40)), None);
    }

    #[test]
    fn test_valid_fingerprint() {
        assert_eq!(
            validate_fingerprint("ABAF11C65A2970B130ABE3C479BE3E4300411886").unwrap(),
            "ABAF11C65A2970B130ABE3C479BE3E4300411886"
        );
        assert_eq!(
            validate_fingerprint("abaf11c65a2970b130abe3c479be3e4300411886").unwrap(),
            "ABAF11C65A2970B130ABE3C479BE3E4300411886"
        );
    }

    #[test]
    fn test_invalid_fingerprint_empty() {
        assert!(matches!(
            validate_fingerprint(""),
            Err(Error::InvalidKeyId { .. })
        ));
    }

    #[test]
    fn test_invalid_fingerprint_non_hex() {
        let fpr = format!("{}G", "A".repeat(39));
        assert!(matches!(
            validate_fingerprint(&fpr),
            Err(Error::InvalidKeyId { .. })
        ));
    }

    #[test]
    fn test_invalid_fingerprint_wrong_length() {
        // short and long key IDs are not deletion addresses
        assert!(matches!(
            validate_fingerprint("DEADBEEF"),
            Err(Error::InvalidKeyId { .. })
        ));
        assert!(matches!(
            validate_fingerprint("786C63F330D7CB92"),
            Err(Error::InvalidKeyId { .. })
        ));
    }
}

//! Customer Models

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Customer record written at the end of a booking, keyed by email.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomerUpsert {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: String,

    /// The customer's loyalty balance after this order settles.
    pub loyalty_points: u32,

    /// Credential digest, present only when an account was requested
    /// inline during checkout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Loyalty projection of a customer row.
#[derive(Debug, Clone, Deserialize)]
pub struct LoyaltyRow {
    #[serde(default)]
    pub loyalty_points: Option<u32>,
}

/// Digest a raw password for storage.
///
/// The store only ever sees the SHA-256 hex digest, never the plaintext.
pub fn credential_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_digest_is_hex_sha256() {
        let digest = credential_digest("hunter2");

        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(digest, credential_digest("hunter3"));
    }

    #[test]
    fn upsert_without_password_omits_the_field() {
        let upsert = CustomerUpsert {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "0100".to_string(),
            address: "1 Test Lane".to_string(),
            notes: String::new(),
            loyalty_points: 10,
            password: None,
        };

        let json = serde_json::to_value(&upsert).expect("serializes");

        assert!(json.get("password").is_none());
        assert_eq!(json["loyalty_points"], 10);
    }
}

//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};

/// Length in bytes of generated token identifiers
pub const TOKEN_ID_BYTES: usize = 16;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Fresh opaque identifier drawn from the OS CSPRNG, hex encoded
pub fn random_token_id() -> String {
    to_hex(&random_bytes(TOKEN_ID_BYTES))
}

/// Encode bytes as lowercase hex
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex (either case) to bytes
pub fn from_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        // Should not be all zeros (statistically)
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_random_token_id_unique() {
        let a = random_token_id();
        let b = random_token_id();
        assert_eq!(a.len(), TOKEN_ID_BYTES * 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_known_value() {
        assert_eq!(to_hex(b"\x00\xabJ"), "00ab4a");
        assert_eq!(from_hex("00AB4a").unwrap(), vec![0x00, 0xab, 0x4a]);
        assert!(from_hex("zz").is_err());
        assert!(from_hex("abc").is_err());
    }

    #[test]
    fn test_base64_decode() {
        assert_eq!(from_base64("aGVsbG8=").unwrap(), b"hello");
        assert!(from_base64("not base64!").is_err());
    }
}

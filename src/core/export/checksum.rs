//! Checksums of delivered export bytes

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `data` (64 characters)
///
/// ```
/// use classroll::core::export::checksum::sha256_hex;
///
/// let checksum = sha256_hex(b"Name,Notes\r\n");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic_and_content_sensitive() {
        assert_eq!(sha256_hex(b"a,b\r\n"), sha256_hex(b"a,b\r\n"));
        assert_ne!(sha256_hex(b"a,b\r\n"), sha256_hex(b"a;b\r\n"));
        assert!(sha256_hex(b"").chars().all(|c| c.is_ascii_hexdigit()));
    }
}

pub mod config;
pub mod error;
pub mod types;

pub use config::ScanConfig;
pub use error::ScanError;
pub use types::{PhaseStatus, Target};

/// SHA-256 hex digest of a byte payload. Identical bytes always yield the
/// identical checksum; used to group visually-identical screenshots.
pub fn checksum_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_deterministic() {
        let a = checksum_hex(b"same bytes");
        let b = checksum_hex(b"same bytes");
        assert_eq!(a, b);
    }

    #[test]
    fn checksum_differs_for_different_bytes() {
        assert_ne!(checksum_hex(b"one image"), checksum_hex(b"another image"));
    }

    #[test]
    fn checksum_is_lowercase_hex() {
        let sum = checksum_hex(b"payload");
        assert_eq!(sum.len(), 64);
        assert!(sum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}

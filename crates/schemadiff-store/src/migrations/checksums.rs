//! Checksums for migration SQL and snapshot bodies

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of raw bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Checksum of migration SQL with line endings normalized to `\n`
pub fn compute_checksum(sql: &str) -> String {
    sha256_hex(sql.replace("\r\n", "\n").as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum("SELECT 1");
        assert_eq!(checksum.len(), 64);
    }

    #[test]
    fn test_line_endings_do_not_change_checksum() {
        assert_eq!(
            compute_checksum("SELECT 1;\r\nSELECT 2;\r\n"),
            compute_checksum("SELECT 1;\nSELECT 2;\n")
        );
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}

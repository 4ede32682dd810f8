//! Content fingerprinting.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 fingerprint of a document body as lowercase hex.
///
/// Deterministic and side-effect free; any byte difference in the input
/// produces a different digest.
pub fn fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_stable() {
        let a = fingerprint(b"# Hello\n\nSome document body.");
        let b = fingerprint(b"# Hello\n\nSome document body.");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_hex64() {
        let digest = fingerprint(b"");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        // SHA-256 of the empty string is a well-known constant.
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_fingerprint_differs_on_any_change() {
        let corpus = [
            &b"alpha"[..],
            b"alphA",
            b"alpha ",
            b" alpha",
            b"beta",
            b"",
            b"\0",
        ];
        for (i, x) in corpus.iter().enumerate() {
            for (j, y) in corpus.iter().enumerate() {
                if i != j {
                    assert_ne!(fingerprint(x), fingerprint(y));
                }
            }
        }
    }
}

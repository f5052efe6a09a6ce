use argon2::password_hash::rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

/// A fresh opaque token: 32 random bytes, hex-encoded.
pub fn generate() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Only this digest is persisted; the raw token leaves the server once.
pub fn hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub fn from_authorization_header(header: &str) -> Option<String> {
    let (scheme, token) = header.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_unique_hex() {
        let first = generate();
        let second = generate();

        assert_eq!(first.len(), TOKEN_BYTES * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn hashing_is_stable_and_hides_the_token() {
        let token = generate();

        assert_eq!(hash(&token), hash(&token));
        assert_ne!(hash(&token), token);
        assert_ne!(hash(&token), hash(&generate()));
        assert_eq!(
            hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(
            from_authorization_header("Bearer abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(
            from_authorization_header("bearer   abc123 "),
            Some("abc123".to_string())
        );
        assert_eq!(from_authorization_header("Basic abc123"), None);
        assert_eq!(from_authorization_header("Bearer "), None);
        assert_eq!(from_authorization_header("abc123"), None);
    }
}

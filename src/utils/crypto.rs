//! Cryptographic utilities

use rand::Rng;
use sha2::{Digest, Sha256};

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Random ASCII-alphanumeric string of `length` characters
pub fn random_token(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| ALPHANUMERIC[rng.random_range(0..ALPHANUMERIC.len())] as char)
        .collect()
}

/// Lowercase hex SHA-256 digest. Bearer tokens are stored only in this form.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

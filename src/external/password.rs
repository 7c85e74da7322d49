//! Password hashing for user creation.

use crate::error::AppError;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub trait PasswordHasher: Send + Sync {
    /// Hash a plain password into the form stored in `app_user.password`.
    fn hash(&self, plain: &str) -> Result<String, AppError>;
    fn verify(&self, plain: &str, stored: &str) -> bool;
}

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Salted, iterated SHA-256. Stored as `sha256$<rounds>$<salt hex>$<digest hex>`.
#[derive(Clone, Copy, Debug)]
pub struct Sha256Hasher {
    rounds: u32,
}

impl Sha256Hasher {
    pub fn new(rounds: u32) -> Self {
        Sha256Hasher { rounds: rounds.max(1) }
    }
}

fn digest(salt: &[u8], plain: &str, rounds: u32) -> Vec<u8> {
    let mut out = Sha256::new().chain_update(salt).chain_update(plain.as_bytes()).finalize();
    for _ in 1..rounds {
        out = Sha256::new().chain_update(salt).chain_update(out).finalize();
    }
    out.to_vec()
}

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, plain: &str) -> Result<String, AppError> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let out = digest(&salt, plain, self.rounds);
        Ok(format!("{}${}${}${}", SCHEME, self.rounds, hex::encode(salt), hex::encode(out)))
    }

    fn verify(&self, plain: &str, stored: &str) -> bool {
        let mut parts = stored.split('$');
        let (Some(SCHEME), Some(rounds), Some(salt), Some(expected), None) =
            (parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        let (Ok(rounds), Ok(salt), Ok(expected)) = (rounds.parse::<u32>(), hex::decode(salt), hex::decode(expected))
        else {
            return false;
        };
        let actual = digest(&salt, plain, rounds.max(1));
        actual.len() == expected.len() && actual.iter().zip(&expected).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_is_salted() {
        let hasher = Sha256Hasher::new(10);
        let a = hasher.hash("hunter22").unwrap();
        let b = hasher.hash("hunter22").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("sha256$10$"));
        assert!(!a.contains("hunter22"));
        assert!(hasher.verify("hunter22", &a));
        assert!(hasher.verify("hunter22", &b));
        assert!(!hasher.verify("hunter23", &a));
    }

    #[test]
    fn rounds_come_from_stored_hash() {
        let stored = Sha256Hasher::new(3).hash("secret").unwrap();
        assert!(Sha256Hasher::new(1000).verify("secret", &stored));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        let hasher = Sha256Hasher::new(1);
        for stored in ["", "secret", "md5$1$00$00", "sha256$x$00$00", "sha256$1$zz$00", "sha256$1$00$00$00"] {
            assert!(!hasher.verify("secret", stored), "{}", stored);
        }
    }
}

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: String, ttl_hours: i64) -> Self {
        Self {
            secret,
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn generate_token(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

/// Argon2id with a configurable iteration count; memory and lanes stay at
/// the crate defaults. Verification reads the parameters from the stored hash,
/// so raising the work factor does not invalidate existing passwords.
#[derive(Clone)]
pub struct PasswordHashing {
    iterations: u32,
}

impl PasswordHashing {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    fn argon2(&self) -> Result<Argon2<'static>, password_hash::Error> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            self.iterations,
            Params::DEFAULT_P_COST,
            None,
        )?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    pub fn hash(&self, password: &str) -> Result<String, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)?
            .to_string();
        Ok(hash)
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, password_hash::Error> {
        let parsed = PasswordHash::new(hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// One-way fingerprint of a network address; the raw address is never stored.
pub fn hash_ip(ip: &str) -> String {
    hex::encode(Sha256::digest(ip.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_subject() {
        let keys = JwtKeys::new("secret".into(), 24);
        let id = Uuid::new_v4();
        let token = keys.generate_token(id).unwrap();
        let claims = keys.verify_token(&token).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = JwtKeys::new("one".into(), 24)
            .generate_token(Uuid::new_v4())
            .unwrap();
        assert!(JwtKeys::new("two".into(), 24).verify_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = JwtKeys::new("secret".into(), -2);
        let token = keys.generate_token(Uuid::new_v4()).unwrap();
        assert!(keys.verify_token(&token).is_err());
    }

    #[test]
    fn password_round_trip() {
        let hashing = PasswordHashing::new(1);
        let hash = hashing.hash("Segredo123").unwrap();
        assert_ne!(hash, "Segredo123");
        assert!(hashing.verify("Segredo123", &hash).unwrap());
        assert!(!hashing.verify("segredo123", &hash).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error_not_a_mismatch() {
        let hashing = PasswordHashing::new(1);
        assert!(hashing.verify("Segredo123", "not-a-phc-string").is_err());
    }

    #[test]
    fn zero_iterations_fail_to_hash() {
        assert!(PasswordHashing::new(0).hash("Segredo123").is_err());
    }

    #[test]
    fn ip_hash_is_deterministic_and_opaque() {
        let first = hash_ip("203.0.113.7");
        assert_eq!(first, hash_ip("203.0.113.7"));
        assert_ne!(first, "203.0.113.7");
        assert_ne!(first, hash_ip("203.0.113.8"));
        assert_eq!(first.len(), 64);
    }
}

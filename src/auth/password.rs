use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier, Version};

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::Result;

/// Argon2id hashing and verification of plaintext passwords.
///
/// Both operations run on tokio's blocking pool.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::ConfigError(format!("invalid argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        Self::new(config.hash_memory_kib, config.hash_iterations, config.hash_parallelism)
    }

    /// Produces a PHC-format hash with a fresh random salt.
    pub async fn hash(&self, password: &str) -> Result<String> {
        let hasher = self.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password)).await?
    }

    /// Returns `Ok(false)` on mismatch; a malformed stored hash is an error.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let hasher = self.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify_blocking(&password, &hash)).await?
    }

    pub fn hash_blocking(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn verify_blocking(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)?;
        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

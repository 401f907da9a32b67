use std::fmt;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

use crate::config::Config;

/// Identifier/secret pair submitted to prove identity.
///
/// Lives only for the duration of one login attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub identifier: String,
    pub secret: String,
}

impl Credential {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid hash parameters: {0}")]
    InvalidCost(String),

    #[error("Failed to hash secret: {0}")]
    Hashing(String),

    #[error("Invalid secret hash: {0}")]
    InvalidHash(String),
}

/// Argon2id cost parameters for the admin secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl HashCost {
    /// Smallest cost argon2 accepts. Only suitable for tests.
    pub const MIN: HashCost = HashCost {
        memory_kib: Params::MIN_M_COST,
        iterations: Params::MIN_T_COST,
    };

    fn hasher(&self) -> Result<Argon2<'static>, CredentialError> {
        let params = Params::new(self.memory_kib, self.iterations, 1, None)
            .map_err(|e| CredentialError::InvalidCost(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
        }
    }
}

/// The single administrator account the console accepts.
///
/// The secret is only ever held as an Argon2id PHC string.
#[derive(Clone)]
pub struct AdminAccount {
    identifier: String,
    secret_hash: String,
}

impl AdminAccount {
    /// Build the account by hashing `secret` with a fresh salt.
    pub fn new(identifier: impl Into<String>, secret: &str, cost: HashCost) -> Result<Self, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = cost
            .hasher()?
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;

        Ok(Self {
            identifier: identifier.into(),
            secret_hash: hash.to_string(),
        })
    }

    /// Build the account from a stored PHC hash string.
    pub fn from_hash(identifier: impl Into<String>, secret_hash: impl Into<String>) -> Result<Self, CredentialError> {
        let secret_hash = secret_hash.into();
        PasswordHash::new(&secret_hash).map_err(|e| CredentialError::InvalidHash(e.to_string()))?;
        Ok(Self {
            identifier: identifier.into(),
            secret_hash,
        })
    }

    /// The configured admin account, falling back to the demo secret.
    pub fn from_config(config: &Config) -> Result<Self, CredentialError> {
        match config.admin_secret_hash {
            Some(ref hash) => Self::from_hash(config.admin_identifier.clone(), hash.clone()),
            None => Self::new(
                config.admin_identifier.clone(),
                crate::config::DEFAULT_ADMIN_SECRET,
                HashCost {
                    memory_kib: config.hash_memory_kib,
                    iterations: config.hash_iterations,
                },
            ),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret_hash(&self) -> &str {
        &self.secret_hash
    }

    /// Check a credential against this account.
    ///
    /// The hash is verified even when the identifier does not match, so an
    /// unknown identifier and a wrong secret cost the same.
    pub fn verify(&self, credential: &Credential) -> bool {
        let identifier_matches = credential.identifier == self.identifier;

        let secret_matches = match PasswordHash::new(&self.secret_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(credential.secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        };

        identifier_matches & secret_matches
    }
}

impl fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAccount")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

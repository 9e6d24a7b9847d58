//! API key resolution. A missing key is the one fatal startup error.

use std::error::Error as StdError;
use std::fmt;

use tracing::debug;

use crate::core::constants::API_KEY_ENV;
use crate::core::keyring::{KeyringAccessError, SecretStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Keyring,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "{API_KEY_ENV} environment variable"),
            CredentialSource::Keyring => write!(f, "system keyring"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    api_key: String,
    source: CredentialSource,
}

impl Credential {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

// Keeps the key itself out of debug output and logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Debug)]
pub enum CredentialError {
    Missing,
    Keyring(KeyringAccessError),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Missing => write!(
                f,
                "Gemini API key not found.\n\n\
                 Set it in the environment:\n  export {API_KEY_ENV}=\"AIza...\"\n\n\
                 or store it in the system keyring:\n  physbot auth"
            ),
            CredentialError::Keyring(err) => {
                write!(f, "Could not read the API key from the system keyring: {err}")
            }
        }
    }
}

impl StdError for CredentialError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CredentialError::Missing => None,
            CredentialError::Keyring(err) => Some(err),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Environment first, then the keyring. Blank values count as missing.
pub fn resolve_api_key(
    env_value: Option<String>,
    store: &dyn SecretStore,
) -> Result<Credential, CredentialError> {
    if let Some(api_key) = non_blank(env_value) {
        debug!("using API key from environment");
        return Ok(Credential {
            api_key,
            source: CredentialSource::Environment,
        });
    }

    match store.read() {
        Ok(stored) => non_blank(stored)
            .map(|api_key| {
                debug!("using API key from keyring");
                Credential {
                    api_key,
                    source: CredentialSource::Keyring,
                }
            })
            .ok_or(CredentialError::Missing),
        Err(err) => Err(CredentialError::Keyring(err)),
    }
}

pub fn resolve_from_environment(store: &dyn SecretStore) -> Result<Credential, CredentialError> {
    resolve_api_key(std::env::var(API_KEY_ENV).ok(), store)
}

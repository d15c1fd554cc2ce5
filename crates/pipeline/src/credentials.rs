// OAuth access token storage.
//
// The token comes from `NOTEMAKER_ACCESS_TOKEN` when set, otherwise from the
// OS keychain. `signin` writes the keychain entry and `signout` removes it.

use anyhow::{bail, Context, Result};

use crate::error::PipelineError;

pub const TOKEN_ENV_VAR: &str = "NOTEMAKER_ACCESS_TOKEN";
const KEYRING_SERVICE: &str = "notemaker";
const TOKEN_ACCOUNT: &str = "access_token";

/// Persist the access token in the keychain.
pub fn store_access_token(token: &str) -> Result<()> {
    store_with(&KeyringSecretStore, token)
}

/// The access token from the environment or the keychain, if any.
pub fn load_access_token() -> Result<Option<String>> {
    load_with(&KeyringSecretStore, std::env::var(TOKEN_ENV_VAR).ok())
}

/// Like [`load_access_token`], but a missing token is `NotSignedIn`.
pub fn require_access_token() -> Result<String> {
    load_access_token()?.ok_or_else(|| PipelineError::NotSignedIn.into())
}

/// Remove the keychain entry. Removing a missing entry succeeds.
pub fn clear_access_token() -> Result<()> {
    clear_with(&KeyringSecretStore)
}

trait SecretStore: Send + Sync {
    fn set_secret(&self, service: &str, account: &str, value: &str) -> Result<()>;
    fn get_secret(&self, service: &str, account: &str) -> Result<Option<String>>;
    fn delete_secret(&self, service: &str, account: &str) -> Result<()>;
}

struct KeyringSecretStore;

impl SecretStore for KeyringSecretStore {
    fn set_secret(&self, service: &str, account: &str, value: &str) -> Result<()> {
        let entry = keyring::Entry::new(service, account)
            .context("failed to initialize keychain entry")?;
        entry.set_password(value).context("failed to write keychain entry")
    }

    fn get_secret(&self, service: &str, account: &str) -> Result<Option<String>> {
        let entry = keyring::Entry::new(service, account)
            .context("failed to initialize keychain entry")?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(error).context("failed to read keychain entry"),
        }
    }

    fn delete_secret(&self, service: &str, account: &str) -> Result<()> {
        let entry = keyring::Entry::new(service, account)
            .context("failed to initialize keychain entry")?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(error).context("failed to delete keychain entry"),
        }
    }
}

fn store_with(store: &dyn SecretStore, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        bail!("access token must not be empty");
    }
    store
        .set_secret(KEYRING_SERVICE, TOKEN_ACCOUNT, token)
        .context("failed to persist access token in keychain")
}

fn load_with(store: &dyn SecretStore, from_env: Option<String>) -> Result<Option<String>> {
    if let Some(token) = from_env.filter(|token| !token.trim().is_empty()) {
        return Ok(Some(token.trim().to_string()));
    }
    store
        .get_secret(KEYRING_SERVICE, TOKEN_ACCOUNT)
        .context("failed to read access token from keychain")
}

fn clear_with(store: &dyn SecretStore) -> Result<()> {
    store
        .delete_secret(KEYRING_SERVICE, TOKEN_ACCOUNT)
        .context("failed to clear access token from keychain")
}

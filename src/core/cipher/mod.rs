//! Cipher gateway.
//!
//! Thin layer over an external key-management service. A [`Connector`]
//! builds a [`KmsBackend`] for a [`KeyScope`]; the [`Gateway`] caches those
//! handles so repeated calls for the same scope reuse one client.
//!
//! ## Backends
//!
//! - **AWS KMS**: feature-gated (`aws`). Region and named profile come from
//!   the resolver config, otherwise the default credential chain is used.
//! - **Mock**: `cfg(test)` or feature `test-kms`. Reversible, not secure.
//!
//! ## Adding a New Backend
//!
//! 1. Implement `KmsBackend` for the client type
//! 2. Implement `Connector` to build it from a `KeyScope`
//! 3. Feature-gate if it pulls in an SDK

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

use crate::core::config::ResolverConfig;
use crate::error::{ConfigError, Result};

pub mod aws;
#[cfg(any(test, feature = "test-kms"))]
pub mod mock;

pub use aws::AwsConnector;
#[cfg(any(test, feature = "test-kms"))]
pub use mock::{MockConnector, MockKms};

/// Encrypt/decrypt capability bound to one key.
///
/// Implemented by real providers and by the mock used in tests.
pub trait KmsBackend: std::fmt::Debug + Send + Sync {
    /// Encrypt plaintext, returning a text-safe (base64) ciphertext.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if the service rejects the call.
    fn encrypt(&self, plaintext: &str) -> Result<String>;

    /// Decrypt a ciphertext produced by [`KmsBackend::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` if decoding or the service call fails.
    fn decrypt(&self, ciphertext: &str) -> Result<String>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Builds backends for a key scope.
pub trait Connector: std::fmt::Debug + Send + Sync {
    fn connect(&self, scope: &KeyScope) -> Result<Arc<dyn KmsBackend>>;
}

/// The credential tuple a backend handle is bound to.
///
/// This is the cache key: a different region or profile under the same key
/// id gets its own handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyScope {
    pub key_id: String,
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl KeyScope {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            region: None,
            profile: None,
        }
    }

    /// Scope for the active stage.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKeyId` if no key id resolved for the stage.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let key_id = config
            .key_id
            .clone()
            .ok_or_else(|| ConfigError::MissingKeyId {
                stage: config.stage.clone(),
            })?;
        Ok(Self {
            key_id,
            region: config.region.clone(),
            profile: config.profile.clone(),
        })
    }
}

/// Encrypt/decrypt entry point with a per-scope handle cache.
///
/// The cache only grows (insert if absent) and lives as long as the gateway.
#[derive(Debug)]
pub struct Gateway {
    connector: Box<dyn Connector>,
    handles: Mutex<HashMap<KeyScope, Arc<dyn KmsBackend>>>,
}

impl Gateway {
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Encrypt `plaintext` with the key configured for the active stage.
    pub fn encrypt(&self, plaintext: &str, config: &ResolverConfig) -> Result<String> {
        let backend = self.handle(config)?;
        trace!(backend = backend.name(), plaintext_len = plaintext.len(), "encrypting");
        backend.encrypt(plaintext)
    }

    /// Decrypt `ciphertext` with the key configured for the active stage.
    pub fn decrypt(&self, ciphertext: &str, config: &ResolverConfig) -> Result<String> {
        let backend = self.handle(config)?;
        trace!(backend = backend.name(), ciphertext_len = ciphertext.len(), "decrypting");
        backend.decrypt(ciphertext)
    }

    /// Number of cached backend handles.
    pub fn cached_handles(&self) -> usize {
        self.lock().len()
    }

    fn handle(&self, config: &ResolverConfig) -> Result<Arc<dyn KmsBackend>> {
        let scope = KeyScope::from_config(config)?;
        let mut handles = self.lock();

        if let Some(backend) = handles.get(&scope) {
            return Ok(Arc::clone(backend));
        }

        debug!(key_id = %scope.key_id, region = ?scope.region, profile = ?scope.profile, "connecting KMS backend");
        let backend = self.connector.connect(&scope)?;
        handles.insert(scope, Arc::clone(&backend));
        Ok(backend)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<KeyScope, Arc<dyn KmsBackend>>> {
        // A panic mid-insert cannot leave a half-written entry
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Gateway {
    /// AWS KMS, or the mock when built with `test-kms`.
    fn default() -> Self {
        #[cfg(feature = "test-kms")]
        {
            Self::new(MockConnector)
        }
        #[cfg(not(feature = "test-kms"))]
        {
            Self::new(AwsConnector)
        }
    }
}

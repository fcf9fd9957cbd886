//! Mock KMS backend for testing.
//!
//! Uses hex encoding tagged with the key id. NOT cryptographically secure,
//! it only validates the plumbing without an external service.

use std::sync::Arc;

use super::{Connector, KeyScope, KmsBackend};
use crate::error::{CipherError, Result};

const PREFIX: &str = "mock-kms:";

/// Reversible fake bound to one key id.
#[derive(Debug)]
pub struct MockKms {
    key_id: String,
}

impl MockKms {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
        }
    }
}

impl KmsBackend for MockKms {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let hex: String = plaintext.bytes().map(|b| format!("{:02x}", b)).collect();
        Ok(format!("{}{}:{}", PREFIX, self.key_id, hex))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let body = ciphertext.strip_prefix(PREFIX).ok_or_else(|| {
            CipherError::DecryptionFailed("not a mock-kms ciphertext".to_string())
        })?;
        // Key ids may contain ':' (ARNs), hex never does
        let (key_id, hex) = body
            .rsplit_once(':')
            .ok_or_else(|| CipherError::DecryptionFailed("missing key id".to_string()))?;
        if key_id != self.key_id {
            return Err(CipherError::DecryptionFailed(format!(
                "ciphertext was encrypted with key '{}'",
                key_id
            ))
            .into());
        }
        if hex.len() % 2 != 0 {
            return Err(CipherError::DecryptionFailed("odd hex length".to_string()).into());
        }

        let bytes: std::result::Result<Vec<u8>, _> = (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
            .collect();
        let bytes =
            bytes.map_err(|e| CipherError::DecryptionFailed(format!("invalid hex: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| CipherError::DecryptionFailed(format!("invalid utf8: {}", e)).into())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Connector handing out [`MockKms`] instances.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockConnector;

impl Connector for MockConnector {
    fn connect(&self, scope: &KeyScope) -> Result<Arc<dyn KmsBackend>> {
        Ok(Arc::new(MockKms::new(scope.key_id.clone())))
    }
}

//! AWS KMS cipher backend.
//!
//! Encrypts values using AWS Key Management Service.
//! Enable with `--features aws`.
//!
//! Credentials come from the named profile when one is configured, otherwise
//! from the default credential provider chain (environment, shared config,
//! instance metadata). Ciphertext blobs are stored as standard base64.

use std::sync::Arc;

use super::{Connector, KeyScope, KmsBackend};
use crate::error::Result;
#[cfg(not(feature = "aws"))]
use crate::error::CipherError;

/// Connector for AWS KMS clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsConnector;

impl Connector for AwsConnector {
    #[cfg(feature = "aws")]
    fn connect(&self, scope: &KeyScope) -> Result<Arc<dyn KmsBackend>> {
        Ok(Arc::new(AwsKms::connect(scope)?))
    }

    #[cfg(not(feature = "aws"))]
    fn connect(&self, _scope: &KeyScope) -> Result<Arc<dyn KmsBackend>> {
        Err(CipherError::NotCompiled("AWS").into())
    }
}

#[cfg(feature = "aws")]
pub use self::client::AwsKms;

#[cfg(feature = "aws")]
mod client {
    use ::base64::Engine;
    use aws_sdk_kms::primitives::Blob;
    use tracing::trace;

    use super::{KeyScope, KmsBackend};
    use crate::error::{CipherError, Error, Result};

    /// AWS KMS client bound to one key.
    ///
    /// The async SDK is driven by a private current-thread runtime.
    pub struct AwsKms {
        key_id: String,
        client: aws_sdk_kms::Client,
        runtime: tokio::runtime::Runtime,
    }

    impl std::fmt::Debug for AwsKms {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("AwsKms")
                .field("key_id", &self.key_id)
                .finish_non_exhaustive()
        }
    }

    impl AwsKms {
        /// Load SDK config for the scope's region and profile and build a client.
        pub fn connect(scope: &KeyScope) -> Result<Self> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| CipherError::Connect(format!("failed to create runtime: {}", e)))?;

            let sdk_config = runtime.block_on(async {
                let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
                if let Some(region) = &scope.region {
                    loader = loader.region(aws_config::Region::new(region.clone()));
                }
                if let Some(profile) = &scope.profile {
                    loader = loader.profile_name(profile.as_str());
                }
                loader.load().await
            });

            Ok(Self {
                key_id: scope.key_id.clone(),
                client: aws_sdk_kms::Client::new(&sdk_config),
                runtime,
            })
        }
    }

    impl KmsBackend for AwsKms {
        fn encrypt(&self, plaintext: &str) -> Result<String> {
            trace!(
                key_id = %self.key_id,
                plaintext_len = plaintext.len(),
                "encrypting with AWS KMS"
            );

            self.runtime.block_on(async {
                let result = self
                    .client
                    .encrypt()
                    .key_id(&self.key_id)
                    .plaintext(Blob::new(plaintext.as_bytes()))
                    .send()
                    .await
                    .map_err(|e| {
                        CipherError::EncryptionFailed(format!("KMS encrypt failed: {}", e))
                    })?;

                let blob = result.ciphertext_blob().ok_or_else(|| {
                    CipherError::EncryptionFailed("no ciphertext returned".into())
                })?;

                let encoded = ::base64::engine::general_purpose::STANDARD.encode(blob.as_ref());
                trace!(ciphertext_len = encoded.len(), "encrypted with AWS KMS");
                Ok::<String, Error>(encoded)
            })
        }

        fn decrypt(&self, ciphertext: &str) -> Result<String> {
            trace!(ciphertext_len = ciphertext.len(), "decrypting with AWS KMS");

            let blob = ::base64::engine::general_purpose::STANDARD
                .decode(ciphertext.trim())
                .map_err(|e| CipherError::DecryptionFailed(format!("invalid base64: {}", e)))?;

            self.runtime.block_on(async {
                let result = self
                    .client
                    .decrypt()
                    .key_id(&self.key_id)
                    .ciphertext_blob(Blob::new(blob))
                    .send()
                    .await
                    .map_err(|e| {
                        CipherError::DecryptionFailed(format!("KMS decrypt failed: {}", e))
                    })?;

                let plaintext_blob = result.plaintext().ok_or_else(|| {
                    CipherError::DecryptionFailed("no plaintext returned".into())
                })?;

                let plaintext = String::from_utf8(plaintext_blob.as_ref().to_vec())
                    .map_err(|e| CipherError::DecryptionFailed(format!("UTF-8 error: {}", e)))?;

                trace!(plaintext_len = plaintext.len(), "decrypted with AWS KMS");
                Ok::<String, Error>(plaintext)
            })
        }

        fn name(&self) -> &'static str {
            "aws-kms"
        }
    }
}

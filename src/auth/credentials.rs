//! Credential management for Kalshi API authentication.

use std::path::Path;

use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::pss::{BlindedSigningKey, VerifyingKey};
use rsa::signature::Keypair;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::error::KalshiError;

/// API credentials: the public key id and the RSA key used for PSS signatures.
///
/// The private key never leaves this type; `Debug` output redacts it.
#[derive(Clone)]
pub struct Credentials {
    /// The API key id (public identifier sent in `KALSHI-ACCESS-KEY`)
    pub key_id: String,
    signing_key: BlindedSigningKey<Sha256>,
}

impl Credentials {
    /// Create credentials from an already parsed RSA private key.
    pub fn new(key_id: impl Into<String>, private_key: RsaPrivateKey) -> Self {
        Self {
            key_id: key_id.into(),
            signing_key: BlindedSigningKey::<Sha256>::new(private_key),
        }
    }

    /// Parse a PEM encoded RSA private key.
    ///
    /// Accepts both PKCS#8 (`BEGIN PRIVATE KEY`) and PKCS#1
    /// (`BEGIN RSA PRIVATE KEY`) encodings.
    pub fn from_pem_str(key_id: impl Into<String>, pem: &str) -> Result<Self, KalshiError> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|_| {
                KalshiError::KeyLoad(
                    "expected a PEM encoded RSA private key (PKCS#8 or PKCS#1)".to_string(),
                )
            })?;
        Ok(Self::new(key_id, private_key))
    }

    /// Read and parse a PEM private key file.
    pub fn from_pem_file(
        key_id: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, KalshiError> {
        let path = path.as_ref();
        let pem = std::fs::read_to_string(path)
            .map(SecretString::from)
            .map_err(|e| KalshiError::KeyLoad(format!("{}: {e}", path.display())))?;
        Self::from_pem_str(key_id, pem.expose_secret())
    }

    pub(crate) fn signing_key(&self) -> &BlindedSigningKey<Sha256> {
        &self.signing_key
    }

    /// The public half of the signing key, for verifying produced signatures.
    pub fn verifying_key(&self) -> VerifyingKey<Sha256> {
        self.signing_key.verifying_key()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

//! # ES256 Key Material
//!
//! Holds the single ECDSA P-256 private key of the process and the public
//! key derived from it.
//!
//! ## Security Invariant
//!
//! - A [`SigningKeyPair`] is only ever constructed after a sign-then-verify
//!   self-check passes. A pair that exists is a pair that works.
//! - The private scalar lives in a [`p256::SecretKey`], which zeroizes on
//!   drop. Inline PEM text is carried in a [`Zeroizing`] buffer.
//! - `SigningKeyPair` does not implement `Serialize`, and its `Debug`
//!   output contains no key material. Export is explicit through
//!   [`SigningKeyPair::to_pkcs8_pem`] and only the CLI calls it.
//!
//! ## Accepted Input
//!
//! PKCS#8 (`BEGIN PRIVATE KEY`) or SEC1 (`BEGIN EC PRIVATE KEY`), with
//! surrounding whitespace ignored.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use p256::SecretKey;
use zeroize::Zeroizing;

use crate::error::KeyError;

/// Where the private key PEM comes from.
#[derive(Clone)]
pub enum KeySource {
    /// PEM text supplied directly, typically through an environment variable.
    Inline(Zeroizing<String>),
    /// Path to a PEM file.
    File(PathBuf),
}

impl KeySource {
    /// Pick a source from optional inline text and an optional path.
    /// Non-blank inline text wins over the path.
    pub fn resolve(inline: Option<String>, path: Option<PathBuf>) -> Result<Self, KeyError> {
        match (inline, path) {
            (Some(pem), _) if !pem.trim().is_empty() => Ok(Self::Inline(Zeroizing::new(pem))),
            (_, Some(path)) => Ok(Self::File(path)),
            _ => Err(KeyError::NotConfigured),
        }
    }
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline([REDACTED])"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// An ES256 private key with its derived verification key.
///
/// Read-only after construction; share it behind an `Arc`.
pub struct SigningKeyPair {
    secret: SecretKey,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeyPair {
    /// Load from a [`KeySource`].
    pub fn load(source: &KeySource) -> Result<Self, KeyError> {
        match source {
            KeySource::Inline(pem) => Self::from_pem(pem),
            KeySource::File(path) => Self::from_pem_file(path),
        }
    }

    /// Read and parse a PEM file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, KeyError> {
        let path = path.as_ref();
        let pem = std::fs::read_to_string(path)
            .map(Zeroizing::new)
            .map_err(|source| KeyError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "loaded signing key file");
        Self::from_pem(&pem)
    }

    /// Parse PEM text in PKCS#8 or SEC1 form.
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        let pem = pem.trim();
        let secret = SecretKey::from_pkcs8_pem(pem)
            .or_else(|pkcs8_err| {
                SecretKey::from_sec1_pem(pem).map_err(|sec1_err| {
                    KeyError::InvalidPem(format!("neither PKCS#8 ({pkcs8_err}) nor SEC1 ({sec1_err})"))
                })
            })?;
        Self::from_secret(secret)
    }

    /// Generate a fresh random key pair.
    pub fn generate() -> Result<Self, KeyError> {
        Self::from_secret(SecretKey::random(&mut rand_core::OsRng))
    }

    fn from_secret(secret: SecretKey) -> Result<Self, KeyError> {
        let der = secret
            .to_pkcs8_der()
            .map_err(|e| KeyError::Encoding(e.to_string()))?;
        let encoding = EncodingKey::from_ec_der(der.as_bytes());

        let point = secret.public_key().to_encoded_point(false);
        let (x, y) = match (point.x(), point.y()) {
            (Some(x), Some(y)) => (URL_SAFE_NO_PAD.encode(x), URL_SAFE_NO_PAD.encode(y)),
            _ => return Err(KeyError::Encoding("public key is the identity point".into())),
        };
        let decoding = DecodingKey::from_ec_components(&x, &y)
            .map_err(|e| KeyError::Encoding(e.to_string()))?;

        let pair = Self {
            secret,
            encoding,
            decoding,
        };
        pair.self_check()?;
        Ok(pair)
    }

    /// Sign a fixed payload and verify it with the derived public key.
    fn self_check(&self) -> Result<(), KeyError> {
        let payload = serde_json::json!({ "check": "hilo-key-self-check" });
        let token = jsonwebtoken::encode(&Header::new(Algorithm::ES256), &payload, &self.encoding)
            .map_err(|e| KeyError::SelfCheck(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::ES256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        jsonwebtoken::decode::<serde_json::Value>(&token, &self.decoding, &validation)
            .map(|_| ())
            .map_err(|e| KeyError::SelfCheck(e.to_string()))
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }

    /// Export the private key as PKCS#8 PEM.
    pub fn to_pkcs8_pem(&self) -> Result<Zeroizing<String>, KeyError> {
        self.secret
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| KeyError::Encoding(e.to_string()))
    }

    /// Export the public key as SPKI PEM (`BEGIN PUBLIC KEY`).
    pub fn public_key_pem(&self) -> Result<String, KeyError> {
        self.secret
            .public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| KeyError::Encoding(e.to_string()))
    }
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("algorithm", &"ES256")
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

//! # hilo-crypto: ES256 Token Cryptography
//!
//! Key material and the compact-JWS token codec for the Hilo API:
//!
//! - **Key material** ([`SigningKeyPair`]): one P-256 private key loaded from
//!   PEM (PKCS#8 or SEC1), inline or from a file, with its derived public
//!   key. Construction fails unless the pair can verify its own signature.
//! - **Token codec** ([`TokenCodec`]): ES256 sign and verify over
//!   [`hilo_core::Claims`]. Verification pins the algorithm and does not
//!   judge expiry.
//! - **Refresh** ([`TokenCodec::refresh`]): re-signs an expired but
//!   otherwise valid token with a later expiry.
//!
//! ## Crate Policy
//!
//! - Depends only on `hilo-core` internally.
//! - No mocking of cryptographic operations in tests; every test signs and
//!   verifies with a real P-256 key.
//! - Key material never appears in `Debug` output or logs.

pub mod codec;
pub mod error;
pub mod keys;
pub mod refresh;

pub use codec::{SignedToken, TokenCodec};
pub use error::{KeyError, TokenError, VerificationFailure};
pub use keys::{KeySource, SigningKeyPair};

//! # hilo-cli: Operator CLI for the Hilo API
//!
//! Provides the `hilo` command-line interface for working with the
//! service's ES256 key material outside the running server.
//!
//! ## Subcommands
//!
//! - `hilo keygen`: generate a P-256 key pair as PEM files.
//! - `hilo token issue`: sign a token with chosen claims.
//! - `hilo token verify`: check a token's signature and expiry.
//! - `hilo token refresh`: renew an expired token.
//!
//! ```bash
//! hilo keygen --output ./keys --prefix es256
//! hilo token issue --key ./keys/es256_private.pem --user-id u-1 \
//!     --permission /api/v1/users --expires-in 3600
//! hilo token verify --key ./keys/es256_private.pem eyJhbGciOiJFUzI1NiJ9...
//! ```
//!
//! Every handler returns `anyhow::Result<u8>`; the `u8` is the process
//! exit code.

pub mod keygen;
pub mod token;

use std::path::Path;

use anyhow::{Context, Result};
use hilo_crypto::SigningKeyPair;

/// Load a signing key pair from a PEM file, with the path in any error.
pub fn load_key(path: &Path) -> Result<SigningKeyPair> {
    SigningKeyPair::from_pem_file(path)
        .with_context(|| format!("failed to load signing key: {}", path.display()))
}

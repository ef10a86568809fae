//! # Application State
//!
//! Shared state for the Axum application, passed to route handlers via the
//! `State` extractor. Holds the configuration and the token codec; nothing
//! in it is mutated after startup.

use std::sync::Arc;

use hilo_crypto::{KeyError, SigningKeyPair, TokenCodec};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub codec: Arc<TokenCodec>,
}

impl AppState {
    /// Load the signing key named by `config` and build the state.
    ///
    /// Fails if the key cannot be read, parsed, or self-verified.
    pub fn try_with_config(config: AppConfig) -> Result<Self, KeyError> {
        let keys = SigningKeyPair::load(&config.key_source)?;
        tracing::info!(source = ?config.key_source, "ES256 signing key loaded");
        Ok(Self::with_codec(config, TokenCodec::new(keys)))
    }

    /// Build the state around an existing codec.
    pub fn with_codec(config: AppConfig, codec: TokenCodec) -> Self {
        Self {
            config: Arc::new(config),
            codec: Arc::new(codec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilo_crypto::KeySource;
    use std::io::Write;

    #[test]
    fn loads_key_from_file_source() {
        let pair = SigningKeyPair::generate().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(pair.to_pkcs8_pem().unwrap().as_bytes()).unwrap();

        let config = AppConfig::with_key_source(KeySource::File(file.path().to_path_buf()));
        let state = AppState::try_with_config(config).unwrap();
        assert_eq!(
            state.codec.keys().public_key_pem().unwrap(),
            pair.public_key_pem().unwrap()
        );
    }

    #[test]
    fn unreadable_key_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::with_key_source(KeySource::File(dir.path().join("missing.pem")));
        let err = AppState::try_with_config(config).unwrap_err();
        assert!(matches!(err, KeyError::Read { .. }));
    }
}

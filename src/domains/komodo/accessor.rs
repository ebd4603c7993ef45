//! Shared access to the Komodo client.
//!
//! A [`ClientAccessor`] owns the connection settings and lazily builds one
//! client on first use. Every caller after that receives the same handle.
//! Tools never construct clients themselves; they go through [`ClientAccessor::get`].

use std::sync::{Arc, OnceLock};
use tracing::info;

use super::client::{KomodoApi, KomodoClient};
use super::error::KomodoError;
use crate::core::config::KomodoConfig;

/// Single-assignment holder for the process-wide Komodo client.
pub struct ClientAccessor {
    config: KomodoConfig,
    client: OnceLock<Arc<dyn KomodoApi>>,
}

impl ClientAccessor {
    /// Create an accessor that will build its client from `config` on first use.
    pub fn new(config: KomodoConfig) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    /// Create an accessor around an already-built client.
    pub fn with_client(client: Arc<dyn KomodoApi>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(client);
        Self {
            config: KomodoConfig::default(),
            client: cell,
        }
    }

    /// Get the shared client, building it on the first successful call.
    ///
    /// Fails with [`KomodoError::Config`] while any connection setting is
    /// missing; no request is attempted in that case.
    pub fn get(&self) -> Result<Arc<dyn KomodoApi>, KomodoError> {
        if let Some(client) = self.client.get() {
            return Ok(client.clone());
        }

        let (url, key, secret) = self.config.credentials()?;
        let client = self.client.get_or_init(|| {
            info!("Initializing Komodo client for {}", url);
            Arc::new(KomodoClient::new(url, key, secret))
        });

        Ok(client.clone())
    }

    /// Whether a client has been built (or installed) yet.
    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    /// Replace the connection settings and drop the current client.
    ///
    /// The next [`get`](Self::get) builds a fresh client.
    pub fn reinitialize(&mut self, config: KomodoConfig) {
        info!("Reinitializing Komodo client accessor");
        self.config = config;
        self.client = OnceLock::new();
    }
}

impl std::fmt::Debug for ClientAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientAccessor")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::komodo::testing::RecordingClient;

    fn full_config() -> KomodoConfig {
        KomodoConfig::new("http://komodo.local:9120", "key", "secret")
    }

    #[test]
    fn test_get_returns_same_handle() {
        let accessor = ClientAccessor::new(full_config());
        assert!(!accessor.is_initialized());

        let first = accessor.get().unwrap();
        let second = accessor.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(accessor.is_initialized());
    }

    #[test]
    fn test_missing_config_fails_every_call() {
        let accessor = ClientAccessor::new(KomodoConfig {
            url: Some("http://komodo.local".to_string()),
            key: None,
            secret: Some(String::new()),
        });

        for _ in 0..2 {
            match accessor.get() {
                Err(KomodoError::Config { missing }) => {
                    assert_eq!(missing, vec!["KOMODO_KEY", "KOMODO_SECRET"]);
                }
                other => panic!("expected config error, got {:?}", other.map(|_| ())),
            }
        }
        assert!(!accessor.is_initialized());
    }

    #[test]
    fn test_with_client_uses_installed_handle() {
        let stub = RecordingClient::new();
        let installed: Arc<dyn KomodoApi> = stub.clone();
        let accessor = ClientAccessor::with_client(installed.clone());

        let got = accessor.get().unwrap();
        assert!(Arc::ptr_eq(&got, &installed));
    }

    #[test]
    fn test_reinitialize_builds_new_handle() {
        let mut accessor = ClientAccessor::new(full_config());
        let before = accessor.get().unwrap();

        accessor.reinitialize(full_config());
        assert!(!accessor.is_initialized());

        let after = accessor.get().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_reinitialize_with_incomplete_config() {
        let mut accessor = ClientAccessor::new(full_config());
        accessor.get().unwrap();

        accessor.reinitialize(KomodoConfig::default());
        assert!(matches!(accessor.get(), Err(KomodoError::Config { .. })));
    }
}

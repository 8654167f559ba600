//! `ModelConfigManager` — CRUD for model configs plus the cached built-in default.

use std::sync::Arc;

use oda_core::reserved::{is_reserved_model_id, DEFAULT_MODEL_APP_NAME, DEFAULT_MODEL_CONFIG_ID};
use oda_core::OdaError;
use tracing::{debug, info};

use crate::error::ConfigResult;
use crate::store::ConfigStore;
use crate::types::ModelConfig;

/// Bootstrap-supplied default model fields. If all three are present at
/// construction time, [`ModelConfigManager`] caches a built-in default model
/// config under the reserved id; otherwise no default is available.
#[derive(Debug, Clone, Default)]
pub struct BootstrapModelDefaults {
    /// Default provider base URL.
    pub base_url: Option<String>,
    /// Default provider API key.
    pub api_key: Option<String>,
    /// Default model name.
    pub model: Option<String>,
}

/// CRUD manager for [`ModelConfig`] records, with one cached, read-only
/// built-in default bound to [`oda_core::reserved::DEFAULT_MODEL_CONFIG_ID`].
pub struct ModelConfigManager {
    store: Arc<dyn ConfigStore<ModelConfig>>,
    default: Option<ModelConfig>,
}

impl ModelConfigManager {
    /// Construct the manager, deriving the built-in default from `defaults`
    /// when all three bootstrap fields are present.
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore<ModelConfig>>, defaults: BootstrapModelDefaults) -> Self {
        let default = match (defaults.base_url, defaults.api_key, defaults.model) {
            (Some(base_url), Some(api_key), Some(model)) => {
                info!(model_id = DEFAULT_MODEL_CONFIG_ID, "caching built-in default model config");
                Some(ModelConfig {
                    app_name: DEFAULT_MODEL_APP_NAME.to_string(),
                    model_id: DEFAULT_MODEL_CONFIG_ID.to_string(),
                    base_url,
                    api_key,
                    model,
                })
            }
            _ => None,
        };
        Self { store, default }
    }

    /// Create a new model config.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::ReservedId` if `c.model_id` is the reserved default id;
    /// otherwise propagates the store's result.
    pub async fn create(&self, c: ModelConfig) -> ConfigResult<()> {
        if is_reserved_model_id(&c.model_id) {
            return Err(OdaError::ReservedId(c.model_id).into());
        }
        self.store.create(c).await
    }

    /// Look up a model config by id. Resolves the cached default directly
    /// without touching the store when `model_id` is the reserved id.
    pub async fn get(&self, app_name: &str, model_id: &str) -> ConfigResult<Option<ModelConfig>> {
        if is_reserved_model_id(model_id) {
            debug!(model_id, "resolved reserved default model config from cache");
            return Ok(self.default.clone());
        }
        self.store
            .get(&(app_name.to_string(), model_id.to_string()))
            .await
    }

    /// Replace an existing model config.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::ReservedId` if `c.model_id` is the reserved default id.
    pub async fn update(&self, c: ModelConfig) -> ConfigResult<()> {
        if is_reserved_model_id(&c.model_id) {
            return Err(OdaError::ReservedId(c.model_id).into());
        }
        self.store.update(c).await
    }

    /// Delete a model config by id.
    ///
    /// # Errors
    ///
    /// Returns `OdaError::ReservedId` if `model_id` is the reserved default id.
    pub async fn delete(&self, app_name: &str, model_id: &str) -> ConfigResult<()> {
        if is_reserved_model_id(model_id) {
            return Err(OdaError::ReservedId(model_id.to_string()).into());
        }
        self.store
            .delete(&(app_name.to_string(), model_id.to_string()))
            .await
    }

    /// List every stored model config, followed by the cached default (if any).
    pub async fn list(&self) -> ConfigResult<Vec<ModelConfig>> {
        let mut all = self.store.list().await?;
        if let Some(default) = &self.default {
            all.push(default.clone());
        }
        Ok(all)
    }

    /// `true` iff `get(app_name, model_id)` would resolve to a config.
    pub async fn validate(&self, app_name: &str, model_id: &str) -> ConfigResult<bool> {
        Ok(self.get(app_name, model_id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryConfigStore;

    fn model(app: &str, id: &str) -> ModelConfig {
        ModelConfig {
            app_name: app.to_string(),
            model_id: id.to_string(),
            base_url: "https://example.com".to_string(),
            api_key: "key".to_string(),
            model: "gpt".to_string(),
        }
    }

    fn manager_with_default() -> ModelConfigManager {
        ModelConfigManager::new(
            Arc::new(MemoryConfigStore::new()),
            BootstrapModelDefaults {
                base_url: Some("https://api.example.com".to_string()),
                api_key: Some("secret".to_string()),
                model: Some("gpt-4".to_string()),
            },
        )
    }

    #[tokio::test]
    async fn no_default_when_bootstrap_incomplete() {
        let mgr = ModelConfigManager::new(Arc::new(MemoryConfigStore::new()), BootstrapModelDefaults::default());
        assert_eq!(mgr.get("app", DEFAULT_MODEL_CONFIG_ID).await.unwrap(), None);
    }

    #[tokio::test]
    async fn default_resolves_from_cache() {
        let mgr = manager_with_default();
        let got = mgr.get("app", DEFAULT_MODEL_CONFIG_ID).await.unwrap();
        assert_eq!(got.unwrap().model_id, DEFAULT_MODEL_CONFIG_ID);
    }

    #[tokio::test]
    async fn create_rejects_reserved_id() {
        let mgr = manager_with_default();
        let err = mgr
            .create(model(DEFAULT_MODEL_APP_NAME, DEFAULT_MODEL_CONFIG_ID))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::ConfigError::Core(OdaError::ReservedId(_))));
    }

    #[tokio::test]
    async fn list_puts_default_last() {
        let mgr = manager_with_default();
        mgr.create(model("app", "m1")).await.unwrap();
        let all = mgr.list().await.unwrap();
        assert_eq!(all.last().unwrap().model_id, DEFAULT_MODEL_CONFIG_ID);
        assert_eq!(all.first().unwrap().model_id, "m1");
    }

    #[tokio::test]
    async fn validate_checks_existence() {
        let mgr = manager_with_default();
        assert!(!mgr.validate("app", "missing").await.unwrap());
        mgr.create(model("app", "m1")).await.unwrap();
        assert!(mgr.validate("app", "m1").await.unwrap());
    }
}

use std::sync::Arc;

use crate::{
    auth::{GrantedRole, RoleCheck},
    config::Config,
    store::{AnyThemeStore, ThemeStore},
};

#[derive(Clone)]
pub struct HttpState {
    pub config: Config,
    pub store: Arc<AnyThemeStore>,
    pub roles: Arc<dyn RoleCheck>,
}

impl HttpState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let backend = config.settings_backend().map_err(|err| {
            anyhow::anyhow!(
                "Failed to open theme storage in {}: {}",
                config.data.display(),
                err
            )
        })?;

        let store = Arc::new(ThemeStore::new(backend)?);

        Ok(Self::new_with_store(config, store))
    }

    pub fn new_with_store(config: Config, store: Arc<AnyThemeStore>) -> Self {
        let roles = Arc::new(GrantedRole(config.granted_role));

        Self {
            config,
            store,
            roles,
        }
    }
}

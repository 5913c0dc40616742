use std::sync::Arc;

use crate::auth::{IdentityProvider, TokenSigner};
use crate::config::AppConfig;
use crate::database::Store;
use crate::services::{CatalogService, UserService};
use crate::storage::{BlobStore, PictureManager};

/// Everything a request handler needs, injected once at router construction
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub catalog: CatalogService,
    pub users: UserService,
    pub tokens: TokenSigner,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Store,
        blobs: Arc<dyn BlobStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let pictures = PictureManager::new(blobs, &config.uploads.allowed_extensions);
        Self {
            tokens: TokenSigner::new(&config.security),
            catalog: CatalogService::new(store.clone(), pictures),
            users: UserService::new(store.clone()),
            config: Arc::new(config),
            store,
            identity,
        }
    }
}

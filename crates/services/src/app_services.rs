use std::sync::Arc;

use electro_core::model::SiteConfig;
use storage::repository::Storage;

use crate::Clock;
use crate::auth_service::AuthService;
use crate::error::AppServicesError;
use crate::local_store::LocalStore;
use crate::notifications::NotificationCenter;
use crate::observer::StoreObserver;
use crate::theme_service::ThemeService;

/// Wires the store façade and the services that sit on it.
#[derive(Clone)]
pub struct AppServices {
    config: Arc<SiteConfig>,
    store: Arc<LocalStore>,
    auth: Arc<AuthService>,
    theme: Arc<ThemeService>,
    notifications: Arc<NotificationCenter>,
}

impl AppServices {
    #[must_use]
    pub fn new(
        storage: &Storage,
        clock: Clock,
        config: SiteConfig,
        observer: Arc<dyn StoreObserver>,
    ) -> Self {
        let store = Arc::new(LocalStore::new(Arc::clone(&storage.local), observer));
        let notifications = Arc::new(NotificationCenter::new(clock));
        let auth = Arc::new(AuthService::new(
            clock,
            Arc::clone(&store),
            config.admin().clone(),
        ));
        let theme = Arc::new(ThemeService::new(
            Arc::clone(&store),
            Arc::clone(&notifications),
        ));

        Self {
            config: Arc::new(config),
            store,
            auth,
            theme,
            notifications,
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: SiteConfig,
        observer: Arc<dyn StoreObserver>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, clock, config, observer))
    }

    /// Page-load sequence: refresh auth state, then apply the saved theme.
    pub async fn initialize(&self) {
        self.auth.check_auth_status().await;
        self.theme.load_saved_theme().await;
        tracing::info!("{} initialisé", self.config.banner());
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> Arc<LocalStore> {
        Arc::clone(&self.store)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn theme(&self) -> Arc<ThemeService> {
        Arc::clone(&self.theme)
    }

    #[must_use]
    pub fn notifications(&self) -> Arc<NotificationCenter> {
        Arc::clone(&self.notifications)
    }
}

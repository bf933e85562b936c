use std::sync::Arc;

use electro_core::model::{NotificationKind, Theme};

use crate::local_store::LocalStore;
use crate::notifications::NotificationCenter;

/// Applies the stored theme on load and flips it on demand.
#[derive(Clone)]
pub struct ThemeService {
    store: Arc<LocalStore>,
    notifications: Arc<NotificationCenter>,
}

impl ThemeService {
    #[must_use]
    pub fn new(store: Arc<LocalStore>, notifications: Arc<NotificationCenter>) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Read the saved theme and hand it to the page without writing anything.
    pub async fn load_saved_theme(&self) -> Theme {
        let theme = self.store.get_theme().await;
        self.store.observer().theme_changed(theme);
        theme
    }

    /// Switch light/dark, persist it and announce the change with a toast.
    pub async fn toggle_theme(&self) -> Theme {
        let next = self.store.get_theme().await.toggled();
        self.store.set_theme(next).await;
        self.notifications.show(
            format!("Thème {} activé", next.label_fr()),
            NotificationKind::Info,
        );
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Clock;
    use electro_core::time::fixed_now;
    use storage::repository::InMemoryStore;

    fn service() -> (ThemeService, Arc<NotificationCenter>) {
        let store = Arc::new(LocalStore::detached(Arc::new(InMemoryStore::new())));
        let notifications = Arc::new(NotificationCenter::new(Clock::fixed(fixed_now())));
        (ThemeService::new(store, Arc::clone(&notifications)), notifications)
    }

    #[tokio::test]
    async fn toggle_flips_and_announces() {
        let (themes, notifications) = service();
        assert_eq!(themes.load_saved_theme().await, Theme::Light);

        assert_eq!(themes.toggle_theme().await, Theme::Dark);
        assert_eq!(
            notifications.current().unwrap().message(),
            "Thème sombre activé"
        );

        assert_eq!(themes.toggle_theme().await, Theme::Light);
        assert_eq!(
            notifications.current().unwrap().message(),
            "Thème clair activé"
        );
        assert_eq!(themes.load_saved_theme().await, Theme::Light);
    }
}

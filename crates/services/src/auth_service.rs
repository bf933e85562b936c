//! Client-only sign-in. Nothing here is verified by a server; the session is
//! whatever the browser has stored.

use std::sync::Arc;

use serde_json::json;

use electro_core::model::{AdminCredentials, UserSession};

use crate::Clock;
use crate::error::{ADMIN_LOGIN_PAGE, AuthError};
use crate::local_store::LocalStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(&'static str),
    Logout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserMenuEntry {
    pub label: &'static str,
    pub action: MenuAction,
}

/// Dropdown shown when a signed-in user clicks their name in the navbar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserMenu {
    pub name: String,
    pub email: String,
    pub entries: Vec<UserMenuEntry>,
}

impl UserMenu {
    fn for_session(session: &UserSession) -> Self {
        Self {
            name: session.name().to_string(),
            email: session.email().to_string(),
            entries: vec![
                UserMenuEntry {
                    label: "Mes cours",
                    action: MenuAction::Navigate("cours-details.html"),
                },
                UserMenuEntry {
                    label: "Mes projets",
                    action: MenuAction::Navigate("galerie-projets.html"),
                },
                UserMenuEntry {
                    label: "Déconnexion",
                    action: MenuAction::Logout,
                },
            ],
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    store: Arc<LocalStore>,
    admin: AdminCredentials,
}

impl AuthService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<LocalStore>, admin: AdminCredentials) -> Self {
        Self {
            clock,
            store,
            admin,
        }
    }

    /// Page-load check: read the stored user and push it to the UI.
    pub async fn check_auth_status(&self) -> Option<UserSession> {
        let user = self.store.get_session().await;
        self.store.observer().session_changed(user.as_ref());
        user
    }

    pub async fn current_user(&self) -> Option<UserSession> {
        self.store.get_session().await
    }

    /// Simulated login: validate the form fields and store the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the name is blank or the email is
    /// malformed.
    pub async fn login(&self, name: &str, email: &str) -> Result<UserSession, AuthError> {
        let session = UserSession::new(name, email)?
            .with_field("logged_in_at", json!(self.clock.now().to_rfc3339()));
        self.store.set_session(&session).await;
        tracing::info!(email = session.email(), "user signed in");
        Ok(session)
    }

    pub async fn logout(&self) {
        self.store.clear_session().await;
        tracing::info!("user signed out");
    }

    pub async fn user_menu(&self) -> Option<UserMenu> {
        self.store
            .get_session()
            .await
            .map(|session| UserMenu::for_session(&session))
    }

    pub async fn is_admin(&self) -> bool {
        self.store.is_admin().await
    }

    /// Gate for admin pages. Non-admins are sent to the admin login page.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AdminRequired` when the admin flag is not set.
    pub async fn require_admin(&self) -> Result<(), AuthError> {
        if self.store.is_admin().await {
            return Ok(());
        }
        self.store.observer().navigate_to(ADMIN_LOGIN_PAGE);
        Err(AuthError::AdminRequired {
            redirect_to: ADMIN_LOGIN_PAGE,
        })
    }

    /// # Errors
    ///
    /// Returns `AuthError::InvalidAdminCredentials` when the pair does not
    /// match the configured admin account.
    pub async fn admin_login(&self, attempt: &AdminCredentials) -> Result<(), AuthError> {
        if !self.admin.matches(attempt) {
            tracing::warn!(email = %attempt.email, "rejected admin login");
            return Err(AuthError::InvalidAdminCredentials);
        }
        self.store.set_admin(true).await;
        tracing::info!("admin signed in");
        Ok(())
    }

    pub async fn admin_logout(&self) {
        self.store.set_admin(false).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use electro_core::model::SessionError;
    use electro_core::time::fixed_now;
    use storage::repository::InMemoryStore;

    fn service() -> AuthService {
        let store = Arc::new(LocalStore::detached(Arc::new(InMemoryStore::new())));
        AuthService::new(
            Clock::fixed(fixed_now()),
            store,
            AdminCredentials::new("admin@electrolearn.fr", "admin123"),
        )
    }

    #[tokio::test]
    async fn login_then_logout() {
        let auth = service();
        assert!(auth.check_auth_status().await.is_none());

        let session = auth.login("Ada", "ada@example.fr").await.unwrap();
        assert_eq!(
            session.field("logged_in_at"),
            Some(&json!("2023-11-14T22:13:20+00:00"))
        );
        assert_eq!(auth.current_user().await, Some(session));

        auth.logout().await;
        assert!(auth.current_user().await.is_none());
        assert!(auth.user_menu().await.is_none());
    }

    #[tokio::test]
    async fn invalid_login_leaves_storage_untouched() {
        let auth = service();
        let err = auth.login("Ada", "not-an-email").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Session(SessionError::InvalidEmail(_))
        ));
        assert!(auth.current_user().await.is_none());
    }

    #[tokio::test]
    async fn menu_lists_user_and_links() {
        let auth = service();
        auth.login("Ada", "ada@example.fr").await.unwrap();
        let menu = auth.user_menu().await.unwrap();
        assert_eq!(menu.name, "Ada");
        assert_eq!(menu.email, "ada@example.fr");
        assert_eq!(
            menu.entries.iter().map(|e| e.action).collect::<Vec<_>>(),
            vec![
                MenuAction::Navigate("cours-details.html"),
                MenuAction::Navigate("galerie-projets.html"),
                MenuAction::Logout,
            ]
        );
    }

    #[tokio::test]
    async fn admin_gate() {
        let auth = service();
        assert!(matches!(
            auth.require_admin().await,
            Err(AuthError::AdminRequired {
                redirect_to: "admin-login.html"
            })
        ));

        let wrong = AdminCredentials::new("admin@electrolearn.fr", "guess");
        assert!(matches!(
            auth.admin_login(&wrong).await,
            Err(AuthError::InvalidAdminCredentials)
        ));
        assert!(!auth.is_admin().await);

        let right = AdminCredentials::new("admin@electrolearn.fr", "admin123");
        auth.admin_login(&right).await.unwrap();
        assert!(auth.require_admin().await.is_ok());

        auth.admin_logout().await;
        assert!(!auth.is_admin().await);
    }
}

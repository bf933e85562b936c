//! Shared error types for the services crate.

use thiserror::Error;

use electro_core::model::SessionError;
use storage::sqlite::SqliteInitError;

/// Page an unauthenticated admin visitor is sent to.
pub const ADMIN_LOGIN_PAGE: &str = "admin-login.html";

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("admin access required, redirecting to {redirect_to}")]
    AdminRequired { redirect_to: &'static str },
    #[error("invalid admin credentials")]
    InvalidAdminCredentials,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod error;
pub mod local_store;
pub mod notifications;
pub mod observer;
pub mod theme_service;

pub use electro_core::Clock;

pub use app_services::AppServices;
pub use auth_service::{AuthService, MenuAction, UserMenu, UserMenuEntry};
pub use error::{ADMIN_LOGIN_PAGE, AppServicesError, AuthError};
pub use local_store::LocalStore;
pub use notifications::NotificationCenter;
pub use observer::{NoopObserver, StoreObserver, TracingObserver};
pub use theme_service::ThemeService;

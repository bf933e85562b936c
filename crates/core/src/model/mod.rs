mod admin;
mod ids;
mod notification;
mod preferences;
mod progress;
mod session;
mod site_config;
mod theme;

pub use admin::AdminCredentials;
pub use ids::{CourseId, LessonId};
pub use notification::{
    DEFAULT_NOTIFICATION_MS, Notification, NotificationKind, default_notification_duration,
};
pub use preferences::Preferences;
pub use progress::{CourseProgress, LessonProgress, Progress};
pub use session::{SessionError, UserSession};
pub use site_config::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, DEFAULT_API_BASE_URL, DEFAULT_SITE_NAME,
    DEFAULT_SITE_VERSION, SiteConfig, SiteConfigDraft, SiteConfigError,
};
pub use theme::{ParseThemeError, Theme};

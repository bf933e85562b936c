use electro_core::model::{Theme, UserSession};

/// Hooks the page layer implements to react to store mutations.
///
/// All methods default to doing nothing so implementors only override what
/// they render.
pub trait StoreObserver: Send + Sync {
    /// The signed-in user changed or was read on page load.
    fn session_changed(&self, _session: Option<&UserSession>) {}

    /// A theme was stored or loaded and should be applied.
    fn theme_changed(&self, _theme: Theme) {}

    /// The current page should reload (after logout).
    fn reload_requested(&self) {}

    /// The browser should navigate to `target`.
    fn navigate_to(&self, _target: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StoreObserver for NoopObserver {}

/// Logs every UI callback; used by the CLI where there is nothing to redraw.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StoreObserver for TracingObserver {
    fn session_changed(&self, session: Option<&UserSession>) {
        match session {
            Some(user) => tracing::info!(name = user.name(), "session active"),
            None => tracing::info!("no active session"),
        }
    }

    fn theme_changed(&self, theme: Theme) {
        tracing::info!(%theme, "theme applied");
    }

    fn reload_requested(&self) {
        tracing::info!("page reload requested");
    }

    fn navigate_to(&self, target: &str) {
        tracing::info!(destination = target, "navigation requested");
    }
}

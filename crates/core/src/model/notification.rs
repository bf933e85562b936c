use chrono::{DateTime, Duration, Utc};

/// Toast severity. Each kind maps to a fixed background colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Lenient parse: anything unrecognised is shown as `Info`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "#48BB78",
            Self::Error => "#F56565",
            Self::Warning => "#ED8936",
            Self::Info => "#4299E1",
        }
    }

    /// CSS class carried by the toast element.
    #[must_use]
    pub fn css_class(self) -> String {
        format!("custom-notification notification-{}", self.as_str())
    }
}

/// How long a toast stays up when the caller does not say, in milliseconds.
pub const DEFAULT_NOTIFICATION_MS: i64 = 5_000;

#[must_use]
pub fn default_notification_duration() -> Duration {
    Duration::milliseconds(DEFAULT_NOTIFICATION_MS)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    message: String,
    kind: NotificationKind,
    shown_at: DateTime<Utc>,
    duration: Duration,
}

impl Notification {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        kind: NotificationKind,
        shown_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at,
            duration,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    #[must_use]
    pub fn shown_at(&self) -> DateTime<Utc> {
        self.shown_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.shown_at + self.duration
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Colour scheme applied to `<body data-theme>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown theme: {0}")]
pub struct ParseThemeError(pub String);

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Adjective used in the "Thème ... activé" toast.
    #[must_use]
    pub fn label_fr(self) -> &'static str {
        match self {
            Theme::Light => "clair",
            Theme::Dark => "sombre",
        }
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

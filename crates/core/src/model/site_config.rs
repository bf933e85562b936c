use thiserror::Error;
use url::Url;

use super::admin::AdminCredentials;

pub const DEFAULT_SITE_NAME: &str = "ElectroLearn";
pub const DEFAULT_SITE_VERSION: &str = "1.0.0";
pub const DEFAULT_API_BASE_URL: &str = "https://api.electrolearn.fr/v1";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@electrolearn.fr";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    site_name: String,
    version: String,
    api_base_url: Url,
    admin: AdminCredentials,
}

/// Unvalidated config as read from env or flags. `None` means "use default".
#[derive(Clone, Debug, Default)]
pub struct SiteConfigDraft {
    pub site_name: Option<String>,
    pub version: Option<String>,
    pub api_base_url: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SiteConfigError {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("admin password cannot be empty")]
    EmptyAdminPassword,
}

impl SiteConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill in defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns `SiteConfigError` if the base URL does not parse or the admin
    /// password override is blank.
    pub fn validate(self) -> Result<SiteConfig, SiteConfigError> {
        let site_name =
            normalize_optional(self.site_name).unwrap_or_else(|| DEFAULT_SITE_NAME.to_string());
        let version = normalize_optional(self.version)
            .unwrap_or_else(|| DEFAULT_SITE_VERSION.to_string());
        let raw_url = normalize_optional(self.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url =
            Url::parse(&raw_url).map_err(|_| SiteConfigError::InvalidBaseUrl(raw_url.clone()))?;

        let admin_email =
            normalize_optional(self.admin_email).unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string());
        let admin_password = match self.admin_password {
            Some(pw) if pw.is_empty() => return Err(SiteConfigError::EmptyAdminPassword),
            Some(pw) => pw,
            None => DEFAULT_ADMIN_PASSWORD.to_string(),
        };

        Ok(SiteConfig {
            site_name,
            version,
            api_base_url,
            admin: AdminCredentials::new(admin_email, admin_password),
        })
    }
}

impl SiteConfig {
    #[must_use]
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    #[must_use]
    pub fn admin(&self) -> &AdminCredentials {
        &self.admin
    }

    /// "ElectroLearn v1.0.0", as logged at startup.
    #[must_use]
    pub fn banner(&self) -> String {
        format!("{} v{}", self.site_name, self.version)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_uses_site_defaults() {
        let cfg = SiteConfigDraft::new().validate().unwrap();
        assert_eq!(cfg.site_name(), DEFAULT_SITE_NAME);
        assert_eq!(cfg.api_base_url().as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(cfg.admin().email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(cfg.banner(), "ElectroLearn v1.0.0");
    }

    #[test]
    fn blank_overrides_fall_back_to_defaults() {
        let cfg = SiteConfigDraft {
            site_name: Some("   ".into()),
            api_base_url: Some(String::new()),
            ..SiteConfigDraft::default()
        }
        .validate()
        .unwrap();
        assert_eq!(cfg.site_name(), DEFAULT_SITE_NAME);
        assert_eq!(cfg.api_base_url().as_str(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn rejects_bad_url_and_empty_password() {
        let err = SiteConfigDraft {
            api_base_url: Some("not a url".into()),
            ..SiteConfigDraft::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, SiteConfigError::InvalidBaseUrl("not a url".into()));

        let err = SiteConfigDraft {
            admin_password: Some(String::new()),
            ..SiteConfigDraft::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, SiteConfigError::EmptyAdminPassword);
    }
}

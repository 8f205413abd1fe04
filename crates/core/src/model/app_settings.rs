use thiserror::Error;
use url::Url;

pub const DEFAULT_API_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_STUDENT_NAME: &str = "Khang";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, PartialEq, Eq)]
pub struct AppSettings {
    api_key: Option<String>,
    api_model: String,
    api_base_url: String,
    student_name: String,
    report_recipient: Option<String>,
    request_timeout_secs: u64,
}

#[derive(Clone, Debug, Default)]
pub struct AppSettingsDraft {
    pub api_key: Option<String>,
    pub api_model: Option<String>,
    pub api_base_url: Option<String>,
    pub student_name: Option<String>,
    pub report_recipient: Option<String>,
    pub request_timeout_secs: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,
    #[error("invalid report recipient {0:?}")]
    InvalidRecipient(String),
    #[error("invalid request timeout {0:?}")]
    InvalidTimeout(String),
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill unset fields from `TUTOR_*` environment variables.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Fill unset fields through `lookup` (keyed by `TUTOR_*` variable names).
    #[must_use]
    pub fn with_lookup(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: self.api_key.or_else(|| lookup("TUTOR_API_KEY")),
            api_model: self.api_model.or_else(|| lookup("TUTOR_MODEL")),
            api_base_url: self.api_base_url.or_else(|| lookup("TUTOR_BASE_URL")),
            student_name: self.student_name.or_else(|| lookup("TUTOR_STUDENT")),
            report_recipient: self.report_recipient.or_else(|| lookup("TUTOR_REPORT_TO")),
            request_timeout_secs: self
                .request_timeout_secs
                .or_else(|| lookup("TUTOR_TIMEOUT_SECS")),
        }
    }

    /// Validate and normalize the draft, applying defaults for unset fields.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the base URL, recipient, or timeout is present but invalid.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let api_key = normalize_optional(self.api_key);
        let api_model =
            normalize_optional(self.api_model).unwrap_or_else(|| DEFAULT_API_MODEL.to_string());
        let api_base_url = normalize_optional(self.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let student_name = normalize_optional(self.student_name)
            .unwrap_or_else(|| DEFAULT_STUDENT_NAME.to_string());
        let report_recipient = normalize_optional(self.report_recipient);

        if Url::parse(&api_base_url).is_err() {
            return Err(AppSettingsError::InvalidBaseUrl);
        }

        if let Some(recipient) = report_recipient.as_ref() {
            let valid = recipient
                .split_once('@')
                .is_some_and(|(user, host)| !user.is_empty() && host.contains('.'));
            if !valid {
                return Err(AppSettingsError::InvalidRecipient(recipient.clone()));
            }
        }

        let request_timeout_secs = match normalize_optional(self.request_timeout_secs) {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(AppSettingsError::InvalidTimeout(raw)),
            },
        };

        Ok(AppSettings {
            api_key,
            api_model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            student_name,
            report_recipient,
            request_timeout_secs,
        })
    }
}

impl AppSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn api_model(&self) -> &str {
        &self.api_model
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    #[must_use]
    pub fn report_recipient(&self) -> Option<&str> {
        self.report_recipient.as_deref()
    }

    #[must_use]
    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_model: DEFAULT_API_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            student_name: DEFAULT_STUDENT_NAME.to_string(),
            report_recipient: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_model", &self.api_model)
            .field("api_base_url", &self.api_base_url)
            .field("student_name", &self.student_name)
            .field("report_recipient", &self.report_recipient)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
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
    fn defaults_fill_blank_fields() {
        let settings = AppSettingsDraft {
            api_key: Some("  ".into()),
            ..AppSettingsDraft::new()
        }
        .validate()
        .unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn lookup_only_fills_missing_fields() {
        let settings = AppSettingsDraft {
            api_model: Some("gemini-2.0-flash".into()),
            ..AppSettingsDraft::new()
        }
        .with_lookup(|key| match key {
            "TUTOR_API_KEY" => Some("secret".into()),
            "TUTOR_MODEL" => Some("ignored".into()),
            "TUTOR_TIMEOUT_SECS" => Some("15".into()),
            _ => None,
        })
        .validate()
        .unwrap();
        assert_eq!(settings.api_key(), Some("secret"));
        assert_eq!(settings.api_model(), "gemini-2.0-flash");
        assert_eq!(settings.request_timeout_secs(), 15);
        assert!(!format!("{settings:?}").contains("secret"));
    }

    #[test]
    fn rejects_bad_values() {
        let bad_url = AppSettingsDraft {
            api_base_url: Some("not a url".into()),
            ..AppSettingsDraft::new()
        };
        assert_eq!(bad_url.validate(), Err(AppSettingsError::InvalidBaseUrl));

        let bad_recipient = AppSettingsDraft {
            report_recipient: Some("parent".into()),
            ..AppSettingsDraft::new()
        };
        assert!(matches!(
            bad_recipient.validate(),
            Err(AppSettingsError::InvalidRecipient(_))
        ));

        let bad_timeout = AppSettingsDraft {
            request_timeout_secs: Some("0".into()),
            ..AppSettingsDraft::new()
        };
        assert!(matches!(
            bad_timeout.validate(),
            Err(AppSettingsError::InvalidTimeout(_))
        ));
    }
}

//! # Form Configuration
//!
//! Host-tunable behavior of a form session: when fields are validated while
//! the user edits, and which country national phone numbers belong to.
//!
//! Loaded from YAML. Every key is optional; an empty document yields
//! [`FormConfig::default()`].
//!
//! ```yaml
//! validation_mode: on_blur
//! revalidate_mode: on_change
//! default_country: TR
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::country;
use crate::error::ConfigError;

/// Country used for phone numbers typed without an international prefix.
pub const DEFAULT_COUNTRY: &str = "TR";

/// When a field is validated before the first submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Only on submit.
    #[default]
    OnSubmit,
    /// On every value change.
    OnChange,
    /// When the field loses focus.
    OnBlur,
    /// On first blur, then on every change.
    OnTouched,
    /// On change and on blur.
    All,
}

/// When a field is re-validated after the first submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevalidateMode {
    /// On every value change.
    #[default]
    OnChange,
    /// When the field loses focus.
    OnBlur,
    /// Only on the next submit.
    OnSubmit,
}

/// Configuration of one form session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Validation trigger before the first submit.
    pub validation_mode: ValidationMode,
    /// Validation trigger after the first submit.
    pub revalidate_mode: RevalidateMode,
    /// ISO-3166 alpha-2 code for national phone numbers.
    pub default_country: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::default(),
            revalidate_mode: RevalidateMode::default(),
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl FormConfig {
    /// Parse and check a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML or unknown enum
    /// values, and [`ConfigError::UnknownCountry`] when `default_country` is
    /// not in the calling-code table.
    pub fn from_yaml_str(doc: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document; treat it as "all defaults".
        let config: FormConfig = if doc.trim().is_empty() {
            FormConfig::default()
        } else {
            serde_yaml::from_str(doc)?
        };
        config.check()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let doc = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&doc)
    }

    /// Check cross-field constraints not expressible in serde.
    pub fn check(&self) -> Result<(), ConfigError> {
        if !country::is_known(&self.default_country) {
            return Err(ConfigError::UnknownCountry(self.default_country.clone()));
        }
        Ok(())
    }

    /// Calling code of the default country, without the `+`.
    pub fn default_calling_code(&self) -> Option<&'static str> {
        country::calling_code(&self.default_country)
    }
}

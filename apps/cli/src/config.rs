//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! Command-line flags override whatever is loaded here.

use std::env;

use tally_core::{CurrencyDisplay, DateStyle, FormatOptions, ValidateOptions, MAX_LINE_ITEMS};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Locale override (`TALLY_LOCALE`); `None` derives it from the currency
    pub locale: Option<String>,

    /// Date style (`TALLY_DATE_STYLE`, default: medium)
    pub date_style: DateStyle,

    /// Currency display (`TALLY_CURRENCY_DISPLAY`, default: symbol)
    pub currency_display: CurrencyDisplay,

    /// Line-item cap (`TALLY_MAX_LINE_ITEMS`, default: 100, `0` disables)
    pub max_line_items: Option<usize>,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            locale: None,
            date_style: DateStyle::default(),
            currency_display: CurrencyDisplay::default(),
            max_line_items: Some(MAX_LINE_ITEMS),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CliConfig::default();

        let locale = lookup("TALLY_LOCALE")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let date_style = match lookup("TALLY_DATE_STYLE") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TALLY_DATE_STYLE".to_string()))?,
            None => defaults.date_style,
        };

        let currency_display = match lookup("TALLY_CURRENCY_DISPLAY") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TALLY_CURRENCY_DISPLAY".to_string()))?,
            None => defaults.currency_display,
        };

        let max_line_items = match lookup("TALLY_MAX_LINE_ITEMS") {
            Some(value) => {
                let max: usize = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("TALLY_MAX_LINE_ITEMS".to_string()))?;
                (max > 0).then_some(max)
            }
            None => defaults.max_line_items,
        };

        Ok(CliConfig {
            locale,
            date_style,
            currency_display,
            max_line_items,
        })
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            locale: self.locale.clone(),
            date_style: Some(self.date_style),
            currency_display: Some(self.currency_display),
        }
    }

    pub fn validate_options(&self) -> ValidateOptions {
        ValidateOptions {
            max_line_items: self.max_line_items,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<CliConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.date_style, DateStyle::Medium);
        assert_eq!(config.currency_display, CurrencyDisplay::Symbol);
        assert_eq!(config.max_line_items, Some(100));
        assert_eq!(config.format_options().locale, None);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TALLY_LOCALE", " fr-FR "),
            ("TALLY_DATE_STYLE", "LONG"),
            ("TALLY_CURRENCY_DISPLAY", "code"),
            ("TALLY_MAX_LINE_ITEMS", "25"),
        ])
        .unwrap();

        assert_eq!(config.locale.as_deref(), Some("fr-FR"));
        assert_eq!(config.date_style, DateStyle::Long);
        assert_eq!(config.currency_display, CurrencyDisplay::Code);
        assert_eq!(config.validate_options().max_line_items, Some(25));
    }

    #[test]
    fn test_zero_disables_cap() {
        let config = load(&[("TALLY_MAX_LINE_ITEMS", "0")]).unwrap();
        assert_eq!(config.max_line_items, None);
    }

    #[test]
    fn test_blank_locale_is_ignored() {
        let config = load(&[("TALLY_LOCALE", "  ")]).unwrap();
        assert_eq!(config.locale, None);
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("TALLY_DATE_STYLE", "fancy")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for TALLY_DATE_STYLE");

        let err = load(&[("TALLY_CURRENCY_DISPLAY", "emoji")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var) if var == "TALLY_CURRENCY_DISPLAY"));

        let err = load(&[("TALLY_MAX_LINE_ITEMS", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var) if var == "TALLY_MAX_LINE_ITEMS"));
    }
}

//! Editor configuration types.

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::path::PropertyPath;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "locales[2]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Options accepted by the translation editor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Ordered list of locales to manage. Order defines the output order of
    /// the reconciled collection.
    pub locales: Vec<String>,

    /// Property path of the locale field on untyped records. Typed items
    /// read and write their locale through the schema accessors instead, so
    /// this option only matters in record mode.
    pub locale_field_name: String,

    /// Enables the special "null" locale. When set, a slot whose locale is
    /// `None` is managed in front of the configured locales.
    pub null_locale_enabled: bool,

    /// Whether the editor should open with the "null" locale selected.
    pub null_locale_selected: bool,

    /// Remove translation items whose entire payload is empty after
    /// submission.
    pub auto_remove_empty_translations: bool,

    /// Fields that are always considered empty no matter their contents, for
    /// removal purposes (typically audit timestamps).
    pub auto_remove_ignore_fields: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            locales: Vec::new(),
            locale_field_name: "lang".to_string(),
            null_locale_enabled: false,
            null_locale_selected: false,
            auto_remove_empty_translations: true,
            auto_remove_ignore_fields: vec!["created_at".to_string(), "updated_at".to_string()],
        }
    }
}

impl EditorConfig {
    /// Convenience constructor for the common case of configuring locales
    /// only.
    #[must_use]
    pub fn with_locales<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { locales: locales.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// # Errors
    /// - No locale is configured
    /// - A locale appears more than once
    /// - The locale field name is not a valid property path
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.locales.is_empty() {
            errors.push(ValidationError::new(
                "locales",
                "The translation editor requires at least one locale to manage",
            ));
        }

        for (index, locale) in self.locales.iter().enumerate() {
            if self.locales.iter().take(index).any(|earlier| earlier == locale) {
                errors.push(ValidationError::new(
                    format!("locales[{index}]"),
                    format!("Duplicate locale '{locale}'"),
                ));
            }
        }

        if let Err(e) = PropertyPath::parse(&self.locale_field_name) {
            errors.push(ValidationError::new(
                "localeFieldName",
                format!("Invalid property path '{}': {e}", self.locale_field_name),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_config() {
        let config = EditorConfig::with_locales(["en", "lt"]);

        assert_that!(config.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_config() {
        let json = r#"{"locales": ["en", "fr"], "nullLocaleEnabled": true}"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();

        assert_that!(config.locales, elements_are![eq("en"), eq("fr")]);
        assert_that!(config.null_locale_enabled, eq(true));
        assert_that!(config.locale_field_name, eq("lang"));
        assert_that!(config.auto_remove_empty_translations, eq(true));
        assert_that!(
            config.auto_remove_ignore_fields,
            elements_are![eq("created_at"), eq("updated_at")]
        );
    }

    #[rstest]
    fn validate_empty_locales() {
        let config = EditorConfig::default();

        let result = config.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("locales")),
                field!(ValidationError.message, contains_substring("at least one locale"))
            ]])
        );
    }

    #[rstest]
    fn validate_duplicate_locales() {
        let config = EditorConfig::with_locales(["en", "fr", "en"]);

        let result = config.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("locales[2]")),
                field!(ValidationError.message, contains_substring("Duplicate locale 'en'"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_locale_field_name() {
        let config = EditorConfig {
            locale_field_name: "attributes[lang".to_string(),
            ..EditorConfig::with_locales(["en"])
        };

        let result = config.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("localeFieldName")),
                field!(ValidationError.message, contains_substring("Invalid property path"))
            ]])
        );
    }

    #[rstest]
    fn validate_collects_all_errors() {
        let config = EditorConfig { locale_field_name: String::new(), ..EditorConfig::default() };

        let errors = config.validate().unwrap_err();

        assert_that!(errors, len(eq(2)));
    }
}

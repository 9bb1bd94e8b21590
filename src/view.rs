//! View state for the surrounding presentation layer.
//!
//! The editor itself does not render anything. These helpers only decide
//! which locale tab should be active, given whatever the embedding read from
//! its environment (a cookie, a query parameter, a stored preference), and
//! bundle the pass-through flags a presentation layer needs.

use serde::Serialize;

use crate::config::EditorConfig;

/// Sentinel selection meaning "show every locale at once".
pub const ALL_LOCALES: &str = "__all__";

/// Resolves the locale the editor should open with.
///
/// A requested value is honored when it is [`ALL_LOCALES`] or one of the
/// configured locales; anything else falls back to the first configured
/// locale.
#[must_use]
pub fn selected_locale<'a>(config: &'a EditorConfig, requested: Option<&'a str>) -> &'a str {
    let fallback = config.locales.first().map_or(ALL_LOCALES, String::as_str);
    match requested {
        Some(value)
            if value == ALL_LOCALES
                || config.locales.iter().any(|locale| locale.as_str() == value) =>
        {
            value
        }
        _ => fallback,
    }
}

/// Pass-through state for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    /// The active locale tab, or [`ALL_LOCALES`].
    pub selected_locale: String,
    /// Whether the null locale slot is managed.
    pub null_locale_enabled: bool,
    /// Whether the editor opens with the null locale selected.
    pub null_locale_selected: bool,
}

impl EditorView {
    /// Builds the view state from the configuration and an optional
    /// previously selected locale.
    #[must_use]
    pub fn new(config: &EditorConfig, requested: Option<&str>) -> Self {
        Self {
            selected_locale: selected_locale(config, requested).to_string(),
            null_locale_enabled: config.null_locale_enabled,
            null_locale_selected: config.null_locale_selected,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::configured_locale(Some("fr"), "fr")]
    #[case::all_locales(Some("__all__"), "__all__")]
    #[case::unknown_locale(Some("xx"), "en")]
    #[case::nothing_requested(None, "en")]
    fn selection_falls_back_to_the_first_locale(
        #[case] requested: Option<&str>,
        #[case] expected: &str,
    ) {
        let config = EditorConfig::with_locales(["en", "fr"]);

        assert_that!(selected_locale(&config, requested), eq(expected));
    }

    #[rstest]
    fn view_carries_null_locale_flags() {
        let config = EditorConfig {
            null_locale_enabled: true,
            null_locale_selected: true,
            ..EditorConfig::with_locales(["en"])
        };

        let view = EditorView::new(&config, None);

        assert_that!(view.selected_locale, eq("en"));
        assert_that!(view.null_locale_enabled, eq(true));
        assert_that!(view.null_locale_selected, eq(true));
    }
}

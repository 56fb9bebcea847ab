//! Display preferences.

use serde::{Deserialize, Serialize};
use vb_core::round_half_up;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalSeparator {
    #[default]
    Point,
    Comma,
}

impl DecimalSeparator {
    pub fn as_char(self) -> char {
        match self {
            DecimalSeparator::Point => '.',
            DecimalSeparator::Comma => ',',
        }
    }
}

/// How numbers are rendered for people. Passed explicitly to every formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    #[serde(default)]
    pub decimal_separator: DecimalSeparator,
}

fn default_decimals() -> u32 {
    2
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: Language::default(),
            decimals: default_decimals(),
            decimal_separator: DecimalSeparator::default(),
        }
    }
}

impl Preferences {
    /// Defaults for a language: French uses a decimal comma.
    pub fn for_language(language: Language) -> Self {
        let decimal_separator = match language {
            Language::En => DecimalSeparator::Point,
            Language::Fr => DecimalSeparator::Comma,
        };
        Self {
            language,
            decimal_separator,
            ..Self::default()
        }
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }
}

/// Render `value` with the preferred number of decimals and separator.
pub fn format_number(value: f64, prefs: &Preferences) -> String {
    format_with(value, prefs.decimals, prefs)
}

/// Like [`format_number`] with an explicit number of decimals.
///
/// Ties round away from zero on the magnitude, so `-0.125` shows as `-0.13`.
pub fn format_with(value: f64, decimals: u32, prefs: &Preferences) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let rounded = round_half_up(value.abs(), decimals).copysign(value);
    let text = format!("{:.*}", decimals as usize, rounded);
    let text = if text.trim_start_matches(['-', '0', '.']).is_empty() {
        text.trim_start_matches('-').to_string()
    } else {
        text
    };
    match prefs.decimal_separator {
        DecimalSeparator::Point => text,
        DecimalSeparator::Comma => text.replace('.', ","),
    }
}

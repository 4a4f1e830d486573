//! Locale-aware numeral formatting used when building cards and rows.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fa,
}

/// A signed percent change: the raw value picks the color, `text` is localized.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub percent: f64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct NumberFormatter {
    locale: Locale,
    unit: String,
}

impl NumberFormatter {
    pub fn new(locale: Locale, unit: &str) -> Self {
        Self {
            locale,
            unit: unit.to_string(),
        }
    }

    /// Monetary unit shown next to amounts.
    pub fn unit(&self) -> String {
        self.localize(&self.unit)
    }

    /// Rounds to a whole amount and groups thousands.
    pub fn amount(&self, value: f64) -> String {
        let rounded = value.round();
        let digits = format!("{:.0}", rounded.abs());
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if rounded < 0.0 {
            grouped.insert(0, '-');
        }
        self.localize(&grouped)
    }

    pub fn count(&self, value: u64) -> String {
        self.amount(value as f64)
    }

    pub fn percent(&self, value: f64) -> String {
        self.localize(&format!("{value:.2}%"))
    }

    pub fn change(&self, percent: f64) -> Change {
        Change {
            percent,
            text: self.percent(percent),
        }
    }

    /// Swaps ASCII digits for the locale's numerals.
    pub fn localize(&self, text: &str) -> String {
        match self.locale {
            Locale::En => text.to_string(),
            Locale::Fa => text
                .chars()
                .map(|c| match c.to_digit(10) {
                    Some(d) if c.is_ascii_digit() => {
                        char::from_u32('\u{06F0}' as u32 + d).unwrap_or(c)
                    }
                    _ => c,
                })
                .collect(),
        }
    }
}

impl Default for NumberFormatter {
    fn default() -> Self {
        Self::new(Locale::En, "IRR")
    }
}

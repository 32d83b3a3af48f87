use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatioCategory {
    Liquidity,
    Leverage,
    Efficiency,
    Profitability,
    MarketValue,
}

impl RatioCategory {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Liquidity => "Liquidity",
            Self::Leverage => "Leverage",
            Self::Efficiency => "Efficiency",
            Self::Profitability => "Profitability",
            Self::MarketValue => "Market Value",
        }
    }

    /// Accepts the display name in any case, with or without its space
    /// ("market value", "MarketValue").
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        [
            Self::Liquidity,
            Self::Leverage,
            Self::Efficiency,
            Self::Profitability,
            Self::MarketValue,
        ]
        .into_iter()
        .find(|c| c.display_name().replace(' ', "").eq_ignore_ascii_case(&wanted))
    }
}

impl fmt::Display for RatioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A knowledge-base entry. `name` is the lower-case key matched against queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatioDefinition {
    pub name: &'static str,
    pub category: RatioCategory,
    pub formula: &'static str,
    pub description: &'static str,
}

impl RatioDefinition {
    /// Capitalises the first letter of every word, where any non-alphabetic
    /// character starts a new word ("p/e ratio" -> "P/E Ratio").
    pub fn title(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut word_start = true;
        for c in self.name.chars() {
            if c.is_alphabetic() {
                if word_start {
                    out.extend(c.to_uppercase());
                } else {
                    out.extend(c.to_lowercase());
                }
                word_start = false;
            } else {
                out.push(c);
                word_start = true;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &'static str) -> RatioDefinition {
        RatioDefinition {
            name,
            category: RatioCategory::MarketValue,
            formula: "",
            description: "",
        }
    }

    #[test]
    fn title_capitalises_after_punctuation() {
        assert_eq!(def("p/e ratio").title(), "P/E Ratio");
        assert_eq!(def("debt-to-equity").title(), "Debt-To-Equity");
        assert_eq!(def("eps").title(), "Eps");
    }

    #[test]
    fn category_from_name_ignores_case_and_spacing() {
        assert_eq!(RatioCategory::from_name("market value"), Some(RatioCategory::MarketValue));
        assert_eq!(RatioCategory::from_name("MarketValue"), Some(RatioCategory::MarketValue));
        assert_eq!(RatioCategory::from_name("LIQUIDITY"), Some(RatioCategory::Liquidity));
        assert_eq!(RatioCategory::from_name("solvency"), None);
    }

    #[test]
    fn market_value_has_spaced_display_name() {
        assert_eq!(RatioCategory::MarketValue.to_string(), "Market Value");
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The ratios produced by the calculator, in output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatioName {
    #[serde(rename = "Current Ratio")]
    CurrentRatio,
    #[serde(rename = "Quick Ratio")]
    QuickRatio,
    #[serde(rename = "Debt Ratio")]
    DebtRatio,
    #[serde(rename = "Debt-to-Equity")]
    DebtToEquity,
    #[serde(rename = "Asset Turnover")]
    AssetTurnover,
    #[serde(rename = "ROA")]
    Roa,
    #[serde(rename = "ROE")]
    Roe,
    #[serde(rename = "EPS")]
    Eps,
}

impl RatioName {
    pub const ALL: [RatioName; 8] = [
        Self::CurrentRatio,
        Self::QuickRatio,
        Self::DebtRatio,
        Self::DebtToEquity,
        Self::AssetTurnover,
        Self::Roa,
        Self::Roe,
        Self::Eps,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::CurrentRatio => "Current Ratio",
            Self::QuickRatio => "Quick Ratio",
            Self::DebtRatio => "Debt Ratio",
            Self::DebtToEquity => "Debt-to-Equity",
            Self::AssetTurnover => "Asset Turnover",
            Self::Roa => "ROA",
            Self::Roe => "ROE",
            Self::Eps => "EPS",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for RatioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ratios for a single period. `None` marks an undefined cell (missing input
/// or zero denominator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRow {
    pub period: String,
    pub total_equity: Option<f64>,
    pub values: BTreeMap<RatioName, Option<f64>>,
}

impl RatioRow {
    pub fn get(&self, ratio: RatioName) -> Option<f64> {
        self.values.get(&ratio).copied().flatten()
    }
}

/// Period-indexed ratio table. Rows keep the order the periods were requested in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioResult {
    pub rows: Vec<RatioRow>,
}

impl RatioResult {
    pub fn periods(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.period.as_str())
    }

    pub fn row(&self, period: &str) -> Option<&RatioRow> {
        self.rows.iter().find(|r| r.period == period)
    }

    pub fn value(&self, period: &str, ratio: RatioName) -> Option<f64> {
        self.row(period).and_then(|r| r.get(ratio))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

use crate::domain::ratio::{RatioCategory, RatioDefinition};

const fn entry(
    name: &'static str,
    category: RatioCategory,
    formula: &'static str,
    description: &'static str,
) -> RatioDefinition {
    RatioDefinition {
        name,
        category,
        formula,
        description,
    }
}

// Declaration order is the match order for `lookup`.
static CATALOG: [RatioDefinition; 18] = [
    // Liquidity
    entry(
        "current ratio",
        RatioCategory::Liquidity,
        "Current Assets / Current Liabilities",
        "Measures a company’s ability to pay short-term obligations.",
    ),
    entry(
        "quick ratio",
        RatioCategory::Liquidity,
        "(Current Assets − Inventories) / Current Liabilities",
        "Also called the acid-test ratio, it measures immediate short-term liquidity.",
    ),
    entry(
        "cash ratio",
        RatioCategory::Liquidity,
        "Cash / Current Liabilities",
        "The most conservative liquidity ratio. Only includes cash.",
    ),
    // Leverage
    entry(
        "debt-to-equity",
        RatioCategory::Leverage,
        "Total Liabilities / Shareholders’ Equity",
        "Indicates the proportion of equity and debt used to finance assets.",
    ),
    entry(
        "debt ratio",
        RatioCategory::Leverage,
        "Total Liabilities / Total Assets",
        "Shows the percentage of assets financed with debt.",
    ),
    entry(
        "interest coverage",
        RatioCategory::Leverage,
        "EBIT / Interest Expense",
        "Assesses a company’s ability to meet interest payments.",
    ),
    // Efficiency
    entry(
        "inventory turnover",
        RatioCategory::Efficiency,
        "COGS / Average Inventory",
        "Shows how often inventory is sold and replaced.",
    ),
    entry(
        "asset turnover",
        RatioCategory::Efficiency,
        "Revenue / Total Assets",
        "Measures efficiency in using assets to generate sales.",
    ),
    entry(
        "receivables turnover",
        RatioCategory::Efficiency,
        "Net Credit Sales / Avg. Accounts Receivable",
        "Measures effectiveness in collecting receivables.",
    ),
    entry(
        "payables turnover",
        RatioCategory::Efficiency,
        "COGS / Avg. Accounts Payable",
        "Shows how quickly a company pays its suppliers.",
    ),
    // Profitability
    entry(
        "gross profit margin",
        RatioCategory::Profitability,
        "(Revenue − COGS) / Revenue",
        "Measures the % of revenue retained after direct costs.",
    ),
    entry(
        "net profit margin",
        RatioCategory::Profitability,
        "Net Income / Revenue",
        "Shows overall profitability after all expenses.",
    ),
    entry(
        "return on assets",
        RatioCategory::Profitability,
        "Net Income / Total Assets",
        "Indicates how efficient a company is in using assets.",
    ),
    entry(
        "return on equity",
        RatioCategory::Profitability,
        "Net Income / Shareholders’ Equity",
        "Shows the return generated on shareholders’ investments.",
    ),
    // Market value
    entry(
        "eps",
        RatioCategory::MarketValue,
        "Net Income / Shares Outstanding",
        "Earnings per share – a key indicator of profitability.",
    ),
    entry(
        "p/e ratio",
        RatioCategory::MarketValue,
        "Price per Share / EPS",
        "Shows how much investors pay per RM of earnings.",
    ),
    entry(
        "market-to-book",
        RatioCategory::MarketValue,
        "Market Value per Share / Book Value per Share",
        "Compares market value of equity to its book value.",
    ),
    entry(
        "dividend yield",
        RatioCategory::MarketValue,
        "Dividends per Share / Price per Share",
        "Shows cash return from owning the stock.",
    ),
];

pub const NOT_FOUND_HINT: &str =
    "I couldn’t find that ratio. Try asking about ROE, P/E, or Current Ratio.";

pub fn catalog() -> &'static [RatioDefinition] {
    &CATALOG
}

pub fn by_category(category: RatioCategory) -> impl Iterator<Item = &'static RatioDefinition> {
    CATALOG.iter().filter(move |d| d.category == category)
}

/// Returns the first catalog entry (in declaration order) whose key occurs in
/// the lower-cased query. This is first-match, not best-match: a query naming
/// both "debt ratio" and "debt-to-equity" resolves to debt-to-equity, and
/// short keys such as "eps" also match inside longer words ("steps").
pub fn lookup(query: &str) -> Option<&'static RatioDefinition> {
    let normalized = query.to_lowercase();
    let found = CATALOG.iter().find(|d| normalized.contains(d.name));
    tracing::debug!(query, matched = found.map(|d| d.name), "knowledge base lookup");
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_key_inside_question() {
        let def = lookup("What is the Quick Ratio?").unwrap();
        assert_eq!(def.name, "quick ratio");
        assert_eq!(def.category, RatioCategory::Liquidity);
    }

    #[test]
    fn every_catalog_key_is_found_by_itself() {
        for def in catalog() {
            let query = format!("Explain {}", def.name.to_uppercase());
            assert_eq!(lookup(&query).map(|d| d.name), Some(def.name));
        }
    }

    #[test]
    fn unknown_query_is_not_found() {
        assert!(lookup("what is working capital?").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn abbreviation_roe_is_not_a_key() {
        assert!(lookup("What is ROE?").is_none());
        assert_eq!(lookup("What is return on equity?").unwrap().name, "return on equity");
    }

    #[test]
    fn first_declared_key_wins_when_several_match() {
        let def = lookup("compare the debt ratio with debt-to-equity").unwrap();
        assert_eq!(def.name, "debt-to-equity");

        let def = lookup("current ratio or quick ratio?").unwrap();
        assert_eq!(def.name, "current ratio");
    }

    #[test]
    fn short_key_matches_inside_longer_words() {
        assert_eq!(lookup("next steps").unwrap().name, "eps");
    }

    #[test]
    fn catalog_is_grouped_by_category() {
        assert_eq!(catalog().len(), 18);
        assert_eq!(by_category(RatioCategory::Efficiency).count(), 4);
        assert_eq!(by_category(RatioCategory::MarketValue).count(), 4);
        let mut names: Vec<_> = catalog().iter().map(|d| d.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 18);
    }
}

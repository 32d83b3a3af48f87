use crate::domain::result::{RatioName, RatioResult};
use crate::error::CalcError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SELECTION: [RatioName; 2] = [RatioName::CurrentRatio, RatioName::DebtRatio];

/// One (period, ratio, value) observation in long format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub ratio: RatioName,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub ratio: RatioName,
    pub points: Vec<SeriesPoint>,
}

/// Ratio names offered for plotting, alphabetically.
pub fn available_ratios() -> Vec<RatioName> {
    let mut names = RatioName::ALL.to_vec();
    names.sort_by_key(|r| r.label());
    names
}

pub fn melt(result: &RatioResult) -> Vec<TrendPoint> {
    result
        .rows
        .iter()
        .flat_map(|row| {
            RatioName::ALL.into_iter().map(move |ratio| TrendPoint {
                period: row.period.clone(),
                ratio,
                value: row.get(ratio),
            })
        })
        .collect()
}

/// One series per selected ratio, in selection order. Repeated selections
/// collapse to the first occurrence.
pub fn select(result: &RatioResult, ratios: &[RatioName]) -> Result<Vec<TrendSeries>, CalcError> {
    if ratios.is_empty() {
        return Err(CalcError::processing("no ratios selected"));
    }

    let mut out: Vec<TrendSeries> = Vec::with_capacity(ratios.len());
    for &ratio in ratios {
        if out.iter().any(|s| s.ratio == ratio) {
            continue;
        }
        let points = result
            .rows
            .iter()
            .map(|row| SeriesPoint {
                period: row.period.clone(),
                value: row.get(ratio),
            })
            .collect();
        out.push(TrendSeries { ratio, points });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{compute, AuxiliarySeries, TOTAL_ASSETS, TOTAL_CURRENT_ASSETS};
    use crate::statement::FinancialStatement;

    fn sample() -> RatioResult {
        let st = FinancialStatement::default()
            .with_values(TOTAL_CURRENT_ASSETS, &[("2019", 1_000_000.0), ("2020", 1_050_000.0)])
            .with_values(TOTAL_ASSETS, &[("2019", 5_000_000.0), ("2020", 4_200_000.0)]);
        let periods = vec!["2019".to_string(), "2020".to_string()];
        compute(&st, &periods, &AuxiliarySeries::reference()).unwrap()
    }

    #[test]
    fn available_ratios_are_sorted_by_label() {
        let labels: Vec<_> = available_ratios().into_iter().map(|r| r.label()).collect();
        assert_eq!(labels.first(), Some(&"Asset Turnover"));
        assert_eq!(labels.last(), Some(&"ROE"));
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn melt_emits_every_cell() {
        let points = melt(&sample());
        assert_eq!(points.len(), 2 * RatioName::ALL.len());
        assert_eq!(points[0].period, "2019");
        assert_eq!(points[0].ratio, RatioName::CurrentRatio);
        assert_eq!(points[8].period, "2020");
    }

    #[test]
    fn default_selection_gives_two_series() {
        let series = select(&sample(), &DEFAULT_SELECTION).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].ratio, RatioName::CurrentRatio);
        assert_eq!(series[1].points[1].value, Some(1.0));
    }

    #[test]
    fn undefined_cells_stay_undefined_in_series() {
        // 2020: liabilities equal total assets, so equity is zero.
        let series = select(&sample(), &[RatioName::Roe]).unwrap();
        assert!(series[0].points[0].value.is_some());
        assert_eq!(series[0].points[1].value, None);
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert!(select(&sample(), &[]).is_err());
    }

    #[test]
    fn repeated_selection_is_deduplicated() {
        let series = select(&sample(), &[RatioName::Eps, RatioName::Eps]).unwrap();
        assert_eq!(series.len(), 1);
    }
}

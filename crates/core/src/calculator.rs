use crate::domain::result::{RatioName, RatioResult, RatioRow};
use crate::error::CalcError;
use crate::statement::{Cell, FinancialStatement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TOTAL_CURRENT_ASSETS: &str = "Total current assets";
pub const TOTAL_ASSETS: &str = "Total assets";
pub const INVENTORIES: &str = "Inventories";
pub const RECEIVABLES: &str = "Trade and other receivables";

pub const REQUIRED_LINE_ITEMS: [&str; 2] = [TOTAL_CURRENT_ASSETS, TOTAL_ASSETS];

/// Per-period figures that the balance sheet upload does not carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxiliarySeries {
    pub total_liabilities: BTreeMap<String, f64>,
    pub net_income: BTreeMap<String, f64>,
    pub shares_outstanding: BTreeMap<String, f64>,
}

impl AuxiliarySeries {
    /// The illustrative figures used by the classroom demo for 2019-2023.
    /// They are not derived from any uploaded statement.
    pub fn reference() -> Self {
        let periods = reference_periods();
        let liabilities = [4_000_000.0, 4_200_000.0, 4_500_000.0, 4_700_000.0, 4_300_000.0];
        let net_income = [300_000.0, 350_000.0, 370_000.0, 390_000.0, 360_000.0];

        let zip = |values: [f64; 5]| -> BTreeMap<String, f64> {
            periods.iter().cloned().zip(values).collect()
        };
        Self {
            total_liabilities: zip(liabilities),
            net_income: zip(net_income),
            shares_outstanding: zip([100_000.0; 5]),
        }
    }

    pub fn with_period(
        mut self,
        period: &str,
        total_liabilities: f64,
        net_income: f64,
        shares_outstanding: f64,
    ) -> Self {
        self.total_liabilities.insert(period.to_string(), total_liabilities);
        self.net_income.insert(period.to_string(), net_income);
        self.shares_outstanding.insert(period.to_string(), shares_outstanding);
        self
    }
}

pub fn reference_periods() -> Vec<String> {
    (2019..=2023).map(|y| y.to_string()).collect()
}

/// Computes the ratio table for `periods`, in the order given.
///
/// "Total current assets" and "Total assets" must exist for every requested
/// period. Inventories and receivables count as zero when absent; other rows,
/// cash included, are never read and so cannot fail the calculation.
/// Asset turnover is receivables / total assets, a proxy rather than the
/// revenue-based definition. Any division by zero or by a missing figure
/// leaves that cell undefined.
pub fn compute(
    statement: &FinancialStatement,
    periods: &[String],
    auxiliary: &AuxiliarySeries,
) -> Result<RatioResult, CalcError> {
    if periods.is_empty() {
        return Err(CalcError::processing("no periods requested"));
    }

    for label in REQUIRED_LINE_ITEMS {
        let item = statement
            .line_item(label)?
            .ok_or_else(|| CalcError::MissingLineItem(label.to_string()))?;
        if periods.iter().any(|p| !item.cells.contains_key(p)) {
            return Err(CalcError::MissingLineItem(label.to_string()));
        }
    }

    let mut rows = Vec::with_capacity(periods.len());
    for period in periods {
        let current_assets = required_value(statement, TOTAL_CURRENT_ASSETS, period)?;
        let total_assets = required_value(statement, TOTAL_ASSETS, period)?;
        let inventories = optional_value(statement, INVENTORIES, period)?;
        let receivables = optional_value(statement, RECEIVABLES, period)?;

        let total_liabilities = auxiliary.total_liabilities.get(period).copied();
        let net_income = auxiliary.net_income.get(period).copied();
        let shares = auxiliary.shares_outstanding.get(period).copied();

        let total_equity = sub(total_assets, total_liabilities);

        let values = BTreeMap::from([
            (RatioName::CurrentRatio, div(current_assets, total_liabilities)),
            (
                RatioName::QuickRatio,
                div(sub(current_assets, Some(inventories)), total_liabilities),
            ),
            (RatioName::DebtRatio, div(total_liabilities, total_assets)),
            (RatioName::DebtToEquity, div(total_liabilities, total_equity)),
            (RatioName::AssetTurnover, div(Some(receivables), total_assets)),
            (RatioName::Roa, div(net_income, total_assets)),
            (RatioName::Roe, div(net_income, total_equity)),
            (RatioName::Eps, div(net_income, shares)),
        ]);

        rows.push(RatioRow {
            period: period.clone(),
            total_equity,
            values,
        });
    }

    let undefined = rows
        .iter()
        .flat_map(|r| r.values.values())
        .filter(|v| v.is_none())
        .count();
    tracing::debug!(periods = rows.len(), undefined, "ratios computed");

    Ok(RatioResult { rows })
}

fn cell_value(label: &str, period: &str, cell: &Cell) -> Result<Option<f64>, CalcError> {
    match cell {
        Cell::Number(v) => Ok(Some(*v)),
        Cell::Empty => Ok(None),
        Cell::Text(t) => Err(CalcError::processing(format!(
            "'{label}' for {period} is not a number: '{t}'"
        ))),
    }
}

fn required_value(
    statement: &FinancialStatement,
    label: &str,
    period: &str,
) -> Result<Option<f64>, CalcError> {
    match statement.line_item(label)?.and_then(|i| i.cells.get(period)) {
        Some(cell) => cell_value(label, period, cell),
        None => Err(CalcError::MissingLineItem(label.to_string())),
    }
}

fn optional_value(
    statement: &FinancialStatement,
    label: &str,
    period: &str,
) -> Result<f64, CalcError> {
    match statement.line_item(label)?.and_then(|i| i.cells.get(period)) {
        Some(cell) => Ok(cell_value(label, period, cell)?.unwrap_or(0.0)),
        None => Ok(0.0),
    }
}

fn sub(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

fn div(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    let (num, den) = (num?, den?);
    if den == 0.0 {
        return None;
    }
    let q = num / den;
    q.is_finite().then_some(q)
}

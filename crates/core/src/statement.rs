use crate::error::CalcError;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;

/// Leading rows above the column header in the reference upload layout.
pub const DEFAULT_HEADER_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Empty,
    Text(String),
}

impl Cell {
    /// Parses a spreadsheet cell. Thousands separators are dropped and
    /// accounting parentheses mean a negative amount; a bare dash is empty.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() || matches!(s, "-" | "–" | "—") {
            return Cell::Empty;
        }

        let (negative, body) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            Some(inner) => (true, inner),
            None => (false, s),
        };
        let cleaned: String = body.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();

        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(if negative { -v } else { v }),
            Ok(_) => Cell::Empty,
            Err(_) => Cell::Text(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub label: String,
    pub cells: BTreeMap<String, Cell>,
}

/// Line items x periods, as read from one uploaded statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialStatement {
    periods: Vec<String>,
    items: Vec<LineItem>,
}

impl FinancialStatement {
    pub fn new(periods: Vec<String>) -> Self {
        Self {
            periods,
            items: Vec::new(),
        }
    }

    /// Adds a numeric row; periods not seen before are appended to the columns.
    pub fn with_values(mut self, label: &str, values: &[(&str, f64)]) -> Self {
        let cells = values
            .iter()
            .map(|(p, v)| (p.to_string(), Cell::Number(*v)))
            .collect();
        self.push_row(label, cells);
        self
    }

    pub fn push_row(&mut self, label: &str, cells: Vec<(String, Cell)>) {
        for (period, _) in &cells {
            if !self.periods.iter().any(|p| p == period) {
                self.periods.push(period.clone());
            }
        }
        self.items.push(LineItem {
            label: label.trim().to_string(),
            cells: cells.into_iter().collect(),
        });
    }

    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.items
    }

    /// Finds a line item by its trimmed label. A label that appears on more
    /// than one row is ambiguous and rejected.
    pub fn line_item(&self, label: &str) -> Result<Option<&LineItem>, CalcError> {
        let mut matches = self.items.iter().filter(|i| i.label == label);
        let first = matches.next();
        let extra = matches.count();
        if extra > 0 {
            return Err(CalcError::processing(format!(
                "line item '{label}' appears {} times",
                extra + 1
            )));
        }
        Ok(first)
    }
}

/// Reads a CSV export of a statement. The first `header_rows` records are
/// skipped, the next record holds the period labels (its first column is the
/// line-item column and is ignored), and every later record is a line item.
pub fn read_statement<R: Read>(reader: R, header_rows: usize) -> Result<FinancialStatement, CalcError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = csv_reader.records().skip(header_rows);

    let header = match records.next() {
        Some(rec) => rec.map_err(|e| CalcError::processing(format!("unreadable header row: {e}")))?,
        None => {
            return Err(CalcError::processing(format!(
                "no header row after skipping {header_rows} rows"
            )))
        }
    };

    // Column index -> period label; unlabeled columns are ignored.
    let mut columns: Vec<(usize, String)> = Vec::new();
    let mut seen = HashSet::new();
    for (idx, raw) in header.iter().enumerate().skip(1) {
        let label = normalize_period_label(raw);
        if label.is_empty() {
            continue;
        }
        if !seen.insert(label.clone()) {
            return Err(CalcError::processing(format!("duplicate period column '{label}'")));
        }
        columns.push((idx, label));
    }
    if columns.is_empty() {
        return Err(CalcError::processing("header row has no period columns"));
    }

    let mut statement = FinancialStatement::new(columns.iter().map(|(_, p)| p.clone()).collect());
    for (line, rec) in records.enumerate() {
        let rec = rec.map_err(|e| {
            CalcError::processing(format!("unreadable row {}: {e}", header_rows + line + 2))
        })?;
        let label = rec.get(0).unwrap_or("").trim();
        if label.is_empty() {
            continue;
        }
        let cells = columns
            .iter()
            .map(|(idx, period)| (period.clone(), Cell::parse(rec.get(*idx).unwrap_or(""))))
            .collect();
        statement.push_row(label, cells);
    }

    tracing::debug!(
        periods = statement.periods().len(),
        line_items = statement.line_items().len(),
        "statement read"
    );
    Ok(statement)
}

/// Spreadsheet exports often render year headers as floats ("2019.0").
fn normalize_period_label(raw: &str) -> String {
    let s = raw.trim();
    match s.strip_suffix(".0") {
        Some(whole) if !whole.is_empty() && whole.chars().all(|c| c.is_ascii_digit()) => {
            whole.to_string()
        }
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Company Berhad,,,,,
Statement of Financial Position,,,,,
As at 31 December,,,,,
(RM),,,,,
,,,,,
Item,2019,2020,2021,2022,2023
ASSETS,,,,,
Inventories,\"120,000\",\"130,000\",,-,(5)
Total current assets,\"1,000,000\",\"1,100,000\",\"1,200,000\",\"1,300,000\",\"1,250,000\"
  Total assets  ,\"5,000,000\",\"5,200,000\",\"5,600,000\",\"5,900,000\",\"5,400,000\"
Note,see appendix
";

    #[test]
    fn cell_parse_handles_statement_formats() {
        assert_eq!(Cell::parse("1,234.5"), Cell::Number(1234.5));
        assert_eq!(Cell::parse("(2,000)"), Cell::Number(-2000.0));
        assert_eq!(Cell::parse(" - "), Cell::Empty);
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("n.a."), Cell::Text("n.a.".to_string()));
    }

    #[test]
    fn skips_leading_rows_and_reads_periods() {
        let st = read_statement(SAMPLE.as_bytes(), DEFAULT_HEADER_ROWS).unwrap();
        assert_eq!(st.periods(), ["2019", "2020", "2021", "2022", "2023"]);

        let assets = st.line_item("Total assets").unwrap().unwrap();
        assert_eq!(assets.cells["2019"], Cell::Number(5_000_000.0));

        let inv = st.line_item("Inventories").unwrap().unwrap();
        assert_eq!(inv.cells["2021"], Cell::Empty);
        assert_eq!(inv.cells["2022"], Cell::Empty);
        assert_eq!(inv.cells["2023"], Cell::Number(-5.0));
    }

    #[test]
    fn short_rows_fill_with_empty_cells() {
        let st = read_statement(SAMPLE.as_bytes(), DEFAULT_HEADER_ROWS).unwrap();
        let note = st.line_item("Note").unwrap().unwrap();
        assert_eq!(note.cells["2019"], Cell::Text("see appendix".to_string()));
        assert_eq!(note.cells["2023"], Cell::Empty);
    }

    #[test]
    fn float_year_headers_are_normalized() {
        let csv = "Item,2019.0,2020.0\nTotal assets,1,2\n";
        let st = read_statement(csv.as_bytes(), 0).unwrap();
        assert_eq!(st.periods(), ["2019", "2020"]);
    }

    #[test]
    fn too_few_rows_is_a_processing_error() {
        let err = read_statement("a,b\n".as_bytes(), 5).unwrap_err();
        assert!(matches!(err, CalcError::Processing(_)));
    }

    #[test]
    fn duplicate_period_column_is_rejected() {
        let csv = "Item,2019,2019\nTotal assets,1,2\n";
        assert!(matches!(
            read_statement(csv.as_bytes(), 0),
            Err(CalcError::Processing(_))
        ));
    }

    #[test]
    fn duplicate_line_item_is_ambiguous() {
        let st = FinancialStatement::default()
            .with_values("Total assets", &[("2019", 1.0)])
            .with_values("Total assets", &[("2019", 2.0)]);
        assert!(st.line_item("Total assets").is_err());
        assert!(st.line_item("Inventories").unwrap().is_none());
    }
}

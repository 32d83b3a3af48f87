pub mod calculator;
pub mod domain;
pub mod error;
pub mod knowledge;
pub mod quiz;
pub mod statement;
pub mod trend;

pub mod config {
    use anyhow::Context;

    const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub port: u16,
        pub statement_header_rows: usize,
        pub periods: Vec<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let port = match get("PORT").filter(|s| !s.trim().is_empty()) {
                Some(s) => s.trim().parse::<u16>().context("PORT must be a port number")?,
                None => DEFAULT_PORT,
            };

            let header_rows = get("STATEMENT_HEADER_ROWS").filter(|s| !s.trim().is_empty());
            let statement_header_rows = match header_rows {
                Some(s) => s
                    .trim()
                    .parse::<usize>()
                    .context("STATEMENT_HEADER_ROWS must be a non-negative integer")?,
                None => crate::statement::DEFAULT_HEADER_ROWS,
            };

            let periods = match get("RATIO_PERIODS") {
                Some(s) => parse_periods(&s),
                None => crate::calculator::reference_periods(),
            };
            anyhow::ensure!(!periods.is_empty(), "RATIO_PERIODS must name at least one period");

            Ok(Self {
                sentry_dsn: get("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
                port,
                statement_header_rows,
                periods,
            })
        }
    }

    /// Splits a comma-separated period list, dropping blanks.
    pub fn parse_periods(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
            let map: HashMap<String, String> = vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Settings::from_lookup(|k| map.get(k).cloned())
        }

        #[test]
        fn defaults_match_reference_layout() {
            let s = settings(&[]).unwrap();
            assert_eq!(s.port, 3000);
            assert_eq!(s.statement_header_rows, 5);
            assert_eq!(s.periods, ["2019", "2020", "2021", "2022", "2023"]);
            assert!(s.sentry_dsn.is_none());
        }

        #[test]
        fn reads_overrides() {
            let s = settings(&[
                ("PORT", "8080"),
                ("STATEMENT_HEADER_ROWS", "0"),
                ("RATIO_PERIODS", " 2022, ,2023 "),
            ])
            .unwrap();
            assert_eq!(s.port, 8080);
            assert_eq!(s.statement_header_rows, 0);
            assert_eq!(s.periods, ["2022", "2023"]);
        }

        #[test]
        fn rejects_bad_values() {
            assert!(settings(&[("PORT", "http")]).is_err());
            assert!(settings(&[("RATIO_PERIODS", ",")]).is_err());
        }
    }
}

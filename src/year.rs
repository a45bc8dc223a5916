//! Selecting which years of a map to render.
use anyhow::{Context, Error, Result, bail, ensure};
use itertools::Itertools;
use std::str::FromStr;

/// The years requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearSelection {
    /// Every year which has flows
    All,
    /// An ascending list of distinct years
    Years(Vec<u32>),
}

impl FromStr for YearSelection {
    type Err = Error;

    /// Parse `all` (any case), a single year or years separated by semicolons (e.g. "2018;2020")
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        ensure!(!s.is_empty(), "No years provided");

        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let years: Vec<u32> = s
            .split(';')
            .map(|y| y.trim().parse().with_context(|| format!("Invalid year: {y}")))
            .try_collect()?;
        ensure!(
            years.iter().tuple_windows().all(|(a, b)| a < b),
            "Years must be in order and unique"
        );

        Ok(Self::Years(years))
    }
}

impl YearSelection {
    /// Resolve the selection against the years which have flows.
    ///
    /// Fails if any requested year has no flows.
    pub fn resolve(&self, flow_years: &[u32]) -> Result<Vec<u32>> {
        match self {
            Self::All => Ok(flow_years.to_vec()),
            Self::Years(years) => {
                if let Some(missing) = years.iter().find(|year| !flow_years.contains(year)) {
                    bail!("No flows found for year {missing}");
                }

                Ok(years.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;

    #[rstest]
    #[case("all", YearSelection::All)]
    #[case(" ALL ", YearSelection::All)]
    #[case("2020", YearSelection::Years(vec![2020]))]
    #[case("2018; 2021", YearSelection::Years(vec![2018, 2021]))]
    fn test_parse_year_selection(#[case] input: &str, #[case] expected: YearSelection) {
        assert_eq!(input.parse::<YearSelection>().unwrap(), expected);
    }

    #[rstest]
    #[case("", "No years provided")]
    #[case("a;2020", "Invalid year: a")]
    #[case("2021;2020", "Years must be in order and unique")]
    #[case("2020;2020", "Years must be in order and unique")]
    fn test_parse_year_selection_invalid(#[case] input: &str, #[case] error_msg: &str) {
        assert_error!(input.parse::<YearSelection>(), error_msg);
    }

    #[test]
    fn test_resolve() {
        let flow_years = [2018, 2019, 2020];
        assert_eq!(YearSelection::All.resolve(&flow_years).unwrap(), flow_years);
        assert_eq!(
            YearSelection::Years(vec![2019]).resolve(&flow_years).unwrap(),
            [2019]
        );
        assert_error!(
            YearSelection::Years(vec![2019, 2025]).resolve(&flow_years),
            "No flows found for year 2025"
        );
    }
}

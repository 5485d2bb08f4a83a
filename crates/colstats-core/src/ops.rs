//! Named reducers over a flat slice of `f64`.
//!
//! All four are order-independent up to floating-point rounding, so the
//! arrival order of per-file batches does not change the result beyond the
//! last bits of `sum`/`avg`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Sum,
    Avg,
    Min,
    Max,
}

impl Operation {
    pub const ALL: [Operation; 4] = [Operation::Sum, Operation::Avg, Operation::Min, Operation::Max];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Sum => "sum",
            Operation::Avg => "avg",
            Operation::Min => "min",
            Operation::Max => "max",
        }
    }

    /// Reduce `data` to a single value.
    ///
    /// Callers guarantee `data` is non-empty. On an empty slice `sum` is
    /// `0.0` and the others are `NaN`.
    pub fn apply(self, data: &[f64]) -> f64 {
        match self {
            Operation::Sum => sum(data),
            Operation::Avg => avg(data),
            Operation::Min => min(data),
            Operation::Max => max(data),
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sum" => Ok(Operation::Sum),
            "avg" => Ok(Operation::Avg),
            "min" => Ok(Operation::Min),
            "max" => Ok(Operation::Max),
            other => Err(Error::InvalidOperation(other.to_string())),
        }
    }
}

impl TryFrom<&str> for Operation {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn sum(data: &[f64]) -> f64 {
    let mut acc = 0.0;
    for v in data {
        acc += v;
    }
    acc
}

fn avg(data: &[f64]) -> f64 {
    sum(data) / data.len() as f64
}

fn min(data: &[f64]) -> f64 {
    let Some((&first, rest)) = data.split_first() else {
        return f64::NAN;
    };
    rest.iter().fold(first, |m, &v| if v < m { v } else { m })
}

fn max(data: &[f64]) -> f64 {
    let Some((&first, rest)) = data.split_first() else {
        return f64::NAN;
    };
    rest.iter().fold(first, |m, &v| if v > m { v } else { m })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn datasets() -> Vec<Vec<f64>> {
        vec![
            vec![10.0, 20.0, 15.0, 30.0, 45.0, 50.0, 100.0, 30.0],
            vec![
                5.5, 8.0, 2.2, 9.75, 8.45, 3.0, 2.5, 10.25, 4.75, 6.1, 7.67, 12.875, 5.47,
            ],
            vec![-10.0, -20.0],
            vec![102.0, 37.0, 44.0, 57.0, 67.0, 129.0],
        ]
    }

    #[test]
    fn sum_and_avg_match_known_values() {
        let data = datasets();
        let sums = [300.0, 86.515, -30.0, 436.0];
        let avgs = [37.5, 6.655, -15.0, 72.66666666666667];
        for (i, d) in data.iter().enumerate() {
            assert_eq!(Operation::Sum.apply(d), sums[i], "sum_{i}");
            assert_eq!(Operation::Avg.apply(d), avgs[i], "avg_{i}");
        }
    }

    #[test]
    fn avg_is_sum_over_len() {
        for d in datasets() {
            assert_eq!(
                Operation::Avg.apply(&d),
                Operation::Sum.apply(&d) / d.len() as f64
            );
        }
    }

    #[test]
    fn min_max_are_literal_extremes() {
        let d = &datasets()[1];
        assert_eq!(Operation::Min.apply(d), 2.2);
        assert_eq!(Operation::Max.apply(d), 12.875);
        assert_eq!(Operation::Min.apply(&[-10.0, -20.0]), -20.0);
        assert_eq!(Operation::Max.apply(&[7.0]), 7.0);
    }

    #[test]
    fn parse_names() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
        let err = "median".parse::<Operation>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert!("SUM".parse::<Operation>().is_err());
    }

    #[test]
    fn empty_input_does_not_panic() {
        assert_eq!(Operation::Sum.apply(&[]), 0.0);
        assert!(Operation::Avg.apply(&[]).is_nan());
        assert!(Operation::Min.apply(&[]).is_nan());
        assert!(Operation::Max.apply(&[]).is_nan());
    }
}
